use serde::{Deserialize, Serialize};

/// Intended usage of a template, fixed at template-creation time.
///
/// Implementations may extract differently for the two roles, but the
/// enrollment and search sides must stay comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateRole {
    /// Enrollment template destined for the gallery
    Enrollment,
    /// Identification template used to search the gallery
    Identification,
}
