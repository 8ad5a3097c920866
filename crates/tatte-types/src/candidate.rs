use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Similarity score carried by an unassigned candidate slot.
pub const UNASSIGNED_SCORE: f64 = -1.0;

/// One entry in the result list of an identification search.
///
/// A conforming search returns at most `candidate_list_length` entries, with
/// the assigned entries in non-increasing order of similarity score (most
/// similar first). Higher scores mean a higher likelihood that the probe and
/// the enrolled sample show the same tattoo; the absolute scale is
/// vendor-defined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// True when the slot holds a real result; false when the computation
    /// for this slot failed or produced nothing
    pub is_assigned: bool,
    /// Template ID from the enrollment database manifest
    pub template_id: String,
    /// Vendor-defined similarity measure, higher is more similar
    pub similarity_score: f64,
}

impl Candidate {
    /// An assigned candidate.
    pub fn new(template_id: impl Into<String>, similarity_score: f64) -> Self {
        Self {
            is_assigned: true,
            template_id: template_id.into(),
            similarity_score,
        }
    }
}

impl Default for Candidate {
    /// The unassigned sentinel: no id, score of [`UNASSIGNED_SCORE`].
    fn default() -> Self {
        Self {
            is_assigned: false,
            template_id: String::new(),
            similarity_score: UNASSIGNED_SCORE,
        }
    }
}

/// Order candidates by descending similarity score, most similar first.
/// NaN scores sort last.
pub fn sort_descending(candidates: &mut [Candidate]) {
    candidates.sort_by(|a, b| {
        b.similarity_score
            .partial_cmp(&a.similarity_score)
            .unwrap_or(Ordering::Equal)
    });
}
