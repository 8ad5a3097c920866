use serde::{Deserialize, Serialize};

/// Axis-aligned box around one detected tattoo, in pixel coordinates of the
/// host image with the origin at the top-left corner.
///
/// Coordinates are not clipped by this type; keeping the box inside the host
/// image bounds is the producer's obligation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// X-coordinate of the top-left corner
    pub x: u16,
    /// Y-coordinate of the top-left corner
    pub y: u16,
    /// Width of the box in pixels
    pub width: u16,
    /// Height of the box in pixels
    pub height: u16,
    /// Certainty that the region contains a tattoo, on [0, 1], higher is
    /// more certain. Populated by revision 1 localization; revision 2 of the
    /// API dropped per-box confidence, so boxes produced under it carry
    /// `None`.
    pub confidence: Option<f64>,
}

impl BoundingBox {
    /// A box without a confidence value (revision 2 form).
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
            confidence: None,
        }
    }

    /// A box carrying its own confidence (revision 1 localization form).
    pub fn with_confidence(x: u16, y: u16, width: u16, height: u16, confidence: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            confidence: Some(confidence),
        }
    }
}
