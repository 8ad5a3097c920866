//! Shared data model for the Tatt-E tattoo-recognition vendor-plugin API.
//!
//! These are the boundary types exchanged between the test harness and a
//! vendor implementation: raster images, bounding boxes, template roles,
//! status codes, and search candidates. The trait contracts that consume
//! them live in the `tatte-api` crate.

pub mod bounding_box;
pub mod candidate;
pub mod image;
pub mod role;
pub mod status;

pub use bounding_box::BoundingBox;
pub use candidate::Candidate;
pub use image::{Image, ImageType, PixelDepth};
pub use role::TemplateRole;
pub use status::{ReturnCode, ReturnStatus};
