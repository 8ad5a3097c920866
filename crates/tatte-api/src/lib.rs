//! Vendor-plugin contract for the Tatt-E tattoo-recognition evaluation.
//!
//! A vendor library links against this crate and implements one of two
//! interface revisions; the test harness drives the implementation through
//! the trait methods in a fixed call sequence and consumes the outputs
//! (templates, bounding boxes, quality scores, candidates).
//!
//! - [`v1`] splits the contract into an identification capability and a
//!   detect-and-localize capability, with templates carried in the
//!   [`v1::TattooRep`] container.
//! - [`v2`] unifies both capabilities into a single [`v2::Interface`],
//!   replaces the template container with an opaque byte sequence, reports
//!   every tattoo per input image (nested bounding boxes), and makes
//!   enrollment finalization aware of the gallery composition.
//!
//! Nothing here is asynchronous, cancellable, or time-boxed: every call is a
//! blocking request/response, and retry or scheduling policy belongs
//! entirely to the calling harness. The harness may fork many worker
//! processes, each running its own one-time initialization followed by many
//! template-creation calls, so implementations must not assume a
//! single-process lifetime.

pub mod v1;
pub mod v2;

pub use tatte_types as types;
