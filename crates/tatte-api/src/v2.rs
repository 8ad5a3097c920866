//! Revision 2 of the plugin contract.
//!
//! A single [`Interface`] trait replaces the split capability traits of
//! [`crate::v1`]. The notable changes:
//!
//! - templates are plain opaque byte sequences; the `TattooRep` container is
//!   gone,
//! - template creation reports every tattoo found in every input image, as
//!   one list of bounding boxes per image,
//! - enrollment finalization receives the gallery composition
//!   ([`GalleryType`]) so implementations can adapt their indexing,
//! - detection returns bounding boxes directly; the separate localization
//!   call is gone, and per-box confidence with it.

use std::path::Path;
use tatte_types::{BoundingBox, Candidate, Image, ReturnStatus, TemplateRole};

/// Major version of this interface revision.
pub const API_MAJOR_VERSION: u16 = 2;
/// Minor version of this interface revision.
pub const API_MINOR_VERSION: u16 = 0;

/// How the enrollment gallery is composed, fixed per
/// [`Interface::finalize_enrollment`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryType {
    /// Subject-based: all templates of one subject are consolidated
    Consolidated,
    /// Event-based: one template per capture event, subjects may repeat
    Unconsolidated,
}

/// Payload of a successful [`Interface::create_template`] call.
#[derive(Debug, Clone)]
pub struct TemplateOutput {
    /// Opaque template bytes; the encoding is vendor-defined and the
    /// harness never interprets it
    pub template: Vec<u8>,
    /// One quality value per input image, on [0, 1]: expected utility to
    /// the matcher, 1 for a tattoo expected to match well. `quality[i]`
    /// corresponds to input image `i`
    pub quality: Vec<f64>,
    /// One list per input image holding a box for every tattoo found in it:
    /// `bounding_boxes[i]` lists the tattoos of input image `i`, possibly
    /// several, possibly none
    pub bounding_boxes: Vec<Vec<BoundingBox>>,
}

/// Payload of a successful [`Interface::detect_tattoo`] call.
#[derive(Debug, Clone)]
pub struct Detection {
    /// True when at least one tattoo was found in the image
    pub tattoo_detected: bool,
    /// Detection confidence on [0, 1]: 1 means certainty that the image
    /// contains a tattoo, 0 certainty that it does not
    pub confidence: f64,
    /// A box for every tattoo found in the image
    pub bounding_boxes: Vec<BoundingBox>,
}

/// The unified vendor interface: detection, localization, template
/// extraction, and 1:N identification in one contract.
///
/// The temporal rules carry over from revision 1 unchanged: each
/// `initialize_*` method runs exactly once per process before the calls that
/// depend on it, even though the harness may fork many worker processes;
/// enrollment finalization is a one-way transition after which the
/// enrollment data is permanently read-only; finalized enrollment
/// directories are shared by concurrent reader processes without locks.
pub trait Interface {
    /// Initialize for enrollment template production. Called once per
    /// process, before the harness parallelizes [`create_template`] calls
    /// across forked workers.
    ///
    /// `config_dir` is a read-only directory of developer-supplied
    /// configuration and run-time data files.
    ///
    /// [`create_template`]: Interface::create_template
    fn initialize_enrollment_session(&mut self, config_dir: &Path) -> Result<(), ReturnStatus>;

    /// Extract a template from a set of images of the same tattoo.
    ///
    /// All images in one call carry the same [`tatte_types::ImageType`];
    /// tattoos and sketches never mix. Implementations without sketch
    /// support return `ImageTypeNotSupported` - sketch support is optional,
    /// tattoo support mandatory.
    ///
    /// On success the payload is fully populated: `quality` and
    /// `bounding_boxes` both have one entry per input image, and
    /// `bounding_boxes[i]` holds one box per tattoo found in image `i`.
    ///
    /// A failure never breaks the pipeline. For enrollment the harness
    /// stores a blank (zero-length) template under the non-Success status
    /// and enrolls it like any other; for identification the output is
    /// discarded and never searched.
    fn create_template(
        &mut self,
        images: &[Image],
        role: TemplateRole,
    ) -> Result<TemplateOutput, ReturnStatus>;

    /// Freeze the enrollment data; afterwards it is forever read-only.
    /// Called once, after every enrollment template has been created.
    ///
    /// `gallery_type` states how the gallery was composed so the
    /// implementation can pick an indexing strategy. The implementation
    /// must internalize what it needs: it may not move the input files,
    /// retain references into them, or assume they stay readable after the
    /// call - at a minimum it copies the data it needs for search.
    ///
    /// `edb_name` is the enrollment database, a single file of concatenated
    /// templates; `manifest_name` maps template IDs to offset and length
    /// within it. Both are harness-provided paths, openable directly.
    fn finalize_enrollment(
        &mut self,
        enrollment_dir: &Path,
        edb_name: &Path,
        manifest_name: &Path,
        gallery_type: GalleryType,
    ) -> Result<(), ReturnStatus>;

    /// Initialize probe template production against a finalized enrollment
    /// set. Called once per process; the enrollment directory is read-only
    /// and may be read by several processes concurrently.
    fn initialize_probe_template_session(
        &mut self,
        config_dir: &Path,
        enrollment_dir: &Path,
    ) -> Result<(), ReturnStatus>;

    /// Initialize identification searches. Called once per process before
    /// one or more [`identify_template`] calls, typically loading the
    /// enrollment database for the subsequent searches.
    ///
    /// [`identify_template`]: Interface::identify_template
    fn initialize_identification_session(
        &mut self,
        config_dir: &Path,
        enrollment_dir: &Path,
    ) -> Result<(), ReturnStatus>;

    /// Search an identification template against the enrollment set and
    /// return at most `candidate_list_length` candidates in descending
    /// order of similarity score, most similar first.
    ///
    /// Only templates whose [`create_template`] call succeeded are passed
    /// here, byte-for-byte as produced.
    ///
    /// [`create_template`]: Interface::create_template
    fn identify_template(
        &mut self,
        probe: &[u8],
        candidate_list_length: u32,
    ) -> Result<Vec<Candidate>, ReturnStatus>;

    /// Initialize for detection. Called once per process before any
    /// [`detect_tattoo`] call.
    ///
    /// [`detect_tattoo`]: Interface::detect_tattoo
    fn initialize_detection_session(&mut self, config_dir: &Path) -> Result<(), ReturnStatus>;

    /// Report whether the image contains tattoos and where. Detection and
    /// localization are one call in this revision; the returned boxes carry
    /// no per-box confidence.
    fn detect_tattoo(&mut self, image: &Image) -> Result<Detection, ReturnStatus>;
}

/// Signature of the factory a vendor library exports. The returned box is
/// the single extension point the harness uses to reach vendor code.
pub type InterfaceFactory = fn() -> Box<dyn Interface + Send>;
