//! Revision 1 of the plugin contract.
//!
//! Two independent capability traits: [`Identification`] for 1:N search and
//! [`DetectAndLocalize`] for per-image detection and localization. Templates
//! produced under this revision travel in the [`TattooRep`] container, which
//! pairs the opaque template buffer with one bounding box per input image.

use std::path::Path;
use tatte_types::{BoundingBox, Candidate, Image, ReturnStatus, TemplateRole};

/// Major version of this interface revision.
pub const API_MAJOR_VERSION: u16 = 1;
/// Minor version of this interface revision.
pub const API_MINOR_VERSION: u16 = 0;

/// Template container for revision 1: an exclusively-owned, resizable
/// template buffer plus the bounding boxes recorded for each input image.
///
/// The container owns its buffer outright. [`resize_template`] is the only
/// way to (re)allocate it, and every call discards the previous contents, so
/// no stale template bytes survive a resize. Access from multiple threads is
/// undefined; callers serialize use per instance.
///
/// If template creation was given 4 input images, the implementation records
/// 4 bounding boxes, and `bounding_boxes()[i]` belongs to input image `i`.
///
/// [`resize_template`]: TattooRep::resize_template
#[derive(Debug, Default, Clone)]
pub struct TattooRep {
    template: Vec<u8>,
    bounding_boxes: Vec<BoundingBox>,
}

impl TattooRep {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the template buffer with a fresh zeroed allocation of `size`
    /// bytes and return it for the implementation to fill. Passing 0
    /// releases the buffer entirely (empty, size 0).
    ///
    /// Previous contents are discarded, not shrunk or grown in place.
    pub fn resize_template(&mut self, size: u64) -> &mut [u8] {
        if size > 0 {
            self.template = vec![0u8; size as usize];
        } else {
            self.template = Vec::new();
        }
        &mut self.template
    }

    /// Append the bounding box for the next input image. Boxes are kept in
    /// call order.
    pub fn add_bounding_box(&mut self, bb: BoundingBox) {
        self.bounding_boxes.push(bb);
    }

    /// The template bytes. Empty when no template has been produced.
    pub fn template(&self) -> &[u8] {
        &self.template
    }

    /// Size of the template data in bytes.
    pub fn template_size(&self) -> u64 {
        self.template.len() as u64
    }

    /// Bounding boxes in the order they were added, one per input image.
    pub fn bounding_boxes(&self) -> &[BoundingBox] {
        &self.bounding_boxes
    }
}

/// Payload of a successful [`Identification::create_template`] call.
#[derive(Debug, Clone)]
pub struct TemplateOutput {
    /// The produced template with its per-image bounding boxes
    pub tattoo_rep: TattooRep,
    /// One quality value per input image, on [0, 1]. Quality measures
    /// expected utility to the matcher: 1 means the tattoo is expected to
    /// match well, 0 that it is not. `quality[i]` corresponds to input
    /// image `i`.
    pub quality: Vec<f64>,
}

/// Payload of a successful [`DetectAndLocalize::detect_tattoo`] call.
#[derive(Debug, Clone, Copy)]
pub struct Detection {
    /// True when a tattoo was found in the image
    pub tattoo_detected: bool,
    /// Detection confidence on [0, 1]: 1 means certainty that the image
    /// contains a tattoo, 0 certainty that it does not
    pub confidence: f64,
}

/// The 1:N identification capability.
///
/// Call sequence, enrollment phase:
/// [`initialize_enrollment_session`] once per process, then any number of
/// [`create_template`] calls (possibly from many forked workers), then
/// [`finalize_enrollment`] exactly once. Search phase:
/// [`initialize_probe_template_session`] / [`initialize_identification_session`]
/// once per process against the finalized enrollment set, then
/// [`create_template`] / [`identify_template`] many times.
///
/// [`initialize_enrollment_session`]: Identification::initialize_enrollment_session
/// [`create_template`]: Identification::create_template
/// [`finalize_enrollment`]: Identification::finalize_enrollment
/// [`initialize_probe_template_session`]: Identification::initialize_probe_template_session
/// [`initialize_identification_session`]: Identification::initialize_identification_session
/// [`identify_template`]: Identification::identify_template
pub trait Identification {
    /// Initialize the implementation for enrollment and set all needed
    /// parameters. Called exactly once per process, before the harness
    /// parallelizes `create_template` calls across forked workers.
    ///
    /// `config_dir` is a read-only directory of developer-supplied
    /// configuration and run-time data files; its name is assigned by the
    /// harness, the names of files inside it by the vendor.
    fn initialize_enrollment_session(&mut self, config_dir: &Path) -> Result<(), ReturnStatus>;

    /// Extract a template from a set of images of the same tattoo.
    ///
    /// All images in one call carry the same [`tatte_types::ImageType`];
    /// tattoos and sketches are never mixed. Implementations that do not
    /// support sketches return `ImageTypeNotSupported` - sketch support is
    /// optional, tattoo support is mandatory.
    ///
    /// For enrollment templates, a failure must not break the pipeline: the
    /// harness stores a blank (zero-length) template under the non-Success
    /// status and enrolls it like any other. For identification templates, a
    /// non-Success status means the output is discarded and never searched.
    fn create_template(
        &mut self,
        images: &[Image],
        role: TemplateRole,
    ) -> Result<TemplateOutput, ReturnStatus>;

    /// Freeze the enrollment data. Called once, after every enrollment
    /// template has been created; afterwards the enrollment dataset is
    /// forever read-only.
    ///
    /// The implementation may reorganize, index, or statistically process
    /// the templates here, writing anything it likes under `enrollment_dir`.
    /// It must not move the input files, must not retain pointers into them,
    /// and must not assume they stay readable after this call returns: at a
    /// minimum it copies what it needs for search.
    ///
    /// `edb_name` is the enrollment database, a single file of concatenated
    /// templates; `manifest_name` maps template IDs to offset and length
    /// within it. Both paths are harness-provided and openable directly -
    /// implementations never hard-code or assume their values.
    fn finalize_enrollment(
        &mut self,
        enrollment_dir: &Path,
        edb_name: &Path,
        manifest_name: &Path,
    ) -> Result<(), ReturnStatus>;

    /// Initialize probe template production against a finalized enrollment
    /// set. Called once per process before `create_template` runs for
    /// identification templates.
    ///
    /// The enrollment directory is read-only here, and several processes on
    /// one or more machines may read it concurrently; no locking is
    /// provided or needed.
    fn initialize_probe_template_session(
        &mut self,
        config_dir: &Path,
        enrollment_dir: &Path,
    ) -> Result<(), ReturnStatus>;

    /// Initialize identification searches. Called once per process before
    /// one or more `identify_template` calls, typically loading the
    /// enrollment database so it is available to subsequent searches.
    fn initialize_identification_session(
        &mut self,
        config_dir: &Path,
        enrollment_dir: &Path,
    ) -> Result<(), ReturnStatus>;

    /// Search an identification template against the enrollment set and
    /// return at most `candidate_list_length` candidates in descending order
    /// of similarity score, most similar first.
    ///
    /// Only templates whose `create_template` call succeeded are passed
    /// here.
    fn identify_template(
        &mut self,
        probe: &TattooRep,
        candidate_list_length: u32,
    ) -> Result<Vec<Candidate>, ReturnStatus>;
}

/// The detection and localization capability.
pub trait DetectAndLocalize {
    /// Initialize the implementation. Called once before any call to
    /// [`detect_tattoo`] or [`localize_tattoos`].
    ///
    /// [`detect_tattoo`]: DetectAndLocalize::detect_tattoo
    /// [`localize_tattoos`]: DetectAndLocalize::localize_tattoos
    fn initialize(&mut self, config_dir: &Path) -> Result<(), ReturnStatus>;

    /// Report whether the image contains a tattoo, with a confidence on
    /// [0, 1].
    fn detect_tattoo(&mut self, image: &Image) -> Result<Detection, ReturnStatus>;

    /// Locate every tattoo in the image. Each returned box carries its own
    /// confidence.
    fn localize_tattoos(&mut self, image: &Image) -> Result<Vec<BoundingBox>, ReturnStatus>;
}

/// Signature of the factory a vendor library exports for the identification
/// capability. The returned box is the single extension point the harness
/// uses to reach vendor code.
pub type IdentificationFactory = fn() -> Box<dyn Identification + Send>;

/// Signature of the factory a vendor library exports for the
/// detect-and-localize capability.
pub type DetectAndLocalizeFactory = fn() -> Box<dyn DetectAndLocalize + Send>;
