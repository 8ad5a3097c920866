//! Revision 1 null implementations, layered over the same primitives as
//! the revision 2 engine.

use crate::engine::NullEngine;
use crate::measure;
use std::path::Path;
use tatte_api::v1::{
    DetectAndLocalize, Detection, Identification, TattooRep, TemplateOutput,
};
use tatte_api::v2::{GalleryType, Interface};
use tatte_types::{BoundingBox, Candidate, Image, ReturnCode, ReturnStatus, TemplateRole};

fn box_confidence(image: &Image) -> f64 {
    (measure::ink_fraction(image) * 4.0).min(1.0)
}

/// Revision 1 identification capability over the null engine.
///
/// The legacy contract has no gallery composition parameter, so enrollment
/// is finalized as an unconsolidated (event-based) gallery.
#[derive(Default)]
pub struct NullIdentification {
    engine: NullEngine,
}

impl NullIdentification {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Identification for NullIdentification {
    fn initialize_enrollment_session(&mut self, config_dir: &Path) -> Result<(), ReturnStatus> {
        self.engine.initialize_enrollment_session(config_dir)
    }

    fn create_template(
        &mut self,
        images: &[Image],
        role: TemplateRole,
    ) -> Result<TemplateOutput, ReturnStatus> {
        let out = self.engine.create_template(images, role)?;

        let mut rep = TattooRep::new();
        rep.resize_template(out.template.len() as u64)
            .copy_from_slice(&out.template);

        // Revision 1 records exactly one box per input image. Inkless
        // images get an empty box at the origin with zero confidence.
        for image in images {
            let bb = match measure::ink_bounds(image) {
                Some(bb) => BoundingBox::with_confidence(
                    bb.x,
                    bb.y,
                    bb.width,
                    bb.height,
                    box_confidence(image),
                ),
                None => BoundingBox::with_confidence(0, 0, 0, 0, 0.0),
            };
            rep.add_bounding_box(bb);
        }

        Ok(TemplateOutput {
            tattoo_rep: rep,
            quality: out.quality,
        })
    }

    fn finalize_enrollment(
        &mut self,
        enrollment_dir: &Path,
        edb_name: &Path,
        manifest_name: &Path,
    ) -> Result<(), ReturnStatus> {
        self.engine.finalize_enrollment(
            enrollment_dir,
            edb_name,
            manifest_name,
            GalleryType::Unconsolidated,
        )
    }

    fn initialize_probe_template_session(
        &mut self,
        config_dir: &Path,
        enrollment_dir: &Path,
    ) -> Result<(), ReturnStatus> {
        self.engine
            .initialize_probe_template_session(config_dir, enrollment_dir)
    }

    fn initialize_identification_session(
        &mut self,
        config_dir: &Path,
        enrollment_dir: &Path,
    ) -> Result<(), ReturnStatus> {
        self.engine
            .initialize_identification_session(config_dir, enrollment_dir)
    }

    fn identify_template(
        &mut self,
        probe: &TattooRep,
        candidate_list_length: u32,
    ) -> Result<Vec<Candidate>, ReturnStatus> {
        self.engine
            .identify_template(probe.template(), candidate_list_length)
    }
}

/// Revision 1 detection and localization capability.
#[derive(Default)]
pub struct NullDetector {
    initialized: bool,
}

impl NullDetector {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_initialized(&self) -> Result<(), ReturnStatus> {
        if !self.initialized {
            return Err(ReturnStatus::new(
                ReturnCode::VendorError,
                "detector is not initialized",
            ));
        }
        Ok(())
    }
}

impl DetectAndLocalize for NullDetector {
    fn initialize(&mut self, config_dir: &Path) -> Result<(), ReturnStatus> {
        if !config_dir.is_dir() {
            return Err(ReturnStatus::new(
                ReturnCode::ConfigError,
                format!("config directory {} is not readable", config_dir.display()),
            ));
        }
        self.initialized = true;
        tracing::info!(config_dir = %config_dir.display(), "detector initialized");
        Ok(())
    }

    fn detect_tattoo(&mut self, image: &Image) -> Result<Detection, ReturnStatus> {
        self.check_initialized()?;
        let fraction = measure::ink_fraction(image);
        Ok(Detection {
            tattoo_detected: fraction > measure::DETECTION_FLOOR,
            confidence: (fraction * 4.0).min(1.0),
        })
    }

    fn localize_tattoos(&mut self, image: &Image) -> Result<Vec<BoundingBox>, ReturnStatus> {
        self.check_initialized()?;
        // One box per detected region; each carries its own confidence in
        // this revision
        let boxes = measure::ink_bounds(image)
            .map(|bb| {
                BoundingBox::with_confidence(
                    bb.x,
                    bb.y,
                    bb.width,
                    bb.height,
                    box_confidence(image),
                )
            })
            .into_iter()
            .collect();
        Ok(boxes)
    }
}

/// Factory entry point for the revision 1 identification capability.
pub fn identification() -> Box<dyn Identification + Send> {
    Box::new(NullIdentification::new())
}

/// Factory entry point for the revision 1 detect-and-localize capability.
pub fn detect_and_localize() -> Box<dyn DetectAndLocalize + Send> {
    Box::new(NullDetector::new())
}
