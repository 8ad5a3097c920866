//! The revision 2 null engine.

use crate::gallery::{self, Gallery};
use crate::measure;
use std::path::{Path, PathBuf};
use tatte_api::v2::{Detection, GalleryType, Interface, TemplateOutput};
use tatte_types::{Image, ImageType, ReturnCode, ReturnStatus, TemplateRole};

/// The null engine refuses batches larger than this with `NumDataError`.
pub const MAX_INPUT_IMAGES: usize = 8;

/// A conforming no-algorithm implementation of [`Interface`].
///
/// Stateful like a real vendor engine: session initializers record what the
/// engine is allowed to do, and operations called out of sequence report
/// `VendorError` instead of panicking.
#[derive(Default)]
pub struct NullEngine {
    config_dir: Option<PathBuf>,
    detection_ready: bool,
    gallery: Option<Gallery>,
}

impl NullEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_config_dir(&mut self, config_dir: &Path) -> Result<(), ReturnStatus> {
        if !config_dir.is_dir() {
            return Err(ReturnStatus::new(
                ReturnCode::ConfigError,
                format!("config directory {} is not readable", config_dir.display()),
            ));
        }
        self.config_dir = Some(config_dir.to_path_buf());
        Ok(())
    }
}

impl Interface for NullEngine {
    fn initialize_enrollment_session(&mut self, config_dir: &Path) -> Result<(), ReturnStatus> {
        self.check_config_dir(config_dir)?;
        tracing::info!(config_dir = %config_dir.display(), "enrollment session initialized");
        Ok(())
    }

    fn create_template(
        &mut self,
        images: &[Image],
        role: TemplateRole,
    ) -> Result<TemplateOutput, ReturnStatus> {
        if images.is_empty() {
            return Err(ReturnStatus::new(
                ReturnCode::NumDataError,
                "no input images",
            ));
        }
        if images.len() > MAX_INPUT_IMAGES {
            return Err(ReturnStatus::new(
                ReturnCode::NumDataError,
                format!(
                    "{} input images exceed the supported maximum of {MAX_INPUT_IMAGES}",
                    images.len()
                ),
            ));
        }
        // Sketch support is optional and this engine elects not to provide
        // it. The specific code matters: the harness treats it as a
        // declined input, not a failure.
        if images.iter().any(|i| i.image_type() == ImageType::Sketch) {
            return Err(ReturnStatus::new(
                ReturnCode::ImageTypeNotSupported,
                "sketch images are not supported",
            ));
        }

        let mut template = Vec::with_capacity(images.len() * measure::RECORD_SIZE);
        let mut quality = Vec::with_capacity(images.len());
        let mut bounding_boxes = Vec::with_capacity(images.len());
        for image in images {
            template.extend_from_slice(&measure::template_record(image));
            quality.push(measure::quality(image));
            bounding_boxes.push(measure::ink_bounds(image).into_iter().collect());
        }

        tracing::debug!(
            images = images.len(),
            role = ?role,
            template_len = template.len(),
            "template created"
        );

        Ok(TemplateOutput {
            template,
            quality,
            bounding_boxes,
        })
    }

    fn finalize_enrollment(
        &mut self,
        enrollment_dir: &Path,
        edb_name: &Path,
        manifest_name: &Path,
        gallery_type: GalleryType,
    ) -> Result<(), ReturnStatus> {
        let count = gallery::internalize(enrollment_dir, edb_name, manifest_name, gallery_type)?;
        tracing::info!(
            enrollment_dir = %enrollment_dir.display(),
            templates = count,
            gallery_type = ?gallery_type,
            "enrollment finalized"
        );
        Ok(())
    }

    fn initialize_probe_template_session(
        &mut self,
        config_dir: &Path,
        enrollment_dir: &Path,
    ) -> Result<(), ReturnStatus> {
        self.check_config_dir(config_dir)?;
        if !enrollment_dir.join(gallery::GALLERY_INDEX_FILE).is_file() {
            return Err(ReturnStatus::new(
                ReturnCode::InputLocationError,
                format!(
                    "{} does not hold a finalized enrollment",
                    enrollment_dir.display()
                ),
            ));
        }
        tracing::info!(enrollment_dir = %enrollment_dir.display(), "probe template session initialized");
        Ok(())
    }

    fn initialize_identification_session(
        &mut self,
        config_dir: &Path,
        enrollment_dir: &Path,
    ) -> Result<(), ReturnStatus> {
        self.check_config_dir(config_dir)?;
        let gallery = Gallery::open(enrollment_dir)?;
        tracing::info!(
            enrollment_dir = %enrollment_dir.display(),
            templates = gallery.len(),
            "identification session initialized"
        );
        self.gallery = Some(gallery);
        Ok(())
    }

    fn identify_template(
        &mut self,
        probe: &[u8],
        candidate_list_length: u32,
    ) -> Result<Vec<tatte_types::Candidate>, ReturnStatus> {
        let gallery = self.gallery.as_ref().ok_or_else(|| {
            ReturnStatus::new(
                ReturnCode::VendorError,
                "identification session is not initialized",
            )
        })?;
        if probe.is_empty() {
            return Err(ReturnStatus::new(
                ReturnCode::TemplateFormatError,
                "zero-length probe template",
            ));
        }

        let mut candidates: Vec<tatte_types::Candidate> = gallery
            .iter()
            .map(|(id, bytes)| tatte_types::Candidate::new(id, measure::similarity(probe, bytes)))
            .collect();
        tatte_types::candidate::sort_descending(&mut candidates);
        candidates.truncate(candidate_list_length as usize);
        Ok(candidates)
    }

    fn initialize_detection_session(&mut self, config_dir: &Path) -> Result<(), ReturnStatus> {
        self.check_config_dir(config_dir)?;
        self.detection_ready = true;
        tracing::info!(config_dir = %config_dir.display(), "detection session initialized");
        Ok(())
    }

    fn detect_tattoo(&mut self, image: &Image) -> Result<Detection, ReturnStatus> {
        if !self.detection_ready {
            return Err(ReturnStatus::new(
                ReturnCode::VendorError,
                "detection session is not initialized",
            ));
        }

        let fraction = measure::ink_fraction(image);
        let detection = Detection {
            tattoo_detected: fraction > measure::DETECTION_FLOOR,
            confidence: (fraction * 4.0).min(1.0),
            bounding_boxes: measure::ink_bounds(image).into_iter().collect(),
        };
        Ok(detection)
    }
}
