//! End-to-end exercise of the revision 2 contract, with this test playing
//! the harness: enrollment template creation across subjects, EDB and
//! manifest assembly, finalization, and identification searches against
//! the finalized gallery.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tatte_api::v2::{GalleryType, Interface};
use tatte_null::logging::setup_logging;
use tatte_types::{Image, ImageType, PixelDepth, ReturnCode, TemplateRole};

/// A flat synthetic tattoo image whose template depends on the seed.
fn subject_image(seed: u8) -> Image {
    let side = 4 + (seed % 4) as u16;
    let len = side as usize * side as usize;
    Image::new(
        side,
        side,
        PixelDepth::Grayscale8,
        ImageType::Tattoo,
        vec![seed.wrapping_mul(23); len],
    )
    .unwrap()
}

fn sketch_image() -> Image {
    Image::new(
        4,
        4,
        PixelDepth::Grayscale8,
        ImageType::Sketch,
        vec![10u8; 16],
    )
    .unwrap()
}

/// Harness side: concatenate templates into the EDB and write the agreed
/// `template_id offset length` manifest.
fn write_enrollment(dir: &Path, templates: &[(String, Vec<u8>)]) -> (PathBuf, PathBuf) {
    let edb_path = dir.join("enrollment.edb");
    let manifest_path = dir.join("enrollment.manifest");

    let mut edb = File::create(&edb_path).unwrap();
    let mut manifest = File::create(&manifest_path).unwrap();
    let mut offset = 0u64;
    for (id, bytes) in templates {
        edb.write_all(bytes).unwrap();
        writeln!(manifest, "{id} {offset} {}", bytes.len()).unwrap();
        offset += bytes.len() as u64;
    }
    (edb_path, manifest_path)
}

/// Harness side: read one template back out of the EDB via the manifest.
fn read_back(edb: &Path, manifest: &Path, wanted: &str) -> Vec<u8> {
    let edb_bytes = fs::read(edb).unwrap();
    for line in fs::read_to_string(manifest).unwrap().lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields[0] == wanted {
            let offset: usize = fields[1].parse().unwrap();
            let length: usize = fields[2].parse().unwrap();
            return edb_bytes[offset..offset + length].to_vec();
        }
    }
    panic!("{wanted} not present in manifest");
}

#[test]
fn test_enroll_finalize_identify_round_trip() {
    setup_logging();

    let config = tempfile::tempdir().unwrap();
    let enrollment = tempfile::tempdir().unwrap();

    // Enrollment phase
    let mut engine = tatte_null::implementation();
    engine.initialize_enrollment_session(config.path()).unwrap();

    let mut stored: Vec<(String, Vec<u8>)> = Vec::new();
    for seed in 0u8..5 {
        let out = engine
            .create_template(&[subject_image(seed)], TemplateRole::Enrollment)
            .unwrap();
        assert_eq!(out.quality.len(), 1);
        assert!(!out.template.is_empty());
        stored.push((format!("subject_{seed:03}"), out.template));
    }

    // A sketch batch is declined with the specific code; per contract the
    // harness enrolls a blank template under that subject anyway.
    let sketches = [sketch_image(), sketch_image(), sketch_image()];
    let status = engine
        .create_template(&sketches, TemplateRole::Enrollment)
        .unwrap_err();
    assert_eq!(status.code, ReturnCode::ImageTypeNotSupported);
    stored.push(("subject_sketch".to_string(), Vec::new()));

    let (edb, manifest) = write_enrollment(enrollment.path(), &stored);

    // Round trip: what the manifest locates in the EDB is byte-for-byte
    // what create_template produced
    for (id, bytes) in &stored {
        assert_eq!(
            &read_back(&edb, &manifest, id),
            bytes,
            "EDB retrieval must hand back the exact produced template for {id}"
        );
    }

    engine
        .finalize_enrollment(
            enrollment.path(),
            &edb,
            &manifest,
            GalleryType::Consolidated,
        )
        .unwrap();

    // Finalization is one-way
    let status = engine
        .finalize_enrollment(
            enrollment.path(),
            &edb,
            &manifest,
            GalleryType::Consolidated,
        )
        .unwrap_err();
    assert_eq!(status.code, ReturnCode::EnrollDirError);

    // The implementation internalized what it needs; the harness inputs
    // may now disappear entirely
    fs::remove_file(&edb).unwrap();
    fs::remove_file(&manifest).unwrap();

    // Identification phase, fresh engine standing in for a new process
    let mut searcher = tatte_null::implementation();
    searcher
        .initialize_probe_template_session(config.path(), enrollment.path())
        .unwrap();
    searcher
        .initialize_identification_session(config.path(), enrollment.path())
        .unwrap();

    let probe = searcher
        .create_template(&[subject_image(3)], TemplateRole::Identification)
        .unwrap();

    let candidates = searcher.identify_template(&probe.template, 3).unwrap();

    assert_eq!(candidates.len(), 3, "list holds at most k entries");
    assert!(candidates.iter().all(|c| c.is_assigned));
    assert_eq!(
        candidates[0].template_id, "subject_003",
        "the probe's own subject must rank first"
    );
    for pair in candidates.windows(2) {
        assert!(
            pair[0].similarity_score >= pair[1].similarity_score,
            "candidates must be sorted by non-increasing similarity"
        );
    }

    // Asking for more candidates than enrolled subjects returns them all
    let everyone = searcher.identify_template(&probe.template, 100).unwrap();
    assert_eq!(everyone.len(), stored.len());
}

#[test]
fn test_probe_session_rejects_unfinalized_directory() {
    let config = tempfile::tempdir().unwrap();
    let not_finalized = tempfile::tempdir().unwrap();

    let mut engine = tatte_null::implementation();
    let status = engine
        .initialize_probe_template_session(config.path(), not_finalized.path())
        .unwrap_err();
    assert_eq!(status.code, ReturnCode::InputLocationError);

    let status = engine
        .initialize_identification_session(config.path(), not_finalized.path())
        .unwrap_err();
    assert_eq!(status.code, ReturnCode::InputLocationError);
}

#[test]
fn test_multi_image_batch_reports_per_image_outputs() {
    let config = tempfile::tempdir().unwrap();
    let mut engine = tatte_null::implementation();
    engine.initialize_enrollment_session(config.path()).unwrap();

    // First image all ink, second none, third some
    let mut speckled = vec![255u8; 16];
    speckled[0] = 0;
    let images = [
        subject_image(0),
        Image::new(
            3,
            3,
            PixelDepth::Grayscale8,
            ImageType::Tattoo,
            vec![255u8; 9],
        )
        .unwrap(),
        Image::new(4, 4, PixelDepth::Grayscale8, ImageType::Tattoo, speckled).unwrap(),
    ];

    let out = engine
        .create_template(&images, TemplateRole::Enrollment)
        .unwrap();

    assert_eq!(out.bounding_boxes.len(), 3, "one box list per input image");
    assert_eq!(out.bounding_boxes[0].len(), 1);
    assert_eq!(out.bounding_boxes[1].len(), 0);
    assert_eq!(out.bounding_boxes[2].len(), 1);
    assert_eq!(out.quality.len(), 3);
}
