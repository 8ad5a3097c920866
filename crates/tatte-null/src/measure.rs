//! Trivial pixel measurements standing in for a real feature extractor.
//!
//! Pixels darker than [`INK_THRESHOLD`] count as "ink". Everything here is
//! deterministic so templates round-trip byte-for-byte through the
//! enrollment database.

use tatte_types::{BoundingBox, Image, PixelDepth};

/// Luma below this counts as tattoo ink.
pub const INK_THRESHOLD: u8 = 64;

/// Ink fractions above this count as "a tattoo is present".
pub const DETECTION_FLOOR: f64 = 0.01;

/// Bytes emitted into the template per input image.
pub const RECORD_SIZE: usize = 16;

fn luma_at(image: &Image, index: usize) -> u8 {
    let data = image.data();
    match image.depth() {
        PixelDepth::Grayscale8 => data[index],
        PixelDepth::Rgb24 => {
            let p = index * 3;
            ((data[p] as u16 + data[p + 1] as u16 + data[p + 2] as u16) / 3) as u8
        }
    }
}

fn pixel_count(image: &Image) -> usize {
    image.width() as usize * image.height() as usize
}

/// Fraction of pixels darker than the ink threshold, on [0, 1].
pub fn ink_fraction(image: &Image) -> f64 {
    let pixels = pixel_count(image);
    if pixels == 0 {
        return 0.0;
    }
    let inked = (0..pixels)
        .filter(|&i| luma_at(image, i) < INK_THRESHOLD)
        .count();
    inked as f64 / pixels as f64
}

/// Tight bounding box around all ink pixels, or None when the image holds
/// no ink at all.
pub fn ink_bounds(image: &Image) -> Option<BoundingBox> {
    let width = image.width() as usize;
    let pixels = pixel_count(image);

    let mut min_x = usize::MAX;
    let mut min_y = usize::MAX;
    let mut max_x = 0usize;
    let mut max_y = 0usize;
    let mut any = false;

    for i in 0..pixels {
        if luma_at(image, i) < INK_THRESHOLD {
            let (x, y) = (i % width, i / width);
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
            any = true;
        }
    }

    any.then(|| {
        BoundingBox::new(
            min_x as u16,
            min_y as u16,
            (max_x - min_x + 1) as u16,
            (max_y - min_y + 1) as u16,
        )
    })
}

/// Stand-in quality measure: the fraction of non-zero bytes in the raster,
/// on [0, 1]. Flat black or empty rasters score 0.
pub fn quality(image: &Image) -> f64 {
    let data = image.data();
    if data.is_empty() {
        return 0.0;
    }
    let nonzero = data.iter().filter(|&&b| b != 0).count();
    nonzero as f64 / data.len() as f64
}

/// Deterministic per-image template record: geometry, depth, mean luma, ink
/// presence, raster length. 16 bytes, little-endian fields.
pub fn template_record(image: &Image) -> [u8; RECORD_SIZE] {
    let pixels = pixel_count(image);
    let mean = if pixels == 0 {
        0u8
    } else {
        let sum: u64 = (0..pixels).map(|i| luma_at(image, i) as u64).sum();
        (sum / pixels as u64) as u8
    };

    let mut record = [0u8; RECORD_SIZE];
    record[0..2].copy_from_slice(&image.width().to_le_bytes());
    record[2..4].copy_from_slice(&image.height().to_le_bytes());
    record[4..6].copy_from_slice(&image.depth().bits().to_le_bytes());
    record[6] = mean;
    record[7] = ink_bounds(image).is_some() as u8;
    record[8..16].copy_from_slice(&(image.size() as u64).to_le_bytes());
    record
}

/// Positional byte overlap between two templates, on [0, 1]: the count of
/// equal bytes at equal offsets over the longer length. Identical templates
/// score 1.0, a zero-length side scores 0.0.
pub fn similarity(a: &[u8], b: &[u8]) -> f64 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 0.0;
    }
    let matching = a.iter().zip(b.iter()).filter(|(x, y)| x == y).count();
    matching as f64 / longest as f64
}
