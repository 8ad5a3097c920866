use crate::status::{ReturnCode, ReturnStatus};
use serde::{Deserialize, Serialize};

/// Label describing what an image depicts.
///
/// A batch of images handed to template creation always carries a single
/// type; tattoos and sketches are never mixed in one call. Sketch support is
/// optional per implementation, tattoo support is mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    /// Tattoo image
    Tattoo,
    /// Sketch of a tattoo
    Sketch,
    /// Unknown
    Unknown,
}

/// Pixel depth of a raster. Only 8-bit grayscale and 24-bit RGB are legal,
/// so the constraint is carried by the type rather than checked at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelDepth {
    /// 8 bits per pixel, single intensity channel
    Grayscale8,
    /// 24 bits per pixel, interleaved RGB
    Rgb24,
}

impl PixelDepth {
    /// Bits per pixel (8 or 24).
    pub fn bits(self) -> u16 {
        match self {
            PixelDepth::Grayscale8 => 8,
            PixelDepth::Rgb24 => 24,
        }
    }

    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelDepth::Grayscale8 => 1,
            PixelDepth::Rgb24 => 3,
        }
    }
}

/// A single raster image.
///
/// The pixel buffer is raster-scanned: `RGBRGBRGB...` for [`PixelDepth::Rgb24`],
/// `III...` for [`PixelDepth::Grayscale8`]. The buffer is owned by the image;
/// the constructor rejects buffers whose length does not match
/// `width * height * bytes_per_pixel`, so `size()` always reflects the
/// geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u16,
    height: u16,
    depth: PixelDepth,
    image_type: ImageType,
    data: Vec<u8>,
}

impl Image {
    /// Build an image over an owned pixel buffer.
    ///
    /// Returns `ParseError` when the buffer length disagrees with the stated
    /// geometry and depth.
    pub fn new(
        width: u16,
        height: u16,
        depth: PixelDepth,
        image_type: ImageType,
        data: Vec<u8>,
    ) -> Result<Self, ReturnStatus> {
        let expected = width as usize * height as usize * depth.bytes_per_pixel();
        if data.len() != expected {
            return Err(ReturnStatus::new(
                ReturnCode::ParseError,
                format!(
                    "raster is {} bytes, expected {} for {}x{} at {} bits per pixel",
                    data.len(),
                    expected,
                    width,
                    height,
                    depth.bits()
                ),
            ));
        }
        Ok(Self {
            width,
            height,
            depth,
            image_type,
            data,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn depth(&self) -> PixelDepth {
        self.depth
    }

    pub fn image_type(&self) -> ImageType {
        self.image_type
    }

    /// Size of the pixel buffer in bytes, equal to
    /// `width * height * (bits / 8)`.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}
