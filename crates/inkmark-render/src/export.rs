//! Raster readback and PNG encoding.

use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("PNG encoding failed: {0}")]
    Encode(#[from] png::EncodingError),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Pixels read back from a rendered surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterReadback {
    /// RGBA pixel data (4 bytes per pixel).
    pub rgba_data: Vec<u8>,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
}

impl RasterReadback {
    /// Wrap RGBA pixels, checking the buffer matches the dimensions.
    pub fn new(rgba_data: Vec<u8>, width: u32, height: u32) -> RenderResult<Self> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || rgba_data.len() != expected {
            return Err(RendererError::Surface(format!(
                "readback of {} bytes does not match {}x{} RGBA",
                rgba_data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            rgba_data,
            width,
            height,
        })
    }

    /// Encode the pixels as an 8-bit RGBA PNG.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        let mut png_data = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut png_data, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header()?;
            writer.write_image_data(&self.rgba_data)?;
        }
        Ok(png_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

    #[test]
    fn test_encode_png() {
        let readback = RasterReadback::new(vec![255; 2 * 3 * 4], 2, 3).unwrap();
        let png = readback.encode_png().unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_rejects_mismatched_buffer() {
        assert!(matches!(
            RasterReadback::new(vec![0; 10], 2, 2),
            Err(RendererError::Surface(_))
        ));
        assert!(RasterReadback::new(Vec::new(), 0, 0).is_err());
    }
}
