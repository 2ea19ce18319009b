//! Image decoding into CPU-side pixel buffers
//!
//! Decoding is pure and synchronous. The streaming worker calls it off the
//! render thread; nothing here touches the GPU.

use std::path::Path;

use crate::core::error::Error;

/// A fully decoded image in RGBA8 source channel order
///
/// Transient: produced here, consumed exactly once at texture adoption
/// (which reorders channels for the GPU format), then discarded.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` bytes, row-major RGBA
    pub data: Vec<u8>,
}

impl DecodedImage {
    /// Byte length a well-formed buffer must have
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    /// True when the buffer length matches the dimensions
    pub fn is_complete(&self) -> bool {
        self.data.len() == self.expected_len()
    }
}

/// Decode an image file into an RGBA8 buffer
pub fn decode(path: &Path) -> Result<DecodedImage, Error> {
    let img = image::open(path)
        .map_err(|e| Error::Decode {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?
        .to_rgba8();

    let (width, height) = img.dimensions();
    Ok(DecodedImage {
        width,
        height,
        data: img.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pixels.png");
        let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 255]));
        img.save(&path).unwrap();

        let decoded = decode(&path).unwrap();
        assert_eq!(decoded.width, 4);
        assert_eq!(decoded.height, 2);
        assert!(decoded.is_complete());
        assert_eq!(&decoded.data[0..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_decode_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = decode(&dir.path().join("nope.png")).unwrap_err();
        match err {
            Error::Decode { path, .. } => assert!(path.contains("nope.png")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
