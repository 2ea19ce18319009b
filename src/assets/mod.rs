//! Asset loading and generation

pub mod image;

pub use image::{DecodedImage, decode};

use std::path::{Path, PathBuf};

use crate::core::error::Error;

/// Pixel side length of the synthesized detail image
const DETAIL_SIZE: u32 = 512;
/// Pixel side length of the synthesized thumbnail image
const THUMB_SIZE: u32 = 16;

/// File paths of the two streaming source images
#[derive(Debug, Clone)]
pub struct AssetPaths {
    pub detail: PathBuf,
    pub thumb: PathBuf,
}

/// Make sure the two streaming source images exist, synthesizing them if missing
///
/// The viewer streams between exactly two resolution tiers of the same
/// picture. When no images are supplied we generate a 512x512 detail
/// image and its 16x16 thumbnail so the viewer runs out of the box.
pub fn ensure_streaming_images(dir: &Path) -> Result<AssetPaths, Error> {
    std::fs::create_dir_all(dir)?;

    let paths = AssetPaths {
        detail: dir.join("detail.png"),
        thumb: dir.join("thumb.png"),
    };

    if !paths.detail.exists() {
        log::info!("Synthesizing detail image at {}", paths.detail.display());
        save_test_pattern(&paths.detail, DETAIL_SIZE)?;
    }
    if !paths.thumb.exists() {
        log::info!("Synthesizing thumbnail image at {}", paths.thumb.display());
        save_test_pattern(&paths.thumb, THUMB_SIZE)?;
    }

    Ok(paths)
}

/// Write a checker-and-gradient RGBA test pattern of the given side length
fn save_test_pattern(path: &Path, size: u32) -> Result<(), Error> {
    let img = ::image::RgbaImage::from_fn(size, size, |x, y| {
        let checker = ((x * 8 / size.max(1)) + (y * 8 / size.max(1))) % 2;
        let base = if checker == 0 { 60 } else { 200 };
        let gx = (x * 255 / size.max(1)) as u8;
        let gy = (y * 255 / size.max(1)) as u8;
        ::image::Rgba([base, gx, gy, 255])
    });
    img.save(path).map_err(|e| Error::Decode {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_streaming_images_creates_both_tiers() {
        let dir = tempfile::tempdir().unwrap();
        let paths = ensure_streaming_images(dir.path()).unwrap();
        assert!(paths.detail.exists());
        assert!(paths.thumb.exists());

        let detail = decode(&paths.detail).unwrap();
        let thumb = decode(&paths.thumb).unwrap();
        assert_eq!(detail.width, DETAIL_SIZE);
        assert_eq!(detail.height, DETAIL_SIZE);
        assert_eq!(thumb.width, THUMB_SIZE);
        assert_eq!(thumb.height, THUMB_SIZE);
    }

    #[test]
    fn test_ensure_streaming_images_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let first = ensure_streaming_images(dir.path()).unwrap();
        let before = std::fs::metadata(&first.detail).unwrap().modified().unwrap();

        let second = ensure_streaming_images(dir.path()).unwrap();
        let after = std::fs::metadata(&second.detail).unwrap().modified().unwrap();
        assert_eq!(before, after);
    }
}
