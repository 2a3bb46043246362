//! Saving rendered images to disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::RenderError;
use crate::render::RenderedImage;

/// Directory used when the caller does not pick one.
pub const DEFAULT_DIRECTORY: &str = "saved";
/// Base file name used when the caller does not pick one.
pub const DEFAULT_BASENAME: &str = "custom_qr";

/// Returns a path under `directory` that does not exist yet.
///
/// Anything after the first `.` in `base` is dropped and `extension` is
/// appended. Collisions get a ` (1)`, ` (2)`, ... suffix. The directory is
/// created if missing.
///
/// # Errors
///
/// Returns an `std::io::Error` if the directory cannot be created, or with
/// kind `InvalidInput` if `base` contains a path separator.
pub fn unique_path(directory: &Path, base: &str, extension: &str) -> std::io::Result<PathBuf> {
    if base.chars().any(|c| c == '/' || c == '\\' || std::path::is_separator(c)) {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("file name `{}` must not contain a path separator", base),
        ));
    }
    if !directory.exists() {
        fs::create_dir_all(directory)?;
        info!(directory = %directory.display(), "created output directory");
    }

    let stem = match base.split('.').next() {
        Some(s) if !s.is_empty() => s,
        _ => DEFAULT_BASENAME,
    };
    let mut path = directory.join(format!("{}.{}", stem, extension));
    let mut counter = 1u32;
    while path.exists() {
        path = directory.join(format!("{} ({}).{}", stem, counter, extension));
        counter += 1;
    }
    Ok(path)
}

/// Writes a rendered image under `directory`, picking a free file name.
///
/// SVG output gets the `.svg` extension, raster output `.png`.
pub fn save(image: &RenderedImage, directory: &Path, base: &str) -> Result<PathBuf, RenderError> {
    let path = match image {
        RenderedImage::Svg(svg) => {
            let path = unique_path(directory, base, "svg")?;
            fs::write(&path, svg)?;
            path
        }
        RenderedImage::Raster(img) => {
            let path = unique_path(directory, base, "png")?;
            img.save(&path)?;
            path
        }
    };
    info!(path = %path.display(), "saved QR image");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{RasterRenderer, RenderRequest, Renderer, SvgRenderer};

    #[test]
    fn test_unique_path_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("out");
        let path = unique_path(&dir, "qr.png", "svg").unwrap();
        assert!(dir.is_dir());
        assert_eq!(path, dir.join("qr.svg"));
    }

    #[test]
    fn test_unique_path_counts_up() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("code.svg"), "").unwrap();
        fs::write(tmp.path().join("code (1).svg"), "").unwrap();

        let path = unique_path(tmp.path(), "code", "svg").unwrap();
        assert_eq!(path, tmp.path().join("code (2).svg"));
    }

    #[test]
    fn test_unique_path_rejects_separators() {
        let tmp = tempfile::tempdir().unwrap();
        let err = unique_path(tmp.path(), "a/b", "svg").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
        let err = unique_path(tmp.path(), "a\\b", "svg").unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
        assert!(!tmp.path().join("a").exists());
    }

    #[test]
    fn test_unique_path_empty_base() {
        let tmp = tempfile::tempdir().unwrap();
        let path = unique_path(tmp.path(), "", "png").unwrap();
        assert_eq!(path, tmp.path().join("custom_qr.png"));
    }

    #[test]
    fn test_save_svg_and_png() {
        let tmp = tempfile::tempdir().unwrap();
        let req = RenderRequest::new("https://example.com");

        let svg = SvgRenderer.render(&req).unwrap();
        let first = save(&svg, tmp.path(), "site").unwrap();
        let second = save(&svg, tmp.path(), "site").unwrap();
        assert_eq!(first, tmp.path().join("site.svg"));
        assert_eq!(second, tmp.path().join("site (1).svg"));
        assert!(fs::read_to_string(&first).unwrap().contains("<svg"));

        let png = RasterRenderer { scale: 2 }.render(&req).unwrap();
        let path = save(&png, tmp.path(), "site").unwrap();
        assert_eq!(path, tmp.path().join("site.png"));
        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.width(), png.as_raster().unwrap().width());
    }
}
