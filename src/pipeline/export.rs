//! Writing a [`GeneratedArtifact`] to disk

use std::{
    fs,
    io::{self, Cursor},
    path::{Path, PathBuf},
};

use image::{DynamicImage, ImageFormat};
use thiserror::Error;

use super::GeneratedArtifact;

/// Which half of a [`GeneratedArtifact`] gets written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportKind {
    /// The SVG markup, verbatim as UTF-8 text
    Vector,
    /// The raster, encoded according to the destination's file extension
    Raster,
}

impl ExportKind {
    /// Picks the export kind from the extension of `path`: `.svg` means [`ExportKind::Vector`],
    /// any extension `image` can encode means [`ExportKind::Raster`].
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let is_svg = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map_or(false, |ext| ext.eq_ignore_ascii_case("svg"));
        if is_svg {
            Ok(ExportKind::Vector)
        } else if ImageFormat::from_path(path).is_ok() {
            Ok(ExportKind::Raster)
        } else {
            Err(ExportError::UnsupportedFormat(path.to_owned()))
        }
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    /// The pipeline has no valid artifact, so nothing was written
    #[error("no artifact to export")]
    NoArtifact,
    #[error("can't write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("can't encode raster: {0}")]
    Encode(#[from] image::ImageError),
    #[error("don't know how to write an image to {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

pub(super) fn write(
    artifact: &GeneratedArtifact,
    path: &Path,
    kind: ExportKind,
) -> Result<(), ExportError> {
    let bytes = match kind {
        ExportKind::Vector => artifact.markup.as_bytes().to_vec(),
        ExportKind::Raster => encode_raster(artifact, path)?,
    };
    // The file is only created once the whole output is ready
    fs::write(path, bytes).map_err(|source| ExportError::Io {
        path: path.to_owned(),
        source,
    })
}

fn encode_raster(artifact: &GeneratedArtifact, path: &Path) -> Result<Vec<u8>, ExportError> {
    let format = ImageFormat::from_path(path)
        .map_err(|_| ExportError::UnsupportedFormat(path.to_owned()))?;
    let mut bytes = Cursor::new(Vec::new());
    match format {
        // JPEG has no alpha channel
        ImageFormat::Jpeg => DynamicImage::ImageRgba8(artifact.raster.clone())
            .to_rgb8()
            .write_to(&mut bytes, format)?,
        _ => artifact.raster.write_to(&mut bytes, format)?,
    }
    Ok(bytes.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_extension() {
        assert_eq!(
            ExportKind::from_path(Path::new("out/a.svg")).unwrap(),
            ExportKind::Vector
        );
        assert_eq!(
            ExportKind::from_path(Path::new("A.SVG")).unwrap(),
            ExportKind::Vector
        );
        assert_eq!(
            ExportKind::from_path(Path::new("a.png")).unwrap(),
            ExportKind::Raster
        );
        assert_eq!(
            ExportKind::from_path(Path::new("a.jpeg")).unwrap(),
            ExportKind::Raster
        );
        assert!(matches!(
            ExportKind::from_path(Path::new("a.txt")),
            Err(ExportError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            ExportKind::from_path(Path::new("no_extension")),
            Err(ExportError::UnsupportedFormat(_))
        ));
    }
}
