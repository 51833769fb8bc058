//! Jacket (cover art) fingerprinting.
//!
//! The fingerprint is a SHA-1 over the decoded RGBA pixels, not over the
//! encoded file, so the same artwork stored as PNG or as BMP hashes the same.
//! Only the first embedded picture is considered.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbaImage;
use sha1::{Digest, Sha1};
use tracing::debug;

use crate::container::EmbeddedPicture;
use crate::error::Result;

/// A successfully decoded jacket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JacketDescriptor {
    hash: String,
    extension: String,
    data: Vec<u8>,
}

impl JacketDescriptor {
    pub fn new(hash: String, extension: String, data: Vec<u8>) -> Self {
        Self {
            hash,
            extension,
            data,
        }
    }

    /// Upper-case hex SHA-1 of the decoded pixels
    pub fn hash(&self) -> &str {
        &self.hash
    }

    /// Lower-cased extension of the declared filename, possibly empty
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Original encoded image bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Write the encoded bytes to `<dir>/<hash>.<ext>`.
    ///
    /// Without a declared extension the image format is sniffed from the
    /// bytes, falling back to `bin`.
    ///
    /// # Errors
    ///
    /// [`Error::Io`](crate::error::Error::Io) if the directory cannot be created or the file written.
    pub fn export(&self, dir: &Path) -> Result<PathBuf> {
        let extension = if self.extension.is_empty() {
            image::guess_format(&self.data)
                .ok()
                .and_then(|format| format.extensions_str().first().copied())
                .unwrap_or("bin")
        } else {
            self.extension.as_str()
        };

        fs::create_dir_all(dir)?;
        let path = dir.join(format!("{}.{}", self.hash, extension));
        fs::write(&path, &self.data)?;
        Ok(path)
    }
}

/// Fingerprint the first picture. `None` if there are no pictures or the
/// first one cannot be decoded.
pub fn hash_jacket(pictures: &[EmbeddedPicture]) -> Option<JacketDescriptor> {
    let picture = pictures.first()?;

    let image = match image::load_from_memory(&picture.data) {
        Ok(image) => image.into_rgba8(),
        Err(e) => {
            debug!(error = %e, bytes = picture.data.len(), "Jacket not decodable");
            return None;
        }
    };

    Some(JacketDescriptor::new(
        pixel_digest(&image),
        file_extension(picture.filename.as_deref()),
        picture.data.clone(),
    ))
}

/// SHA-1 over the row-major RGBA samples, `width * height * 4` bytes.
pub fn pixel_digest(image: &RgbaImage) -> String {
    format!("{:X}", Sha1::digest(image.as_raw()))
}

/// Lower-cased extension of a declared filename, empty when there is none.
pub fn file_extension(filename: Option<&str>) -> String {
    filename
        .and_then(|name| Path::new(name).extension())
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}
