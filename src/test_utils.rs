//! Test utilities and fixtures.
//!
//! Helpers for building images and container snapshots without touching
//! real audio files.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{mock_container_tags, sample_image, encode_image};
//!
//! let tags = ContainerTags {
//!     comment: Some("https://music.apple.com/us/album/x/1?i=2".to_string()),
//!     ..mock_container_tags()
//! };
//! ```

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use lofty::tag::TagType;

use crate::container::{ContainerTags, EmbeddedPicture, ItunesBoxes, TagLayer};
use crate::provenance::resolver::{CATALOG_BOX, OWNER_BOX};

/// An opaque gradient so every pixel differs.
pub fn sample_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 40) as u8, (y * 30) as u8, ((x + y) * 7) as u8, 255])
    })
}

/// Encode an image in memory.
pub fn encode_image(image: &RgbaImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    image
        .write_to(&mut buf, format)
        .expect("Failed to encode test image");
    buf.into_inner()
}

/// A PNG picture record.
pub fn mock_picture(filename: Option<&str>) -> EmbeddedPicture {
    EmbeddedPicture {
        filename: filename.map(str::to_string),
        data: encode_image(&sample_image(4, 4), ImageFormat::Png),
    }
}

/// An iTunes layer carrying the two store ids.
pub fn store_id_layer(owner: i64, catalog: i32) -> TagLayer {
    let boxes: ItunesBoxes = [
        (OWNER_BOX, owner.to_be_bytes().to_vec()),
        (CATALOG_BOX, catalog.to_be_bytes().to_vec()),
    ]
    .into_iter()
    .collect();
    TagLayer::Itunes(boxes)
}

/// Creates mock ContainerTags with sensible defaults.
///
/// No comment, no pictures, a single ID3v2 layer. Customize using struct
/// update syntax.
pub fn mock_container_tags() -> ContainerTags {
    ContainerTags {
        title: Some("Test Track".to_string()),
        album: Some("Test Album".to_string()),
        copyright: Some("℗ 2020 Test Label".to_string()),
        performers: vec!["Test Artist".to_string()],
        album_artists: vec!["Test Album Artist".to_string()],
        comment: None,
        pictures: Vec::new(),
        layers: vec![TagLayer::Plain(TagType::Id3v2)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::BoxLookup;

    #[test]
    fn test_sample_image_is_opaque() {
        let image = sample_image(5, 3);
        assert_eq!(image.dimensions(), (5, 3));
        assert!(image.pixels().all(|p| p.0[3] == 255));
    }

    #[test]
    fn test_encode_image_png_signature() {
        let png = encode_image(&sample_image(1, 1), ImageFormat::Png);
        assert_eq!(&png[..4], b"\x89PNG");
    }

    #[test]
    fn test_store_id_layer_payload_widths() {
        let layer = store_id_layer(1, 2);
        let boxes = layer.as_itunes().unwrap();
        assert_eq!(boxes.lookup_box(&OWNER_BOX).map(<[u8]>::len), Some(8));
        assert_eq!(boxes.lookup_box(&CATALOG_BOX).map(<[u8]>::len), Some(4));
    }

    #[test]
    fn test_mock_container_tags_defaults() {
        let tags = mock_container_tags();
        assert_eq!(tags.title.as_deref(), Some("Test Track"));
        assert!(tags.comment.is_none());
        assert!(tags.pictures.is_empty());
    }
}
