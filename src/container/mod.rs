//! Tag container access.
//!
//! A single audio file can carry several tag formats at once (ID3v2 next to
//! ID3v1 and APE in an MP3, an iTunes `ilst` in an M4A, ...). [`read`] flattens
//! the generic fields of all of them into a [`ContainerTags`] and keeps an
//! ordered list of [`TagLayer`]s for callers that need a specific schema.
//!
//! # Layers
//!
//! Layers are a tagged union. Only the iTunes layer exposes raw vendor boxes;
//! every other tag format is recorded by type alone:
//!
//! ```ignore
//! let boxes = tags.layers.iter().find_map(TagLayer::as_itunes);
//! ```

mod reader;

use std::collections::BTreeMap;

use lofty::tag::TagType;

pub use reader::read;

/// Four-character atom/box code, e.g. `*b"plID"`.
pub type FourCc = [u8; 4];

/// Raw-byte lookup of vendor-specific boxes by four-character code.
pub trait BoxLookup {
    /// Payload of the first box with this code, if any.
    fn lookup_box(&self, code: &FourCc) -> Option<&[u8]>;
}

/// Raw payloads of the data atoms in an iTunes-style `ilst`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItunesBoxes {
    boxes: BTreeMap<FourCc, Vec<u8>>,
}

impl ItunesBoxes {
    /// Record a payload. The first payload seen for a code wins.
    pub fn insert(&mut self, code: FourCc, payload: Vec<u8>) {
        self.boxes.entry(code).or_insert(payload);
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }
}

impl BoxLookup for ItunesBoxes {
    fn lookup_box(&self, code: &FourCc) -> Option<&[u8]> {
        self.boxes.get(code).map(Vec::as_slice)
    }
}

impl FromIterator<(FourCc, Vec<u8>)> for ItunesBoxes {
    fn from_iter<I: IntoIterator<Item = (FourCc, Vec<u8>)>>(iter: I) -> Self {
        let mut boxes = Self::default();
        for (code, payload) in iter {
            boxes.insert(code, payload);
        }
        boxes
    }
}

/// One tag format present in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagLayer {
    /// MP4 `ilst` with its raw data atoms
    Itunes(ItunesBoxes),
    /// Any other tag format; only its generic fields are used
    Plain(TagType),
}

impl TagLayer {
    pub fn as_itunes(&self) -> Option<&ItunesBoxes> {
        match self {
            TagLayer::Itunes(boxes) => Some(boxes),
            TagLayer::Plain(_) => None,
        }
    }

    pub fn tag_type(&self) -> TagType {
        match self {
            TagLayer::Itunes(_) => TagType::Mp4Ilst,
            TagLayer::Plain(tag_type) => *tag_type,
        }
    }
}

/// An embedded picture as declared in the tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedPicture {
    /// Declared filename (the picture description), if any
    pub filename: Option<String>,
    /// Encoded image bytes
    pub data: Vec<u8>,
}

/// Everything the aggregator needs from one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerTags {
    pub title: Option<String>,
    pub album: Option<String>,
    pub copyright: Option<String>,
    pub performers: Vec<String>,
    pub album_artists: Vec<String>,
    pub comment: Option<String>,
    pub pictures: Vec<EmbeddedPicture>,
    /// Co-resident tag formats, primary tag first
    pub layers: Vec<TagLayer>,
}

impl ContainerTags {
    /// First performer, else first album artist.
    pub fn artist(&self) -> Option<&str> {
        self.performers
            .first()
            .or_else(|| self.album_artists.first())
            .map(String::as_str)
    }
}
