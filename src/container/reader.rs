//! Reads tag containers with lofty, plus mp4ameta for raw iTunes atoms.
//!
//! lofty decodes typed `ilst` integers to at most 32 bits, which loses the
//! 64-bit playlist id, so MP4 files get a second pass over the same handle
//! that keeps the raw atom payloads.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Seek};
use std::path::Path;

use lofty::config::{ParseOptions, ParsingMode};
use lofty::file::{FileType, TaggedFileExt};
use lofty::probe::Probe;
use lofty::tag::{Accessor, ItemKey, Tag, TagType};
use tracing::{debug, warn};

use super::{ContainerTags, EmbeddedPicture, ItunesBoxes, TagLayer};
use crate::error::{Error, Result};

/// Read every co-resident tag of `path` into a [`ContainerTags`].
///
/// The file handle lives only for the duration of this call.
pub fn read(path: &Path) -> Result<ContainerTags> {
    let file = File::open(path).map_err(|e| Error::container_read(path, e))?;
    let mut reader = BufReader::new(file);

    let tagged_file = Probe::new(&mut reader)
        .options(parse_options())
        .guess_file_type()
        .map_err(|e| Error::container_read(path, e))?
        .read()
        .map_err(|e| Error::container_read(path, e))?;

    let mut itunes = if tagged_file.file_type() == FileType::Mp4 {
        read_itunes_boxes(&mut reader, path)
    } else {
        None
    };

    // Primary tag first, the rest in file order
    let primary = tagged_file.primary_tag_type();
    let mut tags: Vec<&Tag> = tagged_file.tags().iter().collect();
    tags.sort_by_key(|tag| tag.tag_type() != primary);

    let layers = tags
        .iter()
        .map(|tag| match tag.tag_type() {
            TagType::Mp4Ilst => itunes
                .take()
                .map_or(TagLayer::Plain(TagType::Mp4Ilst), TagLayer::Itunes),
            other => TagLayer::Plain(other),
        })
        .collect();

    let container = ContainerTags {
        title: first_text(&tags, |t| t.title()),
        album: first_text(&tags, |t| t.album()),
        copyright: first_text(&tags, |t| {
            t.get_string(&ItemKey::CopyrightMessage).map(Cow::Borrowed)
        }),
        performers: first_list(&tags, |t| strings(t, &ItemKey::TrackArtist)),
        album_artists: first_list(&tags, |t| strings(t, &ItemKey::AlbumArtist)),
        comment: first_text(&tags, |t| t.comment()),
        pictures: first_list(&tags, pictures),
        layers,
    };

    debug!(
        path = %path.display(),
        file_type = ?tagged_file.file_type(),
        layers = ?container.layers.iter().map(TagLayer::tag_type).collect::<Vec<_>>(),
        pictures = container.pictures.len(),
        "Read container tags"
    );

    Ok(container)
}

fn parse_options() -> ParseOptions {
    ParseOptions::new()
        .read_properties(false)
        .parsing_mode(ParsingMode::BestAttempt)
}

/// Second pass over an MP4 file collecting raw `ilst` data atoms.
///
/// Failure here only costs the store-id provenance, so it is logged rather
/// than propagated.
fn read_itunes_boxes(reader: &mut BufReader<File>, path: &Path) -> Option<ItunesBoxes> {
    if let Err(e) = reader.rewind() {
        warn!(path = %path.display(), error = %e, "Failed to rewind for ilst read");
        return None;
    }

    match mp4ameta::Tag::read_from(reader) {
        Ok(tag) => {
            let boxes: ItunesBoxes = tag
                .data()
                .filter_map(|(ident, data)| match ident {
                    mp4ameta::DataIdent::Fourcc(fourcc) => {
                        data.bytes().map(|bytes| (fourcc.0, bytes.to_vec()))
                    }
                    _ => None,
                })
                .collect();
            debug!(path = %path.display(), atoms = boxes.len(), "Read raw ilst atoms");
            Some(boxes)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read raw ilst atoms");
            None
        }
    }
}

fn first_text<'a>(
    tags: &[&'a Tag],
    get: impl Fn(&'a Tag) -> Option<Cow<'a, str>>,
) -> Option<String> {
    tags.iter().find_map(|tag| get(*tag)).map(Cow::into_owned)
}

fn first_list<T>(tags: &[&Tag], get: impl Fn(&Tag) -> Vec<T>) -> Vec<T> {
    tags.iter()
        .map(|tag| get(*tag))
        .find(|list| !list.is_empty())
        .unwrap_or_default()
}

fn strings(tag: &Tag, key: &ItemKey) -> Vec<String> {
    tag.get_strings(key).map(str::to_owned).collect()
}

fn pictures(tag: &Tag) -> Vec<EmbeddedPicture> {
    tag.pictures()
        .iter()
        .map(|picture| EmbeddedPicture {
            filename: picture.description().map(str::to_owned),
            data: picture.data().to_vec(),
        })
        .collect()
}
