//! Metadata extraction for a single audio file.
//!
//! Reads the container once, then:
//! - copies title, album and copyright straight through
//! - picks the artist (first performer, else first album artist)
//! - resolves provenance from the comment or the store-id boxes
//! - fingerprints the first embedded picture
//!
//! # Example
//!
//! ```ignore
//! let result = music_info::metadata::extract(Path::new("song.m4a"))?;
//! println!("{} from {:?}", result.name(), result.provider());
//! ```

use std::path::Path;

use tracing::debug;

use crate::container::{self, ContainerTags};
use crate::error::Result;
use crate::jacket;
use crate::model::{ExtractionResult, TrackFields};
use crate::provenance::{ProvenanceResolver, RuleTable};

/// Extracts [`ExtractionResult`]s using a fixed rule table.
///
/// Holds no mutable state; one instance can serve any number of files,
/// including from several threads at once.
#[derive(Debug, Clone)]
pub struct Extractor {
    resolver: ProvenanceResolver,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(RuleTable::builtin())
    }
}

impl Extractor {
    pub fn new(rules: RuleTable) -> Self {
        Self {
            resolver: ProvenanceResolver::new(rules),
        }
    }

    pub fn rules(&self) -> &RuleTable {
        self.resolver.rules()
    }

    /// Read `path` and build its result.
    ///
    /// # Errors
    ///
    /// - [`Error::ContainerRead`](crate::error::Error::ContainerRead) if the
    ///   file cannot be opened or parsed
    /// - [`Error::MalformedBox`](crate::error::Error::MalformedBox) if a
    ///   store-id box has the wrong width
    pub fn extract(&self, path: &Path) -> Result<ExtractionResult> {
        debug!(path = %path.display(), "Extracting metadata");
        let tags = container::read(path)?;
        self.assemble(&tags)
    }

    /// Build a result from already-read container tags.
    pub fn assemble(&self, tags: &ContainerTags) -> Result<ExtractionResult> {
        let fields = TrackFields {
            name: tags.title.clone().unwrap_or_default(),
            album: tags.album.clone(),
            artist: tags.artist().map(str::to_owned),
            copyright: tags.copyright.clone(),
        };

        let provenance = self
            .resolver
            .resolve(tags.comment.as_deref(), &tags.layers)?;
        let jacket = jacket::hash_jacket(&tags.pictures);

        debug!(
            provider = provenance.as_ref().map(|p| p.provider()),
            jacket = jacket.as_ref().map(|j| j.hash()),
            "Assembled metadata"
        );

        Ok(ExtractionResult::new(fields, provenance, jacket))
    }
}

/// Extract with the built-in rule table.
pub fn extract(path: &Path) -> Result<ExtractionResult> {
    Extractor::default().extract(path)
}
