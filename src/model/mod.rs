//! Result records produced by an extraction.
//!
//! [`ExtractionResult`] is the only thing that leaves the crate. It serializes
//! to a flat JSON object:
//!
//! ```json
//! {
//!   "name": "GENESONG (feat. Steve Vai)",
//!   "album": "Genesong",
//!   "artist": "Kenji",
//!   "provider": "Apple Music",
//!   "link": "https://music.apple.com/us/album/1451411999?i=1451412277",
//!   "jacketSha1": "3F7C...",
//!   "copyright": "℗ 2019"
//! }
//! ```

use serde::Serialize;

use crate::jacket::JacketDescriptor;

/// Where a track came from: a store/provider label and a canonical link.
///
/// Always built with both halves; there is no partial provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvenanceInfo {
    link: String,
    provider: String,
}

impl ProvenanceInfo {
    pub fn new(link: impl Into<String>, provider: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            provider: provider.into(),
        }
    }

    pub fn link(&self) -> &str {
        &self.link
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }
}

/// Flat string fields read straight from the container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackFields {
    pub name: String,
    pub album: Option<String>,
    pub artist: Option<String>,
    pub copyright: Option<String>,
}

/// Normalized metadata for one audio file.
///
/// Immutable once built. `provider` and `link` are either both set or both
/// absent, and `jacketSha1` is set exactly when a jacket was decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    name: String,
    album: Option<String>,
    artist: Option<String>,
    provider: Option<String>,
    link: Option<String>,
    jacket_sha1: Option<String>,
    copyright: Option<String>,
    #[serde(skip)]
    jacket: Option<JacketDescriptor>,
}

impl ExtractionResult {
    pub fn new(
        fields: TrackFields,
        provenance: Option<ProvenanceInfo>,
        jacket: Option<JacketDescriptor>,
    ) -> Self {
        let (link, provider) = match provenance {
            Some(info) => (Some(info.link), Some(info.provider)),
            None => (None, None),
        };

        Self {
            name: fields.name,
            album: fields.album,
            artist: fields.artist,
            provider,
            link,
            jacket_sha1: jacket.as_ref().map(|j| j.hash().to_string()),
            copyright: fields.copyright,
            jacket,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn album(&self) -> Option<&str> {
        self.album.as_deref()
    }

    pub fn artist(&self) -> Option<&str> {
        self.artist.as_deref()
    }

    pub fn copyright(&self) -> Option<&str> {
        self.copyright.as_deref()
    }

    pub fn provider(&self) -> Option<&str> {
        self.provider.as_deref()
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn jacket_sha1(&self) -> Option<&str> {
        self.jacket_sha1.as_deref()
    }

    /// Decoded jacket handle. Never serialized.
    pub fn jacket(&self) -> Option<&JacketDescriptor> {
        self.jacket.as_ref()
    }
}
