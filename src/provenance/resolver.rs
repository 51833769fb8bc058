//! Decides where a track came from.
//!
//! Two strategies, strictly ordered and never merged:
//!
//! 1. **Comment**: if the file has a comment, only the [`RuleTable`] is
//!    consulted. An unmatched comment means "no provenance"; the store-id
//!    boxes are not looked at.
//! 2. **Store ids**: without a comment, the first iTunes layer is asked for
//!    the `plID` (playlist/album id, 64-bit) and `cnID` (catalog id, 32-bit)
//!    boxes, which are turned into an Apple Music link.

use tracing::debug;

use super::rules::RuleTable;
use crate::container::{BoxLookup, FourCc, TagLayer};
use crate::error::{Error, Result};
use crate::model::ProvenanceInfo;

/// Box holding the album id, big-endian `i64`.
pub const OWNER_BOX: FourCc = *b"plID";
/// Box holding the track's catalog id, big-endian `i32`.
pub const CATALOG_BOX: FourCc = *b"cnID";

pub const STORE_PROVIDER: &str = "Apple Music";

/// Link synthesized from the two store ids.
pub fn store_link(owner: i64, catalog: i32) -> String {
    format!("https://music.apple.com/us/album/{owner}?i={catalog}")
}

/// Provenance resolution against an injected rule table.
#[derive(Debug, Clone, Default)]
pub struct ProvenanceResolver {
    rules: RuleTable,
}

impl ProvenanceResolver {
    pub fn new(rules: RuleTable) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Resolve provenance from a comment or, failing its presence, from the
    /// store-id boxes of the first iTunes layer.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedBox`] if both store-id boxes are present but either
    /// payload has the wrong width.
    pub fn resolve(
        &self,
        comment: Option<&str>,
        layers: &[TagLayer],
    ) -> Result<Option<ProvenanceInfo>> {
        if let Some(text) = comment {
            let info = self.rules.first_match(text);
            debug!(matched = info.is_some(), "Resolved provenance from comment");
            return Ok(info);
        }

        match layers.iter().find_map(TagLayer::as_itunes) {
            Some(boxes) => resolve_store_ids(boxes),
            None => Ok(None),
        }
    }
}

/// Build the store link from the owner and catalog boxes.
///
/// Both boxes must be present and non-empty; otherwise there is no
/// provenance. A present box of the wrong width is an error.
pub fn resolve_store_ids(boxes: &impl BoxLookup) -> Result<Option<ProvenanceInfo>> {
    let payload = |code: &FourCc| boxes.lookup_box(code).filter(|bytes| !bytes.is_empty());

    let (Some(owner), Some(catalog)) = (payload(&OWNER_BOX), payload(&CATALOG_BOX)) else {
        debug!("Store-id boxes not present");
        return Ok(None);
    };

    let owner = i64::from_be_bytes(fixed_width(&OWNER_BOX, owner)?);
    let catalog = i32::from_be_bytes(fixed_width(&CATALOG_BOX, catalog)?);
    debug!(owner, catalog, "Resolved provenance from store ids");

    Ok(Some(ProvenanceInfo::new(
        store_link(owner, catalog),
        STORE_PROVIDER,
    )))
}

fn fixed_width<const N: usize>(code: &FourCc, payload: &[u8]) -> Result<[u8; N]> {
    payload
        .try_into()
        .map_err(|_| Error::malformed_box(code, N, payload.len()))
}
