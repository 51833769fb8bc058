//! Music Info - normalized metadata for a single audio file.
//!
//! Given one tagged audio file, produces title, album, artist and copyright,
//! the store it was bought from (with a canonical link) when that can be
//! told, and a fingerprint of the embedded cover art.
//!
//! ```ignore
//! use music_info::metadata::Extractor;
//!
//! let extractor = Extractor::default();
//! let result = extractor.extract(Path::new("song.m4a"))?;
//! println!("{}", serde_json::to_string(&result)?);
//! ```

pub mod cli;
pub mod config;
pub mod container;
pub mod error;
pub mod jacket;
pub mod metadata;
pub mod model;
pub mod provenance;
pub mod scanner;
#[cfg(test)]
pub mod test_utils;

pub use error::{Error, Result};
pub use metadata::{Extractor, extract};
pub use model::{ExtractionResult, ProvenanceInfo};
