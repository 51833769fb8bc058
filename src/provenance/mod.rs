//! Track provenance: which store a file came from, and its canonical link.
//!
//! - [`rules`]: ordered table of store-link patterns matched against comments
//! - [`resolver`]: comment-first resolution with the iTunes store-id fallback

pub mod resolver;
pub mod rules;

pub use resolver::{ProvenanceResolver, resolve_store_ids, store_link};
pub use rules::{LinkTransform, ProvenanceRule, RuleTable};
