//! Core types and traits for the Hoplink URL shortener.
//!
//! This crate provides the shared vocabulary used by the resolver and
//! reaper services: validated short codes, stored link records, and the
//! trait boundaries for the durable store and the lookup cache.

pub mod cache;
pub mod error;
pub mod policy;
pub mod shortcode;
pub mod store;

pub use cache::UrlCache;
pub use error::{CacheError, InvalidShortCode, StoreError};
pub use policy::{StandardUrlPolicy, UrlPolicy};
pub use shortcode::ShortCode;
pub use store::{LinkRecord, LinkStore};
