//! Source adapters for datagate.
//!
//! Each adapter turns a search term into a store-specific lookup and
//! normalizes the answer to tagged text lines. Adapters never return an
//! error to their caller: failures become [`SourceResult::Failure`] and are
//! rendered as in-band sentinel lines.
//!
//! # Adapters
//! - [`relational::UserSource`] and [`relational::OrderSource`]: SQLite tables
//! - [`document::ProjectSource`]: JSON-lines project collection
//! - [`country::CountrySource`]: REST Countries lookup
//! - [`cache::CacheSource`]: key lookup on a [`cache::CacheStore`]

pub mod adapter;
pub mod cache;
pub mod country;
pub mod document;
pub mod error;
pub mod factory;
pub mod relational;
pub mod result;

// Re-export main types
pub use adapter::{clamp_limit, SourceAdapter, DEFAULT_LIMIT};
pub use cache::{CacheSource, CacheStore, MemoryCache, SqliteCache, DEFAULT_TTL};
pub use error::{CacheError, SourceError};
pub use factory::{create_adapter, create_adapters, create_cache_store, AdapterMap};
pub use result::SourceResult;
