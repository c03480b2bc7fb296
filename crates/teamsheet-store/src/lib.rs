//! Alias mapping persistence for teamsheet.
//!
//! The alias store holds the canonical-team-name → alias-list mapping that
//! the name resolver matches against. Two logical operations exist:
//! read the whole mapping, or replace the whole mapping. There are no
//! incremental alias edits.
//!
//! Backends:
//! - [`HttpAliasStore`]: remote key-value endpoint (the system of record)
//! - [`JsonFileStore`]: local JSON snapshot, used as a fallback when the
//!   remote endpoint is unreachable
//! - [`fakes::MemoryAliasStore`]: in-memory test double

pub mod error;
pub mod fakes;
pub mod file;
pub mod http;
pub mod store_traits;

pub use error::StoreError;
pub use file::JsonFileStore;
pub use http::HttpAliasStore;
pub use store_traits::{scan_collisions, AliasCollision, AliasMap, AliasStore, StoreResult};
