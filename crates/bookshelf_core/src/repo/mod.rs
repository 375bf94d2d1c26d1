//! Repository contracts and persistence backends.
//!
//! # Responsibility
//! - Define the read/write repository contracts shared by all backends.
//! - Provide in-memory, CSV and JSON file implementations.
//! - Adapt synchronous stores into latency-bearing async repositories.
//!
//! # Invariants
//! - Missing keys are reported as `None`/`false`, never as errors.
//! - Listings are ordered ascending by record key.
//! - `add` overwrites an existing key (last write wins).

pub mod async_repo;
pub mod contract;
pub mod csv_codec;
pub mod csv_repo;
mod file_store;
pub mod json_repo;
pub mod memory_repo;

pub use file_store::LoadPolicy;
