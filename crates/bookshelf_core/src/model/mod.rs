//! Record types stored by repository backends.
//!
//! # Responsibility
//! - Define the `Record` identity contract shared by every backend.
//! - Define the canonical `Book` value object.
//!
//! # Invariants
//! - A record key identifies at most one live record per store.
//! - Records are immutable values; updates replace the whole record.

pub mod book;

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Value object identified by a unique key.
///
/// Backends are generic over this trait so that no storage implementation
/// hard-codes a concrete record type.
pub trait Record: Clone + Send + Sync + 'static {
    /// Key type. Listings are ordered ascending by this type's `Ord`.
    type Key: Ord + Hash + Copy + Debug + Display + Send + Sync + 'static;

    /// Returns the key this record is stored under.
    fn key(&self) -> Self::Key;
}
