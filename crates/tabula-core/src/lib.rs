//! Core runtime for Tabula: entity keys, query strategies, continuation
//! tokens, page assembly, and the paged repository surface over a
//! partitioned table store.
#![warn(unreachable_pub)]

pub mod config;
pub mod db;
pub mod error;
pub mod key;
pub mod obs;
pub mod serialize;
pub mod traits;

// test
#[cfg(test)]
pub(crate) mod test_support;

pub use error::{Error, ErrorClass};

///
/// CONSTANTS
///

/// Maximum number of entities a table store returns per segment in the
/// reference deployment, regardless of the requested page size.
pub const DEFAULT_MAX_SEGMENT_SIZE: u32 = 1000;

///
/// Prelude
///
/// Vocabulary for defining entities and describing queries.
///

pub mod prelude {
    pub use crate::{
        db::{
            page::PageResult,
            query::{Predicate, QueryStrategy},
        },
        key::EntityKey,
        traits::TableEntity,
    };
}
