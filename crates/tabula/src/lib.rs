//! ## Crate layout
//! - `core`: entity keys, query strategies, continuation tokens, page
//!   assembly, the table repository, and the store contract.
//!
//! The `prelude` module carries what application code needs to define an
//! entity and page through a table.

pub use tabula_core as core;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use crate::core::{DEFAULT_MAX_SEGMENT_SIZE, Error, ErrorClass, config::StoreConfig};

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::core::{
        db::{
            MemoryStore, PageResult, Predicate, QueryStrategy, TableRepository, WriteBatch,
            store::{TableAdmin as _, TableStore as _, TableWriter as _},
        },
        key::EntityKey,
        traits::TableEntity,
    };
}

///
/// TESTS
///
