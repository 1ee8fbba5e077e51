//! Pagination runtime: query strategies, continuation tokens, page assembly,
//! the repository surface, and the store collaborator contract.

mod aggregate;
pub mod cursor;
pub mod page;
pub mod query;
pub mod repository;
pub mod store;

pub use cursor::{ContinuationToken, TokenWireError};
pub use page::{PageAssembler, PageResult};
pub use query::{Filter, Predicate, QueryStrategy, StrategyKind, TableQuery};
pub use repository::{Find, TableRepository, WriteBatch, WriteBatchResponse, WriteOp};
pub use store::{
    MemoryStore, Segment, StoreCursor, StoreError, TableAdmin, TableStore, TableWriter,
};
