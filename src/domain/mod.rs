//! Domain layer: records, the node arena, the builder and the query store
//!
//! This layer is independent of external concerns (no I/O, no config loading).

pub mod arena;
pub mod builder;
pub mod error;
pub mod record;
pub mod store;

pub use arena::{TreeArena, TreeNode};
pub use builder::TreeBuilder;
pub use error::{DomainError, DomainResult};
pub use record::{ParentRef, Record, RecordId, ROOT_SENTINEL};
pub use store::TreeStore;
