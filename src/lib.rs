//! In-memory hierarchical index built from flat `id`/`parent` records.
//!
//! ```
//! use serde_json::json;
//! use treestore::{RecordId, TreeStore};
//!
//! let store = TreeStore::from_values(vec![
//!     json!({"id": 1, "parent": "root"}),
//!     json!({"id": 2, "parent": 1, "type": "test"}),
//! ])
//! .unwrap();
//!
//! assert_eq!(store.get_children(&RecordId::Int(1)).len(), 1);
//! assert_eq!(store.get_all_parents(&RecordId::Int(2)).unwrap().len(), 2);
//! ```

pub mod config;
pub mod domain;
pub mod errors;
pub mod tree_traits;
pub mod util;

pub use config::{DisplayConfig, DuplicateIdPolicy, RootPolicy, Settings};
pub use domain::{
    DomainError, DomainResult, ParentRef, Record, RecordId, TreeBuilder, TreeStore, ROOT_SENTINEL,
};
pub use errors::{TreeStoreError, TreeStoreResult};
pub use tree_traits::TreeRender;
