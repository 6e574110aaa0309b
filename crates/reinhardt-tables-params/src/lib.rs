//! Table-scoped request parameters for Reinhardt tables
//!
//! Table state (page, sort, filters, export selection) travels between requests
//! as plain request parameters. This crate owns that parameter surface:
//!
//! - [`TableScope`]: the bit-exact key grammar `prefix + tableId + segment`
//! - [`ParameterStore`]: an ordered name -> values mapping
//! - [`ParameterRegistry`]: partitions raw request parameters into table-scoped
//!   and user-defined ones, falling back to persisted state when the request
//!   carries no table-scoped parameters
//! - [`StateStore`]: the save/load contract for persisted table state
//!
//! # Example
//!
//! ```rust
//! use reinhardt_tables_params::{MemoryStateStore, ParameterRegistry, ParameterStore, TableScope};
//!
//! let scope = TableScope::new("", "users_");
//! let state = MemoryStateStore::new();
//! let registry = ParameterRegistry::new(&scope);
//!
//! let raw = ParameterStore::from_query("users_page=2&users_sort.name=asc").unwrap();
//! let params = registry.resolve(&raw, &state).unwrap();
//! assert_eq!(params.get("users_page"), Some("2"));
//!
//! // The next request without table parameters restores the saved state
//! let params = registry.resolve(&ParameterStore::new(), &state).unwrap();
//! assert_eq!(params.get("users_sort.name"), Some("asc"));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod registry;
pub mod scope;
pub mod state;
pub mod store;

pub use registry::ParameterRegistry;
pub use scope::{TableScope, is_export_request};
pub use state::{MemoryStateStore, NoopStateStore, StateError, StateMode, StateStore};
pub use store::ParameterStore;
