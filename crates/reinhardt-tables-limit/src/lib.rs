//! Limit resolution for Reinhardt tables
//!
//! A [`Limit`] is everything one request asks of a table: which page, which
//! sort, which filters, and whether the rows are being exported. It is derived
//! from the table's [`ParameterStore`](reinhardt_tables_params::ParameterStore)
//! by [`LimitResolver`] and can be written back to parameters with
//! [`Limit::to_parameters`].
//!
//! # Example
//!
//! ```rust
//! use reinhardt_tables_limit::{LimitResolver, SortOrder};
//! use reinhardt_tables_params::{ParameterStore, TableScope};
//!
//! let scope = TableScope::new("", "users_");
//! let mut params = ParameterStore::from_query(
//!     "users_page=2&users_sort.city=desc&users_alias.city=address.city",
//! )
//! .unwrap();
//!
//! let limit = LimitResolver::new(&scope).resolve(&mut params).unwrap();
//! assert_eq!(limit.page().number(), 2);
//! assert_eq!(limit.sort().property(), "address.city");
//! assert_eq!(limit.sort().order(), SortOrder::Descending);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod filter;
pub mod limit;
pub mod page;
pub mod resolver;
pub mod sort;

pub use error::{LimitError, Result};
pub use filter::{Filter, FilterAction, FilterSet};
pub use limit::{Limit, RowWindow};
pub use page::Page;
pub use resolver::LimitResolver;
pub use sort::{Sort, SortOrder};
