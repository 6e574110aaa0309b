//! Persisted table state
//!
//! Table state is whatever table-scoped parameters the last request carried.
//! A [`StateStore`] keeps that mapping between requests; the medium (session,
//! cookie, database) is up to the implementation.
//!
//! ## Example
//!
//! ```rust
//! use reinhardt_tables_params::{MemoryStateStore, ParameterStore, StateStore};
//!
//! let store = MemoryStateStore::new();
//! let params: ParameterStore = [("users_page", "3")].into_iter().collect();
//!
//! store.save("users_", &params).unwrap();
//! let loaded = store.load("users_", "state").unwrap();
//! assert_eq!(loaded, Some(params));
//! ```

use crate::store::ParameterStore;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// State store errors
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StateError {
	/// The backing store failed
	#[error("State backend error: {0}")]
	Backend(String),
	/// Saved state could not be encoded or decoded
	#[error("State serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

/// When the registry consults persisted state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateMode {
	/// Restore saved state whenever a request has no table parameters
	#[default]
	Persist,
	/// Restore saved state only when the request names the state attribute
	Notify,
	/// Never restore or save
	Disabled,
}

/// Save/load contract for persisted table state
///
/// Implementations must tolerate independent reads and writes for different
/// table ids. Callers serialize access per table when the backend needs it.
pub trait StateStore: Send + Sync {
	/// Stores the table-scoped parameters of `table_id`
	fn save(&self, table_id: &str, parameters: &ParameterStore) -> Result<(), StateError>;

	/// Loads the parameters saved for `table_id`
	///
	/// `state_key` names the state attribute the request used; backends that
	/// keep one state per table may ignore it.
	fn load(&self, table_id: &str, state_key: &str) -> Result<Option<ParameterStore>, StateError>;
}

impl<S: StateStore + ?Sized> StateStore for Arc<S> {
	fn save(&self, table_id: &str, parameters: &ParameterStore) -> Result<(), StateError> {
		(**self).save(table_id, parameters)
	}

	fn load(&self, table_id: &str, state_key: &str) -> Result<Option<ParameterStore>, StateError> {
		(**self).load(table_id, state_key)
	}
}

/// State store that remembers nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStateStore;

impl StateStore for NoopStateStore {
	fn save(&self, _table_id: &str, _parameters: &ParameterStore) -> Result<(), StateError> {
		Ok(())
	}

	fn load(&self, _table_id: &str, _state_key: &str) -> Result<Option<ParameterStore>, StateError> {
		Ok(None)
	}
}

/// In-memory state store
///
/// Entries are stored as JSON documents so the store behaves like an external
/// backend: what is loaded is a fresh copy, never a shared reference.
/// State is lost when the process exits.
#[derive(Debug, Clone, Default)]
pub struct MemoryStateStore {
	entries: Arc<RwLock<HashMap<String, serde_json::Value>>>,
}

impl MemoryStateStore {
	/// Creates an empty store
	pub fn new() -> Self {
		Self::default()
	}

	/// Drops the saved state of `table_id`
	pub fn remove(&self, table_id: &str) -> bool {
		self.entries.write().remove(table_id).is_some()
	}

	/// Number of tables with saved state
	pub fn len(&self) -> usize {
		self.entries.read().len()
	}

	/// Returns true if no state is saved
	pub fn is_empty(&self) -> bool {
		self.entries.read().is_empty()
	}
}

impl StateStore for MemoryStateStore {
	fn save(&self, table_id: &str, parameters: &ParameterStore) -> Result<(), StateError> {
		let document = serde_json::to_value(parameters)?;
		self.entries.write().insert(table_id.to_string(), document);
		Ok(())
	}

	fn load(&self, table_id: &str, _state_key: &str) -> Result<Option<ParameterStore>, StateError> {
		let entries = self.entries.read();
		match entries.get(table_id) {
			Some(document) => Ok(Some(serde_json::from_value(document.clone())?)),
			None => Ok(None),
		}
	}
}
