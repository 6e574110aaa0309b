//! Property access on rows
//!
//! Rows expose their data by dotted property paths such as `address.city`.
//! JSON rows are supported out of the box; other row types implement
//! [`PropertyResolver`] themselves.
//!
//! ## Example
//!
//! ```
//! use reinhardt_tables_rows::{PropertyResolver, Value};
//! use serde_json::json;
//!
//! let row = json!({"name": "Acme", "address": {"city": "Paris"}});
//! assert_eq!(row.property("address.city").unwrap(), Some(Value::from("Paris")));
//! assert!(row.property("address.zip").is_err());
//! ```

use crate::value::Value;
use rust_decimal::Decimal;
use std::sync::Arc;
use thiserror::Error;

/// Reasons a property path cannot be read
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
	/// The path names a property the row does not have
	#[error("Unknown property: {path}")]
	NotFound {
		/// Requested path
		path: String,
	},

	/// An intermediate segment of the path is null
	#[error("Null value at `{segment}` while reading {path}")]
	NestedNull {
		/// Requested path
		path: String,
		/// Segment that was null
		segment: String,
	},

	/// The path names a nested object or list, not a scalar
	#[error("Property {path} is not a scalar value")]
	NotScalar {
		/// Requested path
		path: String,
	},
}

/// Reads scalar properties of a row by path
pub trait PropertyResolver {
	/// Reads the property at `path`
	///
	/// Returns `Ok(None)` when the property exists but is null.
	///
	/// # Errors
	///
	/// Returns [`PropertyError`] when the path cannot be read.
	fn property(&self, path: &str) -> Result<Option<Value>, PropertyError>;
}

impl<T: PropertyResolver + ?Sized> PropertyResolver for &T {
	fn property(&self, path: &str) -> Result<Option<Value>, PropertyError> {
		(**self).property(path)
	}
}

impl<T: PropertyResolver + ?Sized> PropertyResolver for Box<T> {
	fn property(&self, path: &str) -> Result<Option<Value>, PropertyError> {
		(**self).property(path)
	}
}

impl<T: PropertyResolver + ?Sized> PropertyResolver for Arc<T> {
	fn property(&self, path: &str) -> Result<Option<Value>, PropertyError> {
		(**self).property(path)
	}
}

impl PropertyResolver for serde_json::Value {
	fn property(&self, path: &str) -> Result<Option<Value>, PropertyError> {
		let not_found = || PropertyError::NotFound {
			path: path.to_string(),
		};

		let mut current = self;
		let mut segments = path.split('.').peekable();
		while let Some(segment) = segments.next() {
			let next = match current {
				serde_json::Value::Object(map) => map.get(segment),
				serde_json::Value::Array(items) => segment
					.parse::<usize>()
					.ok()
					.and_then(|index| items.get(index)),
				_ => None,
			}
			.ok_or_else(not_found)?;

			if next.is_null() && segments.peek().is_some() {
				return Err(PropertyError::NestedNull {
					path: path.to_string(),
					segment: segment.to_string(),
				});
			}
			current = next;
		}

		json_scalar(current, path)
	}
}

fn json_scalar(value: &serde_json::Value, path: &str) -> Result<Option<Value>, PropertyError> {
	Ok(Some(match value {
		serde_json::Value::Null => return Ok(None),
		serde_json::Value::Bool(value) => Value::Bool(*value),
		serde_json::Value::Number(number) => {
			if let Some(value) = number.as_i64() {
				Value::Int(value)
			} else if let Some(value) = number.as_u64() {
				Value::Decimal(Decimal::from(value))
			} else {
				Value::Float(number.as_f64().unwrap_or(f64::NAN))
			}
		}
		serde_json::Value::String(text) => Value::Text(text.clone()),
		serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
			return Err(PropertyError::NotScalar {
				path: path.to_string(),
			});
		}
	}))
}
