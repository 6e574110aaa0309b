//! Page directive

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;

/// Requested page
///
/// Page numbers are 1-indexed. `size_override` is the page size carried by the
/// request, replacing the table's configured size when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
	number: NonZeroU32,
	size_override: Option<NonZeroU32>,
}

impl Page {
	/// Creates a page without size override
	pub fn new(number: NonZeroU32) -> Self {
		Self {
			number,
			size_override: None,
		}
	}

	/// The first page
	pub fn first() -> Self {
		Self::new(NonZeroU32::MIN)
	}

	/// Sets the page size override
	pub fn with_size_override(mut self, size: Option<NonZeroU32>) -> Self {
		self.size_override = size;
		self
	}

	/// Returns the 1-indexed page number
	pub fn number(&self) -> u32 {
		self.number.get()
	}

	/// Returns the requested page size, if the request carried one
	pub fn size_override(&self) -> Option<u32> {
		self.size_override.map(NonZeroU32::get)
	}
}

impl Default for Page {
	fn default() -> Self {
		Self::first()
	}
}
