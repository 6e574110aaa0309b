//! Export views
//!
//! Exports are registered per table and keyed by view name (`csv`, `xls`,
//! ...). When a request exports a table, the `export-view` parameter picks the
//! export; writing the bytes is left to the embedding application.

use reinhardt_tables_params::{ParameterStore, TableScope};
use std::collections::BTreeMap;
use thiserror::Error;

/// Export configuration errors
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExportError {
	/// The request exports the table but names no view
	#[error("Export requested for table {table_id:?} without an export view parameter")]
	MissingView {
		/// Table being exported
		table_id: String,
	},

	/// The requested view has no registered export
	#[error(
		"Export requested for table {table_id:?} with view {view:?}, but no export is registered for that view"
	)]
	NotRegistered {
		/// Table being exported
		table_id: String,
		/// Requested view
		view: String,
	},
}

/// One export of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Export {
	view: String,
	file_name: Option<String>,
	content_type: Option<String>,
	text: Option<String>,
}

impl Export {
	/// Creates an export for `view`
	pub fn new(view: impl Into<String>) -> Self {
		Self {
			view: view.into(),
			file_name: None,
			content_type: None,
			text: None,
		}
	}

	/// Sets the name of the downloaded file
	pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
		self.file_name = Some(file_name.into());
		self
	}

	/// Sets the content type of the exported document
	pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
		self.content_type = Some(content_type.into());
		self
	}

	/// Sets the link text offered for this export
	pub fn with_text(mut self, text: impl Into<String>) -> Self {
		self.text = Some(text.into());
		self
	}

	/// View name
	pub fn view(&self) -> &str {
		&self.view
	}

	/// File name of the download
	pub fn file_name(&self) -> Option<&str> {
		self.file_name.as_deref()
	}

	/// Content type of the document
	pub fn content_type(&self) -> Option<&str> {
		self.content_type.as_deref()
	}

	/// Link text, the view name unless set
	pub fn text(&self) -> &str {
		self.text.as_deref().unwrap_or(&self.view)
	}
}

/// Exports registered for one table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportRegistry {
	exports: BTreeMap<String, Export>,
}

impl ExportRegistry {
	/// Creates an empty registry
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers an export, replacing any export for the same view
	pub fn register(&mut self, export: Export) -> Option<Export> {
		self.exports.insert(export.view.clone(), export)
	}

	/// Returns the export registered for `view`
	pub fn get(&self, view: &str) -> Option<&Export> {
		self.exports.get(view)
	}

	/// Iterates over the exports in view order
	pub fn iter(&self) -> impl Iterator<Item = &Export> {
		self.exports.values()
	}

	/// Number of registered exports
	pub fn len(&self) -> usize {
		self.exports.len()
	}

	/// Returns true if nothing is registered
	pub fn is_empty(&self) -> bool {
		self.exports.is_empty()
	}

	/// Selects the export requested by `params`
	///
	/// The `export-filename` parameter, when present, replaces the registered
	/// file name.
	///
	/// # Errors
	///
	/// Returns [`ExportError`] when no view is requested or the view is not
	/// registered.
	pub fn current(&self, params: &ParameterStore, scope: &TableScope) -> Result<Export, ExportError> {
		let view = params
			.get(&scope.export_view_key())
			.map(str::trim)
			.filter(|view| !view.is_empty())
			.ok_or_else(|| ExportError::MissingView {
				table_id: scope.table_id().to_string(),
			})?;

		let mut export = self
			.get(view)
			.cloned()
			.ok_or_else(|| ExportError::NotRegistered {
				table_id: scope.table_id().to_string(),
				view: view.to_string(),
			})?;

		if let Some(file_name) = params
			.get(&scope.export_file_name_key())
			.filter(|name| !name.trim().is_empty())
		{
			export.file_name = Some(file_name.to_string());
		}
		Ok(export)
	}
}

impl FromIterator<Export> for ExportRegistry {
	fn from_iter<I: IntoIterator<Item = Export>>(iter: I) -> Self {
		let mut registry = Self::new();
		for export in iter {
			registry.register(export);
		}
		registry
	}
}
