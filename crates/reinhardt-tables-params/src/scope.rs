//! Parameter key grammar
//!
//! Every table-scoped key is `prefix + tableId + segment [+ alias]`. The segment
//! strings are part of the persisted state format and must not change.

use crate::store::ParameterStore;

/// Page number segment
pub const PAGE: &str = "page";
/// Rows displayed (page size override) segment
pub const ROWS_DISPLAYED: &str = "rows";
/// Sort segment, followed by the column alias
pub const SORT: &str = "sort.";
/// Filter segment, followed by the column alias
pub const FILTER: &str = "filter.";
/// Alias segment, followed by the column alias; the value is the real property
pub const ALIAS: &str = "alias.";
/// Export view segment
pub const EXPORT_VIEW: &str = "export-view";
/// Export file name segment
pub const EXPORT_FILE_NAME: &str = "export-filename";
/// Tree node open segment
pub const TREE_OPEN: &str = "tree-open";

/// Key (after the filter segment) holding the filter action
pub const FILTER_ACTION: &str = "action";

/// Global marker naming the table being exported. Never persisted.
pub const EXPORT_TABLE_ID: &str = "export-table-id";
/// Global marker for the rendering instance. Never persisted.
pub const TABLE_INSTANCE: &str = "table-instance";

const TABLE_SEGMENTS: [&str; 8] = [
	PAGE,
	ROWS_DISPLAYED,
	SORT,
	FILTER,
	EXPORT_VIEW,
	EXPORT_FILE_NAME,
	ALIAS,
	TREE_OPEN,
];

/// Identifies one table's parameter namespace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableScope {
	prefix: String,
	table_id: String,
	prefix_with_table_id: String,
}

impl TableScope {
	/// Creates a scope for `table_id` under `prefix`
	///
	/// Keys are built by plain concatenation, so a separator (if any) belongs in
	/// the prefix or the table id.
	pub fn new(prefix: impl Into<String>, table_id: impl Into<String>) -> Self {
		let prefix = prefix.into();
		let table_id = table_id.into();
		let prefix_with_table_id = format!("{prefix}{table_id}");
		Self {
			prefix,
			table_id,
			prefix_with_table_id,
		}
	}

	/// Returns the table identifier
	pub fn table_id(&self) -> &str {
		&self.table_id
	}

	/// Returns the parameter prefix
	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	/// Returns `prefix + tableId`
	pub fn prefix_with_table_id(&self) -> &str {
		&self.prefix_with_table_id
	}

	/// Builds `prefix + tableId + segment`
	pub fn key(&self, segment: &str) -> String {
		format!("{}{}", self.prefix_with_table_id, segment)
	}

	/// Key of the page number parameter
	pub fn page_key(&self) -> String {
		self.key(PAGE)
	}

	/// Key of the rows displayed parameter
	pub fn rows_displayed_key(&self) -> String {
		self.key(ROWS_DISPLAYED)
	}

	/// Key prefix shared by all sort parameters
	pub fn sort_prefix(&self) -> String {
		self.key(SORT)
	}

	/// Sort key for one column alias
	pub fn sort_key(&self, alias: &str) -> String {
		format!("{}{}{}", self.prefix_with_table_id, SORT, alias)
	}

	/// Key prefix shared by all filter parameters
	pub fn filter_prefix(&self) -> String {
		self.key(FILTER)
	}

	/// Filter key for one column alias
	pub fn filter_key(&self, alias: &str) -> String {
		format!("{}{}{}", self.prefix_with_table_id, FILTER, alias)
	}

	/// Key of the filter action parameter
	pub fn filter_action_key(&self) -> String {
		self.filter_key(FILTER_ACTION)
	}

	/// Alias key for one column alias
	pub fn alias_key(&self, alias: &str) -> String {
		format!("{}{}{}", self.prefix_with_table_id, ALIAS, alias)
	}

	/// Key of the export view parameter
	pub fn export_view_key(&self) -> String {
		self.key(EXPORT_VIEW)
	}

	/// Key of the export file name parameter
	pub fn export_file_name_key(&self) -> String {
		self.key(EXPORT_FILE_NAME)
	}

	/// Returns true if `name` belongs to this table's recognized namespace
	pub fn is_table_parameter(&self, name: &str) -> bool {
		name.strip_prefix(self.prefix_with_table_id.as_str())
			.is_some_and(|rest| TABLE_SEGMENTS.iter().any(|segment| rest.starts_with(segment)))
	}

	/// Returns true for markers that are dropped on every request
	pub fn is_throwaway_parameter(name: &str) -> bool {
		name == EXPORT_TABLE_ID || name == TABLE_INSTANCE
	}
}

/// Returns true if the request asks to export `table_id`
pub fn is_export_request(raw: &ParameterStore, table_id: &str) -> bool {
	match raw.get(EXPORT_TABLE_ID) {
		Some(value) if !value.trim().is_empty() => value == table_id,
		_ => false,
	}
}
