//! Column definitions
//!
//! A [`Column`] describes one property of the rows: how it is addressed in
//! parameters (its alias), how it is formatted, and whether it can be sorted,
//! filtered or totalled. Columns of one table are collected in a
//! [`ColumnSet`], which leaves out columns not shown in the current view.
//!
//! ## Example
//!
//! ```
//! use reinhardt_tables_rows::{Column, ColumnSet};
//!
//! let mut columns = ColumnSet::new("html");
//! columns.add(Column::new("firstName")).unwrap();
//! columns.add(Column::new("address.city").with_alias("city")).unwrap();
//! columns.add(Column::new("salary").views_denied(["html"])).unwrap();
//!
//! assert_eq!(columns.len(), 2);
//! assert_eq!(columns.get("firstName").unwrap().title(), "First Name");
//! assert_eq!(columns.get("city").unwrap().property(), "address.city");
//! ```

use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

/// Errors raised while assembling a column set
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnError {
	/// Two columns share an alias
	#[error("Duplicate column alias: {alias}")]
	DuplicateAlias {
		/// Shared alias
		alias: String,
	},

	/// The column does not name a property
	#[error("Column property must not be blank")]
	BlankProperty,
}

/// Rows a column calculation runs over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CalcScope {
	/// Every row left after filtering, across all pages
	#[default]
	Filtered,
	/// Only the rows of the current page
	Page,
}

/// One column of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
	property: String,
	alias: Option<String>,
	title: Option<String>,
	date: bool,
	currency: bool,
	parse: Option<String>,
	format: Option<String>,
	calcs: Vec<String>,
	calc_titles: Vec<String>,
	calc_scope: CalcScope,
	sortable: Option<bool>,
	filterable: Option<bool>,
	views_allowed: BTreeSet<String>,
	views_denied: BTreeSet<String>,
}

impl Column {
	/// Creates a column over the row property at `property`
	pub fn new(property: impl Into<String>) -> Self {
		Self {
			property: property.into(),
			alias: None,
			title: None,
			date: false,
			currency: false,
			parse: None,
			format: None,
			calcs: Vec::new(),
			calc_titles: Vec::new(),
			calc_scope: CalcScope::default(),
			sortable: None,
			filterable: None,
			views_allowed: BTreeSet::new(),
			views_denied: BTreeSet::new(),
		}
	}

	/// Sets the identifier used in sort, filter and alias parameters
	pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
		self.alias = Some(alias.into());
		self
	}

	/// Sets the header title
	pub fn with_title(mut self, title: impl Into<String>) -> Self {
		self.title = Some(title.into());
		self
	}

	/// Marks the column as holding dates
	pub fn date(mut self) -> Self {
		self.date = true;
		self
	}

	/// Marks the column as holding currency amounts
	pub fn currency(mut self) -> Self {
		self.currency = true;
		self
	}

	/// Sets the pattern used to read dates stored as text
	pub fn with_parse(mut self, parse: impl Into<String>) -> Self {
		self.parse = Some(parse.into());
		self
	}

	/// Sets the display pattern, or the name of a configured format
	pub fn with_format(mut self, format: impl Into<String>) -> Self {
		self.format = Some(format.into());
		self
	}

	/// Adds a calculation, by registered calculator name
	pub fn with_calc(mut self, calc: impl Into<String>) -> Self {
		self.calcs.push(calc.into());
		self
	}

	/// Adds a title for the calculation at the same position
	pub fn with_calc_title(mut self, title: impl Into<String>) -> Self {
		self.calc_titles.push(title.into());
		self
	}

	/// Sets the rows calculations run over
	pub fn with_calc_scope(mut self, scope: CalcScope) -> Self {
		self.calc_scope = scope;
		self
	}

	/// Sets whether this column can be sorted
	pub fn sortable(mut self, sortable: bool) -> Self {
		self.sortable = Some(sortable);
		self
	}

	/// Sets whether this column can be filtered
	pub fn filterable(mut self, filterable: bool) -> Self {
		self.filterable = Some(filterable);
		self
	}

	/// Restricts the column to the given views
	pub fn views_allowed<I, S>(mut self, views: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.views_allowed.extend(views.into_iter().map(Into::into));
		self
	}

	/// Hides the column in the given views
	pub fn views_denied<I, S>(mut self, views: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.views_denied.extend(views.into_iter().map(Into::into));
		self
	}

	/// Row property path
	pub fn property(&self) -> &str {
		&self.property
	}

	/// Parameter-facing identifier, the property unless set
	pub fn alias(&self) -> &str {
		self.alias.as_deref().unwrap_or(&self.property)
	}

	/// Header title
	///
	/// Without an explicit title the property is turned into words:
	/// `firstName` becomes `First Name`.
	pub fn title(&self) -> String {
		match &self.title {
			Some(title) => title.clone(),
			None => property_to_words(&self.property),
		}
	}

	/// Returns true if the column holds dates
	pub fn is_date(&self) -> bool {
		self.date
	}

	/// Returns true if the column holds currency amounts
	pub fn is_currency(&self) -> bool {
		self.currency
	}

	/// Pattern used to read dates stored as text
	pub fn parse(&self) -> Option<&str> {
		self.parse.as_deref()
	}

	/// Display pattern
	pub fn format(&self) -> Option<&str> {
		self.format.as_deref()
	}

	/// Calculator names, in declaration order
	pub fn calcs(&self) -> &[String] {
		&self.calcs
	}

	/// Calculation titles, in declaration order
	pub fn calc_titles(&self) -> &[String] {
		&self.calc_titles
	}

	/// Rows calculations run over
	pub fn calc_scope(&self) -> CalcScope {
		self.calc_scope
	}

	/// Returns true if any calculation is declared
	pub fn is_calculated(&self) -> bool {
		!self.calcs.is_empty()
	}

	/// Returns true if the column can be sorted
	pub fn is_sortable(&self) -> bool {
		self.sortable.unwrap_or(true)
	}

	/// Returns true if the column can be filtered
	pub fn is_filterable(&self) -> bool {
		self.filterable.unwrap_or(true)
	}

	/// Returns true if the column is shown in `view`
	pub fn allows_view(&self, view: &str) -> bool {
		if self.views_denied.contains(view) {
			return false;
		}
		self.views_allowed.is_empty() || self.views_allowed.contains(view)
	}

	fn apply_defaults(&mut self, defaults: &ColumnDefaults) {
		self.sortable.get_or_insert(defaults.sortable);
		self.filterable.get_or_insert(defaults.filterable);

		let format = match self.format.take() {
			Some(name) => Some(defaults.formats.get(&name).cloned().unwrap_or(name)),
			None if self.date => Some(defaults.date_format.clone()),
			None if self.currency => Some(defaults.currency_format.clone()),
			None => None,
		};
		self.format = format;
	}
}

/// Values a column takes when it does not set them itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefaults {
	/// Display pattern of date columns
	pub date_format: String,
	/// Display pattern of currency columns
	pub currency_format: String,
	/// Whether columns can be sorted
	pub sortable: bool,
	/// Whether columns can be filtered
	pub filterable: bool,
	/// Named display patterns, referenced by [`Column::with_format`]
	pub formats: BTreeMap<String, String>,
}

impl Default for ColumnDefaults {
	fn default() -> Self {
		Self {
			date_format: "%m/%d/%Y".to_string(),
			currency_format: "###,###,##0.00".to_string(),
			sortable: true,
			filterable: true,
			formats: BTreeMap::new(),
		}
	}
}

/// Columns shown in one view of a table, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet {
	view: String,
	defaults: ColumnDefaults,
	columns: Vec<Column>,
}

impl ColumnSet {
	/// Creates an empty set for `view`
	pub fn new(view: impl Into<String>) -> Self {
		Self {
			view: view.into(),
			defaults: ColumnDefaults::default(),
			columns: Vec::new(),
		}
	}

	/// Sets the defaults applied to columns added afterwards
	pub fn with_defaults(mut self, defaults: ColumnDefaults) -> Self {
		self.defaults = defaults;
		self
	}

	/// View the columns are shown in
	pub fn view(&self) -> &str {
		&self.view
	}

	/// Adds a column
	///
	/// Returns `Ok(false)` when the column is not shown in this view.
	///
	/// # Errors
	///
	/// Returns [`ColumnError`] for a blank property or an alias already taken.
	pub fn add(&mut self, mut column: Column) -> Result<bool, ColumnError> {
		if column.property.trim().is_empty() {
			return Err(ColumnError::BlankProperty);
		}
		if !column.allows_view(&self.view) {
			tracing::debug!(view = %self.view, alias = column.alias(), "column not shown in view");
			return Ok(false);
		}
		if self.get(column.alias()).is_some() {
			return Err(ColumnError::DuplicateAlias {
				alias: column.alias().to_string(),
			});
		}

		column.apply_defaults(&self.defaults);
		self.columns.push(column);
		Ok(true)
	}

	/// Returns the column with `alias`
	pub fn get(&self, alias: &str) -> Option<&Column> {
		self.columns.iter().find(|column| column.alias() == alias)
	}

	/// All columns
	pub fn columns(&self) -> &[Column] {
		&self.columns
	}

	/// Iterates over the columns
	pub fn iter(&self) -> std::slice::Iter<'_, Column> {
		self.columns.iter()
	}

	/// Columns declaring at least one calculation
	pub fn calculated(&self) -> impl Iterator<Item = &Column> {
		self.columns.iter().filter(|column| column.is_calculated())
	}

	/// First column declaring a calculation, where totals rows start
	pub fn first_calc_column(&self) -> Option<&Column> {
		self.calculated().next()
	}

	/// Number of columns
	pub fn len(&self) -> usize {
		self.columns.len()
	}

	/// Returns true if no column is shown
	pub fn is_empty(&self) -> bool {
		self.columns.is_empty()
	}
}

impl<'a> IntoIterator for &'a ColumnSet {
	type Item = &'a Column;
	type IntoIter = std::slice::Iter<'a, Column>;

	fn into_iter(self) -> Self::IntoIter {
		self.columns.iter()
	}
}

/// Turns a property path into title words: `address.zipCode` -> `Address Zip Code`
fn property_to_words(property: &str) -> String {
	let mut words: Vec<String> = Vec::new();
	let mut current = String::new();
	let mut previous_lower = false;

	for c in property.chars() {
		if c == '.' || c == '_' || c.is_whitespace() {
			if !current.is_empty() {
				words.push(std::mem::take(&mut current));
			}
			previous_lower = false;
			continue;
		}
		if c.is_uppercase() && previous_lower && !current.is_empty() {
			words.push(std::mem::take(&mut current));
		}
		previous_lower = c.is_lowercase() || c.is_ascii_digit();
		current.push(c);
	}
	if !current.is_empty() {
		words.push(current);
	}

	words
		.iter()
		.map(|word| {
			let mut chars = word.chars();
			match chars.next() {
				Some(first) => first.to_uppercase().chain(chars).collect(),
				None => String::new(),
			}
		})
		.collect::<Vec<_>>()
		.join(" ")
}
