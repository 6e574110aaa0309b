//! Table settings
//!
//! Settings are read from TOML. Every key is optional:
//!
//! ```toml
//! prefix = "ec_"
//! rows_displayed = 25
//! state = "notify"
//! locale = "de_DE"
//! currency_format = "#,##0.00 ¤"
//!
//! [formats]
//! short = "%d.%m."
//!
//! [calc]
//! sum = "total"
//! ```

use reinhardt_tables_params::StateMode;
use reinhardt_tables_rows::{ColumnDefaults, InvalidLocale, Locale};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Error type for loading settings
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
	/// The settings file could not be read
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// The settings are not valid TOML for [`TableSettings`]
	#[error("TOML error: {0}")]
	Toml(#[from] toml::de::Error),

	/// The locale tag is malformed
	#[error(transparent)]
	Locale(#[from] InvalidLocale),
}

/// Settings shared by the tables of an application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableSettings {
	/// Prepended to every table parameter name
	pub prefix: String,
	/// Rows per page unless the request overrides it
	pub rows_displayed: usize,
	/// Whether rows are split into pages
	pub show_pagination: bool,
	/// View of interactive requests
	pub view: String,
	/// How table parameters are persisted between requests
	pub state: StateMode,
	/// Parameter asking to restore persisted state in `notify` mode
	pub state_attr: String,
	/// Whether parameters outside the table grammar are kept
	pub auto_include_parameters: bool,
	/// Locale tag, such as `en_US`
	pub locale: String,
	/// Display pattern of date columns
	pub date_format: String,
	/// Display pattern of currency columns
	pub currency_format: String,
	/// Whether columns can be sorted unless they say otherwise
	pub sortable: bool,
	/// Whether columns can be filtered unless they say otherwise
	pub filterable: bool,
	/// Whether nulls sort after every value in ascending order
	pub nulls_high: bool,
	/// Named display patterns columns may refer to
	pub formats: BTreeMap<String, String>,
	/// Calculator aliases: name used by columns -> registered calculator
	pub calc: BTreeMap<String, String>,
}

impl Default for TableSettings {
	fn default() -> Self {
		let columns = ColumnDefaults::default();
		Self {
			prefix: String::new(),
			rows_displayed: 15,
			show_pagination: true,
			view: "html".to_string(),
			state: StateMode::default(),
			state_attr: "state".to_string(),
			auto_include_parameters: false,
			locale: "en_US".to_string(),
			date_format: columns.date_format,
			currency_format: columns.currency_format,
			sortable: columns.sortable,
			filterable: columns.filterable,
			nulls_high: true,
			formats: columns.formats,
			calc: BTreeMap::new(),
		}
	}
}

impl TableSettings {
	/// Parses settings from TOML
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_tables::TableSettings;
	///
	/// let settings = TableSettings::from_toml_str("rows_displayed = 50").unwrap();
	/// assert_eq!(settings.rows_displayed, 50);
	/// assert_eq!(settings.view, "html");
	/// ```
	pub fn from_toml_str(source: &str) -> Result<Self, SettingsError> {
		let settings: Self = toml::from_str(source)?;
		settings.locale()?;
		Ok(settings)
	}

	/// Reads settings from a TOML file
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
		let source = fs::read_to_string(path.as_ref())?;
		tracing::debug!(path = %path.as_ref().display(), "loading table settings");
		Self::from_toml_str(&source)
	}

	/// Parsed locale
	pub fn locale(&self) -> Result<Locale, SettingsError> {
		Ok(self.locale.parse()?)
	}

	/// Column defaults derived from these settings
	pub fn column_defaults(&self) -> ColumnDefaults {
		ColumnDefaults {
			date_format: self.date_format.clone(),
			currency_format: self.currency_format.clone(),
			sortable: self.sortable,
			filterable: self.filterable,
			formats: self.formats.clone(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::io::Write;

	#[rstest]
	fn test_defaults() {
		let settings = TableSettings::from_toml_str("").unwrap();
		assert_eq!(settings, TableSettings::default());
		assert_eq!(settings.rows_displayed, 15);
		assert_eq!(settings.state, StateMode::Persist);
		assert_eq!(settings.locale().unwrap(), Locale::default());
	}

	#[rstest]
	fn test_from_toml() {
		let settings = TableSettings::from_toml_str(
			r#"
			prefix = "ec_"
			state = "notify"
			state_attr = "restore"
			locale = "de_DE"
			sortable = false

			[formats]
			short = "%d.%m."

			[calc]
			sum = "total"
			"#,
		)
		.unwrap();

		assert_eq!(settings.prefix, "ec_");
		assert_eq!(settings.state, StateMode::Notify);
		assert_eq!(settings.state_attr, "restore");
		assert_eq!(settings.calc.get("sum").map(String::as_str), Some("total"));

		let defaults = settings.column_defaults();
		assert!(!defaults.sortable);
		assert!(defaults.filterable);
		assert_eq!(defaults.formats.get("short").map(String::as_str), Some("%d.%m."));
	}

	#[rstest]
	#[case("rows_displayed = \"many\"")]
	#[case("state = \"forever\"")]
	#[case("locale = \"not a locale\"")]
	fn test_invalid(#[case] source: &str) {
		assert!(TableSettings::from_toml_str(source).is_err());
	}

	#[rstest]
	fn test_from_path() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "rows_displayed = 40").unwrap();
		writeln!(file, "show_pagination = false").unwrap();

		let settings = TableSettings::from_path(file.path()).unwrap();
		assert_eq!(settings.rows_displayed, 40);
		assert!(!settings.show_pagination);
	}

	#[rstest]
	fn test_missing_file() {
		let dir = tempfile::tempdir().unwrap();
		let result = TableSettings::from_path(dir.path().join("tables.toml"));
		assert!(matches!(result, Err(SettingsError::Io(_))));
	}
}
