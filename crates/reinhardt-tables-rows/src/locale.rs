//! Locale used when formatting values

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned for malformed locale tags
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid locale: {0:?}")]
pub struct InvalidLocale(pub String);

/// Language and optional country, written `en_US` or `en-US`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
	language: String,
	country: Option<String>,
}

impl Locale {
	/// Creates a locale from its parts
	pub fn new(language: impl Into<String>, country: Option<&str>) -> Self {
		Self {
			language: language.into().to_ascii_lowercase(),
			country: country.map(str::to_ascii_uppercase),
		}
	}

	/// Lowercase ISO language code
	pub fn language(&self) -> &str {
		&self.language
	}

	/// Uppercase ISO country code
	pub fn country(&self) -> Option<&str> {
		self.country.as_deref()
	}

	/// Separator between integer and fraction digits
	pub fn decimal_separator(&self) -> char {
		match self.language.as_str() {
			"de" | "fr" | "es" | "it" | "nl" | "pt" | "ru" | "pl" | "sv" | "da" | "nb" | "fi"
			| "cs" | "tr" => ',',
			_ => '.',
		}
	}

	/// Separator between digit groups
	pub fn grouping_separator(&self) -> char {
		match self.language.as_str() {
			"de" | "es" | "it" | "nl" | "pt" | "da" | "tr" => '.',
			"fr" | "ru" | "pl" | "sv" | "nb" | "fi" | "cs" => '\u{a0}',
			_ => {
				if self.country.as_deref() == Some("CH") {
					'\''
				} else {
					','
				}
			}
		}
	}

	/// Currency symbol of the locale's country
	pub fn currency_symbol(&self) -> &'static str {
		match self.country.as_deref() {
			Some("US") => "$",
			Some("GB") => "£",
			Some("JP") | Some("CN") => "¥",
			Some("IN") => "₹",
			Some("CH") => "CHF",
			Some("CA") => "CA$",
			Some("AU") => "A$",
			Some("DE" | "FR" | "ES" | "IT" | "NL" | "AT" | "BE" | "PT" | "FI" | "IE") => "€",
			_ => "¤",
		}
	}
}

impl Default for Locale {
	fn default() -> Self {
		Self::new("en", Some("US"))
	}
}

impl FromStr for Locale {
	type Err = InvalidLocale;

	fn from_str(tag: &str) -> Result<Self, Self::Err> {
		let invalid = || InvalidLocale(tag.to_string());
		let mut parts = tag.trim().split(['_', '-']);

		let language = parts.next().filter(|part| is_code(part, 2..=3)).ok_or_else(invalid)?;
		let country = match parts.next() {
			Some(part) if is_code(part, 2..=3) => Some(part),
			Some(_) => return Err(invalid()),
			None => None,
		};
		if parts.next().is_some() {
			return Err(invalid());
		}

		Ok(Self::new(language, country))
	}
}

impl fmt::Display for Locale {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.country {
			Some(country) => write!(f, "{}_{}", self.language, country),
			None => f.write_str(&self.language),
		}
	}
}

fn is_code(part: &str, len: std::ops::RangeInclusive<usize>) -> bool {
	len.contains(&part.len()) && part.chars().all(|c| c.is_ascii_alphanumeric())
}
