//! Locale-aware formatting of date and currency values
//!
//! Date patterns use `strftime` syntax. Number patterns follow the familiar
//! decimal format notation:
//!
//! | Symbol | Meaning |
//! |--------|---------|
//! | `0`    | Digit, zero shown when absent |
//! | `#`    | Digit, nothing shown when absent |
//! | `,`    | Grouping separator position |
//! | `.`    | Decimal separator position |
//! | `¤`    | Currency symbol of the locale |
//!
//! Anything before or after the digit symbols is copied literally. Numbers
//! are rounded half-to-even.

use crate::locale::Locale;
use crate::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt::Write;
use std::str::FromStr;
use thiserror::Error;

/// Formatting errors
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
	/// The pattern cannot be used for this value
	#[error("Invalid format pattern: {0:?}")]
	InvalidPattern(String),

	/// The value is not a date and cannot be parsed as one
	#[error("Cannot format {value:?} as a date")]
	NotADate {
		/// Offending value
		value: String,
	},

	/// The value is not a number and cannot be parsed as one
	#[error("Cannot format {value:?} as a number")]
	NotANumber {
		/// Offending value
		value: String,
	},
}

/// Formats values the way they are displayed
pub trait ValueFormatter: Send + Sync {
	/// Formats a date value with `pattern`
	///
	/// `parse` is the pattern used to read dates stored as text.
	fn format_date(
		&self,
		value: &Value,
		parse: Option<&str>,
		pattern: &str,
		locale: &Locale,
	) -> Result<String, FormatError>;

	/// Formats a numeric value with a number `pattern`
	fn format_number(&self, value: &Value, pattern: &str, locale: &Locale)
	-> Result<String, FormatError>;
}

/// Formatter driven by the patterns described in the module docs
///
/// Dates stored as integers are read as milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternFormatter;

const DEFAULT_DATE_PARSE: [&str; 3] = ["%Y-%m-%d", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];

impl PatternFormatter {
	fn date_time(value: &Value, parse: Option<&str>) -> Result<NaiveDateTime, FormatError> {
		let not_a_date = || FormatError::NotADate {
			value: value.to_string(),
		};

		match value {
			Value::Date(date) => Ok(date.and_time(chrono::NaiveTime::MIN)),
			Value::DateTime(date_time) => Ok(*date_time),
			Value::Int(millis) => DateTime::<Utc>::from_timestamp_millis(*millis)
				.map(|date_time| date_time.naive_utc())
				.ok_or_else(not_a_date),
			Value::Text(text) => {
				let text = text.trim();
				let patterns = parse.map_or_else(|| DEFAULT_DATE_PARSE.to_vec(), |parse| vec![parse]);
				patterns
					.iter()
					.find_map(|pattern| {
						NaiveDateTime::parse_from_str(text, pattern)
							.ok()
							.or_else(|| {
								NaiveDate::parse_from_str(text, pattern)
									.ok()
									.map(|date| date.and_time(chrono::NaiveTime::MIN))
							})
					})
					.ok_or_else(not_a_date)
			}
			_ => Err(not_a_date()),
		}
	}
}

impl ValueFormatter for PatternFormatter {
	fn format_date(
		&self,
		value: &Value,
		parse: Option<&str>,
		pattern: &str,
		_locale: &Locale,
	) -> Result<String, FormatError> {
		let date_time = Self::date_time(value, parse)?;
		let mut out = String::new();
		write!(out, "{}", date_time.format(pattern))
			.map_err(|_| FormatError::InvalidPattern(pattern.to_string()))?;
		Ok(out)
	}

	fn format_number(
		&self,
		value: &Value,
		pattern: &str,
		locale: &Locale,
	) -> Result<String, FormatError> {
		let number = match value {
			Value::Text(text) => Decimal::from_str(text.trim()).ok(),
			other => other.to_decimal(),
		}
		.ok_or_else(|| FormatError::NotANumber {
			value: value.to_string(),
		})?;

		Ok(NumberPattern::parse(pattern)?.format(number, locale))
	}
}

/// Parsed decimal format pattern
#[derive(Debug, Clone, PartialEq, Eq)]
struct NumberPattern {
	prefix: String,
	suffix: String,
	min_integer: usize,
	grouping: Option<usize>,
	min_fraction: usize,
	max_fraction: usize,
}

impl NumberPattern {
	fn parse(pattern: &str) -> Result<Self, FormatError> {
		let invalid = || FormatError::InvalidPattern(pattern.to_string());
		// Negative subpatterns are not supported; the leading minus is used instead.
		let positive = pattern.split(';').next().unwrap_or_default();

		let is_digit_symbol = |c: char| matches!(c, '#' | '0' | ',' | '.');
		let start = positive.find(is_digit_symbol).ok_or_else(invalid)?;
		let end = positive.rfind(is_digit_symbol).map(|i| i + 1).ok_or_else(invalid)?;
		let (prefix, digits, suffix) = (&positive[..start], &positive[start..end], &positive[end..]);
		if digits.chars().any(|c| !is_digit_symbol(c)) {
			return Err(invalid());
		}

		let (integer, fraction) = match digits.split_once('.') {
			Some((integer, fraction)) if !fraction.contains(['.', ',']) => (integer, fraction),
			Some(_) => return Err(invalid()),
			None => (digits, ""),
		};
		if !integer.contains(['#', '0']) && !fraction.contains(['#', '0']) {
			return Err(invalid());
		}

		let grouping = integer
			.rfind(',')
			.map(|i| integer.len() - i - 1)
			.filter(|size| *size > 0);

		Ok(Self {
			prefix: prefix.to_string(),
			suffix: suffix.to_string(),
			min_integer: integer.matches('0').count(),
			grouping,
			min_fraction: fraction.matches('0').count(),
			max_fraction: fraction.matches(['0', '#']).count(),
		})
	}

	fn format(&self, number: Decimal, locale: &Locale) -> String {
		let rounded = number.round_dp_with_strategy(
			self.max_fraction as u32,
			RoundingStrategy::MidpointNearestEven,
		);
		let negative = rounded.is_sign_negative() && !rounded.is_zero();
		let plain = rounded.abs().to_string();
		let (integer, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), ""));

		let mut fraction = fraction.trim_end_matches('0').to_string();
		while fraction.len() < self.min_fraction {
			fraction.push('0');
		}

		let mut integer = if integer == "0" { String::new() } else { integer.to_string() };
		while integer.len() < self.min_integer {
			integer.insert(0, '0');
		}
		if integer.is_empty() && fraction.is_empty() {
			integer.push('0');
		}

		let mut out = String::new();
		if negative {
			out.push('-');
		}
		out.push_str(&self.affix(&self.prefix, locale));
		out.push_str(&group(&integer, self.grouping, locale.grouping_separator()));
		if !fraction.is_empty() {
			out.push(locale.decimal_separator());
			out.push_str(&fraction);
		}
		out.push_str(&self.affix(&self.suffix, locale));
		out
	}

	fn affix(&self, text: &str, locale: &Locale) -> String {
		text.replace('¤', locale.currency_symbol())
	}
}

fn group(digits: &str, size: Option<usize>, separator: char) -> String {
	let Some(size) = size else {
		return digits.to_string();
	};

	let mut out = String::with_capacity(digits.len() + digits.len() / size);
	for (i, c) in digits.chars().enumerate() {
		if i > 0 && (digits.len() - i) % size == 0 {
			out.push(separator);
		}
		out.push(c);
	}
	out
}
