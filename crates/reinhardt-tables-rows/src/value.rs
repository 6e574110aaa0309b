//! Scalar values read from row properties

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::cmp::Ordering;
use std::fmt;

/// A scalar property value
///
/// A missing (null) value is represented by `Option::None` wherever values are
/// read, never by a variant of this enum.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Boolean
	Bool(bool),
	/// Signed integer
	Int(i64),
	/// Floating point number
	Float(f64),
	/// Exact decimal number
	Decimal(Decimal),
	/// Text
	Text(String),
	/// Calendar date
	Date(NaiveDate),
	/// Date and time without time zone
	DateTime(NaiveDateTime),
}

impl Value {
	/// Name of the value kind, used in diagnostics
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Bool(_) => "bool",
			Self::Int(_) => "int",
			Self::Float(_) => "float",
			Self::Decimal(_) => "decimal",
			Self::Text(_) => "text",
			Self::Date(_) => "date",
			Self::DateTime(_) => "datetime",
		}
	}

	/// Returns true for the numeric kinds
	pub fn is_numeric(&self) -> bool {
		matches!(self, Self::Int(_) | Self::Float(_) | Self::Decimal(_))
	}

	/// Returns the text of a `Text` value
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(text) => Some(text),
			_ => None,
		}
	}

	/// Converts a numeric value to an exact decimal
	///
	/// Floats that cannot be represented (NaN, infinities) yield `None`.
	pub fn to_decimal(&self) -> Option<Decimal> {
		match self {
			Self::Int(value) => Some(Decimal::from(*value)),
			Self::Float(value) => Decimal::try_from(*value).ok(),
			Self::Decimal(value) => Some(*value),
			_ => None,
		}
	}

	/// Compares two values by their natural order
	///
	/// Numbers compare across numeric kinds and dates compare with date-times
	/// at midnight. Returns `None` for values of unrelated kinds and for NaN.
	pub fn natural_cmp(&self, other: &Self) -> Option<Ordering> {
		match (self, other) {
			(Self::Bool(a), Self::Bool(b)) => Some(a.cmp(b)),
			(Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
			(Self::Decimal(a), Self::Decimal(b)) => Some(a.cmp(b)),
			(Self::Int(a), Self::Decimal(b)) => Some(Decimal::from(*a).cmp(b)),
			(Self::Decimal(a), Self::Int(b)) => Some(a.cmp(&Decimal::from(*b))),
			(a, b) if a.is_numeric() && b.is_numeric() => a.to_f64()?.partial_cmp(&b.to_f64()?),
			(Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
			(Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
			(Self::DateTime(a), Self::DateTime(b)) => Some(a.cmp(b)),
			(Self::Date(a), Self::DateTime(b)) => Some(a.and_time(NaiveTime::MIN).cmp(b)),
			(Self::DateTime(a), Self::Date(b)) => Some(a.cmp(&b.and_time(NaiveTime::MIN))),
			_ => None,
		}
	}

	fn to_f64(&self) -> Option<f64> {
		match self {
			Self::Int(value) => Some(*value as f64),
			Self::Float(value) => Some(*value),
			Self::Decimal(value) => value.to_f64(),
			_ => None,
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Bool(value) => write!(f, "{value}"),
			Self::Int(value) => write!(f, "{value}"),
			Self::Float(value) => write!(f, "{value}"),
			Self::Decimal(value) => write!(f, "{value}"),
			Self::Text(value) => f.write_str(value),
			Self::Date(value) => write!(f, "{}", value.format("%Y-%m-%d")),
			Self::DateTime(value) => write!(f, "{}", value.format("%Y-%m-%d %H:%M:%S")),
		}
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Self::Int(i64::from(value))
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<Decimal> for Value {
	fn from(value: Decimal) -> Self {
		Self::Decimal(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl From<NaiveDate> for Value {
	fn from(value: NaiveDate) -> Self {
		Self::Date(value)
	}
}

impl From<NaiveDateTime> for Value {
	fn from(value: NaiveDateTime) -> Self {
		Self::DateTime(value)
	}
}
