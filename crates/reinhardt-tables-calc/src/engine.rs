//! Running calculations over rows

use crate::calculator::Accumulator;
use crate::registry::CalculatorRegistry;
use reinhardt_tables_rows::{Column, ColumnSet, PropertyResolver, Value};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Result of one calculation
///
/// `value` is `None` when the calculator could not be resolved, which is
/// distinct from a computed zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalcResult {
	identifier: String,
	value: Option<Decimal>,
}

impl CalcResult {
	/// Creates a result
	pub fn new(identifier: impl Into<String>, value: Option<Decimal>) -> Self {
		Self {
			identifier: identifier.into(),
			value,
		}
	}

	/// Calculator name the result was asked for
	pub fn identifier(&self) -> &str {
		&self.identifier
	}

	/// Computed value
	pub fn value(&self) -> Option<Decimal> {
		self.value
	}
}

/// Every calculation of one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnCalcs {
	/// Alias of the column
	pub alias: String,
	/// Results in declaration order
	pub results: Vec<CalcResult>,
}

/// Folds column values into calculation results
#[derive(Debug, Clone, Copy)]
pub struct CalcEngine<'a> {
	registry: &'a CalculatorRegistry,
}

impl<'a> CalcEngine<'a> {
	/// Creates an engine resolving calculators in `registry`
	pub fn new(registry: &'a CalculatorRegistry) -> Self {
		Self { registry }
	}

	/// Runs the calculation `identifier` over the column values of `rows`
	///
	/// Rows whose property cannot be read are skipped. Values that are not
	/// numbers are parsed as decimals; a blank one counts as zero and an
	/// unparsable or null one is logged and counts as zero.
	pub fn compute<R: PropertyResolver>(&self, rows: &[R], column: &Column, identifier: &str) -> CalcResult {
		let calculator = match self.registry.resolve(identifier) {
			Ok(calculator) => calculator,
			Err(error) => {
				tracing::warn!(alias = column.alias(), %error, "calculation skipped");
				return CalcResult::new(identifier, None);
			}
		};

		let mut accumulator = calculator.accumulator(rows.len());
		each_row_value(rows, column.property(), accumulator.as_mut());
		CalcResult::new(identifier, Some(accumulator.result()))
	}

	/// Runs every calculation declared by `column`
	pub fn compute_column<R: PropertyResolver>(&self, rows: &[R], column: &Column) -> ColumnCalcs {
		ColumnCalcs {
			alias: column.alias().to_string(),
			results: column
				.calcs()
				.iter()
				.map(|identifier| self.compute(rows, column, identifier))
				.collect(),
		}
	}

	/// Runs the calculations of every calculated column
	pub fn compute_columns<R: PropertyResolver>(&self, rows: &[R], columns: &ColumnSet) -> Vec<ColumnCalcs> {
		columns
			.calculated()
			.map(|column| self.compute_column(rows, column))
			.collect()
	}
}

fn each_row_value<R: PropertyResolver>(rows: &[R], property: &str, accumulator: &mut dyn Accumulator) {
	for row in rows {
		let Ok(value) = row.property(property) else {
			continue;
		};

		let number = match &value {
			Some(value) if value.is_numeric() => value.to_decimal(),
			Some(Value::Text(text)) if text.trim().is_empty() => Some(Decimal::ZERO),
			Some(value) => Decimal::from_str(value.to_string().trim()).ok(),
			None => None,
		};

		match number {
			Some(number) => accumulator.process_value(number),
			None => {
				tracing::warn!(
					property,
					value = ?value,
					"unparsable calculation value counted as zero"
				);
				accumulator.process_value(Decimal::ZERO);
			}
		}
	}
}

/// Titles of the calculations declared by the first calculated column
///
/// Missing titles fall back to the calculator name.
pub fn calc_titles(columns: &ColumnSet) -> Vec<String> {
	let Some(column) = columns.first_calc_column() else {
		return Vec::new();
	};

	column
		.calcs()
		.iter()
		.enumerate()
		.map(|(position, calc)| {
			column
				.calc_titles()
				.get(position)
				.cloned()
				.unwrap_or_else(|| calc.clone())
		})
		.collect()
}
