//! Calculator contract and the built-in calculators

use rust_decimal::Decimal;

/// Running state of one calculation
pub trait Accumulator {
	/// Feeds one column value
	fn process_value(&mut self, value: Decimal);

	/// Returns the result over the values fed so far
	fn result(&self) -> Decimal;
}

/// A named aggregate over a column
pub trait Calculator: Send + Sync {
	/// Starts a calculation over `row_count` rows
	///
	/// `row_count` counts every row handed to the calculation, including rows
	/// whose value could not be read.
	fn accumulator(&self, row_count: usize) -> Box<dyn Accumulator>;
}

/// Sum of the values
#[derive(Debug, Clone, Copy, Default)]
pub struct TotalCalc;

/// Sum of the values divided by the row count; zero for no rows
#[derive(Debug, Clone, Copy, Default)]
pub struct AverageCalc;

/// Number of values fed
#[derive(Debug, Clone, Copy, Default)]
pub struct CountCalc;

#[derive(Debug, Default)]
struct Sum {
	total: Decimal,
}

impl Accumulator for Sum {
	fn process_value(&mut self, value: Decimal) {
		self.total = match self.total.checked_add(value) {
			Some(total) => total,
			None => {
				tracing::warn!(total = %self.total, %value, "calculation total overflowed, clamping");
				if value.is_sign_negative() {
					Decimal::MIN
				} else {
					Decimal::MAX
				}
			}
		};
	}

	fn result(&self) -> Decimal {
		self.total
	}
}

#[derive(Debug)]
struct Average {
	sum: Sum,
	row_count: usize,
}

impl Accumulator for Average {
	fn process_value(&mut self, value: Decimal) {
		self.sum.process_value(value);
	}

	fn result(&self) -> Decimal {
		if self.row_count == 0 {
			return Decimal::ZERO;
		}
		self.sum.result() / Decimal::from(self.row_count)
	}
}

#[derive(Debug, Default)]
struct Count {
	count: u64,
}

impl Accumulator for Count {
	fn process_value(&mut self, _value: Decimal) {
		self.count += 1;
	}

	fn result(&self) -> Decimal {
		Decimal::from(self.count)
	}
}

impl Calculator for TotalCalc {
	fn accumulator(&self, _row_count: usize) -> Box<dyn Accumulator> {
		Box::new(Sum::default())
	}
}

impl Calculator for AverageCalc {
	fn accumulator(&self, row_count: usize) -> Box<dyn Accumulator> {
		Box::new(Average {
			sum: Sum::default(),
			row_count,
		})
	}
}

impl Calculator for CountCalc {
	fn accumulator(&self, _row_count: usize) -> Box<dyn Accumulator> {
		Box::new(Count::default())
	}
}
