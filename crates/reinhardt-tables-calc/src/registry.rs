//! Name to calculator lookup

use crate::calculator::{AverageCalc, Calculator, CountCalc, TotalCalc};
use crate::error::CalcError;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Calculators available to a table, by name
///
/// Aliases map a name used by columns onto a registered name, the way a
/// settings file can point `sum` at `total`. Resolution has no side effects.
#[derive(Clone, Default)]
pub struct CalculatorRegistry {
	calculators: HashMap<String, Arc<dyn Calculator>>,
	aliases: HashMap<String, String>,
}

impl CalculatorRegistry {
	/// Creates an empty registry
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a registry holding `total`, `average` and `count`
	pub fn with_builtins() -> Self {
		let mut registry = Self::new();
		registry.register("total", TotalCalc);
		registry.register("average", AverageCalc);
		registry.register("count", CountCalc);
		registry
	}

	/// Registers a calculator, replacing any calculator of the same name
	pub fn register(&mut self, name: impl Into<String>, calculator: impl Calculator + 'static) {
		self.calculators.insert(name.into(), Arc::new(calculator));
	}

	/// Makes `name` resolve to the calculator registered as `target`
	pub fn alias(&mut self, name: impl Into<String>, target: impl Into<String>) {
		self.aliases.insert(name.into(), target.into());
	}

	/// Returns true if `name` resolves
	pub fn contains(&self, name: &str) -> bool {
		self.resolve(name).is_ok()
	}

	/// Resolves a calculator name, following one alias
	///
	/// # Errors
	///
	/// Returns [`CalcError::UnknownCalculator`] when nothing is registered
	/// under the name.
	pub fn resolve(&self, name: &str) -> Result<Arc<dyn Calculator>, CalcError> {
		let target = self
			.aliases
			.get(name)
			.map(String::as_str)
			.filter(|target| !target.trim().is_empty())
			.unwrap_or(name);

		self.calculators
			.get(target)
			.cloned()
			.ok_or_else(|| CalcError::UnknownCalculator(target.to_string()))
	}

	/// Registered names, sorted
	pub fn names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.calculators.keys().map(String::as_str).collect();
		names.sort_unstable();
		names
	}
}

impl fmt::Debug for CalculatorRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CalculatorRegistry")
			.field("calculators", &self.names())
			.field("aliases", &self.aliases)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use rust_decimal::Decimal;

	#[rstest]
	fn test_builtins() {
		let registry = CalculatorRegistry::with_builtins();
		assert_eq!(registry.names(), ["average", "count", "total"]);
		assert!(registry.contains("total"));
		assert!(!registry.contains("median"));
	}

	#[rstest]
	fn test_unknown_calculator() {
		let registry = CalculatorRegistry::with_builtins();
		assert_eq!(
			registry.resolve("median").err(),
			Some(CalcError::UnknownCalculator("median".to_string()))
		);
	}

	#[rstest]
	fn test_alias() {
		let mut registry = CalculatorRegistry::with_builtins();
		registry.alias("sum", "total");
		registry.alias("blank", " ");

		let mut accumulator = registry.resolve("sum").unwrap().accumulator(2);
		accumulator.process_value(Decimal::from(2));
		accumulator.process_value(Decimal::from(3));
		assert_eq!(accumulator.result(), Decimal::from(5));
		assert!(!registry.contains("blank"));
	}

	#[rstest]
	fn test_registries_are_isolated() {
		let mut first = CalculatorRegistry::new();
		first.register("total", TotalCalc);
		let second = CalculatorRegistry::new();
		assert!(first.contains("total"));
		assert!(!second.contains("total"));
	}
}
