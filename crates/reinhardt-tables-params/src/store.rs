//! Ordered parameter storage

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// Mapping from parameter name to its ordered values
///
/// Keys iterate in lexicographic order. Scans that pick "the first matching
/// key" (sort resolution in particular) rely on this order to be reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterStore {
	params: BTreeMap<String, Vec<String>>,
}

impl ParameterStore {
	/// Creates an empty store
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses an `application/x-www-form-urlencoded` query string
	///
	/// Repeated names accumulate their values in order of appearance.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_tables_params::ParameterStore;
	///
	/// let store = ParameterStore::from_query("tag=a&tag=b&page=2").unwrap();
	/// assert_eq!(store.get_all("tag"), &["a", "b"]);
	/// assert_eq!(store.get("page"), Some("2"));
	/// ```
	pub fn from_query(query: &str) -> Result<Self, serde_urlencoded::de::Error> {
		let pairs: Vec<(String, String)> =
			serde_urlencoded::from_str(query.trim_start_matches('?'))?;
		Ok(pairs.into_iter().collect())
	}

	/// Serializes the store back to a query string, keys in store order
	pub fn to_query(&self) -> Result<String, serde_urlencoded::ser::Error> {
		let pairs: Vec<(&str, &str)> = self
			.params
			.iter()
			.flat_map(|(name, values)| values.iter().map(move |v| (name.as_str(), v.as_str())))
			.collect();
		serde_urlencoded::to_string(pairs)
	}

	/// Returns the first value of `name`
	pub fn get(&self, name: &str) -> Option<&str> {
		self.params
			.get(name)
			.and_then(|values| values.first())
			.map(String::as_str)
	}

	/// Returns every value of `name` (empty when absent)
	pub fn get_all(&self, name: &str) -> &[String] {
		self.params.get(name).map(Vec::as_slice).unwrap_or(&[])
	}

	/// Returns true if `name` is present
	pub fn contains(&self, name: &str) -> bool {
		self.params.contains_key(name)
	}

	/// Replaces all values of `name`
	pub fn insert(&mut self, name: impl Into<String>, values: Vec<String>) {
		self.params.insert(name.into(), values);
	}

	/// Replaces all values of `name` with a single value
	pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.params.insert(name.into(), vec![value.into()]);
	}

	/// Appends one value to `name`
	pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
		self.params.entry(name.into()).or_default().push(value.into());
	}

	/// Removes `name`, returning its values
	pub fn remove(&mut self, name: &str) -> Option<Vec<String>> {
		self.params.remove(name)
	}

	/// Removes every parameter whose name starts with `prefix`
	///
	/// Returns the number of removed parameters.
	pub fn remove_prefixed(&mut self, prefix: &str) -> usize {
		let before = self.params.len();
		self.params.retain(|name, _| !name.starts_with(prefix));
		before - self.params.len()
	}

	/// Iterates `(suffix, first value)` for every key starting with `prefix`
	///
	/// Only parameters with a non-blank first value are yielded.
	pub fn scoped<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
		self.params
			.range::<str, _>((std::ops::Bound::Included(prefix), std::ops::Bound::Unbounded))
			.take_while(move |(name, _)| name.starts_with(prefix))
			.filter_map(move |(name, values)| {
				let value = values.first()?;
				if value.trim().is_empty() {
					return None;
				}
				Some((&name[prefix.len()..], value.as_str()))
			})
	}

	/// Merges `other` into this store; `other` wins on equal names
	pub fn extend(&mut self, other: ParameterStore) {
		self.params.extend(other.params);
	}

	/// Iterates names and values in key order
	pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
		self.params.iter()
	}

	/// Iterates names in key order
	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.params.keys().map(String::as_str)
	}

	/// Number of distinct parameter names
	pub fn len(&self) -> usize {
		self.params.len()
	}

	/// Returns true if no parameter is stored
	pub fn is_empty(&self) -> bool {
		self.params.is_empty()
	}
}

impl<K, V> FromIterator<(K, V)> for ParameterStore
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		let mut store = Self::new();
		for (name, value) in iter {
			store.append(name, value);
		}
		store
	}
}

impl IntoIterator for ParameterStore {
	type Item = (String, Vec<String>);
	type IntoIter = btree_map::IntoIter<String, Vec<String>>;

	fn into_iter(self) -> Self::IntoIter {
		self.params.into_iter()
	}
}

impl<'a> IntoIterator for &'a ParameterStore {
	type Item = (&'a String, &'a Vec<String>);
	type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

	fn into_iter(self) -> Self::IntoIter {
		self.params.iter()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_scoped_strips_prefix_in_key_order() {
		let store: ParameterStore = [
			("t_sort.zeta", "asc"),
			("t_sort.alpha", "desc"),
			("t_sortable", "x"),
			("t_page", "1"),
			("t_sort.blank", " "),
		]
		.into_iter()
		.collect();

		let scoped: Vec<_> = store.scoped("t_sort.").collect();
		assert_eq!(scoped, vec![("alpha", "desc"), ("zeta", "asc")]);
	}

	#[rstest]
	fn test_remove_prefixed() {
		let mut store: ParameterStore = [
			("t_filter.name", "a"),
			("t_filter.action", "filter"),
			("t_page", "2"),
		]
		.into_iter()
		.collect();

		assert_eq!(store.remove_prefixed("t_filter."), 2);
		assert_eq!(store.len(), 1);
		assert_eq!(store.get("t_page"), Some("2"));
	}

	#[rstest]
	fn test_query_round_trip() {
		let store = ParameterStore::from_query("?b=2&a=x%20y&a=z").unwrap();
		assert_eq!(store.get_all("a"), &["x y", "z"]);

		let query = store.to_query().unwrap();
		assert_eq!(query, "a=x+y&a=z&b=2");
		assert_eq!(ParameterStore::from_query(&query).unwrap(), store);
	}

	#[rstest]
	fn test_extend_overwrites() {
		let mut store: ParameterStore = [("a", "1"), ("b", "1")].into_iter().collect();
		store.extend([("b", "2")].into_iter().collect());
		assert_eq!(store.get("a"), Some("1"));
		assert_eq!(store.get("b"), Some("2"));
	}

	#[rstest]
	fn test_get_missing() {
		let store = ParameterStore::new();
		assert_eq!(store.get("nothing"), None);
		assert!(store.get_all("nothing").is_empty());
	}
}
