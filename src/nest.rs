/*!
# Conflag: Nesting.

Options may write into nested sections of the config map. Intermediate
sections are created on first write.
*/

use serde_json::{
	Map,
	Value,
};



/// # Config Map.
pub type Config = Map<String, Value>;



/// # Within Nested Section.
///
/// Run `cb` against the section addressed by `path`, building any missing
/// levels along the way, and return its result.
///
/// A path segment already occupied by a non-map value is replaced with an
/// empty map.
pub(crate) fn with_section<S, F, R>(config: &mut Config, path: &[S], cb: F) -> R
where S: AsRef<str>, F: FnOnce(&mut Config) -> R {
	let Some((key, rest)) = path.split_first() else { return cb(config); };
	let key = key.as_ref();

	let mut inner = match config.remove(key) {
		Some(Value::Object(m)) => m,
		_ => Map::new(),
	};
	let out = with_section(&mut inner, rest, cb);
	config.insert(key.to_owned(), Value::Object(inner));
	out
}

#[must_use]
/// # Resolve Nested Section (Read-Only).
///
/// Return the section addressed by `path`, or `None` if any part of it is
/// missing or not a map.
pub(crate) fn section<'a, S: AsRef<str>>(config: &'a Config, path: &[S])
-> Option<&'a Config> {
	path.iter().try_fold(config, |map, key| map.get(key.as_ref())?.as_object())
}

#[must_use]
/// # Expand Compound Keys.
///
/// Split each key of `map` on `sep` and nest the value accordingly.
/// Non-compound keys pass through unchanged.
///
/// Overlapping compound keys are not reconciled; whichever is written last
/// wins.
///
/// ## Examples
///
/// ```
/// use serde_json::json;
///
/// let flat = json!({ "key": 1, "compound:key": 2 })
///     .as_object()
///     .cloned()
///     .unwrap();
///
/// assert_eq!(
///     serde_json::Value::Object(conflag::expand(flat, ':')),
///     json!({ "key": 1, "compound": { "key": 2 } }),
/// );
/// ```
pub fn expand(map: Config, sep: char) -> Config {
	let mut out = Config::new();
	for (compound, value) in map {
		let mut keys: Vec<&str> = compound.split(sep).collect();
		match keys.pop() {
			Some(last) if ! keys.is_empty() => {
				with_section(&mut out, keys.as_slice(), |m| m.insert(last.to_owned(), value));
			},
			_ => { out.insert(compound, value); },
		}
	}
	out
}
