/*!
# Conflag: Registry.
*/

use crate::{
	ConfigParserError,
	Flag,
	FlagId,
	flag::RawValue,
};
use std::collections::BTreeMap;
use tracing::debug;



#[derive(Debug, Clone)]
/// # Registry Slot.
enum Slot {
	/// # A Flag.
	Flag(FlagId),

	/// # A Separator.
	Separator(String),
}



#[derive(Debug, Clone, Copy)]
/// # Registry Entry.
///
/// This is what [`Registry::entries`] yields: either a flag, or a
/// display-only separator.
pub enum Entry<'a> {
	/// # A Flag.
	Flag(&'a Flag),

	/// # A Separator.
	Separator(&'a str),
}



#[derive(Debug, Clone, Default)]
/// # Flag Registry.
///
/// This holds the registered [`Flag`]s and separators in the order they
/// were added, and maps each of their switch strings back to them.
///
/// Most of the time you'll interact with this through
/// [`ConfigParser`](crate::ConfigParser).
pub struct Registry {
	/// # Registration Order.
	order: Vec<Slot>,

	/// # Flags by ID.
	flags: BTreeMap<FlagId, Flag>,

	/// # Switch Lookup.
	switches: BTreeMap<String, FlagId>,
}

impl Registry {
	#[must_use]
	/// # New.
	pub fn new() -> Self { Self::default() }

	#[must_use]
	/// # Length.
	///
	/// The number of registered flags (not counting separators).
	pub fn len(&self) -> usize { self.flags.len() }

	#[must_use]
	/// # Is Empty?
	pub fn is_empty(&self) -> bool { self.flags.is_empty() }

	#[must_use]
	/// # Get Flag by ID.
	pub fn get(&self, id: FlagId) -> Option<&Flag> { self.flags.get(&id) }

	#[must_use]
	/// # Lookup Switch.
	///
	/// Return the flag mapped to the switch string, if any.
	pub fn lookup(&self, switch: &str) -> Option<&Flag> {
		self.switches.get(switch).and_then(|id| self.flags.get(id))
	}

	/// # Switch Strings.
	///
	/// Iterate over every `(switch, flag)` mapping, sorted by switch.
	pub fn switches(&self) -> impl Iterator<Item=(&str, &Flag)> {
		self.switches.iter()
			.filter_map(|(k, id)| self.flags.get(id).map(|f| (k.as_str(), f)))
	}

	/// # Flags.
	///
	/// Iterate over the registered flags in registration order.
	pub fn flags(&self) -> impl Iterator<Item=&Flag> {
		self.entries().filter_map(|e| match e {
			Entry::Flag(f) => Some(f),
			Entry::Separator(_) => None,
		})
	}

	/// # Entries.
	///
	/// Iterate over the flags and separators in registration order.
	pub fn entries(&self) -> impl Iterator<Item=Entry<'_>> {
		self.order.iter().filter_map(|s| match s {
			Slot::Flag(id) => self.flags.get(id).map(Entry::Flag),
			Slot::Separator(s) => Some(Entry::Separator(s)),
		})
	}
}

impl Registry {
	/// # Register.
	///
	/// Add a flag to the registry, mapping each of its switch strings to it,
	/// and return its ID.
	///
	/// Registering the same flag twice is a no-op.
	///
	/// When `replace` is `true`, any _other_ flags claiming one of the new
	/// flag's switches are unregistered first. This can remove more than one
	/// flag.
	///
	/// ## Errors
	///
	/// When `replace` is `false`, an error is returned if any of the switches
	/// belong to a different flag. Nothing is changed in that case.
	pub fn register(&mut self, flag: Flag, replace: bool) -> Result<FlagId, ConfigParserError> {
		let id = flag.id();
		if self.flags.contains_key(&id) { return Ok(id); }

		let conflicts: Vec<FlagId> = flag.switches()
			.filter_map(|s| self.switches.get(s).copied())
			.collect();

		if ! replace {
			if let Some(switch) = flag.switches().find(|s| self.switches.contains_key(*s)) {
				return Err(ConfigParserError::DuplicateSwitch(switch.to_owned()));
			}
		}

		for old in conflicts {
			if let Some(old) = self.unregister(old) {
				debug!(old = old.label(), new = flag.label(), "replaced conflicting flag");
			}
		}

		debug!(flag = flag.label(), "registered flag");
		for switch in flag.switches() { self.switches.insert(switch.to_owned(), id); }
		self.order.push(Slot::Flag(id));
		self.flags.insert(id, flag);
		Ok(id)
	}

	/// # Unregister.
	///
	/// Remove the flag and all of its switch mappings, returning it.
	pub fn unregister(&mut self, id: FlagId) -> Option<Flag> {
		let flag = self.flags.remove(&id)?;
		self.order.retain(|s| ! matches!(s, Slot::Flag(i) if *i == id));
		self.switches.retain(|_, v| *v != id);
		debug!(flag = flag.label(), "unregistered flag");
		Some(flag)
	}

	/// # Add Separator.
	pub fn separator<S: Into<String>>(&mut self, text: S) {
		self.order.push(Slot::Separator(text.into()));
	}

	/// # Sort Flags.
	///
	/// Sort the flags within each separator-delimited group by the key
	/// returned by `cb`. The sort is stable.
	pub fn sort_by_key<K, F>(&mut self, mut cb: F)
	where K: Ord, F: FnMut(&Flag) -> K {
		let flags = &self.flags;
		for group in self.order.split_mut(|s| matches!(s, Slot::Separator(_))) {
			group.sort_by_cached_key(|s| match s {
				Slot::Flag(id) => flags.get(id).map(&mut cb),
				Slot::Separator(_) => None,
			});
		}
	}
}

impl Registry {
	/// # Resolve Option Token.
	///
	/// Find the flag an option-like token refers to, trying, in order:
	/// 1. The token as-is;
	/// 2. The part before the first `=`, the rest being the value;
	/// 3. For single-dash tokens, the first two characters, the rest being
	///    the value;
	///
	/// The third step also applies to tokens containing an `=` that didn't
	/// resolve in the second, so `-ofoo=bar` gives `-o` the value `foo=bar`.
	///
	/// Returns the flag, the matched switch string, and the inline value, if
	/// any.
	///
	/// ## Errors
	///
	/// If nothing matches, an unknown option error is returned naming the
	/// token.
	pub(crate) fn resolve(&self, token: &str)
	-> Result<(&Flag, String, Option<RawValue>), ConfigParserError> {
		// Direct hit.
		if let Some(flag) = self.lookup(token) {
			return Ok((flag, token.to_owned(), None));
		}

		// Key=value.
		if let Some((switch, value)) = token.split_once('=') {
			if let Some(flag) = self.lookup(switch) {
				return Ok((flag, switch.to_owned(), Some(RawValue::Attached(value.to_owned()))));
			}
		}

		// Compact short.
		if ! token.starts_with("--") {
			if let Some(c) = token.strip_prefix('-').and_then(|t| t.chars().next()) {
				let (switch, rest) = token.split_at(1 + c.len_utf8());
				if ! rest.is_empty() {
					if let Some(flag) = self.lookup(switch) {
						return Ok((flag, switch.to_owned(), Some(RawValue::Compact(rest.to_owned()))));
					}
				}
			}
		}

		Err(ConfigParserError::UnknownOption(token.to_owned()))
	}
}



#[cfg(test)]
mod test {
	use super::*;
	use crate::{
		Attrs,
		FlagType,
	};

	/// # Flag Helper.
	fn flag(decls: &[&str]) -> Flag {
		Attrs::infer(decls).unwrap().build().unwrap()
	}

	#[test]
	fn t_register() {
		let mut reg = Registry::new();
		let opt = flag(&["--long", "-s"]);
		let id = reg.register(opt.clone(), false).unwrap();

		assert_eq!(reg.len(), 1);
		assert_eq!(reg.flags().map(Flag::id).collect::<Vec<_>>(), [id]);
		assert_eq!(
			reg.switches().map(|(k, f)| (k, f.id())).collect::<Vec<_>>(),
			[("--long", id), ("-s", id)],
		);

		// Registering twice is fine.
		assert_eq!(reg.register(opt, false).unwrap(), id);
		assert_eq!(reg.len(), 1);
		assert_eq!(reg.entries().count(), 1);
	}

	#[test]
	fn t_register_conflicts() {
		let mut reg = Registry::new();
		reg.register(flag(&["--key", "-k"]), false).unwrap();

		let err = reg.register(flag(&["--key"]), false).unwrap_err();
		assert_eq!(err.to_string(), "switch is already mapped to a different option: --key");

		let err = reg.register(flag(&["-k"]), false).unwrap_err();
		assert_eq!(err.to_string(), "switch is already mapped to a different option: -k");

		// Nothing should have changed.
		assert_eq!(reg.len(), 1);
		assert_eq!(reg.switches().count(), 2);
	}

	#[test]
	fn t_register_replace() {
		let mut reg = Registry::new();
		let o1 = reg.register(flag(&["-a", "--aa"]), false).unwrap();
		let o2 = reg.register(flag(&["-b", "--bb"]), false).unwrap();
		let o3 = reg.register(flag(&["-c", "--cc"]), false).unwrap();

		// This knocks out o1 and o2 entirely.
		let o4 = reg.register(flag(&["-a", "--bb"]), true).unwrap();

		assert_eq!(reg.flags().map(Flag::id).collect::<Vec<_>>(), [o3, o4]);
		assert_eq!(
			reg.switches().map(|(k, f)| (k, f.id())).collect::<Vec<_>>(),
			[("--bb", o4), ("--cc", o3), ("-a", o4), ("-c", o3)],
		);
		assert!(reg.get(o1).is_none());
		assert!(reg.get(o2).is_none());
	}

	#[test]
	fn t_unregister() {
		let mut reg = Registry::new();
		reg.register(flag(&["--one"]), false).unwrap();
		let before: Vec<String> = reg.switches().map(|(k, _)| k.to_owned()).collect();

		let id = reg.register(flag(&["--[no-]two", "-t"]), false).unwrap();
		assert_eq!(reg.switches().count(), 4);

		let removed = reg.unregister(id).unwrap();
		assert_eq!(removed.id(), id);
		assert_eq!(reg.switches().map(|(k, _)| k.to_owned()).collect::<Vec<_>>(), before);
		assert_eq!(reg.len(), 1);

		// Again is nothing.
		assert!(reg.unregister(id).is_none());
	}

	#[test]
	fn t_sort() {
		let mut reg = Registry::new();
		reg.register(flag(&["--c"]), false).unwrap();
		reg.register(flag(&["--a"]), false).unwrap();
		reg.separator("group two:");
		reg.register(flag(&["-z"]), false).unwrap();
		reg.register(flag(&["--b"]), false).unwrap();
		reg.register(flag(&["-y"]), false).unwrap();

		reg.sort_by_key(|f| f.long().or_else(|| f.short()).map(str::to_owned));

		let order: Vec<String> = reg.entries()
			.map(|e| match e {
				Entry::Flag(f) => f.label().to_owned(),
				Entry::Separator(s) => s.to_owned(),
			})
			.collect();
		assert_eq!(order, ["--a", "--c", "group two:", "--b", "-y", "-z"]);
	}

	#[test]
	fn t_resolve() {
		let mut reg = Registry::new();
		reg.register(Attrs::new().key("x").kind(FlagType::Flag).build().unwrap(), false).unwrap();
		reg.register(Attrs::new().key("y").kind(FlagType::Option).build().unwrap(), false).unwrap();
		reg.register(Attrs::new().key("opt").kind(FlagType::Option).build().unwrap(), false).unwrap();

		for (token, switch, raw) in [
			("--opt", "--opt", None),
			("--opt=", "--opt", Some(RawValue::Attached(String::new()))),
			("--opt=a=b", "--opt", Some(RawValue::Attached("a=b".to_owned()))),
			("-y", "-y", None),
			("-y=val", "-y", Some(RawValue::Attached("val".to_owned()))),
			("-yval", "-y", Some(RawValue::Compact("val".to_owned()))),
			("-xyval", "-x", Some(RawValue::Compact("yval".to_owned()))),
			("-yx=val", "-y", Some(RawValue::Compact("x=val".to_owned()))),
			("-yfoo=bar", "-y", Some(RawValue::Compact("foo=bar".to_owned()))),
		] {
			let (_, s, r) = reg.resolve(token).unwrap();
			assert_eq!(s, switch, "Bug: {token:?} switch.");
			assert_eq!(r, raw, "Bug: {token:?} value.");
		}

		for token in ["--bogus", "--bogus=1", "--optx", "-q", "-qx", "--o"] {
			assert!(
				matches!(reg.resolve(token), Err(ConfigParserError::UnknownOption(t)) if t == token),
				"Bug: {token:?} should be unknown.",
			);
		}
	}
}
