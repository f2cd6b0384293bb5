/*!
# Conflag: Flags.

A [`Flag`] is a single option declaration. Its [`FlagKind`] decides how it
pulls values from the command line and how it writes them into the config:

| Kind | Takes a Value | Writes |
| ---- | ------------- | ------ |
| [`FlagKind::Flag`] | No | `true` |
| [`FlagKind::Switch`] | No | `default` for `--name`, its negation for `--no-name` |
| [`FlagKind::Option`] | Yes | The value. |
| [`FlagKind::List`] | Yes | The value(s), accumulated across occurrences. |
*/

pub(crate) mod attrs;
pub(crate) mod help;

use crate::{
	CallbackError,
	Config,
	ConfigParserError,
	nest,
};
use serde_json::Value;
use std::{
	collections::{
		BTreeSet,
		VecDeque,
	},
	fmt,
	sync::{
		Arc,
		atomic::{
			AtomicU64,
			Ordering,
		},
	},
};



/// # Value Callback.
///
/// Callbacks receive the raw value and return whatever should be stored
/// instead. Lists call back once per element.
pub type Callback = Arc<dyn Fn(Value) -> Result<Value, CallbackError> + Send + Sync>;

/// # Default List Delimiter.
pub(crate) const DELIMITER: &str = ",";

/// # Default Arg Name.
pub(crate) const ARG_NAME: &str = "VALUE";

/// # Next Flag ID.
static NEXT_ID: AtomicU64 = AtomicU64::new(0);



#[derive(Debug, Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
/// # Flag Identity.
///
/// Every [`Flag`] is stamped with a unique ID when it is built. Clones share
/// the ID, and are considered the _same_ flag by the registry.
pub struct FlagId(u64);

impl FlagId {
	/// # Next!
	fn next() -> Self { Self(NEXT_ID.fetch_add(1, Ordering::Relaxed)) }
}



#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq)]
/// # Flag Type.
///
/// The bare kind of a flag, used when declaring one.
pub enum FlagType {
	/// # Boolean Flag.
	Flag,

	/// # Positive/Negative Switch.
	Switch,

	/// # Single Value.
	Option,

	/// # Multiple Values.
	List,
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Flag Kind.
///
/// The variant-specific bits of a [`Flag`].
pub enum FlagKind {
	/// # Boolean Flag.
	Flag,

	/// # Positive/Negative Switch.
	Switch {
		/// # Negative Long Switch (e.g. `--no-name`).
		negative_long: String,

		/// # Negative Prefix (without the trailing dash).
		prefix: String,
	},

	/// # Single Value.
	Option {
		/// # Argument Name (for help).
		arg_name: String,

		/// # Value Optional?
		optional: bool,
	},

	/// # Multiple Values.
	List {
		/// # Argument Name (for help).
		arg_name: String,

		/// # Value Optional?
		optional: bool,

		/// # Split Delimiter.
		delimiter: Option<String>,

		/// # Maximum Length.
		limit: Option<usize>,
	},
}

impl FlagKind {
	#[must_use]
	/// # Flag Type.
	pub const fn flag_type(&self) -> FlagType {
		match self {
			Self::Flag => FlagType::Flag,
			Self::Switch { .. } => FlagType::Switch,
			Self::Option { .. } => FlagType::Option,
			Self::List { .. } => FlagType::List,
		}
	}
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Raw Inline Value.
///
/// A value found inside the option token itself.
pub(crate) enum RawValue {
	/// # From `--key=value` or `-k=value`.
	Attached(String),

	/// # From `-kvalue`.
	Compact(String),
}

impl RawValue {
	/// # Into String.
	fn into_string(self) -> String {
		match self { Self::Attached(s) | Self::Compact(s) => s }
	}
}



#[derive(Debug, Default)]
/// # Parse Pass State.
///
/// This tracks which flags have written something during the current pass.
/// Lists replace whatever they find on their first write, and append
/// thereafter.
pub(crate) struct Pass {
	/// # Flags Written So Far.
	touched: BTreeSet<FlagId>,
}

impl Pass {
	/// # Touch.
	///
	/// Returns `true` if this is the flag's first write of the pass.
	fn touch(&mut self, id: FlagId) -> bool { self.touched.insert(id) }

	/// # Untouch.
	fn reset(&mut self, id: FlagId) { self.touched.remove(&id); }
}



#[derive(Clone)]
/// # Flag.
///
/// A single option declaration. These are built from [`Attrs`](crate::Attrs)
/// and then handed off to a [`ConfigParser`](crate::ConfigParser) (or
/// [`Registry`](crate::Registry)).
///
/// ## Examples
///
/// ```
/// use conflag::{Attrs, Flag, FlagType};
///
/// let flag: Flag = Attrs::new()
///     .key("color")
///     .kind(FlagType::Switch)
///     .build()
///     .unwrap();
///
/// assert_eq!(flag.long(), Some("--color"));
/// assert_eq!(flag.negative_long(), Some("--no-color"));
/// ```
pub struct Flag {
	/// # Identity.
	id: FlagId,

	/// # Config Key.
	key: Option<String>,

	/// # Nest Path.
	nest: Vec<String>,

	/// # Short Switch.
	short: Option<String>,

	/// # Long Switch.
	long: Option<String>,

	/// # Default Value.
	default: Value,

	/// # Description.
	desc: Option<String>,

	/// # Help Hint.
	hint: Option<String>,

	/// # Value Callback.
	callback: Option<Callback>,

	/// # Kind.
	kind: FlagKind,
}

impl fmt::Debug for Flag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Flag")
			.field("id", &self.id)
			.field("key", &self.key)
			.field("nest", &self.nest)
			.field("short", &self.short)
			.field("long", &self.long)
			.field("default", &self.default)
			.field("kind", &self.kind)
			.field("callback", &self.callback.is_some())
			.finish_non_exhaustive()
	}
}

/// # Getters.
impl Flag {
	#[must_use]
	/// # ID.
	pub const fn id(&self) -> FlagId { self.id }

	#[must_use]
	/// # Config Key.
	pub fn key(&self) -> Option<&str> { self.key.as_deref() }

	#[must_use]
	/// # Nest Path.
	pub fn nest(&self) -> &[String] { &self.nest }

	#[must_use]
	/// # Short Switch.
	pub fn short(&self) -> Option<&str> { self.short.as_deref() }

	#[must_use]
	/// # Long Switch.
	pub fn long(&self) -> Option<&str> { self.long.as_deref() }

	#[must_use]
	/// # Negative Long Switch.
	///
	/// This is only ever set for switches.
	pub fn negative_long(&self) -> Option<&str> {
		if let FlagKind::Switch { negative_long, .. } = &self.kind { Some(negative_long) }
		else { None }
	}

	#[must_use]
	/// # Default Value.
	pub const fn default(&self) -> &Value { &self.default }

	#[must_use]
	/// # Description.
	pub fn desc(&self) -> Option<&str> { self.desc.as_deref() }

	#[must_use]
	/// # Help Hint.
	pub fn hint(&self) -> Option<&str> { self.hint.as_deref() }

	#[must_use]
	/// # Kind.
	pub const fn kind(&self) -> &FlagKind { &self.kind }

	#[must_use]
	/// # Flag Type.
	pub const fn flag_type(&self) -> FlagType { self.kind.flag_type() }

	#[must_use]
	/// # Has Callback?
	pub const fn has_callback(&self) -> bool { self.callback.is_some() }

	/// # Switches.
	///
	/// Return every switch string that maps to this flag: the long, negative
	/// long (switches only), and short, in that order.
	pub fn switches(&self) -> impl Iterator<Item=&str> {
		[self.long(), self.negative_long(), self.short()].into_iter().flatten()
	}

	#[must_use]
	/// # Current Value.
	///
	/// Look up this flag's slot in `config`, if it has a key and the slot
	/// exists.
	pub fn value_in<'a>(&self, config: &'a Config) -> Option<&'a Value> {
		let key = self.key.as_deref()?;
		nest::section(config, &self.nest)?.get(key)
	}

	#[must_use]
	/// # Label.
	///
	/// A name suitable for error messages: the long switch, short switch, or
	/// key, whichever comes first.
	pub fn label(&self) -> &str {
		self.long()
			.or_else(|| self.short())
			.or_else(|| self.key())
			.unwrap_or("(anonymous)")
	}
}

/// # Parsing.
impl Flag {
	/// # Consume Value.
	///
	/// Pull whatever value `switch` requires from `raw` or the front of
	/// `argv`, then process and assign it, returning the processed value.
	///
	/// A plain flag matched by its short with a compact remainder, e.g. the
	/// `yz` in `-xyz`, puts `-yz` back on `argv` so the remainder is parsed
	/// as the next short switch.
	pub(crate) fn consume(
		&self,
		switch: &str,
		raw: Option<RawValue>,
		argv: &mut VecDeque<String>,
		config: &mut Config,
		pass: &mut Pass,
	) -> Result<Value, ConfigParserError> {
		let value = match &self.kind {
			FlagKind::Flag => {
				match raw {
					None => {},
					Some(RawValue::Compact(rest)) if self.short() == Some(switch) => {
						argv.push_front(format!("-{rest}"));
					},
					Some(raw) => return Err(ConfigParserError::UnexpectedValue {
						switch: switch.to_owned(),
						value: raw.into_string(),
					}),
				}
				Value::Bool(true)
			},
			FlagKind::Switch { negative_long, .. } => {
				if let Some(raw) = raw {
					return Err(ConfigParserError::UnexpectedValue {
						switch: switch.to_owned(),
						value: raw.into_string(),
					});
				}

				if switch == negative_long { Value::Bool(! truthy(&self.default)) }
				else { self.default.clone() }
			},
			FlagKind::Option { optional, .. } | FlagKind::List { optional, .. } =>
				match raw.map(RawValue::into_string).or_else(|| next_arg(argv)) {
					Some(v) => Value::String(v),
					None if *optional => self.default.clone(),
					None => return Err(ConfigParserError::MissingValue(switch.to_owned())),
				},
		};

		let value = self.process(switch, value)?;
		self.assign(config, value.clone(), pass)?;
		Ok(value)
	}

	/// # Process Value.
	///
	/// Run the value through the callback, if any. Lists split the value
	/// first and run each piece through separately.
	pub(crate) fn process(&self, switch: &str, value: Value)
	-> Result<Value, ConfigParserError> {
		if let FlagKind::List { delimiter, .. } = &self.kind {
			split(delimiter.as_deref(), value)
				.into_iter()
				.map(|v| self.call(switch, v))
				.collect::<Result<Vec<_>, _>>()
				.map(Value::Array)
		}
		else { self.call(switch, value) }
	}

	/// # Run Callback.
	fn call(&self, switch: &str, value: Value) -> Result<Value, ConfigParserError> {
		match &self.callback {
			Some(cb) => cb(value).map_err(|source| ConfigParserError::Callback {
				switch: switch.to_owned(),
				source,
			}),
			None => Ok(value),
		}
	}

	/// # Assign.
	///
	/// Write the value into the config, if there's a key to write it to.
	///
	/// Lists discard whatever was in their slot on their first assignment of
	/// the pass, then append.
	///
	/// ## Errors
	///
	/// Lists return an error if the result would exceed their limit.
	pub(crate) fn assign(&self, config: &mut Config, value: Value, pass: &mut Pass)
	-> Result<(), ConfigParserError> {
		self.store(config, value, pass, true)
	}

	/// # Assign Default.
	///
	/// Write the default into the config, then forget about it so the next
	/// real assignment of the pass is treated as the first.
	///
	/// List limits only apply to parsed values, not defaults.
	pub(crate) fn assign_default(&self, config: &mut Config, pass: &mut Pass)
	-> Result<(), ConfigParserError> {
		self.store(config, self.default.clone(), pass, false)?;
		pass.reset(self.id);
		Ok(())
	}

	/// # Store.
	fn store(&self, config: &mut Config, value: Value, pass: &mut Pass, limited: bool)
	-> Result<(), ConfigParserError> {
		let first = pass.touch(self.id);
		let Some(key) = self.key.as_deref() else { return Ok(()); };

		nest::with_section(config, &self.nest, |section| {
			if let FlagKind::List { limit, .. } = &self.kind {
				let values = split(None, value);
				let slot = section.entry(key).or_insert(Value::Null);
				if first || ! slot.is_array() { *slot = Value::Array(Vec::new()); }
				if let Value::Array(list) = slot {
					if let Some(limit) = limit.filter(|_| limited) {
						if limit < list.len() + values.len() {
							return Err(ConfigParserError::TooManyValues {
								switch: self.label().to_owned(),
								limit,
							});
						}
					}
					list.extend(values);
				}
			}
			else { section.insert(key.to_owned(), value); }

			Ok(())
		})
	}
}



/// # Next Argument.
///
/// Shift the next value off `argv`, unless it looks like an option.
fn next_arg(argv: &mut VecDeque<String>) -> Option<String> {
	if argv.front().map_or(true, |v| crate::switch::looks_like_option(v)) { None }
	else { argv.pop_front() }
}

/// # Split.
///
/// Arrays pass through as-are, strings are split on the delimiter (if any),
/// `null` becomes empty, and anything else is wrapped.
///
/// Trailing empty pieces are dropped, so `"a,b,"` is `["a", "b"]` and `""` is
/// `[]` when splitting.
pub(crate) fn split(delimiter: Option<&str>, value: Value) -> Vec<Value> {
	match value {
		Value::Array(v) => v,
		Value::String(s) => match delimiter {
			Some(d) => {
				let mut out: Vec<&str> = s.split(d).collect();
				while out.last().is_some_and(|v| v.is_empty()) { out.pop(); }
				out.into_iter().map(|v| Value::String(v.to_owned())).collect()
			},
			None => vec![Value::String(s)],
		},
		Value::Null => Vec::new(),
		other => vec![other],
	}
}

/// # Truthy?
///
/// Only `null` and `false` are falsey.
const fn truthy(value: &Value) -> bool {
	! matches!(value, Value::Null | Value::Bool(false))
}
