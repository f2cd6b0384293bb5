/*!
# Conflag: Flag Attributes.
*/

use crate::{
	CallbackError,
	ConfigParserError,
	switch::{
		self,
		NEST_SEPARATOR,
	},
};
use serde_json::Value;
use std::sync::Arc;
use super::{
	ARG_NAME,
	Callback,
	DELIMITER,
	Flag,
	FlagId,
	FlagKind,
	FlagType,
	split,
};



#[derive(Clone, Default)]
/// # Flag Attributes.
///
/// This is a builder for [`Flag`]s. Anything left unset is derived from
/// whatever _was_ set, e.g. a key of `"color"` implies a long switch of
/// `--color`.
///
/// Attributes can also be inferred from shorthand declarations like
/// `"-s"`, `"--long ARG"`, or `"--[no-]switch"` via [`Attrs::infer`].
///
/// ## Examples
///
/// ```
/// use conflag::{Attrs, FlagType};
///
/// let flag = Attrs::infer(["-o", "--output FILE", "Where to write."])
///     .unwrap()
///     .key("output")
///     .build()
///     .unwrap();
///
/// assert_eq!(flag.flag_type(), FlagType::Option);
/// assert_eq!(flag.short(), Some("-o"));
/// assert_eq!(flag.long(), Some("--output"));
/// assert_eq!(flag.desc(), Some("Where to write."));
/// ```
pub struct Attrs {
	/// # Flag Type.
	kind: Option<FlagType>,

	/// # Config Key.
	key: Option<String>,

	/// # Nest Path.
	nest: Option<Vec<String>>,

	/// # Default Value.
	default: Option<Value>,

	/// # Short Switch.
	///
	/// The outer `Option` is whether or not it was specified; the inner
	/// whether it should exist.
	short: Option<Option<String>>,

	/// # Long Switch.
	long: Option<Option<String>>,

	/// # Negative Long Switch.
	negative_long: Option<String>,

	/// # Negative Prefix.
	prefix: Option<String>,

	/// # Argument Name.
	arg_name: Option<String>,

	/// # Optional Value?
	optional: Option<bool>,

	/// # List Delimiter.
	delimiter: Option<Option<String>>,

	/// # List Limit.
	limit: Option<usize>,

	/// # Description.
	desc: Option<String>,

	/// # Help Hint.
	hint: Option<Option<String>>,

	/// # Value Callback.
	callback: Option<Callback>,
}

/// # Builder.
impl Attrs {
	#[must_use]
	/// # New.
	pub fn new() -> Self { <Self as Default>::default() }

	#[must_use]
	/// # With Type.
	pub const fn kind(mut self, kind: FlagType) -> Self {
		self.kind = Some(kind);
		self
	}

	#[must_use]
	/// # With Key.
	pub fn key<S: Into<String>>(mut self, key: S) -> Self {
		self.key = Some(key.into());
		self
	}

	#[must_use]
	/// # With Nest Path.
	pub fn nest<I, S>(mut self, path: I) -> Self
	where I: IntoIterator<Item=S>, S: Into<String> {
		self.nest = Some(path.into_iter().map(Into::into).collect());
		self
	}

	#[must_use]
	/// # With Default.
	pub fn default<V: Into<Value>>(mut self, default: V) -> Self {
		self.default = Some(default.into());
		self
	}

	#[must_use]
	/// # With Short Switch.
	///
	/// The leading dash is optional.
	pub fn short<S: Into<String>>(mut self, short: S) -> Self {
		self.short = Some(Some(short.into()));
		self
	}

	#[must_use]
	/// # Without Short Switch.
	///
	/// Prevent a short switch from being derived from the key.
	pub fn no_short(mut self) -> Self {
		self.short = Some(None);
		self
	}

	#[must_use]
	/// # With Long Switch.
	///
	/// The leading dashes are optional.
	pub fn long<S: Into<String>>(mut self, long: S) -> Self {
		self.long = Some(Some(long.into()));
		self
	}

	#[must_use]
	/// # Without Long Switch.
	///
	/// Prevent a long switch from being derived from the key.
	pub fn no_long(mut self) -> Self {
		self.long = Some(None);
		self
	}

	#[must_use]
	/// # With Negative Long Switch.
	///
	/// Switches otherwise derive this from the long, e.g. `--no-color`.
	pub fn negative_long<S: Into<String>>(mut self, long: S) -> Self {
		self.negative_long = Some(long.into());
		self
	}

	#[must_use]
	/// # With Negative Prefix.
	///
	/// The prefix (sans trailing dash) used to derive a switch's negative
	/// long. The default is `no`.
	pub fn prefix<S: Into<String>>(mut self, prefix: S) -> Self {
		self.prefix = Some(prefix.into());
		self
	}

	#[must_use]
	/// # With Argument Name.
	///
	/// A bracketed name like `[NAME]` implies the value is optional.
	pub fn arg_name<S: Into<String>>(mut self, arg_name: S) -> Self {
		self.arg_name = Some(arg_name.into());
		self
	}

	#[must_use]
	/// # Optional Value?
	pub const fn optional(mut self, optional: bool) -> Self {
		self.optional = Some(optional);
		self
	}

	#[must_use]
	/// # With List Delimiter.
	pub fn delimiter<S: Into<String>>(mut self, delimiter: S) -> Self {
		self.delimiter = Some(Some(delimiter.into()));
		self
	}

	#[must_use]
	/// # Without List Delimiter.
	pub fn no_delimiter(mut self) -> Self {
		self.delimiter = Some(None);
		self
	}

	#[must_use]
	/// # With List Limit.
	pub const fn limit(mut self, limit: usize) -> Self {
		self.limit = Some(limit);
		self
	}

	#[must_use]
	/// # With Description.
	pub fn desc<S: Into<String>>(mut self, desc: S) -> Self {
		self.desc = Some(desc.into());
		self
	}

	#[must_use]
	/// # With Hint.
	pub fn hint<S: Into<String>>(mut self, hint: S) -> Self {
		self.hint = Some(Some(hint.into()));
		self
	}

	#[must_use]
	/// # Without Hint.
	pub fn no_hint(mut self) -> Self {
		self.hint = Some(None);
		self
	}

	#[must_use]
	/// # With Callback.
	pub fn callback<F>(mut self, cb: F) -> Self
	where F: Fn(Value) -> Result<Value, CallbackError> + Send + Sync + 'static {
		self.callback = Some(Arc::new(cb));
		self
	}

	#[must_use]
	/// # Merge.
	///
	/// Overlay `other` on top of `self`. Anything set in `other` wins.
	pub fn merge(self, other: Self) -> Self {
		Self {
			kind: other.kind.or(self.kind),
			key: other.key.or(self.key),
			nest: other.nest.or(self.nest),
			default: other.default.or(self.default),
			short: other.short.or(self.short),
			long: other.long.or(self.long),
			negative_long: other.negative_long.or(self.negative_long),
			prefix: other.prefix.or(self.prefix),
			arg_name: other.arg_name.or(self.arg_name),
			optional: other.optional.or(self.optional),
			delimiter: other.delimiter.or(self.delimiter),
			limit: other.limit.or(self.limit),
			desc: other.desc.or(self.desc),
			hint: other.hint.or(self.hint),
			callback: other.callback.or(self.callback),
		}
	}

	/// # Build.
	///
	/// ## Errors
	///
	/// This will return an error if a switch is malformed, or a switch-type
	/// flag has no long.
	pub fn build(self) -> Result<Flag, ConfigParserError> { Flag::try_from(self) }
}

/// # Inference.
impl Attrs {
	/// # Infer From Declarations.
	///
	/// Build attributes from shorthand declarations:
	///
	/// | Declaration | Implies |
	/// | ----------- | ------- |
	/// | `-s` | short `-s` |
	/// | `--long` | long `--long` |
	/// | `--long ARG` | long `--long`, arg name `ARG` |
	/// | `--[no-]long` | long `--long`, prefix `no`, type switch |
	/// | `--nest:long` | long `--nest:long`, nest path `["nest"]` |
	/// | `some string` | description |
	///
	/// These can be combined, e.g. `-s ARG` or `--nest:[no-]long`.
	///
	/// ## Errors
	///
	/// This will return an error if a declaration is malformed, repeats an
	/// attribute (two longs, etc.), or gives a switch an argument name.
	pub fn infer<I, S>(decls: I) -> Result<Self, ConfigParserError>
	where I: IntoIterator<Item=S>, S: AsRef<str> {
		let mut out = Self::new();

		for decl in decls {
			let decl = decl.as_ref();

			// Descriptions.
			if ! switch::looks_like_option(decl) {
				set_once(&mut out.desc, "desc", decl)?;
				continue;
			}

			let (flag, arg_name) = match decl.split_once(char::is_whitespace) {
				Some((flag, arg_name)) => (flag, Some(arg_name.trim())),
				None => (decl, None),
			};

			// Nesting is inferred from any colon-separated long.
			if let Some((nest, _)) = flag.strip_prefix("--").and_then(|f| f.rsplit_once(NEST_SEPARATOR)) {
				if ! nest.is_empty() {
					out.nest = Some(nest.split(NEST_SEPARATOR).map(str::to_owned).collect());
				}
			}

			if let Some(arg_name) = arg_name.filter(|a| ! a.is_empty()) {
				out.arg_name = Some(arg_name.to_owned());
			}

			if let Some((long, prefix)) = parse_switch_decl(flag) {
				if let Some(arg_name) = out.arg_name.take() {
					return Err(ConfigParserError::ArgNameForSwitch { switch: decl.to_owned(), arg_name });
				}
				set_once_switch(&mut out.long, "long", long)?;
				out.prefix = Some(prefix.to_owned());
			}
			else if flag.starts_with("--") {
				set_once_switch(&mut out.long, "long", flag.to_owned())?;
			}
			else if switch::valid_short(flag) {
				set_once_switch(&mut out.short, "short", flag.to_owned())?;
			}
			else {
				return Err(ConfigParserError::InvalidSwitchFormat {
					kind: "short",
					switch: flag.to_owned(),
				});
			}
		}

		Ok(out)
	}

	#[must_use]
	/// # Guess Type.
	///
	/// | If | Then |
	/// | -- | ---- |
	/// | prefix | switch |
	/// | arg name with a comma | list |
	/// | arg name or default | by default value |
	/// | otherwise | flag |
	///
	/// Guessing by default value: `true` implies a switch, `false` a flag,
	/// an array a list, anything else an option.
	pub fn guess_type(&self) -> FlagType {
		if self.prefix.is_some() { FlagType::Switch }
		else if self.arg_name.as_deref().is_some_and(|a| a.contains(',')) { FlagType::List }
		else if self.arg_name.is_some() || self.default.is_some() {
			match self.default {
				Some(Value::Bool(true)) => FlagType::Switch,
				Some(Value::Bool(false)) => FlagType::Flag,
				Some(Value::Array(_)) => FlagType::List,
				_ => FlagType::Option,
			}
		}
		else { FlagType::Flag }
	}
}

impl TryFrom<Attrs> for Flag {
	type Error = ConfigParserError;

	fn try_from(attrs: Attrs) -> Result<Self, Self::Error> {
		let flag_type = attrs.kind.unwrap_or_else(|| attrs.guess_type());
		let Attrs {
			key, nest, default, short, long, negative_long, prefix, arg_name,
			optional, delimiter, limit, desc, hint, callback, ..
		} = attrs;
		let nest = nest.unwrap_or_default();

		// Single-character top-level keys imply a short; anything else a long.
		let derived_short = key.as_deref()
			.filter(|k| nest.is_empty() && k.chars().count() == 1);
		let short = match short {
			Some(Some(s)) => Some(switch::shortify(&s)?),
			Some(None) => None,
			None => derived_short.map(switch::shortify).transpose()?,
		};
		let long = match long {
			Some(Some(l)) => Some(switch::longify(&l)?),
			Some(None) => None,
			None if derived_short.is_some() => None,
			None => key.as_deref()
				.map(|k| {
					let mut path = nest.clone();
					path.push(k.to_owned());
					switch::longify(&path.join(&*NEST_SEPARATOR.to_string()))
				})
				.transpose()?,
		};

		let delimiter = match delimiter {
			Some(d) => d.filter(|d| ! d.is_empty()),
			None => Some(DELIMITER.to_owned()),
		};

		let hint = match hint {
			Some(h) => h,
			None => guess_hint(default.as_ref(), delimiter.as_deref()),
		};

		let (kind, default) = match flag_type {
			FlagType::Flag => (FlagKind::Flag, default.unwrap_or(Value::Bool(false))),
			FlagType::Switch => {
				let long = long.as_deref().ok_or(ConfigParserError::MissingLongForSwitch)?;
				let prefix = prefix.unwrap_or_else(|| "no".to_owned());
				let negative_long = match negative_long {
					Some(n) => switch::longify(&n)?,
					None => switch::prefix_long(long, &format!("{prefix}-")),
				};
				(
					FlagKind::Switch { negative_long, prefix },
					default.unwrap_or(Value::Bool(true)),
				)
			},
			FlagType::Option | FlagType::List => {
				let arg_name = arg_name
					.or_else(|| key.as_deref().map(str::to_uppercase))
					.unwrap_or_else(|| ARG_NAME.to_owned());
				let optional = optional.unwrap_or_else(||
					2 <= arg_name.len() && arg_name.starts_with('[') && arg_name.ends_with(']')
				);
				let default = default.unwrap_or(Value::Null);

				if flag_type == FlagType::Option {
					(FlagKind::Option { arg_name, optional }, default)
				}
				else {
					let default = Value::Array(split(delimiter.as_deref(), default));
					(FlagKind::List { arg_name, optional, delimiter, limit }, default)
				}
			},
		};

		Ok(Self {
			id: FlagId::next(),
			key,
			nest,
			short,
			long,
			default,
			desc,
			hint,
			callback,
			kind,
		})
	}
}



/// # Parse Switch Declaration.
///
/// Split something like `--nest:[no-]name` into its positive long
/// (`--nest:name`) and prefix (`no`).
fn parse_switch_decl(flag: &str) -> Option<(String, &str)> {
	let rest = flag.strip_prefix("--")?;
	let (nest, tail) = rest.split_once('[')?;
	let (prefix, name) = tail.split_once("-]")?;
	if name.is_empty() { None }
	else { Some((format!("--{nest}{name}"), prefix)) }
}

/// # Set Once.
fn set_once(slot: &mut Option<String>, attr: &'static str, value: &str)
-> Result<(), ConfigParserError> {
	if let Some(first) = slot {
		return Err(ConfigParserError::ConflictingDeclaration {
			attr,
			first: first.clone(),
			second: value.to_owned(),
		});
	}
	*slot = Some(value.to_owned());
	Ok(())
}

/// # Set Once (Switch).
fn set_once_switch(slot: &mut Option<Option<String>>, attr: &'static str, value: String)
-> Result<(), ConfigParserError> {
	if let Some(Some(first)) = slot {
		return Err(ConfigParserError::ConflictingDeclaration {
			attr,
			first: first.clone(),
			second: value,
		});
	}
	*slot = Some(Some(value));
	Ok(())
}

/// # Guess Hint.
///
/// Booleans and nulls have nothing worth hinting; arrays are joined by the
/// delimiter; everything else is stringified.
fn guess_hint(default: Option<&Value>, delimiter: Option<&str>) -> Option<String> {
	match default? {
		Value::Null | Value::Bool(_) => None,
		Value::Array(v) => {
			let hint = v.iter()
				.map(value_str)
				.collect::<Vec<_>>()
				.join(delimiter.unwrap_or(DELIMITER));
			if hint.is_empty() { None } else { Some(hint) }
		},
		v => Some(value_str(v)),
	}
}

/// # Value as String.
fn value_str(v: &Value) -> String {
	match v {
		Value::String(s) => s.clone(),
		v => v.to_string(),
	}
}



#[cfg(test)]
mod test {
	use super::*;
	use serde_json::json;

	#[test]
	fn t_infer() {
		let attrs = Attrs::infer(["-s", "--long ARG_NAME", "Description for the Option"]).unwrap();
		assert_eq!(attrs.short, Some(Some("-s".to_owned())));
		assert_eq!(attrs.long, Some(Some("--long".to_owned())));
		assert_eq!(attrs.arg_name.as_deref(), Some("ARG_NAME"));
		assert_eq!(attrs.desc.as_deref(), Some("Description for the Option"));
		assert_eq!(attrs.guess_type(), FlagType::Option);

		let attrs = Attrs::infer(["--compound-long"]).unwrap();
		assert!(attrs.short.is_none());
		assert_eq!(attrs.long, Some(Some("--compound-long".to_owned())));
		assert!(attrs.arg_name.is_none());
		assert!(attrs.desc.is_none());
		assert_eq!(attrs.guess_type(), FlagType::Flag);

		let attrs = Attrs::infer(["-o ARG"]).unwrap();
		assert_eq!(attrs.short, Some(Some("-o".to_owned())));
		assert_eq!(attrs.arg_name.as_deref(), Some("ARG"));

		let attrs = Attrs::infer(["--list A,B,C"]).unwrap();
		assert_eq!(attrs.guess_type(), FlagType::List);
	}

	#[test]
	fn t_infer_switch() {
		let attrs = Attrs::infer(["--[no-]opt"]).unwrap();
		assert_eq!(attrs.long, Some(Some("--opt".to_owned())));
		assert_eq!(attrs.prefix.as_deref(), Some("no"));
		assert_eq!(attrs.guess_type(), FlagType::Switch);

		let flag = Attrs::infer(["--nest:[without-]opt"]).unwrap().build().unwrap();
		assert_eq!(flag.long(), Some("--nest:opt"));
		assert_eq!(flag.negative_long(), Some("--nest:without-opt"));
		assert_eq!(flag.nest(), ["nest"]);

		assert!(matches!(
			Attrs::infer(["--[no-]opt VALUE"]),
			Err(ConfigParserError::ArgNameForSwitch { arg_name, .. }) if arg_name == "VALUE",
		));
	}

	#[test]
	fn t_infer_nest() {
		let attrs = Attrs::infer(["--a:b:long"]).unwrap();
		assert_eq!(attrs.nest, Some(vec!["a".to_owned(), "b".to_owned()]));
		assert_eq!(attrs.long, Some(Some("--a:b:long".to_owned())));
	}

	#[test]
	fn t_infer_conflicts() {
		for (decls, attr) in [
			(["--long", "--alt"], "long"),
			(["-s", "-o"], "short"),
			(["desc one", "desc two"], "desc"),
		] {
			assert!(
				matches!(
					Attrs::infer(decls),
					Err(ConfigParserError::ConflictingDeclaration { attr: a, .. }) if a == attr
				),
				"Bug: {decls:?} should conflict.",
			);
		}

		assert!(matches!(
			Attrs::infer(["-abc"]),
			Err(ConfigParserError::InvalidSwitchFormat { .. }),
		));
	}

	#[test]
	fn t_merge() {
		let attrs = Attrs::infer(["-k", "description"]).unwrap()
			.merge(Attrs::new().long("--key").kind(FlagType::List));

		let flag = attrs.build().unwrap();
		assert_eq!(flag.short(), Some("-k"));
		assert_eq!(flag.long(), Some("--key"));
		assert_eq!(flag.desc(), Some("description"));
		assert_eq!(flag.flag_type(), FlagType::List);
	}

	#[test]
	fn t_guess_type() {
		for (attrs, expected) in [
			(Attrs::new(), FlagType::Flag),
			(Attrs::new().prefix("no"), FlagType::Switch),
			(Attrs::new().arg_name("A,B"), FlagType::List),
			(Attrs::new().arg_name("A"), FlagType::Option),
			(Attrs::new().default(true), FlagType::Switch),
			(Attrs::new().default(false), FlagType::Flag),
			(Attrs::new().default(json!([])), FlagType::List),
			(Attrs::new().default("value"), FlagType::Option),
			(Attrs::new().default(3), FlagType::Option),
		] {
			assert_eq!(attrs.guess_type(), expected);
		}
	}

	#[test]
	fn t_derived_switches() {
		let flag = Attrs::new().key("long").build().unwrap();
		assert_eq!(flag.long(), Some("--long"));
		assert_eq!(flag.short(), None);

		let flag = Attrs::new().key("s").build().unwrap();
		assert_eq!(flag.long(), None);
		assert_eq!(flag.short(), Some("-s"));

		let flag = Attrs::new().key("key").nest(["a", "b"]).build().unwrap();
		assert_eq!(flag.long(), Some("--a:b:key"));

		let flag = Attrs::new().key("s").nest(["a"]).build().unwrap();
		assert_eq!(flag.long(), Some("--a:s"));
		assert_eq!(flag.short(), None);

		let flag = Attrs::new().key("key").no_long().build().unwrap();
		assert_eq!(flag.switches().count(), 0);

		let flag = Attrs::new().long("long").short("s").build().unwrap();
		assert_eq!(flag.long(), Some("--long"));
		assert_eq!(flag.short(), Some("-s"));
	}

	#[test]
	fn t_invalid_switches() {
		assert!(matches!(
			Attrs::new().long("").build(),
			Err(ConfigParserError::InvalidSwitchFormat { kind: "long", .. }),
		));
		assert!(matches!(
			Attrs::new().short("-invalid").build(),
			Err(ConfigParserError::InvalidSwitchFormat { kind: "short", .. }),
		));
		assert!(matches!(
			Attrs::new().key("oops").no_long().kind(FlagType::Switch).build(),
			Err(ConfigParserError::MissingLongForSwitch),
		));
	}

	#[test]
	fn t_option_defaults() {
		let flag = Attrs::new().key("opt").kind(FlagType::Option).build().unwrap();
		assert_eq!(
			flag.kind(),
			&FlagKind::Option { arg_name: "OPT".to_owned(), optional: false },
		);
		assert_eq!(flag.default(), &Value::Null);

		let flag = Attrs::new().long("--opt").kind(FlagType::Option).build().unwrap();
		assert_eq!(
			flag.kind(),
			&FlagKind::Option { arg_name: ARG_NAME.to_owned(), optional: false },
		);

		let flag = Attrs::new().key("opt").arg_name("[OPT]").optional(false).kind(FlagType::Option)
			.build()
			.unwrap();
		assert!(matches!(flag.kind(), FlagKind::Option { optional: false, .. }));
	}

	#[test]
	fn t_list_defaults() {
		let flag = Attrs::new().key("list").kind(FlagType::List).build().unwrap();
		assert_eq!(flag.default(), &json!([]));
		assert!(matches!(
			flag.kind(),
			FlagKind::List { delimiter: Some(d), limit: None, .. } if d == DELIMITER,
		));

		let flag = Attrs::new().key("list").default("a:b").delimiter(":").kind(FlagType::List)
			.build()
			.unwrap();
		assert_eq!(flag.default(), &json!(["a", "b"]));
		assert_eq!(flag.hint(), Some("a:b"));

		let flag = Attrs::new().key("list").default("a,b").no_delimiter().kind(FlagType::List)
			.build()
			.unwrap();
		assert_eq!(flag.default(), &json!(["a,b"]));
	}

	#[test]
	fn t_guess_hint() {
		assert_eq!(guess_hint(None, None), None);
		assert_eq!(guess_hint(Some(&json!(true)), None), None);
		assert_eq!(guess_hint(Some(&Value::Null), None), None);
		assert_eq!(guess_hint(Some(&json!([])), None), None);
		assert_eq!(guess_hint(Some(&json!(["a", 1])), None).as_deref(), Some("a,1"));
		assert_eq!(guess_hint(Some(&json!(["a", "b"])), Some(":")).as_deref(), Some("a:b"));
		assert_eq!(guess_hint(Some(&json!("value")), None).as_deref(), Some("value"));
		assert_eq!(guess_hint(Some(&json!(8)), None).as_deref(), Some("8"));
	}

	#[test]
	fn t_parse_switch_decl() {
		assert_eq!(parse_switch_decl("--[no-]opt"), Some(("--opt".to_owned(), "no")));
		assert_eq!(parse_switch_decl("--nest:[no-]opt"), Some(("--nest:opt".to_owned(), "no")));
		assert_eq!(parse_switch_decl("--[no-]"), None);
		assert_eq!(parse_switch_decl("--opt"), None);
		assert_eq!(parse_switch_decl("-[no-]o"), None);
	}
}
