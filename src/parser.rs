/*!
# Conflag: Parser.
*/

use crate::{
	Attrs,
	Config,
	ConfigParserError,
	Flag,
	FlagId,
	Registry,
	flag::{
		help,
		Pass,
	},
	registry::Entry,
	switch::looks_like_option,
};
use regex::Regex;
use serde_json::Value;
use std::{
	collections::VecDeque,
	fmt,
};
use tracing::{
	debug,
	trace,
};



/// # Default Option Break.
const OPTION_BREAK: &str = "--";



#[derive(Debug, Clone)]
/// # Option Break.
///
/// The argument that stops option parsing. Everything after it is returned
/// as-is.
pub enum OptionBreak {
	/// # Exact Match.
	Literal(String),

	/// # Pattern Match.
	///
	/// The break matches if the pattern matches anywhere in the argument,
	/// so anchor it if that matters.
	Pattern(Regex),
}

impl Default for OptionBreak {
	fn default() -> Self { Self::Literal(OPTION_BREAK.to_owned()) }
}

impl From<&str> for OptionBreak {
	fn from(src: &str) -> Self { Self::Literal(src.to_owned()) }
}

impl From<String> for OptionBreak {
	fn from(src: String) -> Self { Self::Literal(src) }
}

impl From<Regex> for OptionBreak {
	fn from(src: Regex) -> Self { Self::Pattern(src) }
}

impl OptionBreak {
	#[must_use]
	/// # Matches?
	pub fn matches(&self, arg: &str) -> bool {
		match self {
			Self::Literal(s) => s == arg,
			Self::Pattern(r) => r.is_match(arg),
		}
	}
}



#[derive(Debug, Clone)]
/// # Config Parser.
///
/// This is the main entry point. Register some [`Flag`]s, then call
/// [`ConfigParser::parse`] with the command-line arguments. Options are
/// pulled out and written into the parser's config map; everything else is
/// returned.
///
/// ## Examples
///
/// ```
/// use conflag::{Attrs, ConfigParser};
/// use serde_json::json;
///
/// let mut parser = ConfigParser::new();
/// parser.on(["-o", "--output FILE", "Where to write."], Attrs::new().key("output")).unwrap();
/// parser.on(["--[no-]color"], Attrs::new().key("color")).unwrap();
/// parser.add("tags", json!([]), ["-t", "--tag TAG"], Attrs::new()).unwrap();
///
/// let args = parser.parse(&[
///     "in.txt",
///     "-oout.txt",
///     "--no-color",
///     "--tag", "a,b",
///     "--tag=c",
///     "--",
///     "--not-an-option",
/// ]).unwrap();
///
/// assert_eq!(args, ["in.txt", "--not-an-option"]);
/// assert_eq!(parser.get("output"), Some(&json!("out.txt")));
/// assert_eq!(parser.get("color"), Some(&json!(false)));
/// assert_eq!(parser.get("tags"), Some(&json!(["a", "b", "c"])));
/// ```
pub struct ConfigParser {
	/// # Flags.
	registry: Registry,

	/// # Config Map.
	config: Config,

	/// # Option Break.
	option_break: OptionBreak,

	/// # Keep the Option Break?
	preserve_option_break: bool,

	/// # Assign Defaults on Parse?
	assign_defaults: bool,
}

impl Default for ConfigParser {
	fn default() -> Self {
		Self {
			registry: Registry::new(),
			config: Config::new(),
			option_break: OptionBreak::default(),
			preserve_option_break: false,
			assign_defaults: true,
		}
	}
}

impl fmt::Display for ConfigParser {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.help(help::WIDTH))
	}
}

/// # Settings.
impl ConfigParser {
	#[must_use]
	/// # New.
	pub fn new() -> Self { Self::default() }

	#[must_use]
	/// # With Config.
	///
	/// Start from an existing config map rather than an empty one.
	pub fn with_config(mut self, config: Config) -> Self {
		self.config = config;
		self
	}

	#[must_use]
	/// # With Option Break.
	///
	/// The default is `--`.
	pub fn with_option_break<B: Into<OptionBreak>>(mut self, option_break: B) -> Self {
		self.option_break = option_break.into();
		self
	}

	#[must_use]
	/// # With Preserved Option Break.
	///
	/// When `true`, the option break is kept in the returned arguments.
	pub const fn with_preserve_option_break(mut self, preserve: bool) -> Self {
		self.preserve_option_break = preserve;
		self
	}

	#[must_use]
	/// # With Assign Defaults.
	///
	/// When `true` (the default), every flag writes its default into the
	/// config at the start of each parse.
	pub const fn with_assign_defaults(mut self, assign: bool) -> Self {
		self.assign_defaults = assign;
		self
	}

	/// # Set Option Break.
	pub fn set_option_break<B: Into<OptionBreak>>(&mut self, option_break: B) {
		self.option_break = option_break.into();
	}

	/// # Set Preserve Option Break.
	pub fn set_preserve_option_break(&mut self, preserve: bool) {
		self.preserve_option_break = preserve;
	}

	/// # Set Assign Defaults.
	pub fn set_assign_defaults(&mut self, assign: bool) {
		self.assign_defaults = assign;
	}

	#[must_use]
	/// # Option Break.
	pub const fn option_break(&self) -> &OptionBreak { &self.option_break }

	#[must_use]
	/// # Preserve Option Break?
	pub const fn preserve_option_break(&self) -> bool { self.preserve_option_break }

	#[must_use]
	/// # Assign Defaults?
	pub const fn assign_defaults(&self) -> bool { self.assign_defaults }
}

/// # Config.
impl ConfigParser {
	#[must_use]
	/// # Config.
	pub const fn config(&self) -> &Config { &self.config }

	/// # Config (Mutable).
	pub fn config_mut(&mut self) -> &mut Config { &mut self.config }

	#[must_use]
	/// # Into Config.
	pub fn into_config(self) -> Config { self.config }

	#[must_use]
	/// # Get Config Value.
	pub fn get(&self, key: &str) -> Option<&Value> { self.config.get(key) }

	#[must_use]
	/// # Get Flag Value.
	///
	/// Return the config value belonging to a registered flag, following its
	/// nest path.
	pub fn value(&self, id: FlagId) -> Option<&Value> {
		self.registry.get(id)?.value_in(&self.config)
	}

	/// # Set Config Value.
	///
	/// Returns the previous value, if any.
	pub fn set<K, V>(&mut self, key: K, value: V) -> Option<Value>
	where K: Into<String>, V: Into<Value> {
		self.config.insert(key.into(), value.into())
	}
}

/// # Registration.
impl ConfigParser {
	#[must_use]
	/// # Registry.
	pub const fn registry(&self) -> &Registry { &self.registry }

	/// # Register.
	///
	/// ## Errors
	///
	/// Returns an error if any of the flag's switches are already claimed by
	/// a different flag.
	pub fn register(&mut self, flag: Flag) -> Result<FlagId, ConfigParserError> {
		self.registry.register(flag, false)
	}

	/// # Register (Replacing).
	///
	/// Like [`ConfigParser::register`], except flags with conflicting switches
	/// are removed first.
	///
	/// ## Errors
	///
	/// This cannot currently fail, but returns a `Result` for consistency.
	pub fn register_override(&mut self, flag: Flag) -> Result<FlagId, ConfigParserError> {
		self.registry.register(flag, true)
	}

	/// # Unregister.
	pub fn unregister(&mut self, id: FlagId) -> Option<Flag> {
		self.registry.unregister(id)
	}

	/// # On.
	///
	/// Infer a flag from shorthand declarations (see [`Attrs::infer`]),
	/// overlay `attrs`, then build and register it.
	///
	/// ## Errors
	///
	/// Returns an error if the declarations are invalid, the flag cannot be
	/// built, or its switches conflict with an existing flag.
	pub fn on<I, S>(&mut self, decls: I, attrs: Attrs) -> Result<FlagId, ConfigParserError>
	where I: IntoIterator<Item=S>, S: AsRef<str> {
		let flag = Attrs::infer(decls)?.merge(attrs).build()?;
		self.register(flag)
	}

	/// # On (Replacing).
	///
	/// Same as [`ConfigParser::on`], but conflicting flags are replaced.
	///
	/// ## Errors
	///
	/// Returns an error if the declarations are invalid or the flag cannot be
	/// built.
	pub fn on_override<I, S>(&mut self, decls: I, attrs: Attrs)
	-> Result<FlagId, ConfigParserError>
	where I: IntoIterator<Item=S>, S: AsRef<str> {
		let flag = Attrs::infer(decls)?.merge(attrs).build()?;
		self.register_override(flag)
	}

	/// # Add.
	///
	/// Same as [`ConfigParser::on`], but with the key and default up front.
	///
	/// ## Errors
	///
	/// Returns an error if the declarations are invalid, the flag cannot be
	/// built, or its switches conflict with an existing flag.
	pub fn add<K, V, I, S>(&mut self, key: K, default: V, decls: I, attrs: Attrs)
	-> Result<FlagId, ConfigParserError>
	where K: Into<String>, V: Into<Value>, I: IntoIterator<Item=S>, S: AsRef<str> {
		self.on(decls, attrs.key(key).default(default))
	}

	/// # Remove by Key.
	///
	/// Unregister every flag with the given config key, returning them.
	pub fn rm(&mut self, key: &str) -> Vec<Flag> {
		let ids: Vec<FlagId> = self.registry.flags()
			.filter(|f| f.key() == Some(key))
			.map(Flag::id)
			.collect();

		ids.into_iter().filter_map(|id| self.registry.unregister(id)).collect()
	}

	/// # Add Separator.
	///
	/// Separators are only used for help output.
	pub fn separator<S: Into<String>>(&mut self, text: S) {
		self.registry.separator(text);
	}

	/// # Sort Flags.
	///
	/// Sort flags by their long (or short) switch, keeping separator-delimited
	/// groups intact.
	pub fn sort_flags(&mut self) {
		self.registry.sort_by_key(|f| f.long().or_else(|| f.short()).map(str::to_owned));
	}

	/// # Sort Flags By.
	///
	/// Same as [`ConfigParser::sort_flags`], but with a custom sort key.
	pub fn sort_flags_by<K, F>(&mut self, cb: F)
	where K: Ord, F: FnMut(&Flag) -> K {
		self.registry.sort_by_key(cb);
	}
}

/// # Parsing.
impl ConfigParser {
	/// # Parse.
	///
	/// Parse options out of `argv`, writing their values into the config,
	/// and return the remaining arguments in their original order. Parsing
	/// stops at the option break; anything after it is returned as-is.
	///
	/// The input is left untouched.
	///
	/// ## Errors
	///
	/// Returns an error for unknown options, missing or unexpected values,
	/// lists exceeding their limits, and failed callbacks. The config may be
	/// partially updated in that case.
	pub fn parse<S: AsRef<str>>(&mut self, argv: &[S]) -> Result<Vec<String>, ConfigParserError> {
		let mut args = Vec::new();
		let rest = self.scan(argv.iter().map(|s| s.as_ref().to_owned()), |a| args.push(a))?;
		args.extend(rest);
		Ok(args)
	}

	/// # Parse in Place.
	///
	/// Same as [`ConfigParser::parse`], but `argv` is replaced with the
	/// remaining arguments. On error, `argv` is left as it was.
	///
	/// ## Errors
	///
	/// See [`ConfigParser::parse`].
	pub fn parse_in_place(&mut self, argv: &mut Vec<String>) -> Result<(), ConfigParserError> {
		*argv = self.parse(argv.as_slice())?;
		Ok(())
	}

	/// # Scan.
	///
	/// This is the low-level parsing loop. Plain arguments are passed to `cb`
	/// as they come up; the arguments following the option break (if any) are
	/// returned.
	///
	/// ## Errors
	///
	/// See [`ConfigParser::parse`].
	pub fn scan<I, S, F>(&mut self, argv: I, mut cb: F) -> Result<Vec<String>, ConfigParserError>
	where I: IntoIterator<Item=S>, S: Into<String>, F: FnMut(String) {
		let mut pass = Pass::default();
		if self.assign_defaults {
			for flag in self.registry.flags() {
				flag.assign_default(&mut self.config, &mut pass)?;
			}
		}

		let mut argv: VecDeque<String> = argv.into_iter().map(Into::into).collect();
		while let Some(arg) = argv.pop_front() {
			// Stop!
			if self.option_break.matches(&arg) {
				debug!(token = %arg, remaining = argv.len(), "option break");
				if self.preserve_option_break { argv.push_front(arg); }
				break;
			}

			// Plain arguments go straight through.
			if ! looks_like_option(&arg) {
				trace!(token = %arg, "argument");
				cb(arg);
				continue;
			}

			let (flag, switch, raw) = self.registry.resolve(&arg)?;
			trace!(token = %arg, switch = %switch, flag = flag.label(), "option");
			flag.consume(&switch, raw, &mut argv, &mut self.config, &mut pass)?;
		}

		Ok(argv.into())
	}
}

/// # Help.
impl ConfigParser {
	#[must_use]
	/// # Help Text.
	///
	/// Render the registered flags and separators, in order, one entry per
	/// line (or more, if descriptions wrap).
	///
	/// This is also what the [`Display`](fmt::Display) implementation
	/// returns, using a width of `80`.
	pub fn help(&self, width: usize) -> String {
		let mut out = String::new();
		for entry in self.registry.entries() {
			match entry {
				Entry::Flag(flag) => out.push_str(&help::render(flag, width)),
				Entry::Separator(s) => out.push_str(s.trim_end()),
			}
			out.push('\n');
		}
		out
	}
}
