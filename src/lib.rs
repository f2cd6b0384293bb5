/*!
# Conflag

[![license](https://img.shields.io/badge/license-wtfpl-ff1493?style=flat-square)](https://en.wikipedia.org/wiki/WTFPL)

This crate provides a declarative CLI option parser that writes straight into a (nested) JSON-style config map, [`Config`].

Options are declared up front as [`Flag`]s, either with the [`Attrs`] builder or with shorthand declarations like `"-o"`, `"--output FILE"`, or `"--[no-]color"`. [`ConfigParser::parse`] then walks the command-line arguments, pulls out the options it recognizes, runs their values through any callbacks, and stores the results under each flag's key. Everything else is handed back, in order, for you to deal with.

Four kinds of flags are supported:

| Kind | Example | Result |
| ---- | ------- | ------ |
| [`FlagType::Flag`] | `--verbose` | `true` |
| [`FlagType::Switch`] | `--color` / `--no-color` | `true` / `false` |
| [`FlagType::Option`] | `--output out.txt` | `"out.txt"` |
| [`FlagType::List`] | `--tag a,b --tag c` | `["a", "b", "c"]` |

Values can be attached (`--output=out.txt`, `-o=out.txt`), compact (`-oout.txt`), or passed as the next argument. Compact flags can be stacked, e.g. `-xvf file`.

Parsing stops at the option break (`--` by default); anything after it is returned as-is.



## Example

```
use conflag::{Attrs, ConfigParser, FlagType};
use serde_json::json;

let mut parser = ConfigParser::new();

// Shorthand declarations, with the key set explicitly.
parser.on(["-v", "--verbose", "Say more."], Attrs::new().key("verbose")).unwrap();

// Keys can be nested; the default determines the type.
parser.add("threads", 1, ["-j", "--build:threads N", "Worker count."], Attrs::new()).unwrap();

// Values can be massaged (or rejected) by callbacks.
parser.on(
    ["--level N"],
    Attrs::new().key("level").callback(|v| {
        let n: u8 = v.as_str().unwrap_or_default().parse()?;
        Ok(json!(n))
    }),
).unwrap();

// Or everything can be spelled out.
parser.register(
    Attrs::new()
        .key("color")
        .kind(FlagType::Switch)
        .desc("Colorize output.")
        .build()
        .unwrap()
).unwrap();

let args = parser.parse(&["-v", "-j4", "--level=3", "--no-color", "file.txt"]).unwrap();
assert_eq!(args, ["file.txt"]);
assert_eq!(
    serde_json::Value::Object(parser.into_config()),
    json!({
        "verbose": true,
        "build": { "threads": "4" },
        "level": 3,
        "color": false,
    }),
);
```
*/

#![forbid(unsafe_code)]

#![deny(
	clippy::allow_attributes_without_reason,
	clippy::correctness,
	unreachable_pub,
)]

#![warn(
	clippy::complexity,
	clippy::nursery,
	clippy::pedantic,
	clippy::perf,
	clippy::style,

	clippy::allow_attributes,
	clippy::clone_on_ref_ptr,
	clippy::create_dir,
	clippy::filetype_is_file,
	clippy::format_push_string,
	clippy::get_unwrap,
	clippy::impl_trait_in_params,
	clippy::lossy_float_literal,
	clippy::missing_assert_message,
	clippy::missing_docs_in_private_items,
	clippy::needless_raw_strings,
	clippy::panic_in_result_fn,
	clippy::pub_without_shorthand,
	clippy::rest_pat_in_fully_bound_structs,
	clippy::semicolon_inside_block,
	clippy::str_to_string,
	clippy::string_to_string,
	clippy::todo,
	clippy::undocumented_unsafe_blocks,
	clippy::unneeded_field_pattern,
	clippy::unseparated_literal_suffix,
	clippy::unwrap_in_result,

	macro_use_extern_crate,
	missing_copy_implementations,
	missing_docs,
	non_ascii_idents,
	trivial_casts,
	trivial_numeric_casts,
	unused_crate_dependencies,
	unused_extern_crates,
	unused_import_braces,
)]

#![cfg_attr(docsrs, feature(doc_cfg))]



mod error;
mod flag;
mod nest;
mod parser;
mod registry;
mod switch;

pub use error::{
	CallbackError,
	ConfigParserError,
};
pub use flag::{
	attrs::Attrs,
	Callback,
	Flag,
	FlagId,
	FlagKind,
	FlagType,
};
pub use nest::{
	Config,
	expand,
};
pub use parser::{
	ConfigParser,
	OptionBreak,
};
pub use registry::{
	Entry,
	Registry,
};
pub use serde_json::Value;
