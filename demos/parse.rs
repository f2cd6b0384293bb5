/*!
# Conflag: Parse

This example declares a handful of options, parses whatever arguments are fed
to it, and prints the resulting config and leftovers.

Set `RUST_LOG=conflag=trace` to watch the parser work.
*/

use conflag::{
	Attrs,
	ConfigParser,
	ConfigParserError,
	FlagType,
};
use serde_json::json;
use tracing_subscriber::EnvFilter;



fn main() {
	let filter = EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| EnvFilter::new("warn"));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();

	let mut parser = match parser() {
		Ok(p) => p,
		Err(e) => {
			eprintln!("\x1b[1;91mError:\x1b[0m {e}");
			std::process::exit(e.exit_code());
		},
	};

	let args: Vec<String> = std::env::args().skip(1).collect();
	match parser.parse(&args) {
		Ok(rest) => {
			if parser.get("help") == Some(&json!(true)) {
				print!("{parser}");
				return;
			}

			println!("\x1b[2mConfig:\x1b[0m");
			println!(
				"{}",
				serde_json::to_string_pretty(parser.config()).unwrap_or_default(),
			);

			println!("\x1b[2mArguments:\x1b[0m");
			if rest.is_empty() { println!("  \x1b[91mNo Arguments Passed\x1b[0m"); }
			for v in rest { println!("  {v:?}"); }
		},
		Err(e) => {
			eprintln!("\x1b[1;91mError:\x1b[0m {e}");
			std::process::exit(e.exit_code());
		},
	}
}

/// # Build Parser.
fn parser() -> Result<ConfigParser, ConfigParserError> {
	let mut parser = ConfigParser::new();

	parser.on(["-h", "--help", "Print help information and exit."], Attrs::new().key("help"))?;
	parser.on(["-v", "--verbose", "Be chatty."], Attrs::new().key("verbose"))?;
	parser.on(["--[no-]color", "Colorize output."], Attrs::new().key("color"))?;

	parser.separator("\nBuild:");
	parser.add(
		"threads",
		4,
		["-j", "--build:threads N", "The number of worker threads to use."],
		Attrs::new().callback(|v| {
			let n: u16 = v.as_str().unwrap_or_default().parse()?;
			if n == 0 { Err("threads must be at least one".into()) }
			else { Ok(json!(n)) }
		}),
	)?;
	parser.add(
		"targets",
		json!([]),
		["-t", "--build:target T", "A target to build. May be repeated or comma-separated."],
		Attrs::new().kind(FlagType::List),
	)?;
	parser.add(
		"profile",
		"debug",
		["--build:profile [NAME]", "The build profile."],
		Attrs::new(),
	)?;

	Ok(parser)
}
