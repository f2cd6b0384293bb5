/*!
# Conflag: Help Text.
*/

use crate::switch::prefix_long;
use super::{
	Flag,
	FlagKind,
};



/// # Default Help Width.
pub(crate) const WIDTH: usize = 80;

/// # Tab Replacement.
const TAB: &str = "  ";



/// # Render Flag.
///
/// Format a flag as one or more help lines: the switch summary padded to
/// 45% of `width`, a space, then the wrapped description.
///
/// Summaries too long for their column get a line to themselves, with the
/// description starting on the next.
pub(crate) fn render(flag: &Flag, width: usize) -> String {
	let head_size = width * 45 / 100;
	let desc_size = width.saturating_sub(head_size + 1).max(1);

	let header = header(flag);
	let mut desc = wrap(&desc(flag), desc_size).into_iter();
	let mut lines = Vec::new();

	if head_size < header.chars().count() { lines.push(header); }
	else {
		lines.push(format!("{header:<head_size$} {}", desc.next().unwrap_or_default()));
	}

	for line in desc {
		lines.push(format!("{:head_size$} {line}", ""));
	}

	lines.iter()
		.map(|l| l.trim_end())
		.collect::<Vec<_>>()
		.join("\n")
}

/// # Header.
///
/// E.g. `    -o, --output FILE`.
fn header(flag: &Flag) -> String {
	let short = match (flag.short(), flag.long()) {
		(Some(s), Some(_)) => format!("{s}, "),
		(Some(s), None) => s.to_owned(),
		(None, _) => "    ".to_owned(),
	};

	let long = match (flag.kind(), flag.long()) {
		(FlagKind::Switch { negative_long, prefix }, Some(l)) =>
			if *negative_long == prefix_long(l, &format!("{prefix}-")) {
				prefix_long(l, &format!("[{prefix}-]"))
			}
			else { format!("{l}, {negative_long}") },
		(_, l) => l.unwrap_or_default().to_owned(),
	};

	match flag.kind() {
		FlagKind::Option { arg_name, .. } | FlagKind::List { arg_name, .. } =>
			format!("    {short}{long} {arg_name}"),
		_ => format!("    {short}{long}"),
	}
}

/// # Description.
///
/// The description with the hint, if any, tacked on in parentheses.
fn desc(flag: &Flag) -> String {
	match (flag.desc(), flag.hint()) {
		(None, None) => String::new(),
		(Some(d), None) => d.to_owned(),
		(d, Some(h)) => format!("{} ({h})", d.unwrap_or_default()).trim().to_owned(),
	}
}

/// # Word Wrap.
///
/// Greedily pack whitespace-separated words into lines of at most `cols`
/// characters. Words that are too long on their own are broken up. Tabs
/// count as two spaces; explicit line breaks are kept.
pub(crate) fn wrap(text: &str, cols: usize) -> Vec<String> {
	let cols = cols.max(1);
	let text = text.replace('\t', TAB);
	let mut out = Vec::new();

	for para in text.lines() {
		let mut line = String::new();
		let mut len = 0;

		for word in para.split_whitespace() {
			let word_len = word.chars().count();
			if len != 0 && cols < len + 1 + word_len {
				out.push(std::mem::take(&mut line));
				len = 0;
			}
			if len != 0 {
				line.push(' ');
				len += 1;
			}
			line.push_str(word);
			len += word_len;

			// Chop up anything too big for one line.
			while cols < len {
				let rest: String = line.chars().skip(cols).collect();
				line = line.chars().take(cols).collect();
				out.push(std::mem::replace(&mut line, rest));
				len -= cols;
			}
		}

		if len != 0 || para.trim().is_empty() { out.push(line); }
	}

	out
}



#[cfg(test)]
mod test {
	use super::*;
	use crate::{
		Attrs,
		FlagType,
	};

	#[test]
	fn t_header() {
		let flag = Attrs::infer(["--opt OPT", "-o", "desc"]).unwrap().build().unwrap();
		assert_eq!(header(&flag), "    -o, --opt OPT");

		let flag = Attrs::new().key("switch").kind(FlagType::Switch).build().unwrap();
		assert_eq!(header(&flag), "        --[no-]switch");

		let flag = Attrs::new().key("sw").nest(["a"]).prefix("skip").kind(FlagType::Switch).build().unwrap();
		assert_eq!(header(&flag), "        --a:[skip-]sw");

		// Custom negatives are listed separately.
		let flag = Attrs::new().key("color").negative_long("--plain").kind(FlagType::Switch)
			.build()
			.unwrap();
		assert_eq!(header(&flag), "        --color, --plain");

		let flag = Attrs::new().key("flag").kind(FlagType::Flag).build().unwrap();
		assert_eq!(header(&flag), "        --flag");

		let flag = Attrs::new().key("list").kind(FlagType::List).build().unwrap();
		assert_eq!(header(&flag), "        --list LIST");

		let flag = Attrs::new().key("opt").short("o").no_long().arg_name("OPT").kind(FlagType::Option)
			.build()
			.unwrap();
		assert_eq!(header(&flag), "    -o OPT");
	}

	#[test]
	fn t_desc() {
		let flag = Attrs::new().build().unwrap();
		assert_eq!(desc(&flag), "");

		let flag = Attrs::new().desc("Some text.").build().unwrap();
		assert_eq!(desc(&flag), "Some text.");

		let flag = Attrs::new().key("n").default("4").desc("Threads.").build().unwrap();
		assert_eq!(desc(&flag), "Threads. (4)");

		let flag = Attrs::new().key("n").default("4").build().unwrap();
		assert_eq!(desc(&flag), "(4)");
	}

	#[test]
	fn t_render() {
		let flag = Attrs::infer(["--opt OPT", "-o", "desc"]).unwrap().build().unwrap();
		assert_eq!(render(&flag, WIDTH), "    -o, --opt OPT                    desc");

		// Wrapping.
		let flag = Attrs::new()
			.key("opt")
			.desc("one two three four five six")
			.build()
			.unwrap();
		assert_eq!(
			render(&flag, 40),
			"        --opt      one two three four\n                   five six",
		);

		// Long headers get their own line.
		let flag = Attrs::new()
			.key("a-really-long-option-name")
			.desc("desc")
			.build()
			.unwrap();
		assert_eq!(
			render(&flag, 40),
			"        --a-really-long-option-name\n                   desc",
		);
	}

	#[test]
	fn t_wrap() {
		assert!(wrap("", 10).is_empty());
		assert_eq!(wrap("one two three", 7), ["one two", "three"]);
		assert_eq!(wrap("one\ttwo", 80), ["one two"]);
		assert_eq!(wrap("abcdefghij", 4), ["abcd", "efgh", "ij"]);
		assert_eq!(wrap("a abcdefghij", 4), ["a", "abcd", "efgh", "ij"]);
		assert_eq!(wrap("one\n\ntwo", 80), ["one", "", "two"]);
	}
}
