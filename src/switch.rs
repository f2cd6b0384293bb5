/*!
# Conflag: Switch Grammar.

Short switches are a dash followed by exactly one character, e.g. `-v`.

Long switches are two dashes followed by one or more `:`-separated segments,
e.g. `--verbose` or `--log:level`. Segments may contain dashes, but not
whitespace, `=`, `:`, or brackets, and the first may not lead with a dash.
*/

use crate::ConfigParserError;



/// # Nest Separator.
pub(crate) const NEST_SEPARATOR: char = ':';



#[must_use]
/// # Looks Like an Option?
///
/// Any token beginning with a dash and containing at least one more byte is
/// option-shaped. A lone `-` is a plain argument (traditionally STDIN).
pub(crate) fn looks_like_option(arg: &str) -> bool {
	2 <= arg.len() && arg.starts_with('-')
}

/// # Shortify.
///
/// Normalize a short switch, prefixing a dash if needed.
///
/// ## Errors
///
/// Returns an error if the result is not a valid short switch.
pub(crate) fn shortify(raw: &str) -> Result<String, ConfigParserError> {
	let out =
		if looks_like_option(raw) { raw.to_owned() }
		else { format!("-{raw}") };

	if valid_short(&out) { Ok(out) }
	else {
		Err(ConfigParserError::InvalidSwitchFormat { kind: "short", switch: out })
	}
}

/// # Longify.
///
/// Normalize a long switch, prefixing two dashes if needed.
///
/// ## Errors
///
/// Returns an error if the result is not a valid long switch.
pub(crate) fn longify(raw: &str) -> Result<String, ConfigParserError> {
	let out =
		if looks_like_option(raw) { raw.to_owned() }
		else { format!("--{raw}") };

	if valid_long(&out) { Ok(out) }
	else {
		Err(ConfigParserError::InvalidSwitchFormat { kind: "long", switch: out })
	}
}

#[must_use]
/// # Prefix Long.
///
/// Insert `prefix` in front of the final nested segment of a long switch.
///
/// ```text
/// --opt,        no-   => --no-opt
/// --nested:opt, no-   => --nested:no-opt
/// ```
pub(crate) fn prefix_long(long: &str, prefix: &str) -> String {
	let bare = long.strip_prefix("--").unwrap_or(long);
	match bare.rsplit_once(NEST_SEPARATOR) {
		Some((nest, last)) => format!("--{nest}{NEST_SEPARATOR}{prefix}{last}"),
		None => format!("--{prefix}{bare}"),
	}
}

#[must_use]
/// # Valid Short?
pub(crate) fn valid_short(switch: &str) -> bool {
	let mut chars = switch.chars();
	matches!(
		(chars.next(), chars.next(), chars.next()),
		(Some('-'), Some(c), None) if valid_char(c) && c != '-'
	)
}

#[must_use]
/// # Valid Long?
pub(crate) fn valid_long(switch: &str) -> bool {
	let Some(rest) = switch.strip_prefix("--") else { return false; };
	! rest.starts_with('-') &&
	rest.split(NEST_SEPARATOR).all(|seg| ! seg.is_empty() && seg.chars().all(valid_char))
}

/// # Valid Switch Character?
fn valid_char(c: char) -> bool {
	! c.is_whitespace() && ! matches!(c, '=' | ':' | '[' | ']')
}
