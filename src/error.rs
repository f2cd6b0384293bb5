/*!
# Conflag: Errors

This is the obligatory error enum. Everything that can go wrong while
declaring or parsing options ends up here.
*/

use std::error::Error as StdError;
use thiserror::Error;



/// # Boxed Callback Error.
///
/// Value callbacks may fail with whatever error type suits them; it is boxed
/// up and chained through [`ConfigParserError::Callback`].
pub type CallbackError = Box<dyn StdError + Send + Sync>;



#[derive(Debug, Error)]
/// # Error Enum.
pub enum ConfigParserError {
	/// # Invalid Switch.
	///
	/// A declared short or long switch does not fit the grammar.
	#[error("invalid {kind} switch: {switch}")]
	InvalidSwitchFormat {
		/// # Short or Long.
		kind: &'static str,

		/// # Offending Value.
		switch: String,
	},

	/// # Duplicate Switch.
	#[error("switch is already mapped to a different option: {0}")]
	DuplicateSwitch(String),

	/// # Switch Without Long.
	#[error("no long specified for switch")]
	MissingLongForSwitch,

	/// # Arg Name For Switch.
	#[error("arg name specified for switch {switch}: {arg_name}")]
	ArgNameForSwitch {
		/// # Switch.
		switch: String,

		/// # Arg Name.
		arg_name: String,
	},

	/// # Conflicting Declarations.
	#[error("conflicting {attr} declarations: {first:?}, {second:?}")]
	ConflictingDeclaration {
		/// # Attribute.
		attr: &'static str,

		/// # First Seen.
		first: String,

		/// # Second Seen.
		second: String,
	},

	/// # Unknown Option.
	#[error("unknown option: {0}")]
	UnknownOption(String),

	/// # Missing Value.
	#[error("no value provided for: {0}")]
	MissingValue(String),

	/// # Unexpected Value.
	#[error("value specified for {switch}: {value:?}")]
	UnexpectedValue {
		/// # Switch.
		switch: String,

		/// # Value.
		value: String,
	},

	/// # Too Many Values.
	#[error("too many assignments for {switch} (limit {limit})")]
	TooManyValues {
		/// # Switch.
		switch: String,

		/// # Limit.
		limit: usize,
	},

	/// # Callback Failure.
	#[error("callback failed for {switch}: {source}")]
	Callback {
		/// # Switch.
		switch: String,

		/// # Original Error.
		#[source]
		source: CallbackError,
	},
}

impl ConfigParserError {
	#[must_use]
	/// # Exit Code.
	///
	/// Problems with the user's input, like unknown options or missing
	/// values, return `2`, the conventional usage-error status. Problems with
	/// the option declarations themselves return `1`.
	pub const fn exit_code(&self) -> i32 {
		match self {
			Self::UnknownOption(_)
				| Self::MissingValue(_)
				| Self::UnexpectedValue { .. }
				| Self::TooManyValues { .. }
				| Self::Callback { .. } => 2,
			_ => 1,
		}
	}
}



#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn t_display() {
		assert_eq!(
			ConfigParserError::UnknownOption("--bogus".to_owned()).to_string(),
			"unknown option: --bogus",
		);
		assert_eq!(
			ConfigParserError::MissingValue("--opt".to_owned()).to_string(),
			"no value provided for: --opt",
		);
		assert_eq!(
			ConfigParserError::InvalidSwitchFormat { kind: "long", switch: "--".to_owned() }.to_string(),
			"invalid long switch: --",
		);
	}

	#[test]
	fn t_exit_code() {
		assert_eq!(ConfigParserError::UnknownOption(String::new()).exit_code(), 2);
		assert_eq!(ConfigParserError::MissingLongForSwitch.exit_code(), 1);
		assert_eq!(ConfigParserError::DuplicateSwitch("-x".to_owned()).exit_code(), 1);
	}

	#[test]
	fn t_callback_source() {
		let err = ConfigParserError::Callback {
			switch: "--num".to_owned(),
			source: "not a number".into(),
		};
		assert_eq!(err.source().map(ToString::to_string).as_deref(), Some("not a number"));
	}
}
