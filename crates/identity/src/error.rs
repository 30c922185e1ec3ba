//! Error types for identity documents and record construction.

use thiserror::Error;

/// A stored document could not be decoded.
///
/// Format errors are never partially applied: a document either decodes
/// into a complete [`Identity`](crate::Identity) or not at all.
#[derive(Debug, Error)]
pub enum FormatError {
	/// The document does not start with the `---` delimiter.
	#[error("no structured block found")]
	MissingBlock,

	/// The opening delimiter has no matching closing line.
	#[error("unclosed structured block")]
	UnclosedBlock,

	/// The text between the delimiters is not a valid structured block.
	#[error("block parse error: {0}")]
	Block(#[from] serde_yaml::Error),
}

/// A record could not be created because required fields are missing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
	/// One or more creation-required fields are empty.
	#[error("missing required fields: {}", .0.join(", "))]
	MissingFields(Vec<&'static str>),
}
