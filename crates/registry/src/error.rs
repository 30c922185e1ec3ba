//! Error types for registry operations.

use std::path::PathBuf;

use holon_identity::{FormatError, ValidationError};
use thiserror::Error;

/// Errors surfaced by registry lookups and writes.
///
/// Per-entry failures met while walking a tree (an unreadable subdirectory,
/// a malformed document) are logged and skipped, never returned here.
#[derive(Debug, Error)]
pub enum RegistryError {
	/// The walk root or a target file could not be accessed.
	#[error("I/O error at {path}: {error}")]
	Io {
		/// Path the operation was working on.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A document that was explicitly requested is malformed.
	#[error("{path}: {source}")]
	Format {
		/// Path of the malformed document.
		path: PathBuf,
		/// What was wrong with it.
		source: FormatError,
	},

	/// No record matches the query.
	#[error("holon not found: {0}")]
	NotFound(String),

	/// A prefix query matches more than one record.
	#[error("ambiguous holon prefix {query:?}: {} records match", .candidates.len())]
	Ambiguous {
		/// The query as given.
		query: String,
		/// Documents whose identifiers start with the query, in walk order.
		candidates: Vec<PathBuf>,
	},

	/// A record is missing creation-required fields.
	#[error(transparent)]
	Validation(#[from] ValidationError),

	/// Creation would give a second document an identifier already in the tree.
	#[error("holon {uuid} already exists at {path}")]
	DuplicateIdentifier {
		/// The identifier being created.
		uuid: String,
		/// The document that already carries it.
		path: PathBuf,
	},

	/// Creation would overwrite an existing document.
	#[error("holon document already exists: {0}")]
	AlreadyExists(PathBuf),

	/// A registry configuration file is not valid TOML for [`RegistryConfig`](crate::RegistryConfig).
	#[error("invalid registry config {path}: {error}")]
	Config {
		/// Path of the configuration file.
		path: PathBuf,
		/// The TOML error.
		error: toml::de::Error,
	},
}

impl RegistryError {
	pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
		let path = path.into();
		move |error| Self::Io { path, error }
	}
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
