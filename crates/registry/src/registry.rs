//! The [`Registry`] handle: a root directory, its configuration, and the
//! writer locks for documents beneath it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use holon_identity::{Document, Identity, IdentityPatch};
use parking_lot::Mutex;

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use crate::index::{self, Located};
use crate::store::{self, WriteLocks};

/// A tree of identity documents rooted at one directory.
///
/// Lookups walk the tree on every call. Writes through one `Registry` are
/// serialized per document, and creations are serialized against each other
/// so the identifier check and the write happen as one step. Share it (for
/// example behind an `Arc`) between threads that write the same tree.
#[derive(Debug)]
pub struct Registry {
	root: PathBuf,
	config: RegistryConfig,
	locks: WriteLocks,
	creating: Mutex<()>,
}

impl Registry {
	/// Registry over `root` with default settings.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self::with_config(root, RegistryConfig::default())
	}

	pub fn with_config(root: impl Into<PathBuf>, config: RegistryConfig) -> Self {
		Self {
			root: root.into(),
			config,
			locks: WriteLocks::default(),
			creating: Mutex::new(()),
		}
	}

	/// Registry over `root`, reading `<root>/.holon/registry.toml` if present.
	pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
		let root = root.into();
		let config = RegistryConfig::discover(&root)?;
		Ok(Self::with_config(root, config))
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	pub fn config(&self) -> &RegistryConfig {
		&self.config
	}

	/// `<root>/<convention-dir>/<given-family>`.
	pub fn default_dir(&self, identity: &Identity) -> PathBuf {
		self.root.join(&self.config.convention_dir).join(identity.default_dir_name())
	}

	/// Validates `identity` and writes it as a new document.
	///
	/// `output_dir` defaults to [`default_dir`](Self::default_dir); a relative
	/// directory is joined onto the root. Nothing touches the disk when
	/// validation fails, when the identifier is empty, or when another document
	/// in the tree already carries it. An existing document is never replaced.
	pub fn create(&self, identity: &Identity, output_dir: Option<&Path>) -> Result<PathBuf> {
		identity.validate()?;

		let dir = match output_dir {
			Some(dir) => self.root.join(dir),
			None => self.default_dir(identity),
		};
		let path = dir.join(&self.config.document_name);

		let _creating = self.creating.lock();
		if let Some(existing) = self.find_identifier(identity.uuid())? {
			return Err(RegistryError::DuplicateIdentifier {
				uuid: identity.uuid().to_string(),
				path: existing,
			});
		}
		store::create_new(identity, &path)?;
		Ok(path)
	}

	/// Every well-formed record in the tree. Malformed documents are skipped.
	pub fn find_all(&self) -> Result<Vec<Identity>> {
		index::find_all(&self.root, &self.config)
	}

	/// Every well-formed document with its path and body.
	pub fn scan(&self) -> Result<Vec<Located>> {
		index::scan(&self.root, &self.config)
	}

	/// Resolves an identifier or identifier prefix to a document path.
	pub fn find(&self, query: &str) -> Result<PathBuf> {
		index::find_by_uuid(&self.root, query, &self.config)
	}

	/// Reads one document. `path` is used as given, like the paths [`find`](Self::find) returns.
	pub fn read(&self, path: &Path) -> Result<Document> {
		index::read_document(path)
	}

	/// Applies `patch` to the document at `path`, keeping its body.
	pub fn update(&self, path: &Path, patch: &IdentityPatch) -> Result<Identity> {
		self.update_with(path, |identity| patch.apply(identity))
	}

	/// Read-modify-write of the document at `path` under its writer lock.
	pub fn update_with(&self, path: &Path, mutate: impl FnOnce(&mut Identity)) -> Result<Identity> {
		let slot = self.locks.slot(path);
		let _guard = slot.lock();
		store::update_existing(path, mutate)
	}

	/// Exact identifier lookup. A root that does not exist yet holds nothing.
	fn find_identifier(&self, uuid: &str) -> Result<Option<PathBuf>> {
		match index::find_exact(&self.root, uuid, &self.config) {
			Err(RegistryError::Io { error, .. }) if error.kind() == ErrorKind::NotFound => Ok(None),
			other => other,
		}
	}
}
