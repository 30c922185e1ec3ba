//! Document writes.
//!
//! # Role
//!
//! Turns records into bytes on disk. Every write renders fully in memory,
//! lands in a temp file beside the destination, is synced, then renamed into
//! place, so readers see either the old document or the new one.
//!
//! # Invariants
//!
//! - Creation never replaces an existing document.
//! - Updates re-render only the structured block; the body is kept byte for byte.
//! - A replaced document keeps its permissions. New documents are `0644` on unix.
//! - Writers to one path are serialized by [`WriteLocks`] when the caller holds
//!   the slot across read, mutate, and write.

use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use holon_identity::Identity;
use holon_identity::document::render_new;
use parking_lot::Mutex;
use tempfile::NamedTempFile;

use crate::error::{RegistryError, Result};
use crate::index::read_document;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteMode {
	Create,
	Replace,
}

impl WriteMode {
	fn as_str(self) -> &'static str {
		match self {
			Self::Create => "create",
			Self::Replace => "update",
		}
	}
}

/// Writes a new document for `identity` at `path`, creating parent directories.
pub(crate) fn create_new(identity: &Identity, path: &Path) -> Result<()> {
	if let Some(dir) = path.parent() {
		fs::create_dir_all(dir).map_err(RegistryError::io(dir))?;
	}
	write_atomic(path, render_new(identity).as_bytes(), WriteMode::Create)?;
	tracing::info!(path = %path.display(), uuid = identity.uuid(), mode = WriteMode::Create.as_str(), "registry.write");
	Ok(())
}

/// Reads the document at `path`, lets `mutate` change its record, and writes
/// it back with the original body.
pub(crate) fn update_existing(path: &Path, mutate: impl FnOnce(&mut Identity)) -> Result<Identity> {
	let mut document = read_document(path)?;
	mutate(&mut document.identity);
	write_atomic(path, document.render().as_bytes(), WriteMode::Replace)?;
	tracing::info!(
		path = %path.display(),
		uuid = document.identity.uuid(),
		mode = WriteMode::Replace.as_str(),
		"registry.write"
	);
	Ok(document.identity)
}

fn write_atomic(path: &Path, contents: &[u8], mode: WriteMode) -> Result<()> {
	let dir = match path.parent() {
		Some(dir) if !dir.as_os_str().is_empty() => dir,
		_ => Path::new("."),
	};
	let permissions = match mode {
		WriteMode::Replace => Some(fs::metadata(path).map_err(RegistryError::io(path))?.permissions()),
		WriteMode::Create => default_permissions(),
	};

	let mut temp = NamedTempFile::new_in(dir).map_err(RegistryError::io(dir))?;
	temp.write_all(contents).map_err(RegistryError::io(path))?;
	if let Some(permissions) = permissions {
		temp.as_file().set_permissions(permissions).map_err(RegistryError::io(path))?;
	}
	temp.as_file().sync_all().map_err(RegistryError::io(path))?;

	match mode {
		WriteMode::Replace => {
			temp.persist(path).map_err(|err| RegistryError::Io {
				path: path.to_path_buf(),
				error: err.error,
			})?;
		}
		WriteMode::Create => {
			temp.persist_noclobber(path).map_err(|err| match err.error.kind() {
				ErrorKind::AlreadyExists => RegistryError::AlreadyExists(path.to_path_buf()),
				_ => RegistryError::Io {
					path: path.to_path_buf(),
					error: err.error,
				},
			})?;
		}
	}

	#[cfg(unix)]
	{
		if let Err(error) = fs::File::open(dir).and_then(|handle| handle.sync_all()) {
			tracing::debug!(dir = %dir.display(), %error, "registry.write.sync_dir");
		}
	}
	Ok(())
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
	use std::os::unix::fs::PermissionsExt;
	Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
	None
}

/// Per-path writer locks.
///
/// Paths are keyed by their canonical form so `a/../a/HOLON.md` and
/// `a/HOLON.md` share a slot. Slots nobody holds are dropped on the next
/// lookup.
#[derive(Debug, Default)]
pub(crate) struct WriteLocks {
	slots: Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>,
}

impl WriteLocks {
	/// Returns the lock slot for `path`. Lock it for the duration of the write.
	pub(crate) fn slot(&self, path: &Path) -> Arc<Mutex<()>> {
		let key = lock_key(path);
		let mut slots = self.slots.lock();
		slots.retain(|_, slot| Arc::strong_count(slot) > 1);
		Arc::clone(slots.entry(key).or_default())
	}

	#[cfg(test)]
	fn len(&self) -> usize {
		self.slots.lock().len()
	}
}

/// Canonical form of `path`; a file that does not exist yet is keyed by its
/// canonical parent.
fn lock_key(path: &Path) -> PathBuf {
	if let Ok(canonical) = fs::canonicalize(path) {
		return canonical;
	}
	match (path.parent(), path.file_name()) {
		(Some(dir), Some(name)) => fs::canonicalize(dir).map(|dir| dir.join(name)).unwrap_or_else(|_| path.to_path_buf()),
		_ => path.to_path_buf(),
	}
}
