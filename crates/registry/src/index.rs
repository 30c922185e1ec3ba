//! Discovery and lookup of identity documents under a root directory.
//!
//! # Role
//!
//! Every call walks the tree from scratch; nothing is cached between calls.
//!
//! # Invariants
//!
//! - Directories whose name starts with `.` are pruned, except the walk root
//!   and the convention directory (`.holon` by default).
//! - Only files named exactly like the configured document name are read.
//! - A candidate that cannot be read or parsed is skipped, not reported.
//! - Entries are visited in file-name order within each directory, so results
//!   are stable for a fixed tree.
//! - A walk root that is missing or cannot be listed is an error.

use std::path::{Path, PathBuf};
use std::time::Instant;

use holon_identity::{Document, Identity};
use ignore::{DirEntry, Walk, WalkBuilder};

use crate::config::{PrefixPolicy, RegistryConfig};
use crate::error::{RegistryError, Result};

/// A parsed document and where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
	pub path: PathBuf,
	pub document: Document,
}

/// Returns every well-formed record under `root` in walk order.
pub fn find_all(root: &Path, config: &RegistryConfig) -> Result<Vec<Identity>> {
	Ok(scan(root, config)?.into_iter().map(|located| located.document.identity).collect())
}

/// Like [`find_all`], keeping each record's path and body.
pub fn scan(root: &Path, config: &RegistryConfig) -> Result<Vec<Located>> {
	let start = Instant::now();
	let found: Vec<Located> = documents(root, config)?.collect();
	tracing::debug!(
		root = %root.display(),
		records = found.len(),
		elapsed_ms = start.elapsed().as_millis() as u64,
		"registry.walk.complete"
	);
	Ok(found)
}

/// Resolves `query` to a document path by exact identifier or prefix.
///
/// Ties between several prefix matches are settled by `config.prefix_policy`.
/// An empty query matches nothing.
pub fn find_by_uuid(root: &Path, query: &str, config: &RegistryConfig) -> Result<PathBuf> {
	let walk = documents(root, config)?;
	if query.is_empty() {
		return Err(RegistryError::NotFound(query.to_string()));
	}

	let mut candidates = Vec::new();
	let mut exact = None;
	for located in walk {
		let uuid = located.document.identity.uuid();
		if uuid == query {
			exact = Some(located.path);
			break;
		}
		if !uuid.starts_with(query) {
			continue;
		}
		if config.prefix_policy == PrefixPolicy::FirstMatch {
			exact = Some(located.path);
			break;
		}
		candidates.push(located.path);
	}

	let resolved = match (exact, candidates.len()) {
		(Some(path), _) => path,
		(None, 0) => return Err(RegistryError::NotFound(query.to_string())),
		(None, 1) => candidates.remove(0),
		(None, _) => {
			return Err(RegistryError::Ambiguous {
				query: query.to_string(),
				candidates,
			});
		}
	};

	tracing::debug!(query, path = %resolved.display(), "registry.resolve");
	Ok(resolved)
}

/// Path of the record whose identifier is exactly `uuid`, if any.
pub(crate) fn find_exact(root: &Path, uuid: &str, config: &RegistryConfig) -> Result<Option<PathBuf>> {
	Ok(documents(root, config)?
		.find(|located| located.document.identity.uuid() == uuid)
		.map(|located| located.path))
}

/// Reads and decodes one document.
pub fn read_document(path: &Path) -> Result<Document> {
	read_raw(path).map(|(_, document)| document)
}

/// Reads one document, returning its text alongside the decoded form.
pub(crate) fn read_raw(path: &Path) -> Result<(String, Document)> {
	let text = std::fs::read_to_string(path).map_err(RegistryError::io(path))?;
	let document = Document::parse(&text).map_err(|source| RegistryError::Format {
		path: path.to_path_buf(),
		source,
	})?;
	Ok((text, document))
}

/// Lazily yields the readable, well-formed documents under `root`.
fn documents<'a>(root: &Path, config: &'a RegistryConfig) -> Result<impl Iterator<Item = Located> + 'a> {
	let metadata = std::fs::metadata(root).map_err(RegistryError::io(root))?;
	if metadata.is_dir() {
		std::fs::read_dir(root).map_err(RegistryError::io(root))?;
	}

	Ok(build_walk(root, config).filter_map(move |entry| {
		let entry = match entry {
			Ok(entry) => entry,
			Err(error) => {
				tracing::debug!(%error, "registry.walk.error");
				return None;
			}
		};
		if !entry.file_type().is_some_and(|t| t.is_file()) || entry.file_name() != config.document_name.as_str() {
			return None;
		}

		let path = entry.into_path();
		match read_document(&path) {
			Ok(document) => Some(Located { path, document }),
			Err(error) => {
				tracing::debug!(path = %path.display(), %error, "registry.walk.skip");
				None
			}
		}
	}))
}

fn build_walk(root: &Path, config: &RegistryConfig) -> Walk {
	let convention_dir = config.convention_dir.clone();
	let mut walker = WalkBuilder::new(root);

	walker
		.standard_filters(false)
		.follow_links(false)
		.sort_by_file_name(|a, b| a.cmp(b))
		.filter_entry(move |entry| entry.depth() == 0 || !is_pruned(entry, &convention_dir));

	walker.build()
}

fn is_pruned(entry: &DirEntry, convention_dir: &str) -> bool {
	if !entry.file_type().is_some_and(|t| t.is_dir()) {
		return false;
	}
	let name = entry.file_name().to_string_lossy();
	name.starts_with('.') && name != convention_dir
}
