//! Registry configuration.
//!
//! Settings are read from `<root>/.holon/registry.toml` when present:
//!
//! ```toml
//! document-name = "HOLON.md"
//! convention-dir = ".holon"
//! prefix-policy = "reject-ambiguous"   # or "first-match"
//! generated-by = "sophia-who"
//! default-lang = "rust"
//! ```
//!
//! Every key is optional.

use std::path::Path;

use holon_identity::{DEFAULT_GENERATOR, DEFAULT_LANG};
use serde::Deserialize;

use crate::error::{RegistryError, Result};

/// How an identifier query that is a prefix of several records resolves.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PrefixPolicy {
	/// The first match in walk order wins.
	FirstMatch,
	/// An exact match wins; otherwise several prefix matches are an error.
	#[default]
	RejectAmbiguous,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RegistryConfig {
	/// The only file name the indexer treats as a document.
	pub document_name: String,
	/// Hidden directory that is walked despite its leading dot.
	pub convention_dir: String,
	pub prefix_policy: PrefixPolicy,
	/// Stamped into `generated_by` on creation.
	pub generated_by: String,
	/// `lang` for records created without one.
	pub default_lang: String,
}

impl Default for RegistryConfig {
	fn default() -> Self {
		Self {
			document_name: "HOLON.md".to_string(),
			convention_dir: ".holon".to_string(),
			prefix_policy: PrefixPolicy::default(),
			generated_by: DEFAULT_GENERATOR.to_string(),
			default_lang: DEFAULT_LANG.to_string(),
		}
	}
}

impl RegistryConfig {
	/// Name of the config file inside the convention directory.
	pub const FILE_NAME: &'static str = "registry.toml";

	pub fn parse(input: &str) -> std::result::Result<Self, toml::de::Error> {
		toml::from_str(input)
	}

	/// Loads an explicit config file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(RegistryError::io(path))?;
		Self::parse(&content).map_err(|error| RegistryError::Config {
			path: path.to_path_buf(),
			error,
		})
	}

	/// Loads `<root>/<convention-dir>/registry.toml`, or defaults if it is absent.
	pub fn discover(root: impl AsRef<Path>) -> Result<Self> {
		let defaults = Self::default();
		let path = root.as_ref().join(&defaults.convention_dir).join(Self::FILE_NAME);
		if !path.is_file() {
			return Ok(defaults);
		}
		tracing::debug!(path = %path.display(), "registry.config.load");
		Self::load(path)
	}
}

#[cfg(test)]
mod tests {
	use std::fs;

	use super::*;

	#[test]
	fn empty_file_yields_defaults() {
		assert_eq!(RegistryConfig::parse("").unwrap(), RegistryConfig::default());
	}

	#[test]
	fn keys_are_kebab_case() {
		let config = RegistryConfig::parse("prefix-policy = \"first-match\"\ndocument-name = \"IDENTITY.md\"\n").unwrap();
		assert_eq!(config.prefix_policy, PrefixPolicy::FirstMatch);
		assert_eq!(config.document_name, "IDENTITY.md");
		assert_eq!(config.convention_dir, ".holon");
	}

	#[test]
	fn unknown_keys_are_rejected() {
		assert!(RegistryConfig::parse("prefix_policy = \"first-match\"\n").is_err());
		assert!(RegistryConfig::parse("prefix-policy = \"newest\"\n").is_err());
	}

	#[test]
	fn discover_reads_convention_dir() {
		let temp = tempfile::tempdir().expect("create tempdir");
		assert_eq!(RegistryConfig::discover(temp.path()).unwrap(), RegistryConfig::default());

		let dir = temp.path().join(".holon");
		fs::create_dir_all(&dir).unwrap();
		fs::write(dir.join(RegistryConfig::FILE_NAME), "default-lang = \"go\"\n").unwrap();
		assert_eq!(RegistryConfig::discover(temp.path()).unwrap().default_lang, "go");
	}

	#[test]
	fn load_reports_path_on_bad_toml() {
		let temp = tempfile::tempdir().expect("create tempdir");
		let path = temp.path().join("registry.toml");
		fs::write(&path, "generated-by = [").unwrap();
		match RegistryConfig::load(&path) {
			Err(RegistryError::Config { path: reported, .. }) => assert_eq!(reported, path),
			other => panic!("expected config error, got {other:?}"),
		}
	}
}
