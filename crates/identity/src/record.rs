//! The in-memory identity record.

use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::symbols::{Clade, ReproductionMode, Status};

/// Provenance stamped on records created without an explicit generator.
pub const DEFAULT_GENERATOR: &str = "sophia-who";

/// Implementation language assumed when a creator leaves it empty.
pub const DEFAULT_LANG: &str = "rust";

/// One holon's identity.
///
/// `uuid` and `born` are assigned once by [`IdentityBuilder::build`] (or
/// read back from a document) and have no setters.
///
/// An enum axis read from a document with a spelling outside its known set
/// holds the axis fallback, and the spelling is kept in [`Unrecognized`]. The
/// `*_symbol` accessors report what is actually stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
	pub(crate) uuid: String,
	pub given_name: String,
	pub family_name: String,
	pub motto: String,
	pub composer: String,
	pub clade: Clade,
	pub status: Option<Status>,
	pub(crate) born: String,

	/// UUIDs of the holons this one descends from. Not checked for existence.
	pub parents: Vec<String>,
	pub reproduction: ReproductionMode,

	pub binary_path: Option<String>,
	pub binary_version: Option<String>,
	pub git_tag: Option<String>,
	pub git_commit: Option<String>,
	pub os: Option<String>,
	pub arch: Option<String>,
	pub dependencies: Vec<String>,

	pub aliases: Vec<String>,
	/// License of the third-party binary this holon wraps, if any.
	pub wrapped_license: Option<String>,

	pub generated_by: String,
	pub lang: String,
	pub proto_status: Option<Status>,

	pub(crate) unrecognized: Unrecognized,
}

/// Enum spellings read from a document that no known symbol matches.
///
/// A kept spelling is written back unchanged for as long as its typed field
/// still holds the axis fallback (`deterministic/pure`, `manual`, or unset).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Unrecognized {
	pub clade: Option<String>,
	pub status: Option<String>,
	pub reproduction: Option<String>,
	pub proto_status: Option<String>,
}

impl Unrecognized {
	pub fn is_empty(&self) -> bool {
		*self == Self::default()
	}
}

impl Identity {
	pub fn uuid(&self) -> &str {
		&self.uuid
	}

	/// Creation timestamp as written in the document.
	pub fn born(&self) -> &str {
		&self.born
	}

	/// Spellings from the source document that no known symbol matched.
	pub fn unrecognized(&self) -> &Unrecognized {
		&self.unrecognized
	}

	/// Stored clade spelling.
	pub fn clade_symbol(&self) -> &str {
		match &self.unrecognized.clade {
			Some(spelling) if self.clade == Clade::default() => spelling,
			_ => self.clade.as_str(),
		}
	}

	/// Stored reproduction spelling.
	pub fn reproduction_symbol(&self) -> &str {
		match &self.unrecognized.reproduction {
			Some(spelling) if self.reproduction == ReproductionMode::default() => spelling,
			_ => self.reproduction.as_str(),
		}
	}

	/// Stored status spelling, `None` when unset.
	pub fn status_symbol(&self) -> Option<&str> {
		status_symbol(self.status, &self.unrecognized.status)
	}

	pub fn proto_status_symbol(&self) -> Option<&str> {
		status_symbol(self.proto_status, &self.unrecognized.proto_status)
	}

	/// Checks the fields a record needs before it is written as a new document.
	pub fn validate(&self) -> Result<(), ValidationError> {
		require(&[
			("uuid", &self.uuid),
			("given_name", &self.given_name),
			("family_name", &self.family_name),
			("motto", &self.motto),
			("composer", &self.composer),
		])
	}

	/// `"Given Family"`.
	pub fn display_name(&self) -> String {
		format!("{} {}", self.given_name, self.family_name)
	}

	/// Conventional directory name for this holon, e.g. `swift-transcriber`.
	///
	/// A trailing `?` on the family name is dropped and spaces become dashes.
	pub fn default_dir_name(&self) -> String {
		let family = self.family_name.strip_suffix('?').unwrap_or(&self.family_name);
		format!("{}-{}", self.given_name, family).to_lowercase().replace(' ', "-")
	}
}

/// Collects creation fields and produces a validated [`Identity`].
#[derive(Debug, Clone, Default)]
pub struct IdentityBuilder {
	given_name: String,
	family_name: String,
	motto: String,
	composer: String,
	clade: Clade,
	status: Option<Status>,
	parents: Vec<String>,
	reproduction: ReproductionMode,
	aliases: Vec<String>,
	wrapped_license: Option<String>,
	generated_by: Option<String>,
	lang: Option<String>,
}

impl IdentityBuilder {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn given_name(mut self, value: impl Into<String>) -> Self {
		self.given_name = value.into();
		self
	}

	pub fn family_name(mut self, value: impl Into<String>) -> Self {
		self.family_name = value.into();
		self
	}

	pub fn motto(mut self, value: impl Into<String>) -> Self {
		self.motto = value.into();
		self
	}

	pub fn composer(mut self, value: impl Into<String>) -> Self {
		self.composer = value.into();
		self
	}

	pub fn clade(mut self, clade: Clade) -> Self {
		self.clade = clade;
		self
	}

	pub fn status(mut self, status: Option<Status>) -> Self {
		self.status = status;
		self
	}

	pub fn parents(mut self, parents: impl IntoIterator<Item = impl Into<String>>) -> Self {
		self.parents = parents.into_iter().map(Into::into).collect();
		self
	}

	pub fn reproduction(mut self, mode: ReproductionMode) -> Self {
		self.reproduction = mode;
		self
	}

	/// Sets aliases, dropping blank entries.
	pub fn aliases(mut self, aliases: impl IntoIterator<Item = impl Into<String>>) -> Self {
		self.aliases = aliases
			.into_iter()
			.map(Into::into)
			.map(|alias: String| alias.trim().to_string())
			.filter(|alias| !alias.is_empty())
			.collect();
		self
	}

	/// Sets the wrapped binary license; a blank value clears it.
	pub fn wrapped_license(mut self, license: impl Into<String>) -> Self {
		let license = license.into();
		self.wrapped_license = non_blank(&license);
		self
	}

	pub fn generated_by(mut self, generator: impl Into<String>) -> Self {
		self.generated_by = non_blank(&generator.into());
		self
	}

	pub fn lang(mut self, lang: impl Into<String>) -> Self {
		self.lang = non_blank(&lang.into());
		self
	}

	/// Validates required fields and assigns the UUID and creation time.
	///
	/// Nothing is generated when validation fails.
	pub fn build(self) -> Result<Identity, ValidationError> {
		require(&[
			("given_name", &self.given_name),
			("family_name", &self.family_name),
			("motto", &self.motto),
			("composer", &self.composer),
		])?;

		Ok(Identity {
			uuid: Uuid::new_v4().to_string(),
			given_name: self.given_name.trim().to_string(),
			family_name: self.family_name.trim().to_string(),
			motto: self.motto.trim().to_string(),
			composer: self.composer.trim().to_string(),
			clade: self.clade,
			status: self.status,
			born: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
			parents: self.parents,
			reproduction: self.reproduction,
			binary_path: None,
			binary_version: None,
			git_tag: None,
			git_commit: None,
			os: None,
			arch: None,
			dependencies: Vec::new(),
			aliases: self.aliases,
			wrapped_license: self.wrapped_license,
			generated_by: self.generated_by.unwrap_or_else(|| DEFAULT_GENERATOR.to_string()),
			lang: self.lang.unwrap_or_else(|| DEFAULT_LANG.to_string()),
			proto_status: None,
			unrecognized: Unrecognized::default(),
		})
	}
}

/// Field mutations applied by an update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityPatch {
	pub binary_path: Option<String>,
	pub binary_version: Option<String>,
	pub git_tag: Option<String>,
	pub git_commit: Option<String>,
	pub os: Option<String>,
	pub arch: Option<String>,
	pub status: Option<Status>,
	pub proto_status: Option<Status>,
}

impl IdentityPatch {
	pub fn is_empty(&self) -> bool {
		*self == Self::default()
	}

	pub fn apply(&self, identity: &mut Identity) {
		let pins = [
			(&self.binary_path, &mut identity.binary_path),
			(&self.binary_version, &mut identity.binary_version),
			(&self.git_tag, &mut identity.git_tag),
			(&self.git_commit, &mut identity.git_commit),
			(&self.os, &mut identity.os),
			(&self.arch, &mut identity.arch),
		];
		for (patch, field) in pins {
			if let Some(value) = patch {
				*field = Some(value.clone());
			}
		}
		if self.status.is_some() {
			identity.status = self.status;
			identity.unrecognized.status = None;
		}
		if self.proto_status.is_some() {
			identity.proto_status = self.proto_status;
			identity.unrecognized.proto_status = None;
		}
	}
}

fn status_symbol(status: Option<Status>, unrecognized: &Option<String>) -> Option<&str> {
	match status {
		Some(status) => Some(status.as_str()),
		None => unrecognized.as_deref(),
	}
}

fn require(fields: &[(&'static str, &String)]) -> Result<(), ValidationError> {
	let missing: Vec<&'static str> = fields
		.iter()
		.filter(|(_, value)| value.trim().is_empty())
		.map(|(name, _)| *name)
		.collect();
	if missing.is_empty() {
		Ok(())
	} else {
		Err(ValidationError::MissingFields(missing))
	}
}

fn non_blank(value: &str) -> Option<String> {
	let trimmed = value.trim();
	(!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests;
