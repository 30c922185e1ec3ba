//! Request handlers for exposing a registry over a network boundary.
//!
//! No transport lives here. Each handler takes a plain serde request and
//! returns a serde response, with enum axes carried as integer tags from
//! [`holon_identity::wire`]. Empty strings in requests mean "unset" for
//! creation and "unchanged" for pinning, matching what a zero-valued wire
//! message carries.

use std::path::{Path, PathBuf};

use holon_identity::wire::{self, WireClade, WireReproduction, WireStatus};
use holon_identity::{Identity, IdentityBuilder, IdentityPatch};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::index;
use crate::registry::Registry;

/// An identity record with its enum axes in wire form.
///
/// Absent optional strings are empty. A stored spelling outside the known
/// vocabulary is sent as the unspecified tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireIdentity {
	pub uuid: String,
	pub given_name: String,
	pub family_name: String,
	pub motto: String,
	pub composer: String,
	pub clade: WireClade,
	pub status: WireStatus,
	pub born: String,
	pub parents: Vec<String>,
	pub reproduction: WireReproduction,
	pub binary_path: String,
	pub binary_version: String,
	pub git_tag: String,
	pub git_commit: String,
	pub os: String,
	pub arch: String,
	pub dependencies: Vec<String>,
	pub aliases: Vec<String>,
	pub wrapped_license: String,
	pub generated_by: String,
	pub lang: String,
	pub proto_status: WireStatus,
}

impl From<&Identity> for WireIdentity {
	fn from(identity: &Identity) -> Self {
		let text = |value: &Option<String>| value.clone().unwrap_or_default();
		Self {
			uuid: identity.uuid().to_string(),
			given_name: identity.given_name.clone(),
			family_name: identity.family_name.clone(),
			motto: identity.motto.clone(),
			composer: identity.composer.clone(),
			clade: wire::clade_to_wire(identity.clade_symbol()),
			status: identity.status_symbol().map_or(WireStatus::Unspecified, wire::status_to_wire),
			born: identity.born().to_string(),
			parents: identity.parents.clone(),
			reproduction: wire::reproduction_to_wire(identity.reproduction_symbol()),
			binary_path: text(&identity.binary_path),
			binary_version: text(&identity.binary_version),
			git_tag: text(&identity.git_tag),
			git_commit: text(&identity.git_commit),
			os: text(&identity.os),
			arch: text(&identity.arch),
			dependencies: identity.dependencies.clone(),
			aliases: identity.aliases.clone(),
			wrapped_license: text(&identity.wrapped_license),
			generated_by: identity.generated_by.clone(),
			lang: identity.lang.clone(),
			proto_status: identity.proto_status_symbol().map_or(WireStatus::Unspecified, wire::status_to_wire),
		}
	}
}

/// Creates a new holon.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateIdentityRequest {
	/// Required.
	pub given_name: String,
	/// Required.
	pub family_name: String,
	/// Required.
	pub motto: String,
	/// Required.
	pub composer: String,
	/// Unspecified means `deterministic/pure`.
	pub clade: WireClade,
	/// Unspecified means `manual`.
	pub reproduction: WireReproduction,
	/// Empty means the registry's default language.
	pub lang: String,
	pub aliases: Vec<String>,
	pub wrapped_license: String,
	/// Directory to write into, relative to the registry root. Empty means
	/// `<convention-dir>/<given-family>`.
	pub output_dir: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateIdentityResponse {
	/// The record as written.
	pub identity: WireIdentity,
	/// Where it was written.
	pub file_path: PathBuf,
}

/// Looks up one holon by identifier or identifier prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowIdentityRequest {
	pub uuid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowIdentityResponse {
	pub identity: WireIdentity,
	pub file_path: PathBuf,
	/// The document exactly as stored.
	pub raw_content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListIdentitiesRequest {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListIdentitiesResponse {
	/// Every well-formed record, in walk order.
	pub identities: Vec<WireIdentity>,
}

/// Pins a holon to a concrete build. Empty fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinVersionRequest {
	/// Identifier or identifier prefix.
	pub uuid: String,
	pub binary_path: String,
	pub binary_version: String,
	pub git_tag: String,
	pub git_commit: String,
	pub os: String,
	pub arch: String,
}

impl PinVersionRequest {
	fn patch(&self) -> IdentityPatch {
		let set = |value: &str| (!value.is_empty()).then(|| value.to_string());
		IdentityPatch {
			binary_path: set(&self.binary_path),
			binary_version: set(&self.binary_version),
			git_tag: set(&self.git_tag),
			git_commit: set(&self.git_commit),
			os: set(&self.os),
			arch: set(&self.arch),
			..Default::default()
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinVersionResponse {
	pub identity: WireIdentity,
}

/// Request handlers over one [`Registry`].
#[derive(Debug)]
pub struct IdentityService {
	registry: Registry,
}

impl IdentityService {
	pub fn new(registry: Registry) -> Self {
		Self { registry }
	}

	pub fn registry(&self) -> &Registry {
		&self.registry
	}

	pub fn create_identity(&self, request: CreateIdentityRequest) -> Result<CreateIdentityResponse> {
		let config = self.registry.config();
		let lang = if request.lang.is_empty() {
			config.default_lang.clone()
		} else {
			request.lang
		};

		let identity = IdentityBuilder::new()
			.given_name(request.given_name)
			.family_name(request.family_name)
			.motto(request.motto)
			.composer(request.composer)
			.clade(request.clade.into())
			.reproduction(request.reproduction.into())
			.lang(lang)
			.aliases(request.aliases)
			.wrapped_license(request.wrapped_license)
			.generated_by(config.generated_by.clone())
			.build()?;

		let output_dir = (!request.output_dir.is_empty()).then(|| Path::new(&request.output_dir));
		let file_path = self.registry.create(&identity, output_dir)?;
		Ok(CreateIdentityResponse {
			identity: WireIdentity::from(&identity),
			file_path,
		})
	}

	pub fn show_identity(&self, request: &ShowIdentityRequest) -> Result<ShowIdentityResponse> {
		let file_path = self.registry.find(&request.uuid)?;
		let (raw_content, document) = index::read_raw(&file_path)?;
		Ok(ShowIdentityResponse {
			identity: WireIdentity::from(&document.identity),
			file_path,
			raw_content,
		})
	}

	pub fn list_identities(&self, _request: &ListIdentitiesRequest) -> Result<ListIdentitiesResponse> {
		let identities = self.registry.find_all()?;
		Ok(ListIdentitiesResponse {
			identities: identities.iter().map(WireIdentity::from).collect(),
		})
	}

	/// Applies the non-empty pinning fields. A request with none set reads the
	/// record without rewriting it.
	pub fn pin_version(&self, request: &PinVersionRequest) -> Result<PinVersionResponse> {
		let path = self.registry.find(&request.uuid)?;
		let patch = request.patch();
		let identity = if patch.is_empty() {
			self.registry.read(&path)?.identity
		} else {
			self.registry.update(&path, &patch)?
		};
		Ok(PinVersionResponse {
			identity: WireIdentity::from(&identity),
		})
	}
}
