use pretty_assertions::assert_eq;

use super::*;

fn swift() -> IdentityBuilder {
	IdentityBuilder::new()
		.given_name("Swift")
		.family_name("Transcriber")
		.motto("x")
		.composer("y")
}

#[test]
fn build_assigns_uuid_and_birth() {
	let identity = swift().build().expect("valid identity");
	assert!(uuid::Uuid::parse_str(identity.uuid()).is_ok());
	assert!(chrono::DateTime::parse_from_rfc3339(identity.born()).is_ok());
	assert_eq!(identity.clade, Clade::DeterministicPure);
	assert_eq!(identity.reproduction, ReproductionMode::Manual);
	assert_eq!(identity.status, None);
	assert_eq!(identity.generated_by, DEFAULT_GENERATOR);
	assert_eq!(identity.lang, DEFAULT_LANG);
}

#[test]
fn build_reports_every_missing_field() {
	let err = IdentityBuilder::new().given_name("Swift").motto("   ").build().unwrap_err();
	assert_eq!(err, ValidationError::MissingFields(vec!["family_name", "motto", "composer"]));
	assert_eq!(err.to_string(), "missing required fields: family_name, motto, composer");
}

#[test]
fn uuids_are_unique_per_build() {
	let a = swift().build().unwrap();
	let b = swift().build().unwrap();
	assert_ne!(a.uuid(), b.uuid());
}

#[test]
fn blank_optionals_are_dropped() {
	let identity = swift()
		.aliases(["  who ", "", "sophia"])
		.wrapped_license("  ")
		.lang("")
		.build()
		.unwrap();
	assert_eq!(identity.aliases, vec!["who".to_string(), "sophia".to_string()]);
	assert_eq!(identity.wrapped_license, None);
	assert_eq!(identity.lang, DEFAULT_LANG);
}

#[test]
fn default_dir_name_follows_convention() {
	let identity = IdentityBuilder::new()
		.given_name("Sophia")
		.family_name("Who?")
		.motto("Know thyself.")
		.composer("b")
		.build()
		.unwrap();
	assert_eq!(identity.default_dir_name(), "sophia-who");
	assert_eq!(identity.display_name(), "Sophia Who?");

	let spaced = swift().given_name("Deep Blue").build().unwrap();
	assert_eq!(spaced.default_dir_name(), "deep-blue-transcriber");
}

#[test]
fn patch_only_touches_set_fields() {
	let mut identity = swift().parents(["p-1"]).build().unwrap();
	identity.binary_path = Some("/usr/bin/swift".into());
	let before = identity.clone();

	let patch = IdentityPatch {
		binary_version: Some("1.2.0".into()),
		status: Some(Status::Stable),
		..Default::default()
	};
	patch.apply(&mut identity);

	assert_eq!(identity.binary_version.as_deref(), Some("1.2.0"));
	assert_eq!(identity.binary_path, before.binary_path);
	assert_eq!(identity.status, Some(Status::Stable));
	assert_eq!(identity.parents, before.parents);
	assert_eq!(identity.uuid(), before.uuid());
	assert!(!patch.is_empty());
	assert!(IdentityPatch::default().is_empty());
}

#[test]
fn validate_rechecks_parsed_records() {
	let mut identity = swift().build().unwrap();
	assert_eq!(identity.validate(), Ok(()));
	identity.composer.clear();
	assert_eq!(identity.validate(), Err(ValidationError::MissingFields(vec!["composer"])));
	identity.uuid.clear();
	assert_eq!(identity.validate(), Err(ValidationError::MissingFields(vec!["uuid", "composer"])));
}
