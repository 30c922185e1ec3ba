//! End-to-end registry behavior against scratch directory trees.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::thread;

use holon_identity::{Clade, Document, Identity, IdentityBuilder, IdentityPatch, ReproductionMode, Status};
use holon_registry::{PrefixPolicy, Registry, RegistryConfig, RegistryError};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn swift() -> Identity {
	IdentityBuilder::new()
		.given_name("Swift")
		.family_name("Transcriber")
		.motto("x")
		.composer("y")
		.build()
		.expect("valid identity")
}

fn file_count(root: &Path) -> usize {
	fn walk(dir: &Path, count: &mut usize) {
		for entry in fs::read_dir(dir).expect("read dir").flatten() {
			let path = entry.path();
			if path.is_dir() {
				walk(&path, count);
			} else {
				*count += 1;
			}
		}
	}
	let mut count = 0;
	walk(root, &mut count);
	count
}

#[test]
fn created_record_is_written_with_defaults() {
	let temp = tempfile::tempdir().expect("create tempdir");
	let registry = Registry::new(temp.path());
	let identity = swift();

	let path = registry.create(&identity, None).unwrap();

	assert_eq!(path, temp.path().join(".holon/swift-transcriber/HOLON.md"));
	let text = fs::read_to_string(&path).unwrap();
	assert!(text.starts_with("---\n# Holon Identity v1\n"));
	assert!(text.contains("clade: \"deterministic/pure\"\n"));
	assert!(text.contains("status: null\n"));
	assert!(text.contains("\n# Swift Transcriber\n\n> *\"x\"*\n"));

	let found = registry.find_all().unwrap();
	assert_eq!(found, vec![identity.clone()]);
	assert_eq!(registry.find(identity.uuid()).unwrap(), path);
}

#[test]
fn pinning_a_version_rewrites_only_the_block() {
	let temp = tempfile::tempdir().expect("create tempdir");
	let registry = Registry::new(temp.path());
	let identity = IdentityBuilder::new()
		.given_name("Swift")
		.family_name("Transcriber")
		.motto("x")
		.composer("y")
		.parents(["a1", "b2"])
		.reproduction(ReproductionMode::Bred)
		.build()
		.unwrap();
	let path = registry.create(&identity, Some(Path::new("swift"))).unwrap();
	let body_before = registry.read(&path).unwrap().body;

	let found = registry.find(&identity.uuid()[..6]).unwrap();
	let patch = IdentityPatch {
		binary_version: Some("1.2.0".into()),
		..Default::default()
	};
	let updated = registry.update(&found, &patch).unwrap();

	assert_eq!(updated.binary_version.as_deref(), Some("1.2.0"));
	assert_eq!(updated.parents, vec!["a1".to_string(), "b2".to_string()]);

	let text = fs::read_to_string(&path).unwrap();
	assert!(text.contains("binary_version: \"1.2.0\"\n"));
	assert!(text.contains("binary_path: null\n"));
	assert!(text.contains("parents: [\"a1\", \"b2\"]\n"));
	assert!(text.contains("reproduction: \"bred\"\n"));
	assert_eq!(Document::parse(&text).unwrap().body, body_before);
}

#[test]
fn invalid_record_leaves_no_files() {
	let temp = tempfile::tempdir().expect("create tempdir");
	let registry = Registry::new(temp.path());
	let mut identity = swift();
	identity.motto = "  ".into();

	match registry.create(&identity, None) {
		Err(RegistryError::Validation(err)) => assert_eq!(err.to_string(), "missing required fields: motto"),
		other => panic!("expected validation error, got {other:?}"),
	}
	assert_eq!(file_count(temp.path()), 0);
	assert!(!temp.path().join(".holon").exists());
}

#[test]
fn second_create_into_same_directory_is_refused() {
	let temp = tempfile::tempdir().expect("create tempdir");
	let registry = Registry::new(temp.path());
	let first = swift();
	let path = registry.create(&first, None).unwrap();

	let second = swift();
	assert!(matches!(registry.create(&second, None), Err(RegistryError::AlreadyExists(p)) if p == path));
	assert_eq!(registry.read(&path).unwrap().identity.uuid(), first.uuid());
	assert_eq!(file_count(temp.path()), 1);
}

#[test]
fn reused_identifier_is_refused_anywhere_in_the_tree() {
	let temp = tempfile::tempdir().expect("create tempdir");
	let registry = Registry::new(temp.path());
	let first = swift();
	let path = registry.create(&first, None).unwrap();

	let copy = registry.read(&path).unwrap().identity;
	assert_eq!(copy.uuid(), first.uuid());
	match registry.create(&copy, Some(Path::new("copy"))) {
		Err(RegistryError::DuplicateIdentifier { uuid, path: existing }) => {
			assert_eq!(uuid, first.uuid());
			assert_eq!(existing, path);
		}
		other => panic!("expected duplicate identifier, got {other:?}"),
	}
	assert!(!temp.path().join("copy").exists());
	assert_eq!(file_count(temp.path()), 1);
	assert_eq!(registry.find(first.uuid()).unwrap(), path);
}

#[test]
fn blank_identifier_is_refused() {
	let temp = tempfile::tempdir().expect("create tempdir");
	let registry = Registry::new(temp.path());
	let mut identity = Document::parse("---\n---\n").unwrap().identity;
	identity.given_name = "Blank".into();
	identity.family_name = "Holon".into();
	identity.motto = "x".into();
	identity.composer = "y".into();

	match registry.create(&identity, None) {
		Err(RegistryError::Validation(err)) => assert_eq!(err.to_string(), "missing required fields: uuid"),
		other => panic!("expected validation error, got {other:?}"),
	}
	assert_eq!(file_count(temp.path()), 0);
}

#[test]
fn create_into_missing_root_succeeds() {
	let temp = tempfile::tempdir().expect("create tempdir");
	let root = temp.path().join("fresh");
	let registry = Registry::new(&root);

	let path = registry.create(&swift(), None).unwrap();
	assert!(path.starts_with(&root));
	assert_eq!(registry.find_all().unwrap().len(), 1);
}

#[test]
fn hand_edited_document_keeps_its_prose() {
	let temp = tempfile::tempdir().expect("create tempdir");
	let dir = temp.path().join("legacy");
	fs::create_dir_all(&dir).unwrap();
	let path = dir.join("HOLON.md");
	let body = "\n# Legacy\n\nNotes with --- inside\n---\ntrailing spaces   \n\n";
	fs::write(
		&path,
		format!("---\nuuid: \"legacy-0001\"\ngiven_name: Legacy\nfamily_name: Holon\nclade: probabilistic/adaptive\nstatus: draft\n---\n{body}"),
	)
	.unwrap();

	let registry = Registry::new(temp.path());
	let updated = registry
		.update_with(&registry.find("legacy").unwrap(), |identity| {
			identity.status = Some(Status::Deprecated);
		})
		.unwrap();

	assert_eq!(updated.clade, Clade::ProbabilisticAdaptive);
	let text = fs::read_to_string(&path).unwrap();
	assert!(text.contains("status: deprecated\n"));
	assert!(text.ends_with(body));
	assert_eq!(Document::parse(&text).unwrap().body, body);
}

#[test]
fn concurrent_updates_do_not_lose_writes() {
	let temp = tempfile::tempdir().expect("create tempdir");
	let registry = Arc::new(Registry::new(temp.path()));
	let path = registry.create(&swift(), None).unwrap();

	let workers: Vec<_> = (0..8)
		.map(|n| {
			let registry = Arc::clone(&registry);
			let path = path.clone();
			thread::spawn(move || {
				registry
					.update_with(&path, |identity| identity.dependencies.push(format!("dep-{n}")))
					.expect("update");
			})
		})
		.collect();
	for worker in workers {
		worker.join().expect("worker panicked");
	}

	let mut dependencies = registry.read(&path).unwrap().identity.dependencies;
	dependencies.sort();
	let expected: Vec<String> = (0..8).map(|n| format!("dep-{n}")).collect();
	assert_eq!(dependencies, expected);
	assert_eq!(file_count(temp.path()), 1);
}

#[rstest]
#[case::rejects(PrefixPolicy::RejectAmbiguous, None)]
#[case::first_wins(PrefixPolicy::FirstMatch, Some("a"))]
fn shared_prefix_follows_policy(#[case] policy: PrefixPolicy, #[case] expected_dir: Option<&str>) {
	let temp = tempfile::tempdir().expect("create tempdir");
	for (dir, uuid) in [("a", "feed-0001"), ("b", "feed-0002")] {
		let dir = temp.path().join(dir);
		fs::create_dir_all(&dir).unwrap();
		fs::write(dir.join("HOLON.md"), format!("---\nuuid: \"{uuid}\"\n---\n")).unwrap();
	}
	let registry = Registry::with_config(
		temp.path(),
		RegistryConfig {
			prefix_policy: policy,
			..Default::default()
		},
	);

	match (registry.find("feed"), expected_dir) {
		(Ok(path), Some(dir)) => assert_eq!(path, temp.path().join(dir).join("HOLON.md")),
		(Err(RegistryError::Ambiguous { candidates, .. }), None) => assert_eq!(candidates.len(), 2),
		(other, _) => panic!("unexpected resolution: {other:?}"),
	}
}

#[test]
fn open_reads_config_from_convention_dir() {
	let temp = tempfile::tempdir().expect("create tempdir");
	let convention = temp.path().join(".holon");
	fs::create_dir_all(&convention).unwrap();
	fs::write(convention.join(RegistryConfig::FILE_NAME), "document-name = \"IDENTITY.md\"\n").unwrap();

	let registry = Registry::open(temp.path()).unwrap();
	let path = registry.create(&swift(), None).unwrap();
	assert_eq!(path, temp.path().join(".holon/swift-transcriber/IDENTITY.md"));
	assert_eq!(registry.find_all().unwrap().len(), 1);
}
