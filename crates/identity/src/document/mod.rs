//! The `HOLON.md` document codec.
//!
//! A document is a `---` delimited structured block followed by free prose:
//!
//! ```text
//! ---
//! # Holon Identity v1
//! uuid: "0b6f…"
//! given_name: "Swift"
//! …
//! proto_status: null
//! ---
//!
//! # Swift Transcriber
//! ```
//!
//! The block is decoded with `serde_yaml`, so documents written by other
//! YAML emitters still parse. Rendering always uses the fixed layout from
//! [`render_block`]: every field in a fixed order, absent scalars as `null`,
//! absent lists as `[]`.
//!
//! The body is everything after the closing delimiter line and is carried
//! through rewrites untouched.
//!
//! Enum spellings outside the known sets are not errors: the field takes the
//! axis fallback and the spelling is kept on the record, so a document from
//! a newer vocabulary still lists, resolves, and rewrites unchanged.

mod render;

use serde::Deserialize;

pub use self::render::{body_template, render, render_block, render_new};
use crate::error::FormatError;
use crate::record::{Identity, Unrecognized};
use crate::symbols::{Clade, ReproductionMode, Status};

/// Opening and closing line of the structured block.
pub const DELIMITER: &str = "---";

/// A decoded document: the record and the prose that follows its block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
	pub identity: Identity,
	pub body: String,
}

impl Document {
	/// Wraps a freshly created identity in the default body template.
	pub fn new(identity: Identity) -> Self {
		let body = body_template(&identity);
		Self { identity, body }
	}

	/// Decodes a stored document.
	pub fn parse(text: &str) -> Result<Self, FormatError> {
		parse(text)
	}

	/// Re-encodes the block from the current record and appends the body.
	pub fn render(&self) -> String {
		render(&self.identity, &self.body)
	}
}

/// Splits `text` into its block and body, then decodes the block.
pub fn parse(text: &str) -> Result<Document, FormatError> {
	let (block, body) = split(text)?;
	let identity = decode_block(block)?;
	Ok(Document {
		identity,
		body: body.to_string(),
	})
}

/// Both delimiter lines must be exactly `---`; `----` or `---x` are content.
fn split(text: &str) -> Result<(&str, &str), FormatError> {
	let rest = text.strip_prefix(DELIMITER).and_then(line_end).ok_or(FormatError::MissingBlock)?;
	let (block_len, body) = closing_line(rest).ok_or(FormatError::UnclosedBlock)?;
	Ok((&rest[..block_len], body))
}

/// Consumes one line terminator, or accepts the end of the text.
fn line_end(text: &str) -> Option<&str> {
	if text.is_empty() {
		return Some(text);
	}
	text.strip_prefix("\r\n").or_else(|| text.strip_prefix('\n'))
}

/// Offset of the first line that is exactly the delimiter, and the text after it.
fn closing_line(rest: &str) -> Option<(usize, &str)> {
	let mut start = 0;
	loop {
		let line = &rest[start..];
		if let Some(body) = line.strip_prefix(DELIMITER).and_then(line_end) {
			return Some((start, body));
		}
		start += line.find('\n')? + 1;
	}
}

/// Block fields as they come out of YAML, before symbol lookup.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawIdentity {
	uuid: Option<String>,
	given_name: Option<String>,
	family_name: Option<String>,
	motto: Option<String>,
	composer: Option<String>,
	clade: Option<String>,
	status: Option<String>,
	born: Option<String>,
	parents: Option<Vec<String>>,
	reproduction: Option<String>,
	binary_path: Option<String>,
	binary_version: Option<String>,
	git_tag: Option<String>,
	git_commit: Option<String>,
	os: Option<String>,
	arch: Option<String>,
	dependencies: Option<Vec<String>>,
	aliases: Option<Vec<String>>,
	wrapped_license: Option<String>,
	generated_by: Option<String>,
	lang: Option<String>,
	proto_status: Option<String>,
}

fn decode_block(block: &str) -> Result<Identity, FormatError> {
	let raw: RawIdentity = if is_blank_block(block) {
		RawIdentity::default()
	} else {
		serde_yaml::from_str(block)?
	};

	let mut unrecognized = Unrecognized::default();
	let clade = symbol::<Clade>("clade", raw.clade, &mut unrecognized.clade).unwrap_or_default();
	let status = symbol::<Status>("status", raw.status, &mut unrecognized.status);
	let reproduction = symbol::<ReproductionMode>("reproduction", raw.reproduction, &mut unrecognized.reproduction).unwrap_or_default();
	let proto_status = symbol::<Status>("proto_status", raw.proto_status, &mut unrecognized.proto_status);

	Ok(Identity {
		uuid: raw.uuid.unwrap_or_default(),
		given_name: raw.given_name.unwrap_or_default(),
		family_name: raw.family_name.unwrap_or_default(),
		motto: raw.motto.unwrap_or_default(),
		composer: raw.composer.unwrap_or_default(),
		clade,
		status,
		born: raw.born.unwrap_or_default(),
		parents: raw.parents.unwrap_or_default(),
		reproduction,
		binary_path: present(raw.binary_path),
		binary_version: present(raw.binary_version),
		git_tag: present(raw.git_tag),
		git_commit: present(raw.git_commit),
		os: present(raw.os),
		arch: present(raw.arch),
		dependencies: raw.dependencies.unwrap_or_default(),
		aliases: raw.aliases.unwrap_or_default(),
		wrapped_license: present(raw.wrapped_license),
		generated_by: raw.generated_by.unwrap_or_default(),
		lang: raw.lang.unwrap_or_default(),
		proto_status,
		unrecognized,
	})
}

/// A block holding only comments and whitespace decodes to all defaults.
fn is_blank_block(block: &str) -> bool {
	block.lines().map(str::trim).all(|line| line.is_empty() || line.starts_with('#'))
}

/// Empty strings count as absent.
fn present(value: Option<String>) -> Option<String> {
	value.filter(|v| !v.is_empty())
}

/// Looks up an enum spelling. An unknown one is parked in `unrecognized`.
fn symbol<T: std::str::FromStr>(field: &'static str, value: Option<String>, unrecognized: &mut Option<String>) -> Option<T> {
	let value = present(value)?;
	match value.parse::<T>() {
		Ok(symbol) => Some(symbol),
		Err(_) => {
			tracing::warn!(field, value = %value, "identity.symbol.unrecognized");
			*unrecognized = Some(value);
			None
		}
	}
}
