use super::DELIMITER;
use crate::record::Identity;
use crate::symbols::Status;

const HEADER: &str = "# Holon Identity v1";

/// Full document for a new record: block plus the default body template.
pub fn render_new(identity: &Identity) -> String {
	render(identity, &body_template(identity))
}

/// Block-only rewrite: a fresh block followed by `body` byte for byte.
pub fn render(identity: &Identity, body: &str) -> String {
	let mut out = render_block(identity);
	out.push_str(body);
	out
}

/// Renders the delimited structured block, closing line included.
///
/// The layout is positional: every field is always written, in the same
/// order, so absent values show up as `null` or `[]` rather than vanishing.
pub fn render_block(identity: &Identity) -> String {
	let mut block = Block::default();

	block.line(DELIMITER);
	block.line(HEADER);
	block.string("uuid", &identity.uuid);
	block.string("given_name", &identity.given_name);
	block.string("family_name", &identity.family_name);
	block.string("motto", &identity.motto);
	block.string("composer", &identity.composer);
	block.string("clade", identity.clade_symbol());
	block.status("status", identity.status, identity.unrecognized.status.as_deref());
	block.string("born", &identity.born);

	block.section("# Lineage");
	block.list("parents", &identity.parents);
	block.string("reproduction", identity.reproduction_symbol());

	block.section("# Pinning");
	block.optional("binary_path", identity.binary_path.as_deref());
	block.optional("binary_version", identity.binary_version.as_deref());
	block.optional("git_tag", identity.git_tag.as_deref());
	block.optional("git_commit", identity.git_commit.as_deref());
	block.optional("os", identity.os.as_deref());
	block.optional("arch", identity.arch.as_deref());
	block.list("dependencies", &identity.dependencies);

	block.section("# Optional");
	block.list("aliases", &identity.aliases);
	block.optional("wrapped_license", identity.wrapped_license.as_deref());

	block.section("# Metadata");
	block.string("generated_by", &identity.generated_by);
	block.string("lang", &identity.lang);
	block.status("proto_status", identity.proto_status, identity.unrecognized.proto_status.as_deref());
	block.line(DELIMITER);

	block.0
}

/// Default prose for a newly created holon.
pub fn body_template(identity: &Identity) -> String {
	format!(
		"\n# {given} {family}\n\n> *\"{motto}\"*\n\n## Description\n\n<Describe what this holon does.>\n\n## Introspection Notes\n\n<Any assumptions or ambiguities noted during creation.>\n",
		given = identity.given_name,
		family = identity.family_name,
		motto = identity.motto,
	)
}

#[derive(Default)]
struct Block(String);

impl Block {
	fn line(&mut self, line: &str) {
		self.0.push_str(line);
		self.0.push('\n');
	}

	fn section(&mut self, comment: &str) {
		self.0.push('\n');
		self.line(comment);
	}

	fn bare(&mut self, key: &str, value: &str) {
		self.line(&format!("{key}: {value}"));
	}

	fn string(&mut self, key: &str, value: &str) {
		self.bare(key, &quote(value));
	}

	fn optional(&mut self, key: &str, value: Option<&str>) {
		match value.filter(|v| !v.is_empty()) {
			Some(value) => self.string(key, value),
			None => self.bare(key, "null"),
		}
	}

	/// Known statuses are bare symbols; a kept foreign spelling is quoted.
	fn status(&mut self, key: &str, status: Option<Status>, unrecognized: Option<&str>) {
		match (status, unrecognized) {
			(None, Some(spelling)) => self.string(key, spelling),
			_ => self.bare(key, Status::symbol_or_null(status)),
		}
	}

	fn list(&mut self, key: &str, items: &[String]) {
		let items: Vec<String> = items.iter().map(|item| quote(item)).collect();
		self.bare(key, &format!("[{}]", items.join(", ")));
	}
}

/// YAML double-quoted scalar.
fn quote(value: &str) -> String {
	let mut out = String::with_capacity(value.len() + 2);
	out.push('"');
	for c in value.chars() {
		match c {
			'"' => out.push_str("\\\""),
			'\\' => out.push_str("\\\\"),
			'\n' => out.push_str("\\n"),
			'\r' => out.push_str("\\r"),
			'\t' => out.push_str("\\t"),
			c if c.is_control() || matches!(c, '\u{2028}' | '\u{2029}' | '\u{feff}' | '\u{fffe}' | '\u{ffff}') => {
				out.push_str(&format!("\\u{:04x}", c as u32));
			}
			c => out.push(c),
		}
	}
	out.push('"');
	out
}
