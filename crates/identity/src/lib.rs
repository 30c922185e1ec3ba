//! Holon identity records.
//!
//! A holon's identity lives in a single `HOLON.md` file: a `---` delimited
//! structured block holding the record, followed by free prose. This crate
//! owns the pieces that must agree byte for byte with that format:
//!
//! - [`Identity`]: the record, with [`IdentityBuilder`] for creation and
//!   [`IdentityPatch`] for later field updates.
//! - [`Clade`], [`Status`], [`ReproductionMode`]: the symbolic enum axes.
//! - [`wire`]: the integer tag vocabulary those axes use at a network boundary.
//! - [`document`]: parsing, full rendering, and block-only rewriting.
//!
//! Walking directories and writing files is left to `holon-registry`.

pub mod document;
pub mod error;
mod record;
mod symbols;
pub mod wire;

pub use document::Document;
pub use error::{FormatError, ValidationError};
pub use record::{DEFAULT_GENERATOR, DEFAULT_LANG, Identity, IdentityBuilder, IdentityPatch, Unrecognized};
pub use symbols::{Clade, ReproductionMode, Status};
