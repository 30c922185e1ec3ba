//! Directory-tree registry of holon identity documents.
//!
//! A registry is any directory tree containing `HOLON.md` files. There is no
//! index on disk: every lookup walks the tree, skipping hidden directories
//! other than `.holon` and ignoring documents that fail to parse.
//!
//! # Entry points
//!
//! - [`Registry`]: a root plus [`RegistryConfig`]; creates, finds, reads, and
//!   updates documents, serializing writers per path.
//! - [`find_all`], [`find_by_uuid`], [`read_document`]: stateless lookups for
//!   callers that do not write.
//! - [`service`]: serde request and response types with handlers, for
//!   putting the registry behind a transport.
//!
//! Document encoding lives in `holon-identity`.

mod config;
mod error;
mod index;
mod registry;
pub mod service;
mod store;

pub use config::{PrefixPolicy, RegistryConfig};
pub use error::{RegistryError, Result};
pub use index::{Located, find_all, find_by_uuid, read_document, scan};
pub use registry::Registry;
pub use service::IdentityService;
