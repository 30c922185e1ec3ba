//! Symbolic enum axes as they appear on disk.
//!
//! Each axis is a closed set. The on-disk spelling is the strum serialization,
//! so `Display` and `FromStr` are the document codec's view of the value.
//! The wire view lives in [`crate::wire`].

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Computational nature of a holon.
#[derive(Debug, Default, Display, EnumString, EnumIter, IntoStaticStr, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Clade {
	#[default]
	#[strum(serialize = "deterministic/pure")]
	DeterministicPure,
	#[strum(serialize = "deterministic/stateful")]
	DeterministicStateful,
	#[strum(serialize = "deterministic/io_bound")]
	DeterministicIoBound,
	#[strum(serialize = "probabilistic/generative")]
	ProbabilisticGenerative,
	#[strum(serialize = "probabilistic/perceptual")]
	ProbabilisticPerceptual,
	#[strum(serialize = "probabilistic/adaptive")]
	ProbabilisticAdaptive,
}

/// Lifecycle status, shared by the `status` and `proto_status` axes.
///
/// Records carry `Option<Status>`; `None` is the unspecified value and
/// renders as `null`.
#[derive(Debug, Display, EnumString, EnumIter, IntoStaticStr, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum Status {
	Draft,
	Stable,
	Deprecated,
	Dead,
}

/// How new holons descend from this one.
#[derive(Debug, Default, Display, EnumString, EnumIter, IntoStaticStr, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum ReproductionMode {
	#[default]
	Manual,
	Assisted,
	Automatic,
	Autopoietic,
	Bred,
}

impl Clade {
	/// On-disk spelling.
	pub fn as_str(self) -> &'static str {
		self.into()
	}
}

impl Status {
	/// On-disk spelling.
	pub fn as_str(self) -> &'static str {
		self.into()
	}

	/// On-disk spelling of an optional status, `null` when unspecified.
	pub fn symbol_or_null(status: Option<Self>) -> &'static str {
		status.map_or("null", Self::as_str)
	}
}

impl ReproductionMode {
	/// On-disk spelling.
	pub fn as_str(self) -> &'static str {
		self.into()
	}
}
