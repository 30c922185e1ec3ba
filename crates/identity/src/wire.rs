//! Wire vocabulary for the enum axes.
//!
//! At a network boundary every axis is an integer tag with `0` reserved for
//! "unspecified". Translation is driven by one static table per axis and is
//! total in both directions:
//!
//! * symbol to tag: unknown spellings map to the unspecified tag.
//! * tag to symbol: unknown or unspecified tags map to the axis default
//!   (`deterministic/pure`, `manual`, or an unset status).
//!
//! A symbol without a table row degrades to the unspecified tag. The tests
//! below walk every symbol so a missing row fails loudly there instead.

use serde::{Deserialize, Serialize};

use crate::symbols::{Clade, ReproductionMode, Status};

macro_rules! wire_enum {
	(
		$(#[$meta:meta])*
		$name:ident { $($variant:ident = $tag:literal),+ $(,)? }
	) => {
		$(#[$meta])*
		#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(into = "i32", from = "i32")]
		#[repr(i32)]
		pub enum $name {
			#[default]
			Unspecified = 0,
			$($variant = $tag),+
		}

		impl $name {
			/// Every tag, unspecified first.
			pub const ALL: &'static [Self] = &[Self::Unspecified, $(Self::$variant),+];

			/// Integer tag.
			pub const fn tag(self) -> i32 {
				self as i32
			}

			/// Decodes an integer tag; unknown tags are unspecified.
			pub fn from_tag(tag: i32) -> Self {
				match tag {
					$($tag => Self::$variant,)+
					_ => Self::Unspecified,
				}
			}
		}

		impl From<i32> for $name {
			fn from(tag: i32) -> Self {
				Self::from_tag(tag)
			}
		}

		impl From<$name> for i32 {
			fn from(value: $name) -> Self {
				value.tag()
			}
		}
	};
}

wire_enum! {
	/// Wire form of [`Clade`].
	WireClade {
		DeterministicPure = 1,
		DeterministicStateful = 2,
		DeterministicIoBound = 3,
		ProbabilisticGenerative = 4,
		ProbabilisticPerceptual = 5,
		ProbabilisticAdaptive = 6,
	}
}

wire_enum! {
	/// Wire form of [`Status`], used by both `status` and `proto_status`.
	WireStatus {
		Draft = 1,
		Stable = 2,
		Deprecated = 3,
		Dead = 4,
	}
}

wire_enum! {
	/// Wire form of [`ReproductionMode`].
	WireReproduction {
		Manual = 1,
		Assisted = 2,
		Automatic = 3,
		Autopoietic = 4,
		Bred = 5,
	}
}

static CLADES: &[(Clade, WireClade)] = &[
	(Clade::DeterministicPure, WireClade::DeterministicPure),
	(Clade::DeterministicStateful, WireClade::DeterministicStateful),
	(Clade::DeterministicIoBound, WireClade::DeterministicIoBound),
	(Clade::ProbabilisticGenerative, WireClade::ProbabilisticGenerative),
	(Clade::ProbabilisticPerceptual, WireClade::ProbabilisticPerceptual),
	(Clade::ProbabilisticAdaptive, WireClade::ProbabilisticAdaptive),
];

static STATUSES: &[(Status, WireStatus)] = &[
	(Status::Draft, WireStatus::Draft),
	(Status::Stable, WireStatus::Stable),
	(Status::Deprecated, WireStatus::Deprecated),
	(Status::Dead, WireStatus::Dead),
];

static REPRODUCTION_MODES: &[(ReproductionMode, WireReproduction)] = &[
	(ReproductionMode::Manual, WireReproduction::Manual),
	(ReproductionMode::Assisted, WireReproduction::Assisted),
	(ReproductionMode::Automatic, WireReproduction::Automatic),
	(ReproductionMode::Autopoietic, WireReproduction::Autopoietic),
	(ReproductionMode::Bred, WireReproduction::Bred),
];

fn forward<S: Copy + PartialEq, W: Copy + Default>(table: &[(S, W)], symbol: S) -> W {
	table.iter().find(|(s, _)| *s == symbol).map(|(_, w)| *w).unwrap_or_default()
}

fn reverse<S: Copy, W: Copy + PartialEq>(table: &[(S, W)], tag: W) -> Option<S> {
	table.iter().find(|(_, w)| *w == tag).map(|(s, _)| *s)
}

impl From<Clade> for WireClade {
	fn from(clade: Clade) -> Self {
		forward(CLADES, clade)
	}
}

impl From<WireClade> for Clade {
	fn from(tag: WireClade) -> Self {
		reverse(CLADES, tag).unwrap_or_default()
	}
}

impl From<ReproductionMode> for WireReproduction {
	fn from(mode: ReproductionMode) -> Self {
		forward(REPRODUCTION_MODES, mode)
	}
}

impl From<WireReproduction> for ReproductionMode {
	fn from(tag: WireReproduction) -> Self {
		reverse(REPRODUCTION_MODES, tag).unwrap_or_default()
	}
}

impl From<Option<Status>> for WireStatus {
	fn from(status: Option<Status>) -> Self {
		status.map(|s| forward(STATUSES, s)).unwrap_or_default()
	}
}

impl From<WireStatus> for Option<Status> {
	fn from(tag: WireStatus) -> Self {
		reverse(STATUSES, tag)
	}
}

/// Translates an on-disk clade spelling; unknown spellings are unspecified.
pub fn clade_to_wire(symbol: &str) -> WireClade {
	symbol.parse::<Clade>().map(WireClade::from).unwrap_or_default()
}

/// Translates a clade tag; unspecified falls back to `deterministic/pure`.
pub fn clade_from_wire(tag: WireClade) -> Clade {
	tag.into()
}

/// Translates an on-disk status spelling; unknown spellings are unspecified.
pub fn status_to_wire(symbol: &str) -> WireStatus {
	symbol.parse::<Status>().ok().into()
}

/// Translates a status tag; unspecified is an unset status.
pub fn status_from_wire(tag: WireStatus) -> Option<Status> {
	tag.into()
}

/// Translates an on-disk reproduction spelling; unknown spellings are unspecified.
pub fn reproduction_to_wire(symbol: &str) -> WireReproduction {
	symbol.parse::<ReproductionMode>().map(WireReproduction::from).unwrap_or_default()
}

/// Translates a reproduction tag; unspecified falls back to `manual`.
pub fn reproduction_from_wire(tag: WireReproduction) -> ReproductionMode {
	tag.into()
}
