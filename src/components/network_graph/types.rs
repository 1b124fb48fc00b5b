//! Snapshot data model for the team relationship network.
//!
//! A [`NetworkData`] value is an immutable snapshot handed in by the data
//! layer; a new snapshot (new signal value) reseeds the layout.

/// Fixed set of relationship kinds between two team members.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelationshipKind {
	Influences,
	AlignedWith,
	TensionWith,
	DefersTo,
	CompetesWith,
	Mentors,
	Supports,
}

impl RelationshipKind {
	/// Stroke color for edges of this kind.
	pub fn color(self) -> &'static str {
		match self {
			Self::Influences => "#4f9dff",
			Self::AlignedWith => "#3ecf8e",
			Self::TensionWith => "#ff6b6b",
			Self::DefersTo => "#c792ea",
			Self::CompetesWith => "#ffb347",
			Self::Mentors => "#5eead4",
			Self::Supports => "#8aa2ff",
		}
	}

	/// Dash pattern (`[on, off]` in px), empty for solid strokes.
	pub fn dash(self) -> &'static [f64] {
		match self {
			Self::TensionWith | Self::CompetesWith => &[6.0, 4.0],
			Self::DefersTo => &[2.0, 3.0],
			_ => &[],
		}
	}

	/// Whether edges of this kind carry an arrowhead at the target end.
	pub fn directional(self) -> bool {
		matches!(self, Self::Influences | Self::DefersTo | Self::Mentors)
	}

	/// Short text drawn at the edge midpoint.
	pub fn label(self) -> &'static str {
		match self {
			Self::Influences => "influences",
			Self::AlignedWith => "aligned",
			Self::TensionWith => "tension",
			Self::DefersTo => "defers to",
			Self::CompetesWith => "competes",
			Self::Mentors => "mentors",
			Self::Supports => "supports",
		}
	}
}

/// One team member in the snapshot.
#[derive(Clone, Debug)]
pub struct NetworkNode {
	/// Stable identifier, referenced by edges and selection events.
	pub id: String,
	/// Display name; also drives the deterministic node color.
	pub label: String,
	/// Influence score; drives the rendered radius.
	pub influence: f64,
}

/// One relationship between two members, by node id.
#[derive(Clone, Debug)]
pub struct NetworkEdge {
	pub source: String,
	pub target: String,
	pub kind: RelationshipKind,
	/// Relationship strength, nominally in `[0, 1]`.
	pub strength: f64,
}

/// Immutable graph snapshot: the visualizer's only input.
#[derive(Clone, Debug, Default)]
pub struct NetworkData {
	pub nodes: Vec<NetworkNode>,
	pub edges: Vec<NetworkEdge>,
}
