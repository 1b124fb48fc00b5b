//! Deterministic label → color mapping.
//!
//! Node colors must be stable for the same display name across runs and
//! processes, so the palette index comes from a pure string hash rather
//! than any randomized assignment.

/// `(base, highlight)` pairs; the highlight feeds the gradient hot spot.
const PALETTE: &[(&str, &str)] = &[
	("#1f77b4", "#6fb3e0"), // blue
	("#ff7f0e", "#ffb266"), // orange
	("#2ca02c", "#7ed87e"), // green
	("#d62728", "#ef8a8a"), // red
	("#9467bd", "#c3a6e0"), // purple
	("#8c564b", "#c09a92"), // brown
	("#e377c2", "#f2b3de"), // pink
	("#7f7f7f", "#b8b8b8"), // gray
	("#bcbd22", "#e0e07a"), // olive
	("#17becf", "#7ce0ea"), // cyan
];

/// djb2-style string hash; pure and stable across runs.
fn hash_label(label: &str) -> u64 {
	label
		.bytes()
		.fold(5381u64, |h, b| h.wrapping_mul(33) ^ u64::from(b))
}

/// Base fill color for a node with the given display name.
pub fn base_color(label: &str) -> &'static str {
	PALETTE[(hash_label(label) % PALETTE.len() as u64) as usize].0
}

/// Gradient highlight color paired with [`base_color`].
pub fn highlight_color(label: &str) -> &'static str {
	PALETTE[(hash_label(label) % PALETTE.len() as u64) as usize].1
}
