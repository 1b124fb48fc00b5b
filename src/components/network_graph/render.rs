//! Per-frame canvas drawing.
//!
//! Drawing is a pure function of (positions, edges, interaction state,
//! surface size): no state survives between frames. The geometry and
//! opacity rules are plain functions so they stay testable off-browser;
//! only the `draw_*` functions touch the canvas context.

use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::palette;
use super::sim::{LayoutSimulator, SimEdge};
use super::types::NetworkData;

const BACKGROUND: &str = "#10141c";
const ARROW_SIZE: f64 = 8.0;
/// Edges shorter than this on screen skip their midpoint label.
const EDGE_LABEL_MIN_LEN: f64 = 90.0;
/// Opacity for elements unrelated to the current selection.
const DIMMED_ALPHA: f64 = 0.15;
/// Uniform edge opacity when nothing is selected.
const IDLE_EDGE_ALPHA: f64 = 0.7;

/// An edge segment trimmed back to the two circle boundaries.
#[derive(Clone, Copy, Debug)]
struct EdgeLine {
	x1: f64,
	y1: f64,
	x2: f64,
	y2: f64,
	ux: f64,
	uy: f64,
	len: f64,
}

/// Trim the center-to-center segment by each endpoint's radius; `None`
/// when the circles touch or overlap (nothing visible to stroke).
fn edge_line(x1: f64, y1: f64, r1: f64, x2: f64, y2: f64, r2: f64) -> Option<EdgeLine> {
	let (dx, dy) = (x2 - x1, y2 - y1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist <= r1 + r2 + 1e-3 {
		return None;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	Some(EdgeLine {
		x1: x1 + ux * r1,
		y1: y1 + uy * r1,
		x2: x2 - ux * r2,
		y2: y2 - uy * r2,
		ux,
		uy,
		len: dist - r1 - r2,
	})
}

/// Selection dimming rule for edges.
fn edge_alpha(selected: Option<usize>, a: usize, b: usize) -> f64 {
	match selected {
		None => IDLE_EDGE_ALPHA,
		Some(s) if a == s || b == s => 0.95,
		Some(_) => DIMMED_ALPHA,
	}
}

/// Selection dimming rule for nodes; `connected` means adjacent to the
/// selected node.
fn node_alpha(selected: Option<usize>, connected: bool, slot: usize) -> f64 {
	match selected {
		None => 1.0,
		Some(s) if s == slot => 1.0,
		Some(_) if connected => 0.9,
		Some(_) => DIMMED_ALPHA,
	}
}

/// Whether an edge's kind label is drawn: long enough on screen and
/// relevant to the current selection.
fn edge_label_visible(len: f64, selected: Option<usize>, a: usize, b: usize) -> bool {
	len > EDGE_LABEL_MIN_LEN && selected.is_none_or(|s| a == s || b == s)
}

/// Up to two initials from a display name.
fn initials(label: &str) -> String {
	label
		.split_whitespace()
		.take(2)
		.filter_map(|word| word.chars().next())
		.flat_map(char::to_uppercase)
		.collect()
}

/// Slots adjacent to the selected slot, for the node dimming rule.
fn adjacency(edges: &[SimEdge], selected: Option<usize>, n: usize) -> Vec<bool> {
	let mut connected = vec![false; n];
	if let Some(s) = selected {
		for edge in edges {
			if edge.a == s {
				connected[edge.b] = true;
			} else if edge.b == s {
				connected[edge.a] = true;
			}
		}
	}
	connected
}

/// Draw one frame. All coordinates are logical px; the context is
/// expected to already carry the device-pixel-ratio scale transform.
pub fn draw(
	ctx: &CanvasRenderingContext2d,
	sim: &LayoutSimulator,
	data: &NetworkData,
	hovered: Option<usize>,
	selected: Option<usize>,
	width: f64,
	height: f64,
) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, width, height);
	if sim.is_empty() {
		return;
	}
	draw_edges(ctx, sim, selected);
	draw_nodes(ctx, sim, data, hovered, selected);
	ctx.set_global_alpha(1.0);
}

fn dash_array(dash: &[f64]) -> js_sys::Array {
	dash.iter().copied().map(JsValue::from_f64).collect()
}

fn draw_edges(ctx: &CanvasRenderingContext2d, sim: &LayoutSimulator, selected: Option<usize>) {
	for edge in sim.edges() {
		let (x1, y1) = sim.position(edge.a);
		let (x2, y2) = sim.position(edge.b);
		let Some(line) = edge_line(x1, y1, sim.radius(edge.a), x2, y2, sim.radius(edge.b))
		else {
			continue;
		};

		let alpha = edge_alpha(selected, edge.a, edge.b);
		let width = 1.0 + 2.0 * edge.strength.clamp(0.0, 1.0);
		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(edge.kind.color());
		ctx.set_line_width(width);
		let _ = ctx.set_line_dash(&dash_array(edge.kind.dash()));

		// Directional edges stop short so the arrowhead owns the tip.
		let (end_x, end_y) = if edge.kind.directional() {
			(line.x2 - line.ux * ARROW_SIZE, line.y2 - line.uy * ARROW_SIZE)
		} else {
			(line.x2, line.y2)
		};
		ctx.begin_path();
		ctx.move_to(line.x1, line.y1);
		ctx.line_to(end_x, end_y);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		if edge.kind.directional() {
			let (back_x, back_y) = (line.x2 - line.ux * ARROW_SIZE, line.y2 - line.uy * ARROW_SIZE);
			let (px, py) = (-line.uy * ARROW_SIZE * 0.45, line.ux * ARROW_SIZE * 0.45);
			ctx.set_fill_style_str(edge.kind.color());
			ctx.begin_path();
			ctx.move_to(line.x2, line.y2);
			ctx.line_to(back_x + px, back_y + py);
			ctx.line_to(back_x - px, back_y - py);
			ctx.close_path();
			ctx.fill();
		}

		if edge_label_visible(line.len, selected, edge.a, edge.b) {
			let (mx, my) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
			ctx.set_fill_style_str(edge.kind.color());
			ctx.set_font("10px sans-serif");
			ctx.set_text_align("center");
			ctx.set_text_baseline("bottom");
			let _ = ctx.fill_text(edge.kind.label(), mx, my - 3.0);
		}
	}
}

fn draw_nodes(
	ctx: &CanvasRenderingContext2d,
	sim: &LayoutSimulator,
	data: &NetworkData,
	hovered: Option<usize>,
	selected: Option<usize>,
) {
	let connected = adjacency(sim.edges(), selected, sim.len());

	for (slot, node) in data.nodes.iter().enumerate().take(sim.len()) {
		let (x, y) = sim.position(slot);
		let r = sim.radius(slot);
		let alpha = node_alpha(selected, connected[slot], slot);
		ctx.set_global_alpha(alpha);

		// Radial gradient with an offset highlight; colors are a pure
		// function of the display name.
		if let Ok(gradient) =
			ctx.create_radial_gradient(x - r * 0.35, y - r * 0.35, r * 0.15, x, y, r)
		{
			let _ = gradient.add_color_stop(0.0, palette::highlight_color(&node.label));
			let _ = gradient.add_color_stop(1.0, palette::base_color(&node.label));
			ctx.begin_path();
			let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
			ctx.fill();
		}

		let (outline, outline_width) = if selected == Some(slot) {
			("#ffd166", 3.0)
		} else if hovered == Some(slot) {
			("rgba(255, 255, 255, 0.9)", 2.5)
		} else {
			("rgba(255, 255, 255, 0.25)", 1.0)
		};
		ctx.begin_path();
		let _ = ctx.arc(x, y, r, 0.0, 2.0 * PI);
		ctx.set_stroke_style_str(outline);
		ctx.set_line_width(outline_width);
		ctx.stroke();

		ctx.set_fill_style_str("rgba(255, 255, 255, 0.95)");
		ctx.set_font(&format!("bold {:.0}px sans-serif", (r * 0.75).max(9.0)));
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text(&initials(&node.label), x, y);

		draw_name_pill(ctx, &node.label, x, y + r + 5.0);
	}
	ctx.set_global_alpha(1.0);
}

/// Pill-shaped name tag below a node, sized from measured text width.
fn draw_name_pill(ctx: &CanvasRenderingContext2d, label: &str, cx: f64, top: f64) {
	const PILL_H: f64 = 16.0;
	ctx.set_font("11px sans-serif");
	let text_w = ctx
		.measure_text(label)
		.map(|m| m.width())
		.unwrap_or(6.0 * label.len() as f64);
	let half = text_w / 2.0;
	let (r, cy) = (PILL_H / 2.0, top + PILL_H / 2.0);

	ctx.begin_path();
	let _ = ctx.arc(cx - half, cy, r, 0.5 * PI, 1.5 * PI);
	let _ = ctx.arc(cx + half, cy, r, 1.5 * PI, 0.5 * PI);
	ctx.close_path();
	ctx.set_fill_style_str("rgba(13, 17, 23, 0.78)");
	ctx.fill();

	ctx.set_fill_style_str("rgba(255, 255, 255, 0.92)");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(label, cx, cy);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn edge_line_trims_to_circle_boundaries() {
		let line = edge_line(0.0, 0.0, 10.0, 100.0, 0.0, 20.0).unwrap();
		assert!((line.x1 - 10.0).abs() < 1e-9);
		assert!((line.x2 - 80.0).abs() < 1e-9);
		assert!((line.len - 70.0).abs() < 1e-9);
		assert!((line.ux - 1.0).abs() < 1e-9);
		assert_eq!(line.uy, 0.0);
		assert_eq!(line.y1, 0.0);
		assert_eq!(line.y2, 0.0);
	}

	#[test]
	fn overlapping_circles_produce_no_line() {
		assert!(edge_line(0.0, 0.0, 20.0, 30.0, 0.0, 20.0).is_none());
		// Exactly coincident centers must not divide by zero.
		assert!(edge_line(50.0, 50.0, 10.0, 50.0, 50.0, 10.0).is_none());
	}

	#[test]
	fn dimming_rule_for_edges() {
		assert_eq!(edge_alpha(None, 0, 1), 0.7);
		assert_eq!(edge_alpha(Some(0), 0, 1), 0.95);
		assert_eq!(edge_alpha(Some(2), 0, 1), 0.15);
	}

	#[test]
	fn dimming_rule_for_nodes() {
		assert_eq!(node_alpha(None, false, 3), 1.0);
		assert_eq!(node_alpha(Some(3), false, 3), 1.0);
		assert_eq!(node_alpha(Some(1), true, 3), 0.9);
		assert_eq!(node_alpha(Some(1), false, 3), 0.15);
	}

	#[test]
	fn edge_labels_need_length_and_relevance() {
		assert!(edge_label_visible(120.0, None, 0, 1));
		assert!(!edge_label_visible(50.0, None, 0, 1));
		assert!(edge_label_visible(120.0, Some(1), 0, 1));
		assert!(!edge_label_visible(120.0, Some(2), 0, 1));
	}

	#[test]
	fn initials_take_first_two_words() {
		assert_eq!(initials("Ada Lovelace"), "AL");
		assert_eq!(initials("Cher"), "C");
		assert_eq!(initials("Jean-Luc Pierre Martin"), "JP");
		assert_eq!(initials(""), "");
	}

	#[test]
	fn adjacency_marks_selected_neighbors_only() {
		use crate::components::network_graph::types::RelationshipKind;
		let edges = [
			SimEdge {
				a: 0,
				b: 1,
				kind: RelationshipKind::Supports,
				strength: 0.5,
			},
			SimEdge {
				a: 2,
				b: 0,
				kind: RelationshipKind::Mentors,
				strength: 0.5,
			},
		];
		assert_eq!(adjacency(&edges, Some(0), 4), vec![false, true, true, false]);
		assert_eq!(adjacency(&edges, None, 4), vec![false; 4]);
	}
}
