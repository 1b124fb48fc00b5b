//! Pointer → hover/drag/selection semantics.
//!
//! The controller is deliberately framework-free: the host feeds it
//! surface-local pointer coordinates (logical px) and applies the returned
//! [`InteractionDelta`]. It is the single writer allowed to touch the
//! simulator's position buffer from outside, and only for the drag-locked
//! slot, before the next `step()`.

use super::sim::LayoutSimulator;
use super::types::NetworkData;

/// Pointer movement below this (down → up, px) counts as a click.
const CLICK_THRESHOLD: f64 = 6.0;
/// Extra hit-test padding around each node's radius, px.
const HIT_PAD: f64 = 3.0;
/// Alpha floor requested when a drag perturbs the layout.
const DRAG_ALPHA: f64 = 0.08;

/// What a pointer event changed, for the host to react to.
#[derive(Clone, Debug, PartialEq)]
pub enum InteractionDelta {
	/// Nothing the host needs to act on.
	None,
	/// Hovered slot changed; drives cursor affordance and outlines.
	HoverChanged(Option<usize>),
	/// A node was picked up.
	DragStarted(usize),
	/// The dragged node followed the pointer this frame.
	DragMoved(usize),
	/// A drag finished without being a click; selection untouched.
	DragEnded,
	/// Selection changed; carries the selected node id (None = cleared).
	SelectionChanged(Option<String>),
}

/// Mount-lifetime interaction state; persists across snapshot changes.
#[derive(Debug, Default)]
pub struct InteractionController {
	hovered: Option<usize>,
	drag: Option<usize>,
	down_at: Option<(f64, f64)>,
	selected: Option<String>,
}

impl InteractionController {
	/// Currently hovered slot, if any.
	pub fn hovered(&self) -> Option<usize> {
		self.hovered
	}

	/// Currently dragged slot, if any.
	pub fn drag(&self) -> Option<usize> {
		self.drag
	}

	/// Currently selected node id, if any.
	pub fn selected(&self) -> Option<&str> {
		self.selected.as_deref()
	}

	/// Topmost node under the pointer: reverse draw order, first slot
	/// whose padded radius contains the point.
	pub fn hit_test(&self, sim: &LayoutSimulator, x: f64, y: f64) -> Option<usize> {
		(0..sim.len()).rev().find(|&i| {
			let (nx, ny) = sim.position(i);
			let (dx, dy) = (nx - x, ny - y);
			(dx * dx + dy * dy).sqrt() <= sim.radius(i) + HIT_PAD
		})
	}

	/// Pointer pressed: lock the hit node for dragging and wake the
	/// simulation so it responds to the disturbance.
	pub fn pointer_down(&mut self, sim: &mut LayoutSimulator, x: f64, y: f64) -> InteractionDelta {
		self.down_at = Some((x, y));
		match self.hit_test(sim, x, y) {
			Some(slot) => {
				self.drag = Some(slot);
				sim.lock(slot);
				sim.nudge(DRAG_ALPHA);
				InteractionDelta::DragStarted(slot)
			}
			None => InteractionDelta::None,
		}
	}

	/// Pointer moved: drive the locked node directly, or re-hit-test for
	/// hover while idle.
	pub fn pointer_move(&mut self, sim: &mut LayoutSimulator, x: f64, y: f64) -> InteractionDelta {
		if let Some(slot) = self.drag {
			sim.set_position(slot, x, y);
			return InteractionDelta::DragMoved(slot);
		}
		let hit = self.hit_test(sim, x, y);
		if hit != self.hovered {
			self.hovered = hit;
			InteractionDelta::HoverChanged(hit)
		} else {
			InteractionDelta::None
		}
	}

	/// Pointer released: a short down→up distance is a click (select the
	/// node under the pointer, re-hit-tested now; empty space clears the
	/// selection), anything longer is a completed drag.
	pub fn pointer_up(
		&mut self,
		sim: &mut LayoutSimulator,
		data: &NetworkData,
		x: f64,
		y: f64,
	) -> InteractionDelta {
		let was_drag = self.drag.take();
		sim.unlock();
		let Some((sx, sy)) = self.down_at.take() else {
			return InteractionDelta::None;
		};

		let moved = ((x - sx).powi(2) + (y - sy).powi(2)).sqrt();
		if moved < CLICK_THRESHOLD {
			let picked = self
				.hit_test(sim, x, y)
				.and_then(|slot| data.nodes.get(slot))
				.map(|node| node.id.clone());
			if picked != self.selected {
				self.selected = picked.clone();
				return InteractionDelta::SelectionChanged(picked);
			}
			InteractionDelta::None
		} else if was_drag.is_some() {
			InteractionDelta::DragEnded
		} else {
			InteractionDelta::None
		}
	}

	/// Pointer left the surface: abandon any drag and clear hover.
	pub fn pointer_leave(&mut self, sim: &mut LayoutSimulator) -> InteractionDelta {
		self.drag = None;
		self.down_at = None;
		sim.unlock();
		if self.hovered.take().is_some() {
			InteractionDelta::HoverChanged(None)
		} else {
			InteractionDelta::None
		}
	}

	/// Drop any in-flight drag and hover without side effects; used when
	/// the snapshot changes underneath, since their slots index the old
	/// node list.
	pub fn abandon(&mut self) {
		self.drag = None;
		self.down_at = None;
		self.hovered = None;
	}

	/// Reconcile the selection with a new snapshot: keep it if the id
	/// still exists, clear it otherwise.
	pub fn retain_selection(&mut self, data: &NetworkData) -> InteractionDelta {
		match &self.selected {
			Some(id) if !data.nodes.iter().any(|n| &n.id == id) => {
				self.selected = None;
				InteractionDelta::SelectionChanged(None)
			}
			_ => InteractionDelta::None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_graph::sim::SimParams;
	use crate::components::network_graph::types::{NetworkEdge, NetworkNode, RelationshipKind};

	fn data() -> NetworkData {
		NetworkData {
			nodes: vec![
				NetworkNode {
					id: "a".into(),
					label: "Ada".into(),
					influence: 20.0,
				},
				NetworkNode {
					id: "b".into(),
					label: "Ben".into(),
					influence: 20.0,
				},
				NetworkNode {
					id: "c".into(),
					label: "Cal".into(),
					influence: 20.0,
				},
			],
			edges: vec![NetworkEdge {
				source: "a".into(),
				target: "b".into(),
				kind: RelationshipKind::Influences,
				strength: 0.8,
			}],
		}
	}

	/// Simulator with slots parked at known, well-separated spots.
	fn parked_sim(data: &NetworkData) -> LayoutSimulator {
		let mut sim = LayoutSimulator::new(data, 400.0, 400.0, SimParams::default());
		sim.set_position(0, 100.0, 100.0);
		sim.set_position(1, 300.0, 100.0);
		sim.set_position(2, 200.0, 300.0);
		sim
	}

	#[test]
	fn hit_test_is_deterministic() {
		let data = data();
		let sim = parked_sim(&data);
		let ctl = InteractionController::default();
		assert_eq!(ctl.hit_test(&sim, 100.0, 100.0), Some(0));
		assert_eq!(ctl.hit_test(&sim, 300.0, 100.0), Some(1));
		assert_eq!(ctl.hit_test(&sim, 30.0, 380.0), None);
	}

	#[test]
	fn topmost_node_wins_overlapping_hits() {
		let data = data();
		let mut sim = parked_sim(&data);
		sim.set_position(2, 100.0, 100.0);
		let ctl = InteractionController::default();
		// Slot 2 draws last, so it is on top of slot 0.
		assert_eq!(ctl.hit_test(&sim, 100.0, 100.0), Some(2));
	}

	#[test]
	fn click_in_place_selects() {
		let data = data();
		let mut sim = parked_sim(&data);
		let mut ctl = InteractionController::default();
		assert_eq!(
			ctl.pointer_down(&mut sim, 100.0, 100.0),
			InteractionDelta::DragStarted(0)
		);
		let delta = ctl.pointer_up(&mut sim, &data, 100.0, 100.0);
		assert_eq!(delta, InteractionDelta::SelectionChanged(Some("a".into())));
		assert_eq!(ctl.selected(), Some("a"));
		assert_eq!(ctl.drag(), None);
		assert_eq!(sim.locked(), None);
	}

	#[test]
	fn short_drag_still_counts_as_click() {
		let data = data();
		let mut sim = parked_sim(&data);
		let mut ctl = InteractionController::default();
		ctl.pointer_down(&mut sim, 100.0, 100.0);
		ctl.pointer_move(&mut sim, 103.0, 100.0);
		let delta = ctl.pointer_up(&mut sim, &data, 103.0, 100.0);
		assert_eq!(delta, InteractionDelta::SelectionChanged(Some("a".into())));
	}

	#[test]
	fn long_drag_completes_without_selecting() {
		let data = data();
		let mut sim = parked_sim(&data);
		let mut ctl = InteractionController::default();
		ctl.pointer_down(&mut sim, 100.0, 100.0);
		ctl.pointer_move(&mut sim, 180.0, 150.0);
		let delta = ctl.pointer_up(&mut sim, &data, 180.0, 150.0);
		assert_eq!(delta, InteractionDelta::DragEnded);
		assert_eq!(ctl.selected(), None);
		assert_eq!(sim.position(0), (180.0, 150.0));
	}

	#[test]
	fn drag_leaves_other_nodes_in_place() {
		let data = data();
		let mut sim = parked_sim(&data);
		let mut ctl = InteractionController::default();
		let (b, c) = (sim.position(1), sim.position(2));
		ctl.pointer_down(&mut sim, 100.0, 100.0);
		ctl.pointer_move(&mut sim, 350.0, 350.0);
		ctl.pointer_up(&mut sim, &data, 350.0, 350.0);
		assert_eq!(sim.position(1), b);
		assert_eq!(sim.position(2), c);
	}

	#[test]
	fn click_on_empty_space_clears_selection() {
		let data = data();
		let mut sim = parked_sim(&data);
		let mut ctl = InteractionController::default();
		ctl.pointer_down(&mut sim, 100.0, 100.0);
		ctl.pointer_up(&mut sim, &data, 100.0, 100.0);
		assert_eq!(ctl.selected(), Some("a"));

		ctl.pointer_down(&mut sim, 30.0, 380.0);
		let delta = ctl.pointer_up(&mut sim, &data, 30.0, 380.0);
		assert_eq!(delta, InteractionDelta::SelectionChanged(None));
		assert_eq!(ctl.selected(), None);
	}

	#[test]
	fn pointer_down_wakes_the_simulation() {
		let data = data();
		let mut sim = parked_sim(&data);
		for _ in 0..2000 {
			sim.step();
		}
		assert!(sim.at_rest());
		let mut ctl = InteractionController::default();
		let (x, y) = sim.position(0);
		ctl.pointer_down(&mut sim, x, y);
		assert!(sim.alpha() >= 0.08);
		assert_eq!(sim.locked(), Some(0));
	}

	#[test]
	fn hover_tracks_pointer_and_leave_clears() {
		let data = data();
		let mut sim = parked_sim(&data);
		let mut ctl = InteractionController::default();
		assert_eq!(
			ctl.pointer_move(&mut sim, 100.0, 100.0),
			InteractionDelta::HoverChanged(Some(0))
		);
		// No change while staying on the same node.
		assert_eq!(
			ctl.pointer_move(&mut sim, 101.0, 100.0),
			InteractionDelta::None
		);
		assert_eq!(
			ctl.pointer_leave(&mut sim),
			InteractionDelta::HoverChanged(None)
		);
		assert_eq!(ctl.hovered(), None);
	}

	#[test]
	fn snapshot_change_abandons_drag_in_flight() {
		let data = data();
		let mut sim = parked_sim(&data);
		let mut ctl = InteractionController::default();
		ctl.pointer_move(&mut sim, 100.0, 100.0);
		ctl.pointer_down(&mut sim, 100.0, 100.0);
		assert_eq!(ctl.drag(), Some(0));

		// New snapshot arrives mid-drag: fresh simulator, old controller.
		let mut fresh = parked_sim(&data);
		ctl.abandon();
		ctl.retain_selection(&data);
		assert_eq!(ctl.drag(), None);
		assert_eq!(ctl.hovered(), None);

		// Later pointer motion must not steer any node of the new sim.
		let before: Vec<_> = (0..fresh.len()).map(|i| fresh.position(i)).collect();
		ctl.pointer_move(&mut fresh, 350.0, 200.0);
		let after: Vec<_> = (0..fresh.len()).map(|i| fresh.position(i)).collect();
		assert_eq!(before, after);
		assert_eq!(fresh.locked(), None);
	}

	#[test]
	fn selection_survives_snapshot_when_id_remains() {
		let data = data();
		let mut sim = parked_sim(&data);
		let mut ctl = InteractionController::default();
		ctl.pointer_down(&mut sim, 100.0, 100.0);
		ctl.pointer_up(&mut sim, &data, 100.0, 100.0);

		assert_eq!(ctl.retain_selection(&data), InteractionDelta::None);
		assert_eq!(ctl.selected(), Some("a"));

		let mut smaller = data.clone();
		smaller.nodes.remove(0);
		assert_eq!(
			ctl.retain_selection(&smaller),
			InteractionDelta::SelectionChanged(None)
		);
		assert_eq!(ctl.selected(), None);
	}
}
