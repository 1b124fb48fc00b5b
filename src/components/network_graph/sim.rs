//! Force-directed layout simulator.
//!
//! Positions and velocities live in flat slot-indexed buffers (slot =
//! index into the snapshot's node list). Each frame [`LayoutSimulator::step`]
//! runs one cooling-scheduled force pass: pairwise repulsion, per-edge
//! springs, center gravity, damped integration, boundary clamp. Once
//! `alpha` has decayed below its floor the step is a no-op until a drag
//! or resize nudges it back up.

use std::collections::HashMap;

use super::types::{NetworkData, RelationshipKind};

/// Tuned simulation constants, overridable per instance.
///
/// The defaults are empirical: they produce a stable, readable layout for
/// networks of tens of nodes and are pinned by the unit tests.
#[derive(Clone, Debug)]
pub struct SimParams {
	/// Pairwise repulsion strength (inverse-square law numerator).
	pub repulsion: f64,
	/// Minimum squared distance used in the repulsion denominator.
	pub min_dist_sq: f64,
	/// Spring coefficient for edge attraction.
	pub attraction: f64,
	/// Pull toward the surface center.
	pub gravity: f64,
	/// Per-step velocity multiplier.
	pub damping: f64,
	/// Exponential cooling factor applied to alpha each step.
	pub alpha_decay: f64,
	/// Alpha floor below which `step()` is a no-op.
	pub alpha_min: f64,
	/// Lower clamp for the ideal edge length.
	pub ideal_len_min: f64,
	/// Upper clamp for the ideal edge length.
	pub ideal_len_max: f64,
	/// Radius every node gets before its influence contribution.
	pub base_radius: f64,
	/// Divisor mapping influence score to extra radius.
	pub influence_divisor: f64,
	/// Space reserved under each node for its name pill.
	pub label_margin: f64,
}

impl Default for SimParams {
	fn default() -> Self {
		Self {
			repulsion: 5500.0,
			min_dist_sq: 100.0,
			attraction: 0.04,
			gravity: 0.012,
			damping: 0.55,
			alpha_decay: 0.992,
			alpha_min: 0.002,
			ideal_len_min: 120.0,
			ideal_len_max: 200.0,
			base_radius: 16.0,
			influence_divisor: 8.0,
			label_margin: 26.0,
		}
	}
}

/// An edge resolved to node slots; unresolved edges never get this far.
#[derive(Clone, Copy, Debug)]
pub struct SimEdge {
	pub a: usize,
	pub b: usize,
	pub kind: RelationshipKind,
	pub strength: f64,
}

/// Explicit simulator object owning the position/velocity buffers.
pub struct LayoutSimulator {
	params: SimParams,
	width: f64,
	height: f64,
	alpha: f64,
	px: Vec<f64>,
	py: Vec<f64>,
	vx: Vec<f64>,
	vy: Vec<f64>,
	radii: Vec<f64>,
	edges: Vec<SimEdge>,
	dropped_edges: usize,
	locked: Option<usize>,
}

/// Deterministic pseudo-random value in `[0, 1)` (same LCG as the demo
/// data generator); keeps the seeding jitter reproducible without `rand`.
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

impl LayoutSimulator {
	/// Seed a fresh simulation from a snapshot: nodes on a jittered
	/// circle, velocities zero, `alpha = 1`.
	pub fn new(data: &NetworkData, width: f64, height: f64, params: SimParams) -> Self {
		let n = data.nodes.len();
		let mut id_to_slot = HashMap::with_capacity(n);
		let mut px = Vec::with_capacity(n);
		let mut py = Vec::with_capacity(n);
		let mut radii = Vec::with_capacity(n);

		let (cx, cy) = (width / 2.0, height / 2.0);
		let ring = width * 0.2;
		for (i, node) in data.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * std::f64::consts::PI / (n.max(1) as f64);
			let jx = (rand_simple(i * 2) - 0.5) * 60.0;
			let jy = (rand_simple(i * 2 + 1) - 0.5) * 60.0;
			px.push(cx + ring * angle.cos() + jx);
			py.push(cy + ring * angle.sin() + jy);
			radii.push((params.base_radius + node.influence / params.influence_divisor).max(1.0));
			id_to_slot.insert(node.id.as_str(), i);
		}

		let mut edges = Vec::with_capacity(data.edges.len());
		let mut dropped_edges = 0;
		for edge in &data.edges {
			match (
				id_to_slot.get(edge.source.as_str()),
				id_to_slot.get(edge.target.as_str()),
			) {
				(Some(&a), Some(&b)) => edges.push(SimEdge {
					a,
					b,
					kind: edge.kind,
					strength: edge.strength,
				}),
				_ => dropped_edges += 1,
			}
		}

		let mut sim = Self {
			params,
			width,
			height,
			alpha: 1.0,
			px,
			py,
			vx: vec![0.0; n],
			vy: vec![0.0; n],
			radii,
			edges,
			dropped_edges,
			locked: None,
		};
		for i in 0..n {
			sim.clamp_slot(i);
		}
		sim
	}

	/// Number of node slots.
	pub fn len(&self) -> usize {
		self.px.len()
	}

	/// True when the snapshot had no nodes.
	pub fn is_empty(&self) -> bool {
		self.px.is_empty()
	}

	/// Current cooling coefficient.
	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	/// True once alpha has decayed to the no-op floor.
	pub fn at_rest(&self) -> bool {
		self.alpha <= self.params.alpha_min
	}

	/// Position of a slot.
	pub fn position(&self, slot: usize) -> (f64, f64) {
		(self.px[slot], self.py[slot])
	}

	/// Velocity of a slot.
	pub fn velocity(&self, slot: usize) -> (f64, f64) {
		(self.vx[slot], self.vy[slot])
	}

	/// Rendered radius of a slot.
	pub fn radius(&self, slot: usize) -> f64 {
		self.radii[slot]
	}

	/// Edges that resolved to live slots, in snapshot order.
	pub fn edges(&self) -> &[SimEdge] {
		&self.edges
	}

	/// Snapshot edges skipped because an endpoint id was unknown.
	pub fn dropped_edges(&self) -> usize {
		self.dropped_edges
	}

	/// Logical surface size the layout is currently fit to.
	pub fn surface(&self) -> (f64, f64) {
		(self.width, self.height)
	}

	/// Raise alpha to at least `min_alpha` so the layout re-settles after
	/// a disturbance.
	pub fn nudge(&mut self, min_alpha: f64) {
		self.alpha = self.alpha.max(min_alpha);
	}

	/// Pin a slot: physics leaves its position alone and zeroes its
	/// velocity until [`unlock`](Self::unlock).
	pub fn lock(&mut self, slot: usize) {
		if slot < self.len() {
			self.locked = Some(slot);
		}
	}

	/// Release the drag-locked slot, if any.
	pub fn unlock(&mut self) {
		self.locked = None;
	}

	/// Currently drag-locked slot.
	pub fn locked(&self) -> Option<usize> {
		self.locked
	}

	/// Write a slot's position directly (drag path), clamped to bounds.
	pub fn set_position(&mut self, slot: usize, x: f64, y: f64) {
		if slot >= self.len() {
			return;
		}
		self.px[slot] = x;
		self.py[slot] = y;
		self.clamp_slot(slot);
	}

	/// Ideal spring length for the current node count and surface width.
	fn ideal_len(&self) -> f64 {
		(self.width / (self.len() + 1) as f64)
			.clamp(self.params.ideal_len_min, self.params.ideal_len_max)
	}

	/// One force pass; no-op once alpha is at the floor or with no nodes.
	pub fn step(&mut self) {
		let n = self.len();
		if n == 0 || self.alpha <= self.params.alpha_min {
			return;
		}
		self.alpha *= self.params.alpha_decay;

		let mut fx = vec![0.0; n];
		let mut fy = vec![0.0; n];

		// Repulsion: inverse-square over all pairs, distance floored to
		// keep near-coincident nodes finite.
		for i in 0..n {
			for j in (i + 1)..n {
				let mut dx = self.px[i] - self.px[j];
				let mut dy = self.py[i] - self.py[j];
				if dx == 0.0 && dy == 0.0 {
					// Deterministic separation direction for exact overlap.
					dx = 0.05 * ((i as f64) - (j as f64));
					dy = 0.05;
				}
				let dist_sq = (dx * dx + dy * dy).max(self.params.min_dist_sq);
				let dist = dist_sq.sqrt();
				let force = self.params.repulsion / dist_sq;
				let (ux, uy) = (dx / dist, dy / dist);
				fx[i] += ux * force;
				fy[i] += uy * force;
				fx[j] -= ux * force;
				fy[j] -= uy * force;
			}
		}

		// Springs: pull each resolved edge toward the ideal length,
		// weighted by relationship strength.
		let ideal = self.ideal_len();
		for edge in &self.edges {
			let dx = self.px[edge.b] - self.px[edge.a];
			let dy = self.py[edge.b] - self.py[edge.a];
			let dist = (dx * dx + dy * dy).sqrt().max(1e-3);
			let force = self.params.attraction * (dist - ideal) * (0.5 + edge.strength);
			let (ux, uy) = (dx / dist, dy / dist);
			fx[edge.a] += ux * force;
			fy[edge.a] += uy * force;
			fx[edge.b] -= ux * force;
			fy[edge.b] -= uy * force;
		}

		// Gravity toward the surface center bounds drift.
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		for i in 0..n {
			fx[i] += self.params.gravity * (cx - self.px[i]);
			fy[i] += self.params.gravity * (cy - self.py[i]);
		}

		// Damped integration; the drag-locked slot stays pinned.
		for i in 0..n {
			if self.locked == Some(i) {
				self.vx[i] = 0.0;
				self.vy[i] = 0.0;
				continue;
			}
			self.vx[i] = (self.vx[i] + fx[i] * self.alpha) * self.params.damping;
			self.vy[i] = (self.vy[i] + fy[i] * self.alpha) * self.params.damping;
			self.px[i] += self.vx[i];
			self.py[i] += self.vy[i];
			self.clamp_slot(i);
		}
	}

	/// Rescale the live layout to a new surface size without reseeding;
	/// positions scale proportionally and alpha rises so the simulation
	/// re-settles instead of jumping.
	pub fn rescale(&mut self, new_width: f64, new_height: f64) {
		let sx = if self.width > 0.0 { new_width / self.width } else { 1.0 };
		let sy = if self.height > 0.0 { new_height / self.height } else { 1.0 };
		self.width = new_width.max(1.0);
		self.height = new_height.max(1.0);
		for i in 0..self.len() {
			self.px[i] *= sx;
			self.py[i] *= sy;
			self.clamp_slot(i);
		}
		self.nudge(0.3);
	}

	/// Keep the full node circle (plus label margin) inside the surface.
	fn clamp_slot(&mut self, slot: usize) {
		let r = self.radii[slot];
		let max_x = (self.width - r).max(r);
		let max_y = (self.height - r - self.params.label_margin).max(r);
		self.px[slot] = self.px[slot].clamp(r, max_x);
		self.py[slot] = self.py[slot].clamp(r, max_y);
	}
}
