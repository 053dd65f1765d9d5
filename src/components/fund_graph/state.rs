//! Graph simulation state and interaction tracking.
//!
//! Wraps the layout [`Simulation`] with the node/link identities it was built
//! from, the pan/zoom view transform, and in-progress drag and pan gestures.
//! A fresh state is built for every new input; nothing here is patched
//! incrementally.

use std::collections::HashMap;

use super::config::GraphConfig;
use super::scene::{Layout, LinkKey, Point, card_origin, link_keys};
use super::simulation::{Center, Collide, Force, LinkForce, ManyBody, SimNode, Simulation};
use super::types::GraphElements;

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%).
	pub k: f64,
}

impl ViewTransform {
	pub fn identity() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}

	/// SVG `transform` attribute value.
	pub fn to_svg(&self) -> String {
		format!("translate({}, {}) scale({})", self.x, self.y, self.k)
	}
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self::identity()
	}
}

/// Tracks the in-progress node drag. A single pointer drags one node at a time.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub node_idx: Option<usize>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f64,
	pub node_start_y: f64,
}

impl DragState {
	pub fn active(&self) -> bool {
		self.node_idx.is_some()
	}
}

/// Tracks an in-progress background pan.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

#[derive(Clone, Debug)]
struct ResolvedLink {
	key: LinkKey,
	endpoints: Option<(usize, usize)>,
}

/// Core graph state combining the layout simulation with interaction tracking.
///
/// Built when the input changes, then mutated each frame by the animation
/// loop and by pointer handlers.
pub struct FundGraphState {
	pub simulation: Simulation,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub width: f64,
	pub height: f64,
	config: GraphConfig,
	node_ids: Vec<String>,
	links: Vec<ResolvedLink>,
}

impl FundGraphState {
	pub fn new(elements: &GraphElements, width: f64, height: f64, config: &GraphConfig) -> Self {
		let mut id_to_idx = HashMap::new();
		let mut node_ids = Vec::with_capacity(elements.nodes.len());
		let mut nodes = Vec::with_capacity(elements.nodes.len());

		// simulation nodes are copies; the caller's elements stay untouched
		for node in &elements.nodes {
			if id_to_idx.contains_key(&node.id) {
				continue;
			}
			id_to_idx.insert(node.id.clone(), nodes.len());
			node_ids.push(node.id.clone());
			nodes.push(SimNode {
				index: nodes.len(),
				x: node.x.unwrap_or(f64::NAN),
				y: node.y.unwrap_or(f64::NAN),
				vx: node.vx.unwrap_or(0.0),
				vy: node.vy.unwrap_or(0.0),
				fx: node.fx,
				fy: node.fy,
			});
		}

		let mut links = Vec::with_capacity(elements.links.len());
		let mut edges = Vec::new();
		for (key, link) in link_keys(&elements.links).into_iter().zip(&elements.links) {
			let endpoints = match (id_to_idx.get(&link.source), id_to_idx.get(&link.target)) {
				(Some(&src), Some(&tgt)) => {
					edges.push((src, tgt));
					Some((src, tgt))
				}
				_ => {
					log::warn!(
						"fund-graph: link {} -> {} references a missing node",
						link.source,
						link.target
					);
					None
				}
			};
			links.push(ResolvedLink { key, endpoints });
		}

		let sim = &config.simulation;
		let simulation = Simulation::new(nodes)
			.with_alpha_min(sim.alpha_min)
			.with_velocity_decay(sim.velocity_decay)
			.with_force(
				"link",
				Force::Link(LinkForce::new(edges, sim.link_distance)),
			)
			.with_force("charge", Force::ManyBody(ManyBody::new(sim.charge_strength)))
			.with_force("collide", Force::Collide(Collide::new(sim.collide_radius)))
			.with_force(
				"center",
				Force::Center(Center::new(width / 2.0, height / 2.0)),
			);

		Self {
			simulation,
			transform: ViewTransform::identity(),
			drag: DragState::default(),
			pan: PanState::default(),
			width,
			height,
			config: config.clone(),
			node_ids,
			links,
		}
	}

	pub fn node_ids(&self) -> &[String] {
		&self.node_ids
	}

	/// Current position of node `idx`, if it has a finite one.
	pub fn position(&self, idx: usize) -> Option<Point> {
		self.simulation
			.node(idx)
			.and_then(|node| Point::finite(node.x, node.y))
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Topmost card under the screen point. Later cards paint over earlier ones.
	pub fn card_at_position(&self, sx: f64, sy: f64) -> Option<usize> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let (hw, hh) = (
			self.config.theme.card.width / 2.0,
			self.config.theme.card.height / 2.0,
		);
		(0..self.node_ids.len()).rev().find(|&idx| {
			self.position(idx)
				.is_some_and(|p| (gx - p.x).abs() <= hw && (gy - p.y).abs() <= hh)
		})
	}

	/// Starts dragging the card under the pointer, if any.
	///
	/// Pins the node where it is, raises the alpha target and restarts the
	/// simulation. A press while a drag is already in progress keeps that drag
	/// and returns `true`.
	pub fn begin_drag(&mut self, sx: f64, sy: f64) -> bool {
		if self.drag.active() {
			return true;
		}
		let Some(idx) = self.card_at_position(sx, sy) else {
			return false;
		};
		self.simulation
			.set_alpha_target(self.config.simulation.drag_alpha_target);
		self.simulation.restart();

		let Some(node) = self.simulation.node_mut(idx) else {
			return false;
		};
		node.fx = Some(node.x);
		node.fy = Some(node.y);
		self.drag.node_idx = Some(idx);
		self.drag.start_x = sx;
		self.drag.start_y = sy;
		self.drag.node_start_x = node.x;
		self.drag.node_start_y = node.y;
		log::debug!("fund-graph: drag start on {}", self.node_ids[idx]);
		true
	}

	/// Moves the pinned node with the pointer, keeping the grab offset.
	pub fn drag_to(&mut self, sx: f64, sy: f64) {
		let Some(idx) = self.drag.node_idx else {
			return;
		};
		let (nx, ny) = (
			self.drag.node_start_x + (sx - self.drag.start_x) / self.transform.k,
			self.drag.node_start_y + (sy - self.drag.start_y) / self.transform.k,
		);
		if let Some(node) = self.simulation.node_mut(idx) {
			node.fx = Some(nx);
			node.fy = Some(ny);
		}
	}

	/// Releases the pinned node back to the simulation.
	pub fn end_drag(&mut self) {
		let Some(idx) = self.drag.node_idx.take() else {
			return;
		};
		self.simulation.set_alpha_target(0.0);
		if let Some(node) = self.simulation.node_mut(idx) {
			node.fx = None;
			node.fy = None;
		}
		log::debug!("fund-graph: drag end on {}", self.node_ids[idx]);
	}

	pub fn begin_pan(&mut self, sx: f64, sy: f64) {
		self.pan.active = true;
		self.pan.start_x = sx;
		self.pan.start_y = sy;
		self.pan.transform_start_x = self.transform.x;
		self.pan.transform_start_y = self.transform.y;
	}

	pub fn pan_to(&mut self, sx: f64, sy: f64) {
		if !self.pan.active {
			return;
		}
		self.transform.x = self.pan.transform_start_x + (sx - self.pan.start_x);
		self.transform.y = self.pan.transform_start_y + (sy - self.pan.start_y);
	}

	pub fn end_pan(&mut self) {
		self.pan.active = false;
	}

	/// Zooms around the screen point, keeping the graph point under it fixed.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 { 0.9 } else { 1.1 };
		let new_k = self.config.zoom.clamp(self.transform.k * factor);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	/// Advances the simulation one frame. Returns whether positions changed.
	pub fn tick(&mut self) -> bool {
		self.simulation.step()
	}

	/// Retargets the centering force at the new viewport center.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		if let Some(Force::Center(center)) = self.simulation.force_mut("center") {
			center.x = width / 2.0;
			center.y = height / 2.0;
		}
	}

	/// Card corners and line endpoints for the current node positions.
	pub fn layout(&self) -> Layout {
		let card = &self.config.theme.card;
		let mut layout = Layout::new(self.transform.clone());
		for (idx, id) in self.node_ids.iter().enumerate() {
			layout.place_card(
				id.clone(),
				card_origin(self.position(idx), card.width, card.height),
			);
		}
		for link in &self.links {
			let (from, to) = match link.endpoints {
				Some((s, t)) => (self.position(s), self.position(t)),
				None => (None, None),
			};
			layout.place_line(link.key.clone(), from, to);
		}
		layout
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::fund_graph::scene::FALLBACK_POINT;
	use crate::components::fund_graph::types::{Fund, FundAttribute, FundNode, FundType, Link};

	fn fund(id: &str, manager: &str) -> FundNode {
		FundNode::fund(
			id,
			Fund {
				name: id.to_uppercase(),
				manager: manager.into(),
				year: "2020".into(),
				fund_type: FundType::RealEstate,
				is_open: false,
			},
		)
	}

	fn sample() -> GraphElements {
		GraphElements {
			nodes: vec![
				fund("f1", "M1"),
				fund("f2", "M1"),
				fund("f3", "M2"),
				FundNode::group_root("m1", "M1", FundAttribute::Manager),
			],
			links: vec![Link::new("f1", "m1"), Link::new("f2", "m1")],
		}
	}

	fn state() -> FundGraphState {
		FundGraphState::new(&sample(), 1000.0, 800.0, &GraphConfig::default())
	}

	fn screen_of(state: &FundGraphState, idx: usize) -> (f64, f64) {
		let p = state.position(idx).unwrap();
		(
			p.x * state.transform.k + state.transform.x,
			p.y * state.transform.k + state.transform.y,
		)
	}

	#[test]
	fn builds_all_four_forces() {
		let state = state();
		assert_eq!(
			state.simulation.force_names().collect::<Vec<_>>(),
			["link", "charge", "collide", "center"]
		);
		assert_eq!(state.node_ids(), ["f1", "f2", "f3", "m1"]);
	}

	#[test]
	fn input_is_not_mutated() {
		let input = sample();
		let before = input.clone();
		let mut state = FundGraphState::new(&input, 1000.0, 800.0, &GraphConfig::default());
		for _ in 0..10 {
			state.tick();
		}
		assert_eq!(input, before);
	}

	#[test]
	fn lines_follow_node_positions_every_tick() {
		let mut state = state();
		let keys = link_keys(&sample().links);
		for _ in 0..25 {
			state.tick();
			let layout = state.layout();
			let line = layout.line(&keys[0]);
			assert_eq!(line.from, state.position(0).unwrap());
			assert_eq!(line.to, state.position(3).unwrap());
		}
	}

	#[test]
	fn cards_are_centered_on_nodes() {
		let mut state = state();
		state.tick();
		let layout = state.layout();
		for (idx, id) in state.node_ids().iter().enumerate() {
			let p = state.position(idx).unwrap();
			assert_eq!(layout.card_origin(id), Point::new(p.x - 90.0, p.y - 60.0));
		}
	}

	#[test]
	fn dangling_link_renders_collapsed() {
		let mut input = sample();
		input.links.push(Link::new("f3", "nowhere"));
		let state = FundGraphState::new(&input, 1000.0, 800.0, &GraphConfig::default());
		let keys = link_keys(&input.links);
		let line = state.layout().line(&keys[2]);
		assert_eq!((line.from, line.to), (FALLBACK_POINT, FALLBACK_POINT));
		match state.simulation.force("link") {
			Some(Force::Link(link)) => assert_eq!(link.links().len(), 2),
			other => panic!("unexpected force {other:?}"),
		}
	}

	#[test]
	fn drag_pins_reheats_and_releases() {
		let mut state = state();
		for _ in 0..400 {
			state.tick();
		}
		assert!(!state.simulation.is_running());

		let (sx, sy) = screen_of(&state, 2);
		assert!(state.begin_drag(sx + 10.0, sy - 5.0));
		assert!(state.simulation.is_running());
		assert_eq!(state.simulation.alpha_target(), 0.3);
		assert_eq!(state.drag.node_idx, Some(2));

		let grabbed = state.position(2).unwrap();
		state.drag_to(sx + 110.0, sy + 45.0);
		for _ in 0..10 {
			state.tick();
			let node = state.simulation.node(2).unwrap();
			assert!((node.x - (grabbed.x + 100.0)).abs() < 1e-9);
			assert!((node.y - (grabbed.y + 50.0)).abs() < 1e-9);
			assert_eq!((node.fx, node.fy), (Some(node.x), Some(node.y)));
		}

		state.end_drag();
		assert_eq!(state.simulation.alpha_target(), 0.0);
		assert!(!state.simulation.node(2).unwrap().is_fixed());
		assert!(!state.drag.active());

		let released = state.position(2).unwrap();
		state.tick();
		assert_ne!(state.position(2).unwrap(), released);
	}

	#[test]
	fn second_press_during_drag_keeps_first_drag() {
		let mut state = state();
		for _ in 0..400 {
			state.tick();
		}
		assert!(!state.simulation.is_running());

		let (ax, ay) = screen_of(&state, 0);
		assert!(state.begin_drag(ax, ay));
		let (bx, by) = screen_of(&state, 3);
		assert!(state.begin_drag(bx, by));
		assert_eq!(state.drag.node_idx, Some(0));
		assert!(!state.simulation.node(3).unwrap().is_fixed());

		state.end_drag();
		state.end_drag();
		assert_eq!(state.simulation.alpha_target(), 0.0);
		assert!(state.simulation.nodes().iter().all(|n| !n.is_fixed()));

		for _ in 0..5000 {
			state.tick();
		}
		assert!(!state.simulation.is_running());
	}

	#[test]
	fn drag_respects_zoom() {
		let mut state = state();
		state.tick();
		state.transform = ViewTransform {
			x: 30.0,
			y: -20.0,
			k: 2.0,
		};
		// the last card paints on top, so its center always hits it
		let start = state.position(3).unwrap();
		let (sx, sy) = screen_of(&state, 3);
		assert!(state.begin_drag(sx, sy));
		assert_eq!(state.drag.node_idx, Some(3));
		state.drag_to(sx + 40.0, sy + 20.0);
		let node = state.simulation.node(3).unwrap();
		assert!((node.fx.unwrap() - (start.x + 20.0)).abs() < 1e-9);
		assert!((node.fy.unwrap() - (start.y + 10.0)).abs() < 1e-9);
	}

	#[test]
	fn background_press_does_not_drag() {
		let mut state = state();
		state.tick();
		assert!(!state.begin_drag(-1.0e6, -1.0e6));
		assert!(!state.drag.active());
		assert_eq!(state.simulation.alpha_target(), 0.0);
	}

	#[test]
	fn overlapping_cards_pick_topmost() {
		let input = GraphElements {
			nodes: vec![fund("under", "M"), fund("over", "M")],
			links: vec![],
		};
		let mut state = FundGraphState::new(&input, 1000.0, 800.0, &GraphConfig::default());
		for idx in 0..2 {
			let node = state.simulation.node_mut(idx).unwrap();
			node.x = 100.0 + idx as f64 * 20.0;
			node.y = 100.0;
		}
		assert_eq!(state.card_at_position(110.0, 100.0), Some(1));
		assert_eq!(state.card_at_position(20.0, 100.0), Some(0));
		assert_eq!(state.card_at_position(500.0, 500.0), None);
	}

	#[test]
	fn pan_and_zoom_update_transform() {
		let mut state = state();
		state.begin_pan(10.0, 10.0);
		state.pan_to(40.0, -10.0);
		state.end_pan();
		state.pan_to(1000.0, 1000.0);
		assert_eq!((state.transform.x, state.transform.y), (30.0, -20.0));

		let before = state.screen_to_graph(200.0, 150.0);
		state.zoom_at(200.0, 150.0, -1.0);
		assert!((state.transform.k - 1.1).abs() < 1e-12);
		let after = state.screen_to_graph(200.0, 150.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);

		for _ in 0..100 {
			state.zoom_at(0.0, 0.0, 1.0);
		}
		assert_eq!(state.transform.k, 0.1);
	}

	#[test]
	fn resize_retargets_center() {
		let mut state = state();
		state.resize(400.0, 200.0);
		match state.simulation.force("center") {
			Some(Force::Center(center)) => assert_eq!((center.x, center.y), (200.0, 100.0)),
			other => panic!("unexpected force {other:?}"),
		}
	}
}
