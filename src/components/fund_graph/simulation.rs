//! Force-directed layout simulation.
//!
//! A single-threaded stepper with the familiar d3-force behaviour: a set of
//! named forces adjusts node velocities each tick, velocities decay, and a
//! global `alpha` cools geometrically until it drops below `alpha_min`, at
//! which point the simulation stops until restarted.
//!
//! Nodes with a fixed position (`fx`/`fy`) are snapped to it on every tick;
//! this is how dragging pins a node.

use std::f64::consts::PI;

/// Ticks it takes alpha to cool from 1 to `alpha_min` with no target.
const COOLING_TICKS: f64 = 300.0;
const INITIAL_RADIUS: f64 = 10.0;

/// A node as seen by the simulation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimNode {
	pub index: usize,
	pub x: f64,
	pub y: f64,
	pub vx: f64,
	pub vy: f64,
	pub fx: Option<f64>,
	pub fy: Option<f64>,
}

impl SimNode {
	/// A node with no seeded position; it is placed when the simulation is built.
	pub fn unplaced() -> Self {
		Self {
			x: f64::NAN,
			y: f64::NAN,
			..Self::default()
		}
	}

	pub fn at(x: f64, y: f64) -> Self {
		Self {
			x,
			y,
			..Self::default()
		}
	}

	pub fn is_fixed(&self) -> bool {
		self.fx.is_some() || self.fy.is_some()
	}
}

/// Linear congruential generator used to separate coincident nodes.
#[derive(Clone, Debug)]
pub struct Lcg {
	state: u64,
}

impl Lcg {
	const A: u64 = 1_664_525;
	const C: u64 = 1_013_904_223;
	const M: u64 = 1 << 32;

	pub fn new() -> Self {
		Self { state: 1 }
	}

	/// Next value in `[0, 1)`.
	pub fn next_f64(&mut self) -> f64 {
		self.state = (Self::A * self.state + Self::C) % Self::M;
		self.state as f64 / Self::M as f64
	}

	fn jiggle(&mut self) -> f64 {
		(self.next_f64() - 0.5) * 1e-6
	}
}

impl Default for Lcg {
	fn default() -> Self {
		Self::new()
	}
}

/// Pairwise attraction or repulsion between every pair of nodes.
#[derive(Clone, Debug)]
pub struct ManyBody {
	pub strength: f64,
	pub distance_min: f64,
}

impl ManyBody {
	pub fn new(strength: f64) -> Self {
		Self {
			strength,
			distance_min: 1.0,
		}
	}

	fn apply(&self, nodes: &mut [SimNode], alpha: f64, random: &mut Lcg) {
		let distance_min2 = self.distance_min * self.distance_min;
		for i in 0..nodes.len() {
			let (xi, yi) = (nodes[i].x, nodes[i].y);
			let (mut dvx, mut dvy) = (0.0, 0.0);
			for (j, other) in nodes.iter().enumerate() {
				if i == j {
					continue;
				}
				let (mut x, mut y) = (other.x - xi, other.y - yi);
				let mut l = x * x + y * y;
				if x == 0.0 {
					x = random.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = random.jiggle();
					l += y * y;
				}
				if l < distance_min2 {
					l = (distance_min2 * l).sqrt();
				}
				dvx += x * self.strength * alpha / l;
				dvy += y * self.strength * alpha / l;
			}
			nodes[i].vx += dvx;
			nodes[i].vy += dvy;
		}
	}
}

/// Spring force pulling linked nodes toward a fixed distance.
#[derive(Clone, Debug)]
pub struct LinkForce {
	pub distance: f64,
	links: Vec<(usize, usize)>,
	strengths: Vec<f64>,
	biases: Vec<f64>,
}

impl LinkForce {
	/// `links` are `(source, target)` node indices.
	pub fn new(links: Vec<(usize, usize)>, distance: f64) -> Self {
		Self {
			distance,
			links,
			strengths: Vec::new(),
			biases: Vec::new(),
		}
	}

	pub fn links(&self) -> &[(usize, usize)] {
		&self.links
	}

	/// Strength and bias come from node degrees, so a hub is moved less than
	/// the leaves attached to it.
	fn initialize(&mut self, node_count: usize) {
		self.links
			.retain(|&(source, target)| source < node_count && target < node_count);
		let mut degree = vec![0usize; node_count];
		for &(source, target) in &self.links {
			degree[source] += 1;
			degree[target] += 1;
		}
		self.strengths = self
			.links
			.iter()
			.map(|&(s, t)| 1.0 / degree[s].min(degree[t]) as f64)
			.collect();
		self.biases = self
			.links
			.iter()
			.map(|&(s, t)| degree[s] as f64 / (degree[s] + degree[t]) as f64)
			.collect();
	}

	fn apply(&self, nodes: &mut [SimNode], alpha: f64, random: &mut Lcg) {
		for (i, &(s, t)) in self.links.iter().enumerate() {
			let (source, target) = (&nodes[s], &nodes[t]);
			let mut x = target.x + target.vx - source.x - source.vx;
			let mut y = target.y + target.vy - source.y - source.vy;
			if x == 0.0 {
				x = random.jiggle();
			}
			if y == 0.0 {
				y = random.jiggle();
			}
			let l = (x * x + y * y).sqrt();
			let l = (l - self.distance) / l * alpha * self.strengths[i];
			x *= l;
			y *= l;
			let bias = self.biases[i];
			nodes[t].vx -= x * bias;
			nodes[t].vy -= y * bias;
			nodes[s].vx += x * (1.0 - bias);
			nodes[s].vy += y * (1.0 - bias);
		}
	}
}

/// Pushes apart nodes whose circles of `radius` overlap.
#[derive(Clone, Debug)]
pub struct Collide {
	pub radius: f64,
	pub strength: f64,
}

impl Collide {
	pub fn new(radius: f64) -> Self {
		Self {
			radius,
			strength: 1.0,
		}
	}

	fn apply(&self, nodes: &mut [SimNode], random: &mut Lcg) {
		let r = self.radius * 2.0;
		// equal radii: each side takes half of the correction
		let share = 0.5;
		for i in 0..nodes.len() {
			let xi = nodes[i].x + nodes[i].vx;
			let yi = nodes[i].y + nodes[i].vy;
			for j in (i + 1)..nodes.len() {
				let mut x = xi - nodes[j].x - nodes[j].vx;
				let mut y = yi - nodes[j].y - nodes[j].vy;
				let mut l = x * x + y * y;
				if l >= r * r {
					continue;
				}
				if x == 0.0 {
					x = random.jiggle();
					l += x * x;
				}
				if y == 0.0 {
					y = random.jiggle();
					l += y * y;
				}
				let d = l.sqrt();
				let m = (r - d) / d * self.strength;
				x *= m;
				y *= m;
				nodes[i].vx += x * share;
				nodes[i].vy += y * share;
				nodes[j].vx -= x * (1.0 - share);
				nodes[j].vy -= y * (1.0 - share);
			}
		}
	}
}

/// Translates all nodes so their mean position sits on `(x, y)`.
#[derive(Clone, Debug)]
pub struct Center {
	pub x: f64,
	pub y: f64,
	pub strength: f64,
}

impl Center {
	pub fn new(x: f64, y: f64) -> Self {
		Self {
			x,
			y,
			strength: 1.0,
		}
	}

	fn apply(&self, nodes: &mut [SimNode]) {
		if nodes.is_empty() {
			return;
		}
		let n = nodes.len() as f64;
		let (sx, sy) = nodes
			.iter()
			.fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
		let (dx, dy) = (
			(sx / n - self.x) * self.strength,
			(sy / n - self.y) * self.strength,
		);
		for node in nodes {
			node.x -= dx;
			node.y -= dy;
		}
	}
}

/// A force the simulation can apply each tick.
#[derive(Clone, Debug)]
pub enum Force {
	ManyBody(ManyBody),
	Link(LinkForce),
	Collide(Collide),
	Center(Center),
}

impl Force {
	fn initialize(&mut self, node_count: usize) {
		if let Force::Link(link) = self {
			link.initialize(node_count);
		}
	}

	fn apply(&self, nodes: &mut [SimNode], alpha: f64, random: &mut Lcg) {
		match self {
			Force::ManyBody(f) => f.apply(nodes, alpha, random),
			Force::Link(f) => f.apply(nodes, alpha, random),
			Force::Collide(f) => f.apply(nodes, random),
			Force::Center(f) => f.apply(nodes),
		}
	}
}

/// The layout simulation: nodes, named forces and cooling state.
#[derive(Clone, Debug)]
pub struct Simulation {
	nodes: Vec<SimNode>,
	forces: Vec<(&'static str, Force)>,
	alpha: f64,
	alpha_min: f64,
	alpha_decay: f64,
	alpha_target: f64,
	velocity_decay: f64,
	running: bool,
	random: Lcg,
}

impl Simulation {
	/// Builds a running simulation, placing every node that has no position.
	pub fn new(nodes: Vec<SimNode>) -> Self {
		let alpha_min = 0.001;
		let mut sim = Self {
			nodes,
			forces: Vec::new(),
			alpha: 1.0,
			alpha_min,
			alpha_decay: decay_for(alpha_min),
			alpha_target: 0.0,
			velocity_decay: 0.4,
			running: true,
			random: Lcg::new(),
		};
		sim.initialize_nodes();
		sim
	}

	fn initialize_nodes(&mut self) {
		for (i, node) in self.nodes.iter_mut().enumerate() {
			node.index = i;
			if let Some(fx) = node.fx {
				node.x = fx;
			}
			if let Some(fy) = node.fy {
				node.y = fy;
			}
			if !node.x.is_finite() || !node.y.is_finite() {
				let radius = INITIAL_RADIUS * (0.5 + i as f64).sqrt();
				let angle = i as f64 * PI * (3.0 - 5f64.sqrt());
				node.x = radius * angle.cos();
				node.y = radius * angle.sin();
			}
			if !node.vx.is_finite() || !node.vy.is_finite() {
				node.vx = 0.0;
				node.vy = 0.0;
			}
		}
	}

	/// Adds `force` under `name`, replacing any force already registered under it.
	pub fn with_force(mut self, name: &'static str, mut force: Force) -> Self {
		force.initialize(self.nodes.len());
		match self.forces.iter_mut().find(|(n, _)| *n == name) {
			Some(slot) => slot.1 = force,
			None => self.forces.push((name, force)),
		}
		self
	}

	pub fn force(&self, name: &str) -> Option<&Force> {
		self.forces.iter().find(|(n, _)| *n == name).map(|(_, f)| f)
	}

	pub fn force_mut(&mut self, name: &str) -> Option<&mut Force> {
		self.forces
			.iter_mut()
			.find(|(n, _)| *n == name)
			.map(|(_, f)| f)
	}

	pub fn force_names(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.forces.iter().map(|(n, _)| *n)
	}

	pub fn with_alpha_min(mut self, alpha_min: f64) -> Self {
		self.alpha_min = alpha_min;
		self.alpha_decay = decay_for(alpha_min);
		self
	}

	pub fn with_velocity_decay(mut self, velocity_decay: f64) -> Self {
		self.velocity_decay = velocity_decay;
		self
	}

	/// Advances the simulation by one step, regardless of whether it is running.
	pub fn tick(&mut self) {
		self.alpha += (self.alpha_target - self.alpha) * self.alpha_decay;

		for (_, force) in &self.forces {
			force.apply(&mut self.nodes, self.alpha, &mut self.random);
		}

		let keep = 1.0 - self.velocity_decay;
		for node in &mut self.nodes {
			match node.fx {
				Some(fx) => {
					node.x = fx;
					node.vx = 0.0;
				}
				None => {
					node.vx *= keep;
					node.x += node.vx;
				}
			}
			match node.fy {
				Some(fy) => {
					node.y = fy;
					node.vy = 0.0;
				}
				None => {
					node.vy *= keep;
					node.y += node.vy;
				}
			}
		}
	}

	/// Timer callback, called once per animation frame.
	///
	/// Returns `true` if a tick happened. The simulation stops itself once
	/// alpha falls below `alpha_min`.
	pub fn step(&mut self) -> bool {
		if !self.running {
			return false;
		}
		self.tick();
		if self.alpha < self.alpha_min {
			self.running = false;
			log::debug!("fund-graph: simulation cooled after reaching alpha {:.5}", self.alpha);
		}
		true
	}

	pub fn restart(&mut self) {
		self.running = true;
	}

	pub fn stop(&mut self) {
		self.running = false;
	}

	pub fn is_running(&self) -> bool {
		self.running
	}

	pub fn alpha(&self) -> f64 {
		self.alpha
	}

	pub fn set_alpha(&mut self, alpha: f64) {
		self.alpha = alpha;
	}

	pub fn alpha_target(&self) -> f64 {
		self.alpha_target
	}

	pub fn set_alpha_target(&mut self, alpha_target: f64) {
		self.alpha_target = alpha_target;
	}

	pub fn alpha_min(&self) -> f64 {
		self.alpha_min
	}

	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	pub fn node(&self, index: usize) -> Option<&SimNode> {
		self.nodes.get(index)
	}

	pub fn node_mut(&mut self, index: usize) -> Option<&mut SimNode> {
		self.nodes.get_mut(index)
	}
}

fn decay_for(alpha_min: f64) -> f64 {
	1.0 - alpha_min.powf(1.0 / COOLING_TICKS)
}
