//! Tunable parameters for the layout, zoom and look of the graph.
//!
//! Every struct implements `Default` with the stock values and deserializes
//! with `#[serde(default)]`, so a host page may override a single field:
//!
//! ```json
//! { "simulation": { "link_distance": 300 }, "zoom": { "max": 4 } }
//! ```

use serde::Deserialize;

use super::theme::Theme;

/// Force and cooling parameters for the layout simulation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
	/// Target length of every link.
	pub link_distance: f64,
	/// Many-body strength. Negative values repel.
	pub charge_strength: f64,
	/// Collision radius of every node.
	pub collide_radius: f64,
	pub alpha_min: f64,
	pub velocity_decay: f64,
	/// Alpha target held while a node is being dragged.
	pub drag_alpha_target: f64,
}

impl Default for SimulationConfig {
	fn default() -> Self {
		Self {
			link_distance: 240.0,
			charge_strength: -240.0,
			collide_radius: 110.0,
			alpha_min: 0.001,
			velocity_decay: 0.4,
			drag_alpha_target: 0.3,
		}
	}
}

/// Zoom factor limits.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ZoomBounds {
	pub min: f64,
	pub max: f64,
}

impl ZoomBounds {
	pub fn clamp(&self, k: f64) -> f64 {
		if self.min > self.max {
			return k.clamp(self.max, self.min);
		}
		k.clamp(self.min, self.max)
	}
}

impl Default for ZoomBounds {
	fn default() -> Self {
		Self {
			min: 0.1,
			max: 10.0,
		}
	}
}

/// Complete configuration for the fund graph component.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	pub simulation: SimulationConfig,
	pub theme: Theme,
	pub zoom: ZoomBounds,
}
