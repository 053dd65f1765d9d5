//! Force-directed fund graph component.
//!
//! Renders funds and the group roots that cluster them as SVG cards joined
//! by lines, with:
//! - A cooling force simulation (link, charge, collide and center forces)
//! - Keyed enter/update/exit reconciliation when the data changes
//! - Card dragging that pins a node while held, plus pan and zoom
//! - Configurable layout parameters and card/link styling
//!
//! # Example
//!
//! ```ignore
//! use fund_graph::{FundAttribute, FundGraph, FundNode, GraphElements, Link};
//!
//! let data = GraphElements {
//!     nodes: vec![
//!         FundNode::group_root("manager:M1", "M1", FundAttribute::Manager),
//!         FundNode::fund("f1", fund),
//!     ],
//!     links: vec![Link::new("manager:M1", "f1")],
//! };
//!
//! view! { <FundGraph data=Signal::stored(data) fullscreen=true /> }
//! ```

mod card;
mod component;
pub mod config;
mod render;
mod scene;
mod simulation;
mod state;
pub mod theme;
mod types;

pub use component::FundGraph;
pub use config::{GraphConfig, SimulationConfig, ZoomBounds};
pub use theme::Theme;
pub use types::{
	Fund, FundAttribute, FundNode, FundType, GraphElements, Link, NodeKind, NodeType,
};
