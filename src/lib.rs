//! fund-graph: Interactive force-directed graph of investment funds.
//!
//! This crate provides a WASM-based visualization that clusters funds around
//! group roots (a shared manager, vintage year or fund type) and lays them out
//! with a cooling force simulation, with card dragging and pan/zoom.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, debug, info, warn};
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::fund_graph::{
	Fund, FundAttribute, FundGraph, FundNode, FundType, GraphConfig, GraphElements, Link,
};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("fund-graph: logging initialized");
}

/// Parse the JSON body of the script element with the given id.
///
/// A missing element is not an error; a malformed body is logged and ignored.
fn load_script_json<T: DeserializeOwned>(id: &str) -> Option<T> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id(id)?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<T>(&json_text) {
		Ok(value) => {
			debug!("fund-graph: parsed #{}", id);
			Some(value)
		}
		Err(e) => {
			warn!("fund-graph: failed to parse #{}: {}", id, e);
			None
		}
	}
}

/// Main application component.
/// Loads graph data (`#graph-data`) and optional configuration
/// (`#graph-config`) from the DOM and renders the fund graph.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let graph_data: GraphElements = load_script_json("graph-data").unwrap_or_default();
	let config: GraphConfig = load_script_json("graph-config").unwrap_or_default();
	info!(
		"fund-graph: loaded {} nodes, {} links",
		graph_data.nodes.len(),
		graph_data.links.len()
	);
	let graph_signal = Signal::derive(move || graph_data.clone());

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Fund Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<FundGraph data=graph_signal fullscreen=true config=config />
			<div class="graph-overlay">
				<h1>"Funds"</h1>
				<p class="subtitle">"Drag cards to reposition. Scroll to zoom. Drag background to pan."</p>
			</div>
		</div>
	}
}
