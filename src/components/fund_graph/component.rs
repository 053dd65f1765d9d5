//! Leptos component wrapping the fund graph SVG.
//!
//! The component mounts the SVG layers and wires mouse/wheel handlers for
//! card dragging, panning, and zooming. An animation loop runs via
//! `requestAnimationFrame`, stepping the simulation and publishing a new
//! [`Layout`] each frame the positions or the view changed.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::ev;
use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{HtmlDivElement, MouseEvent, WheelEvent, Window};

use super::config::GraphConfig;
use super::render::GraphLayers;
use super::scene::{JoinSummary, Layout, Scene};
use super::state::FundGraphState;
use super::types::GraphElements;

/// Simulation state plus a flag for view changes the next frame must publish.
struct GraphContext {
	state: FundGraphState,
	dirty: bool,
}

/// Renders an interactive force-directed graph of fund cards.
///
/// Pass graph data via the reactive `data` signal; each new value is joined
/// against the cards and lines already on screen and restarts the layout.
/// The component sizes itself to its container by default; set
/// `fullscreen = true` to fill the viewport and follow window resizes.
/// Explicit `width`/`height` override automatic sizing.
#[component]
pub fn FundGraph(
	#[prop(into)] data: Signal<GraphElements>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
	#[prop(optional)] config: GraphConfig,
) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let scene = RwSignal::new(Scene::new());
	let layout = RwSignal::new(Layout::default());
	let theme = config.theme.clone();

	let context: Rc<RefCell<Option<GraphContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (context_init, animate_init) = (context.clone(), animate.clone());

	Effect::new(move |_| {
		let elements = data.get();
		let Some(container) = container_ref.get() else {
			return;
		};
		let Some(window) = web_sys::window() else {
			return;
		};
		let (w, h) = if fullscreen {
			window_size(&window)
		} else {
			container_size(&container, width, height)
		};

		let mut next = FundGraphState::new(&elements, w, h, &config);
		// Keep the user's pan and zoom across data updates.
		if let Some(ref previous) = *context_init.borrow() {
			next.transform = previous.state.transform.clone();
		}

		let mut summary = JoinSummary::default();
		scene.update(|s| summary = s.join(&elements, &config.theme.link));
		debug!(
			"fund-graph: joined cards {:?}, lines {:?}",
			summary.cards, summary.lines
		);

		layout.set(next.layout());
		*context_init.borrow_mut() = Some(GraphContext {
			state: next,
			dirty: false,
		});

		// One loop serves every data update.
		if animate_init.borrow().is_some() {
			return;
		}
		let (context_anim, animate_inner) = (context_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			// The layout signal goes away with the component.
			if layout.try_with_untracked(|_| ()).is_none() {
				debug!("fund-graph: unmounted, stopping animation loop");
				return;
			}
			let frame = match *context_anim.borrow_mut() {
				Some(ref mut c) => {
					let moved = c.state.tick();
					if moved || c.dirty {
						c.dirty = false;
						Some(c.state.layout())
					} else {
						None
					}
				}
				None => None,
			};
			if let Some(frame) = frame {
				layout.set(frame);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(win) = web_sys::window() {
					let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	if fullscreen {
		let context_resize = context.clone();
		let handle = window_event_listener(ev::resize, move |_| {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = window_size(&win);
			if let Some(ref mut c) = *context_resize.borrow_mut() {
				c.state.resize(nw, nh);
				c.dirty = true;
			}
		});
		on_cleanup(move || handle.remove());
	}

	let context_md = context.clone();
	let on_mousedown = move |ev: MouseEvent| {
		// Only the primary button drags or pans.
		if ev.button() != 0 {
			return;
		}
		let Some((x, y)) = local_point(container_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_md.borrow_mut() {
			if !c.state.begin_drag(x, y) {
				c.state.begin_pan(x, y);
			}
			c.dirty = true;
		}
	};

	let context_mm = context.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(container_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_mm.borrow_mut() {
			if c.state.drag.active() {
				c.state.drag_to(x, y);
				c.dirty = true;
			} else if c.state.pan.active {
				c.state.pan_to(x, y);
				c.dirty = true;
			}
		}
	};

	let context_mu = context.clone();
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_mu.borrow_mut() {
			c.state.end_drag();
			c.state.end_pan();
		}
	};

	let context_ml = context.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut c) = *context_ml.borrow_mut() {
			c.state.end_drag();
			c.state.end_pan();
		}
	};

	let context_wh = context;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_point(container_ref, &ev) else {
			return;
		};
		if let Some(ref mut c) = *context_wh.borrow_mut() {
			c.state.zoom_at(x, y, ev.delta_y());
			c.dirty = true;
		}
	};

	let container_style = match (width, height) {
		(Some(w), Some(h)) => format!("width: {w}px; height: {h}px;"),
		(Some(w), None) => format!("width: {w}px; height: 100%;"),
		(None, Some(h)) => format!("width: 100%; height: {h}px;"),
		(None, None) => "width: 100%; height: 100%;".to_string(),
	};

	view! {
		<div
			node_ref=container_ref
			class="fund-graph"
			style=container_style
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
		>
			<svg id="graph-svg" width="100%" height="100%" style="display: block; cursor: grab;">
				<GraphLayers scene=scene layout=layout theme=theme />
			</svg>
		</div>
	}
}

fn window_size(window: &Window) -> (f64, f64) {
	(
		window
			.inner_width()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(800.0),
		window
			.inner_height()
			.ok()
			.and_then(|v| v.as_f64())
			.unwrap_or(600.0),
	)
}

fn container_size(container: &HtmlDivElement, width: Option<f64>, height: Option<f64>) -> (f64, f64) {
	let measured = |v: i32, fallback: f64| if v > 0 { v as f64 } else { fallback };
	(
		width.unwrap_or_else(|| measured(container.client_width(), 800.0)),
		height.unwrap_or_else(|| measured(container.client_height(), 600.0)),
	)
}

/// Pointer position relative to the container's top-left corner.
fn local_point(container_ref: NodeRef<leptos::html::Div>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let container = container_ref.get_untracked()?;
	let rect = container.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}
