//! SVG rendering for the fund graph.
//!
//! Everything sits in one pan/zoom group, drawn in three layers:
//! 1. `#graph-links`: one `<line>` per link
//! 2. `#graph-nodes`: one nested `<svg>` card per node
//! 3. `#graph-labels`: reserved overlay layer
//!
//! Element sets follow the [`Scene`] (keyed, so retained elements stay in the
//! DOM); positions follow the per-frame [`Layout`].

use leptos::prelude::*;

use super::card::CardContent;
use super::scene::{Layout, LinkKey, Scene};
use super::theme::{CardStyle, Theme};

#[component]
pub fn GraphLayers(scene: RwSignal<Scene>, layout: RwSignal<Layout>, theme: Theme) -> impl IntoView {
	let card_style = theme.card;
	let link_style = theme.link;

	view! {
		<g class="graph-viewport" transform=move || layout.with(|l| l.transform.to_svg())>
			<g
				id="graph-links"
				stroke=link_style.color.to_css()
				stroke-opacity=link_style.opacity.to_string()
			>
				<For
					each=move || scene.with(|s| s.line_keys())
					key=|link| link.clone()
					children=move |link| view! { <LinkLine link=link scene=scene layout=layout /> }
				/>
			</g>
			<g id="graph-nodes">
				<For
					each=move || scene.with(|s| s.card_ids())
					key=|node_id| node_id.clone()
					children=move |node_id| {
						let style = card_style.clone();
						view! { <NodeCard node_id=node_id scene=scene layout=layout style=style /> }
					}
				/>
			</g>
			<g id="graph-labels"></g>
		</g>
	}
}

#[component]
fn LinkLine(link: LinkKey, scene: RwSignal<Scene>, layout: RwSignal<Layout>) -> impl IntoView {
	let line = {
		let link = link.clone();
		Memo::new(move |_| layout.with(|l| l.line(&link)))
	};
	let stroke_width =
		move || scene.with(|s| s.line(&link).map(|l| l.stroke_width.to_string()));

	view! {
		<line
			stroke-width=stroke_width
			x1=move || line.get().from.x.to_string()
			y1=move || line.get().from.y.to_string()
			x2=move || line.get().to.x.to_string()
			y2=move || line.get().to.y.to_string()
		/>
	}
}

/// A card positioned by its top-left corner. The body is rebuilt from
/// scratch whenever the scene is rejoined.
#[component]
fn NodeCard(
	node_id: String,
	scene: RwSignal<Scene>,
	layout: RwSignal<Layout>,
	style: CardStyle,
) -> impl IntoView {
	let origin = {
		let node_id = node_id.clone();
		Memo::new(move |_| layout.with(|l| l.card_origin(&node_id)))
	};
	let (width, height) = (style.width.to_string(), style.height.to_string());

	view! {
		<svg
			class="fund-card"
			width=width
			height=height
			x=move || origin.get().x.to_string()
			y=move || origin.get().y.to_string()
		>
			{move || {
				scene.with(|s| s.card(&node_id).map(|card| card_body(&card.content, &style)))
			}}
		</svg>
	}
}

fn card_body(content: &CardContent, style: &CardStyle) -> impl IntoView + use<> {
	let text_fill = style.text_color.to_css();
	let lines = content
		.lines
		.iter()
		.enumerate()
		.map(|(i, text)| {
			view! {
				<text
					transform=style.line_transform(i)
					fill=text_fill.clone()
					font-weight=CardContent::is_title(i).then_some("bold")
				>
					{text.clone()}
				</text>
			}
		})
		.collect_view();

	view! {
		<g>
			<rect
				class="fund-label-card"
				fill=style.fill_for(content.node_type).to_css()
				width=style.width.to_string()
				height=style.height.to_string()
				rx=style.corner_radius.to_string()
			/>
			{lines}
		</g>
	}
}
