//! The element model rendered into SVG.
//!
//! [`Scene`] holds one card per node and one line per link, reconciled
//! against each new [`GraphElements`] by key. [`Layout`] is the per-tick
//! geometry of those elements: card corners and line endpoints.

use std::collections::{HashMap, HashSet};

use super::card::CardContent;
use super::state::ViewTransform;
use super::theme::LinkStyle;
use super::types::{GraphElements, Link};

/// Where an element goes when its node has no usable position.
pub const FALLBACK_POINT: Point = Point { x: 0.0, y: 0.0 };

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	pub x: f64,
	pub y: f64,
}

impl Point {
	pub const fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// `None` unless both coordinates are finite.
	pub fn finite(x: f64, y: f64) -> Option<Self> {
		(x.is_finite() && y.is_finite()).then_some(Self { x, y })
	}
}

/// Identity of a link element. Repeated `(source, target)` pairs are told
/// apart by their occurrence count.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LinkKey {
	pub source: String,
	pub target: String,
	pub occurrence: usize,
}

/// Keys for `links`, in order.
pub fn link_keys(links: &[Link]) -> Vec<LinkKey> {
	let mut seen: HashMap<(&str, &str), usize> = HashMap::new();
	links
		.iter()
		.map(|link| {
			let count = seen
				.entry((link.source.as_str(), link.target.as_str()))
				.or_insert(0);
			let key = LinkKey {
				source: link.source.clone(),
				target: link.target.clone(),
				occurrence: *count,
			};
			*count += 1;
			key
		})
		.collect()
}

/// Sizes of the enter, update and exit sets of one join.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JoinCounts {
	pub enter: usize,
	pub update: usize,
	pub exit: usize,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JoinSummary {
	pub cards: JoinCounts,
	pub lines: JoinCounts,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CardElement {
	pub id: String,
	pub content: CardContent,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineElement {
	pub key: LinkKey,
	pub stroke_width: f64,
}

/// Cards and lines currently bound to data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
	cards: Vec<CardElement>,
	card_index: HashMap<String, usize>,
	lines: Vec<LineElement>,
	line_index: HashMap<LinkKey, usize>,
}

impl Scene {
	pub fn new() -> Self {
		Self::default()
	}

	/// Rebinds the scene to `elements`.
	///
	/// Elements whose key is new enter, elements whose key disappeared exit,
	/// and the rest are updated by rebuilding their content from the new data.
	/// Element order follows the data order. Duplicate node ids keep only
	/// their first node.
	pub fn join(&mut self, elements: &GraphElements, link_style: &LinkStyle) -> JoinSummary {
		let mut cards = Vec::with_capacity(elements.nodes.len());
		let mut card_index = HashMap::with_capacity(elements.nodes.len());
		for node in &elements.nodes {
			if card_index.contains_key(&node.id) {
				log::warn!("fund-graph: duplicate node id {:?} ignored", node.id);
				continue;
			}
			card_index.insert(node.id.clone(), cards.len());
			cards.push(CardElement {
				id: node.id.clone(),
				content: CardContent::for_node(node),
			});
		}

		let keys = link_keys(&elements.links);
		let mut lines = Vec::with_capacity(keys.len());
		let mut line_index = HashMap::with_capacity(keys.len());
		for (key, link) in keys.into_iter().zip(&elements.links) {
			line_index.insert(key.clone(), lines.len());
			lines.push(LineElement {
				key,
				stroke_width: link_style.stroke_width(link.value),
			});
		}

		let summary = JoinSummary {
			cards: count_join(self.card_index.keys(), card_index.keys()),
			lines: count_join(self.line_index.keys(), line_index.keys()),
		};

		self.cards = cards;
		self.card_index = card_index;
		self.lines = lines;
		self.line_index = line_index;
		summary
	}

	pub fn cards(&self) -> &[CardElement] {
		&self.cards
	}

	pub fn lines(&self) -> &[LineElement] {
		&self.lines
	}

	pub fn card(&self, id: &str) -> Option<&CardElement> {
		self.card_index.get(id).map(|&i| &self.cards[i])
	}

	pub fn line(&self, key: &LinkKey) -> Option<&LineElement> {
		self.line_index.get(key).map(|&i| &self.lines[i])
	}

	pub fn card_ids(&self) -> Vec<String> {
		self.cards.iter().map(|c| c.id.clone()).collect()
	}

	pub fn line_keys(&self) -> Vec<LinkKey> {
		self.lines.iter().map(|l| l.key.clone()).collect()
	}
}

fn count_join<'a, K>(
	old: impl Iterator<Item = &'a K>,
	new: impl Iterator<Item = &'a K>,
) -> JoinCounts
where
	K: Eq + std::hash::Hash + 'a,
{
	let old: HashSet<&K> = old.collect();
	let new: HashSet<&K> = new.collect();
	let update = old.intersection(&new).count();
	JoinCounts {
		enter: new.len() - update,
		update,
		exit: old.len() - update,
	}
}

/// Top-left corner of a card centered on `center`.
pub fn card_origin(center: Option<Point>, width: f64, height: f64) -> Point {
	match center {
		Some(c) => Point::new(c.x - width / 2.0, c.y - height / 2.0),
		None => FALLBACK_POINT,
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Line {
	pub from: Point,
	pub to: Point,
}

/// Geometry of every element for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Layout {
	pub transform: ViewTransform,
	cards: HashMap<String, Point>,
	lines: HashMap<LinkKey, Line>,
}

impl Layout {
	pub fn new(transform: ViewTransform) -> Self {
		Self {
			transform,
			cards: HashMap::new(),
			lines: HashMap::new(),
		}
	}

	pub fn place_card(&mut self, id: String, origin: Point) {
		self.cards.insert(id, origin);
	}

	/// A line with an unresolved endpoint collapses to a point.
	pub fn place_line(&mut self, key: LinkKey, from: Option<Point>, to: Option<Point>) {
		let line = match (from, to) {
			(Some(from), Some(to)) => Line { from, to },
			_ => Line {
				from: FALLBACK_POINT,
				to: FALLBACK_POINT,
			},
		};
		self.lines.insert(key, line);
	}

	pub fn card_origin(&self, id: &str) -> Point {
		self.cards.get(id).copied().unwrap_or(FALLBACK_POINT)
	}

	pub fn line(&self, key: &LinkKey) -> Line {
		self.lines.get(key).copied().unwrap_or_default()
	}
}

impl Default for Layout {
	fn default() -> Self {
		Self::new(ViewTransform::identity())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::fund_graph::types::{Fund, FundAttribute, FundNode, FundType};

	fn group(id: &str) -> FundNode {
		FundNode::group_root(id, id.to_uppercase(), FundAttribute::Year)
	}

	fn elements(ids: &[&str], links: &[(&str, &str)]) -> GraphElements {
		GraphElements {
			nodes: ids.iter().map(|id| group(id)).collect(),
			links: links.iter().map(|(s, t)| Link::new(*s, *t)).collect(),
		}
	}

	#[test]
	fn first_join_enters_everything() {
		let mut scene = Scene::new();
		let summary = scene.join(
			&elements(&["a", "b", "c"], &[("a", "b"), ("a", "c")]),
			&LinkStyle::default(),
		);
		assert_eq!(
			summary.cards,
			JoinCounts {
				enter: 3,
				update: 0,
				exit: 0
			}
		);
		assert_eq!(summary.lines.enter, 2);
		assert_eq!(scene.card_ids(), ["a", "b", "c"]);
	}

	#[test]
	fn rejoin_counts_match_set_differences() {
		let style = LinkStyle::default();
		let mut scene = Scene::new();
		scene.join(&elements(&["a", "b", "c"], &[("a", "b"), ("a", "c")]), &style);

		let summary = scene.join(
			&elements(&["b", "c", "d", "e"], &[("a", "b"), ("d", "e")]),
			&style,
		);
		assert_eq!(
			summary.cards,
			JoinCounts {
				enter: 2,
				update: 2,
				exit: 1
			}
		);
		assert_eq!(
			summary.lines,
			JoinCounts {
				enter: 1,
				update: 1,
				exit: 1
			}
		);
		assert!(scene.card("a").is_none());
		assert_eq!(scene.card_ids(), ["b", "c", "d", "e"]);
	}

	#[test]
	fn update_rebuilds_card_content() {
		let style = LinkStyle::default();
		let mut scene = Scene::new();
		scene.join(&elements(&["a"], &[]), &style);
		let renamed = GraphElements {
			nodes: vec![FundNode::group_root("a", "renamed", FundAttribute::Manager)],
			links: vec![],
		};
		let summary = scene.join(&renamed, &style);
		assert_eq!(summary.cards.update, 1);
		let card = scene.card("a").unwrap();
		assert_eq!(card.content.lines[0], "renamed");
		assert_eq!(card.content.lines[1], "manager");
	}

	#[test]
	fn single_fund_without_links_gives_one_card_and_no_lines() {
		let input = GraphElements {
			nodes: vec![FundNode::fund(
				"f1",
				Fund {
					name: "Alpha".into(),
					manager: "M1".into(),
					year: "2020".into(),
					fund_type: FundType::VentureCapital,
					is_open: true,
				},
			)],
			links: vec![],
		};
		let mut scene = Scene::new();
		let summary = scene.join(&input, &LinkStyle::default());
		assert_eq!(summary.cards.enter, 1);
		assert_eq!(scene.cards().len(), 1);
		assert!(scene.lines().is_empty());
		assert_eq!(
			scene.card("f1").unwrap().content.lines,
			["Alpha", "M1", "2020", "Venture Capital", "Open"].map(String::from)
		);
	}

	#[test]
	fn duplicate_links_get_distinct_keys() {
		let keys = link_keys(&[Link::new("a", "b"), Link::new("a", "b"), Link::new("b", "a")]);
		assert_eq!(keys[0].occurrence, 0);
		assert_eq!(keys[1].occurrence, 1);
		assert_eq!(keys[2].occurrence, 0);
		assert_ne!(keys[0], keys[1]);
	}

	#[test]
	fn duplicate_node_ids_keep_first() {
		let mut scene = Scene::new();
		let mut input = elements(&["a", "a"], &[]);
		input.nodes[1] = FundNode::group_root("a", "second", FundAttribute::Type);
		let summary = scene.join(&input, &LinkStyle::default());
		assert_eq!(summary.cards.enter, 1);
		assert_eq!(scene.cards().len(), 1);
		assert_eq!(scene.card("a").unwrap().content.lines[0], "A");
	}

	#[test]
	fn line_width_follows_weight() {
		let mut input = elements(&["a", "b"], &[("a", "b")]);
		input.links[0].value = Some(4.0);
		let mut scene = Scene::new();
		scene.join(&input, &LinkStyle::default());
		assert_eq!(scene.lines()[0].stroke_width, 2.0);
	}

	#[test]
	fn card_origin_offsets_by_half_size_or_falls_back() {
		assert_eq!(
			card_origin(Some(Point::new(100.0, 100.0)), 180.0, 120.0),
			Point::new(10.0, 40.0)
		);
		assert_eq!(card_origin(None, 180.0, 120.0), FALLBACK_POINT);
		assert_eq!(Point::finite(f64::NAN, 1.0), None);
	}

	#[test]
	fn unresolved_lines_collapse() {
		let key = link_keys(&[Link::new("a", "zzz")]).remove(0);
		let mut layout = Layout::default();
		layout.place_line(key.clone(), Some(Point::new(5.0, 5.0)), None);
		assert_eq!(layout.line(&key), Line::default());
		assert_eq!(layout.card_origin("missing"), FALLBACK_POINT);
	}
}
