//! Text content of a node card.

use super::types::{FundNode, NodeKind, NodeType};

/// Number of stacked text lines on every card.
pub const CARD_LINES: usize = 5;

/// What a card shows: its kind (for the fill color) and five text lines.
#[derive(Clone, Debug, PartialEq)]
pub struct CardContent {
	pub node_type: NodeType,
	pub lines: [String; CARD_LINES],
}

impl CardContent {
	/// Fund cards list name, manager, year, type and open status. Group-root
	/// cards list their label and grouping attribute, and leave the rest blank.
	pub fn for_node(node: &FundNode) -> Self {
		let lines = match &node.kind {
			NodeKind::Fund { fund } => [
				fund.name.clone(),
				fund.manager.clone(),
				fund.year.clone(),
				fund.fund_type.to_string(),
				if fund.is_open { "Open" } else { "Closed" }.to_string(),
			],
			NodeKind::GroupRoot {
				group_root_text,
				group_root_attribute,
			} => [
				group_root_text.clone(),
				group_root_attribute.to_string(),
				String::new(),
				String::new(),
				String::new(),
			],
		};
		Self {
			node_type: node.node_type(),
			lines,
		}
	}

	/// The first line is the card's title and is drawn bold.
	pub fn is_title(line: usize) -> bool {
		line == 0
	}
}
