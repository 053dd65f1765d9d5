//! Graph data structures handed to the fund graph component.
//!
//! Field names follow the camelCase JSON emitted by the upstream graph
//! builder, so a `GraphElements` document can be deserialized as-is.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fund strategy category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum FundType {
	#[serde(rename = "Venture Capital")]
	VentureCapital,
	#[serde(rename = "Real Estate")]
	RealEstate,
	#[serde(rename = "Hedge Fund")]
	HedgeFund,
}

impl FundType {
	pub fn as_str(self) -> &'static str {
		match self {
			FundType::VentureCapital => "Venture Capital",
			FundType::RealEstate => "Real Estate",
			FundType::HedgeFund => "Hedge Fund",
		}
	}
}

impl fmt::Display for FundType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Fund attribute a group root node clusters its funds by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FundAttribute {
	Manager,
	Year,
	Type,
	IsOpen,
}

impl FundAttribute {
	pub fn as_str(self) -> &'static str {
		match self {
			FundAttribute::Manager => "manager",
			FundAttribute::Year => "year",
			FundAttribute::Type => "type",
			FundAttribute::IsOpen => "isOpen",
		}
	}
}

impl fmt::Display for FundAttribute {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// An immutable fund record.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fund {
	pub name: String,
	pub manager: String,
	pub year: String,
	#[serde(rename = "type")]
	pub fund_type: FundType,
	pub is_open: bool,
}

/// Discriminant of a [`FundNode`], without its payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
	Fund,
	GroupRoot,
}

/// What a node stands for. Serialized as the `type` tag plus its fields.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type")]
pub enum NodeKind {
	/// A single fund.
	#[serde(rename = "FUND")]
	Fund { fund: Fund },
	/// Synthetic hub binding every fund that shares one attribute value.
	#[serde(rename = "GROUP_ROOT", rename_all = "camelCase")]
	GroupRoot {
		group_root_text: String,
		group_root_attribute: FundAttribute,
	},
}

/// A node in the graph.
///
/// The optional coordinates mirror the simulation fields a caller may have
/// seeded; they are copied into the simulation and never written back.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct FundNode {
	/// Unique identifier for this node. Used to reference nodes in links.
	pub id: String,
	#[serde(flatten)]
	pub kind: NodeKind,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub x: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub y: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub vx: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub vy: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fx: Option<f64>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub fy: Option<f64>,
}

impl FundNode {
	pub fn fund(id: impl Into<String>, fund: Fund) -> Self {
		Self::with_kind(id, NodeKind::Fund { fund })
	}

	pub fn group_root(
		id: impl Into<String>,
		text: impl Into<String>,
		attribute: FundAttribute,
	) -> Self {
		Self::with_kind(
			id,
			NodeKind::GroupRoot {
				group_root_text: text.into(),
				group_root_attribute: attribute,
			},
		)
	}

	fn with_kind(id: impl Into<String>, kind: NodeKind) -> Self {
		Self {
			id: id.into(),
			kind,
			x: None,
			y: None,
			vx: None,
			vy: None,
			fx: None,
			fy: None,
		}
	}

	pub fn node_type(&self) -> NodeType {
		match self.kind {
			NodeKind::Fund { .. } => NodeType::Fund,
			NodeKind::GroupRoot { .. } => NodeType::GroupRoot,
		}
	}
}

/// An undirected relationship between two nodes.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Link {
	/// Source node ID.
	pub source: String,
	/// Target node ID.
	pub target: String,
	/// Optional weight, drawn as stroke width.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<f64>,
}

impl Link {
	pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			value: None,
		}
	}
}

/// Complete graph input: nodes and links.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct GraphElements {
	#[serde(default)]
	pub nodes: Vec<FundNode>,
	#[serde(default)]
	pub links: Vec<Link>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_fund_and_group_root_nodes() {
		let json = r#"{
			"nodes": [
				{"id": "f1", "type": "FUND", "fund": {
					"name": "Alpha", "manager": "M1", "year": "2020",
					"type": "Venture Capital", "isOpen": true
				}},
				{"id": "g1", "type": "GROUP_ROOT",
					"groupRootText": "M1", "groupRootAttribute": "manager"}
			],
			"links": [{"source": "f1", "target": "g1"}]
		}"#;

		let elements: GraphElements = serde_json::from_str(json).unwrap();
		assert_eq!(elements.nodes.len(), 2);
		assert_eq!(elements.nodes[0].node_type(), NodeType::Fund);
		assert_eq!(
			elements.nodes[0].kind,
			NodeKind::Fund {
				fund: Fund {
					name: "Alpha".into(),
					manager: "M1".into(),
					year: "2020".into(),
					fund_type: FundType::VentureCapital,
					is_open: true,
				}
			}
		);
		assert_eq!(
			elements.nodes[1],
			FundNode::group_root("g1", "M1", FundAttribute::Manager)
		);
		assert_eq!(elements.links, vec![Link::new("f1", "g1")]);
	}

	#[test]
	fn keeps_seeded_coordinates() {
		let json = r#"{"id": "g", "type": "GROUP_ROOT", "groupRootText": "2021",
			"groupRootAttribute": "year", "x": 4.5, "fy": -2}"#;
		let node: FundNode = serde_json::from_str(json).unwrap();
		assert_eq!(node.x, Some(4.5));
		assert_eq!(node.y, None);
		assert_eq!(node.fy, Some(-2.0));
	}

	#[test]
	fn missing_sections_default_to_empty() {
		let elements: GraphElements = serde_json::from_str("{}").unwrap();
		assert!(elements.nodes.is_empty());
		assert!(elements.links.is_empty());
	}

	#[test]
	fn attribute_names_match_wire_format() {
		assert_eq!(FundAttribute::IsOpen.to_string(), "isOpen");
		assert_eq!(FundType::HedgeFund.to_string(), "Hedge Fund");
	}
}
