//! Visual theming for the fund graph.
//!
//! Card colours and geometry, plus the link stroke style.

use serde::Deserialize;

use super::types::NodeType;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parses a CSS color string.
	/// Supports hex (`#RRGGBB`), the `white` keyword and `rgb()`/`rgba()` notation.
	pub fn parse(color_str: &str) -> Option<Color> {
		let s = color_str.trim();
		if s.eq_ignore_ascii_case("white") {
			return Some(Color::rgb(255, 255, 255));
		}
		if let Some(hex) = s.strip_prefix('#') {
			if hex.len() != 6 || !hex.is_ascii() {
				return None;
			}
			let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
			let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
			let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
			return Some(Color::rgb(r, g, b));
		}
		if s.starts_with("rgb") {
			let nums: Vec<&str> = s
				.trim_start_matches("rgba(")
				.trim_start_matches("rgb(")
				.trim_end_matches(')')
				.split(',')
				.map(str::trim)
				.collect();
			if nums.len() < 3 {
				return None;
			}
			let r = nums[0].parse().ok()?;
			let g = nums[1].parse().ok()?;
			let b = nums[2].parse().ok()?;
			let a = match nums.get(3) {
				Some(a) => a.parse().ok()?,
				None => 1.0,
			};
			return Some(Color::rgba(r, g, b, a));
		}
		None
	}
}

impl TryFrom<String> for Color {
	type Error = String;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Color::parse(&value).ok_or_else(|| format!("unsupported color: {value:?}"))
	}
}

/// Fund card geometry and colors.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CardStyle {
	pub width: f64,
	pub height: f64,
	pub corner_radius: f64,
	pub fund_fill: Color,
	pub group_root_fill: Color,
	pub text_color: Color,
	/// Horizontal inset of every text line.
	pub text_x: f64,
	/// Baseline of the first text line.
	pub first_line_y: f64,
	/// Distance between consecutive baselines.
	pub line_spacing: f64,
}

impl CardStyle {
	pub fn fill_for(&self, node_type: NodeType) -> Color {
		match node_type {
			NodeType::Fund => self.fund_fill,
			NodeType::GroupRoot => self.group_root_fill,
		}
	}

	/// `translate(..)` transform for text line `line` (0-based).
	pub fn line_transform(&self, line: usize) -> String {
		format!(
			"translate({}, {})",
			self.text_x,
			self.first_line_y + self.line_spacing * line as f64
		)
	}
}

impl Default for CardStyle {
	fn default() -> Self {
		Self {
			width: 180.0,
			height: 120.0,
			corner_radius: 20.0,
			fund_fill: Color::rgb(0x18, 0x29, 0x5e),
			group_root_fill: Color::rgb(0x85, 0x05, 0x4d),
			text_color: Color::rgb(255, 255, 255),
			text_x: 20.0,
			first_line_y: 25.0,
			line_spacing: 20.0,
		}
	}
}

/// Link stroke style.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LinkStyle {
	pub color: Color,
	pub opacity: f64,
	/// Stroke width for links without a weight.
	pub default_width: f64,
}

impl LinkStyle {
	/// Weighted links are drawn `sqrt(value)` wide.
	pub fn stroke_width(&self, value: Option<f64>) -> f64 {
		match value {
			Some(v) if v.is_finite() && v > 0.0 => v.sqrt(),
			_ => self.default_width,
		}
	}
}

impl Default for LinkStyle {
	fn default() -> Self {
		Self {
			color: Color::rgb(255, 255, 255),
			opacity: 0.6,
			default_width: 1.0,
		}
	}
}

/// Complete visual theme.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Theme {
	pub card: CardStyle,
	pub link: LinkStyle,
}
