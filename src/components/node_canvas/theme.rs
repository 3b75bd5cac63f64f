//! Color themes for the canvas.

/// An RGBA color convertible to a CSS color string.
#[derive(Clone, Copy, Debug, PartialEq)]
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

	pub fn to_css(&self) -> String {
		format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}

	/// Same color with a different alpha.
	pub fn with_alpha(&self, a: f64) -> Self {
		Self { a, ..*self }
	}
}

/// Node box styling.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	pub fill: Color,
	pub border: Color,
	pub label: Color,
	/// Ring drawn around the selected node.
	pub selection_ring: Color,
}

/// Connector line and arrowhead styling.
#[derive(Clone, Debug)]
pub struct ConnectorStyle {
	pub line: Color,
	pub arrow: Color,
}

/// Full canvas theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: Color,
	pub node: NodeStyle,
	pub connector: ConnectorStyle,
}

impl Theme {
	/// Dark editor theme, the default.
	pub fn dark() -> Self {
		Self {
			name: "dark",
			background: Color::rgb(24, 26, 32),
			node: NodeStyle {
				fill: Color::rgb(45, 52, 64),
				border: Color::rgba(130, 145, 165, 0.8),
				label: Color::rgb(225, 228, 235),
				selection_ring: Color::rgb(255, 196, 0),
			},
			connector: ConnectorStyle {
				line: Color::rgba(130, 170, 220, 0.65),
				arrow: Color::rgba(130, 170, 220, 0.9),
			},
		}
	}

	/// Light theme for bright environments.
	pub fn light() -> Self {
		Self {
			name: "light",
			background: Color::rgb(244, 245, 247),
			node: NodeStyle {
				fill: Color::rgb(255, 255, 255),
				border: Color::rgba(70, 80, 95, 0.7),
				label: Color::rgb(35, 40, 48),
				selection_ring: Color::rgb(230, 140, 0),
			},
			connector: ConnectorStyle {
				line: Color::rgba(80, 110, 160, 0.6),
				arrow: Color::rgba(80, 110, 160, 0.85),
			},
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::dark()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn css_output() {
		assert_eq!(Color::rgb(1, 2, 3).to_css(), "rgba(1, 2, 3, 1)");
		assert_eq!(
			Color::rgba(1, 2, 3, 0.5).with_alpha(0.25).to_css(),
			"rgba(1, 2, 3, 0.25)"
		);
	}
}
