//! Zoom-dependent sizing for canvas visuals.
//!
//! Node boxes and connector lengths live in world space and scale with
//! zoom; line widths, label text, and the selection ring stay readable
//! by compensating for zoom. All values produced here are world-space,
//! ready to use once the canvas transform is applied.

use super::geometry::Vec2;

/// How a visual property responds to the zoom level `k`.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant world-space size; appears larger when zoomed in.
	World,
	/// Constant screen-space size; divides by `k` to cancel the zoom.
	Screen,
	/// World-space size clamped to screen-pixel bounds.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// World-space value for a base size at zoom `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::World => base,
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Sizing for node boxes and their hit areas.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// Half extents of the node box in world units.
	pub half_width: f64,
	pub half_height: f64,
	/// Extra hit-test margin around the box, world units.
	pub hit_padding: f64,
	/// Box corner radius in world units.
	pub corner_radius: f64,
	/// Label font size in screen pixels.
	pub label_size: f64,
	/// Zoom floor for label font scaling, so text stays legible when
	/// zoomed far out.
	pub label_min_k: f64,
}

/// Sizing for connectors and their arrowheads.
#[derive(Clone, Debug)]
pub struct ConnectorScaleConfig {
	/// Line width in screen pixels.
	pub line_width: f64,
	/// Arrowhead size in world units.
	pub arrow_size: f64,
	pub arrow_behavior: ScaleBehavior,
}

/// Sizing for the selection ring around the selected node.
#[derive(Clone, Debug)]
pub struct SelectionScaleConfig {
	/// Ring stroke width in screen pixels.
	pub ring_width: f64,
	/// Gap between box edge and ring in screen pixels.
	pub ring_offset: f64,
}

/// Complete sizing configuration for the canvas.
#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub node: NodeScaleConfig,
	pub connector: ConnectorScaleConfig,
	pub selection: SelectionScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				half_width: 55.0,
				half_height: 20.0,
				hit_padding: 4.0,
				corner_radius: 6.0,
				label_size: 12.0,
				label_min_k: 0.5,
			},
			connector: ConnectorScaleConfig {
				line_width: 1.5,
				arrow_size: 9.0,
				arrow_behavior: ScaleBehavior::Clamped {
					min_screen: 4.0,
					max_screen: 20.0,
				},
			},
			selection: SelectionScaleConfig {
				ring_width: 2.0,
				ring_offset: 3.0,
			},
		}
	}
}

/// Pre-computed world-space values for one zoom level.
///
/// Build once per frame (or per hit test) and pass around.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	pub k: f64,
	/// Node box half extents, world units.
	pub node_half: Vec2,
	/// Hit-test half extents (box plus padding), world units.
	pub hit_half: Vec2,
	pub corner_radius: f64,
	/// Label font string, e.g. "12px sans-serif".
	pub label_font: String,
	pub connector_width: f64,
	pub arrow_size: f64,
	pub ring_width: f64,
	pub ring_offset: f64,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let node = &config.node;
		let label_font_size = node.label_size / k.max(node.label_min_k);
		Self {
			k,
			node_half: Vec2::new(node.half_width, node.half_height),
			hit_half: Vec2::new(
				node.half_width + node.hit_padding,
				node.half_height + node.hit_padding,
			),
			corner_radius: node.corner_radius,
			label_font: format!("{label_font_size}px sans-serif"),
			connector_width: config.connector.line_width / k,
			arrow_size: config
				.connector
				.arrow_behavior
				.apply(config.connector.arrow_size, k),
			ring_width: config.selection.ring_width / k,
			ring_offset: config.selection.ring_offset / k,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn screen_behavior_cancels_zoom() {
		assert_eq!(ScaleBehavior::Screen.apply(10.0, 2.0), 5.0);
		assert_eq!(ScaleBehavior::World.apply(10.0, 2.0), 10.0);
	}

	#[test]
	fn clamped_behavior_bounds_screen_size() {
		let b = ScaleBehavior::Clamped {
			min_screen: 4.0,
			max_screen: 20.0,
		};
		// At k=0.1 a world size of 9 would be 0.9px on screen; clamp
		// lifts it to 4px worth of world units.
		assert_eq!(b.apply(9.0, 0.1), 40.0);
		// At k=4 the same size would be 36px; clamp caps at 20px.
		assert_eq!(b.apply(9.0, 4.0), 5.0);
	}

	#[test]
	fn hit_half_includes_padding() {
		let scaled = ScaledValues::new(&ScaleConfig::default(), 1.0);
		assert!(scaled.hit_half.x > scaled.node_half.x);
		assert!(scaled.hit_half.y > scaled.node_half.y);
	}
}
