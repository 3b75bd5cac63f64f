//! Canvas rendering for the node graph.
//!
//! Draw order per frame: background in screen space, then under the
//! viewport transform all connectors, then all node boxes (so nodes
//! cover connector ends), selection ring last. Connector geometry is
//! world-space, so pan and zoom fall out of the canvas transform and
//! only node drags ever re-orient anything.

use web_sys::CanvasRenderingContext2d;

use super::connector::Connector;
use super::geometry::Vec2;
use super::scale::{ScaleConfig, ScaledValues};
use super::state::CanvasState;
use super::theme::Theme;
use super::types::NodeRecord;

/// Renders the complete canvas.
pub fn render(
	state: &CanvasState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let scale = ScaledValues::new(config, state.viewport.zoom);

	ctx.set_fill_style_str(&theme.background.to_css());
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	ctx.save();
	let _ = ctx.translate(state.viewport.offset.x, state.viewport.offset.y);
	let _ = ctx.scale(state.viewport.zoom, state.viewport.zoom);

	for connector in state.connectors() {
		draw_connector(ctx, connector, &scale, theme);
	}
	for node in state.model().iter() {
		draw_node(ctx, node, state.selected() == Some(node.id.as_str()), &scale, theme);
	}

	ctx.restore();
}

/// One directed connector: a line through the two node centers with an
/// arrowhead short of the target box.
///
/// The context is moved to the midpoint and rotated to the stored
/// angle, then everything draws along the local +X axis with the
/// stored length, exactly the artifact `rebuild` computed.
fn draw_connector(
	ctx: &CanvasRenderingContext2d,
	connector: &Connector,
	scale: &ScaledValues,
	theme: &Theme,
) {
	if connector.length < 0.001 {
		return;
	}

	ctx.save();
	let _ = ctx.translate(connector.midpoint.x, connector.midpoint.y);
	let _ = ctx.rotate(connector.angle.to_radians());

	let half = connector.length / 2.0;
	// Pull the visible tip back to roughly the target box boundary.
	let inset = scale.node_half.y.min(half);
	let tip = half - inset;
	let back = tip - scale.arrow_size;

	ctx.set_stroke_style_str(&theme.connector.line.to_css());
	ctx.set_line_width(scale.connector_width);
	ctx.begin_path();
	ctx.move_to(-half, 0.0);
	ctx.line_to(back, 0.0);
	ctx.stroke();

	ctx.set_fill_style_str(&theme.connector.arrow.to_css());
	ctx.begin_path();
	ctx.move_to(tip, 0.0);
	ctx.line_to(back, scale.arrow_size * 0.45);
	ctx.line_to(back, -scale.arrow_size * 0.45);
	ctx.close_path();
	ctx.fill();

	ctx.restore();
}

fn draw_node(
	ctx: &CanvasRenderingContext2d,
	node: &NodeRecord,
	selected: bool,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let center = node.position;

	rounded_rect(ctx, center, scale.node_half, scale.corner_radius);
	ctx.set_fill_style_str(&theme.node.fill.to_css());
	ctx.fill();
	ctx.set_stroke_style_str(&theme.node.border.to_css());
	ctx.set_line_width(scale.connector_width);
	ctx.stroke();

	if selected {
		let ring_half = Vec2::new(
			scale.node_half.x + scale.ring_offset,
			scale.node_half.y + scale.ring_offset,
		);
		rounded_rect(ctx, center, ring_half, scale.corner_radius + scale.ring_offset);
		ctx.set_stroke_style_str(&theme.node.selection_ring.to_css());
		ctx.set_line_width(scale.ring_width);
		ctx.stroke();
	}

	ctx.set_fill_style_str(&theme.node.label.to_css());
	ctx.set_font(&scale.label_font);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(&node.label, center.x, center.y);
}

/// Trace a rounded rectangle path centered on `center`.
fn rounded_rect(ctx: &CanvasRenderingContext2d, center: Vec2, half: Vec2, radius: f64) {
	let (l, r) = (center.x - half.x, center.x + half.x);
	let (t, b) = (center.y - half.y, center.y + half.y);
	let radius = radius.min(half.x).min(half.y);

	ctx.begin_path();
	ctx.move_to(l + radius, t);
	ctx.line_to(r - radius, t);
	ctx.quadratic_curve_to(r, t, r, t + radius);
	ctx.line_to(r, b - radius);
	ctx.quadratic_curve_to(r, b, r - radius, b);
	ctx.line_to(l + radius, b);
	ctx.quadratic_curve_to(l, b, l, b - radius);
	ctx.line_to(l, t + radius);
	ctx.quadratic_curve_to(l, t, l + radius, t);
	ctx.close_path();
}
