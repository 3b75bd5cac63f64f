//! Directed connectors between node centers.
//!
//! Connectors are pure rendering artifacts: recomputed wholesale on
//! every rebuild, never persisted. Geometry lives in world space, so
//! panning or zooming the viewport needs no re-orientation pass; only
//! node moves do, and those touch just the moved node's connectors.

use super::geometry::{self, Vec2};
use super::model::NodeModel;

/// One directed edge, oriented from source center to target center.
#[derive(Clone, Debug, PartialEq)]
pub struct Connector {
	pub source_id: String,
	pub target_id: String,
	/// World-space center of the source node.
	pub source: Vec2,
	/// World-space center of the target node.
	pub target: Vec2,
	/// Rotation from the +X axis, degrees in (-180, 180].
	pub angle: f64,
	/// Inter-center distance in world units, independent of zoom.
	pub length: f64,
	/// Halfway point between the two centers.
	pub midpoint: Vec2,
}

impl Connector {
	pub fn new(source_id: String, target_id: String, source: Vec2, target: Vec2) -> Self {
		let mut connector = Self {
			source_id,
			target_id,
			source,
			target,
			angle: 0.0,
			length: 0.0,
			midpoint: Vec2::ZERO,
		};
		connector.orient(source, target);
		connector
	}

	/// Recompute geometry for new endpoint centers.
	pub fn orient(&mut self, source: Vec2, target: Vec2) {
		self.source = source;
		self.target = target;
		self.angle = geometry::signed_angle(source, target);
		self.length = geometry::distance(source, target);
		self.midpoint = geometry::lerp(source, target, 0.5);
	}

	/// Whether this connector touches the given node.
	pub fn touches(&self, id: &str) -> bool {
		self.source_id == id || self.target_id == id
	}

	/// Refresh endpoints from the model after one of them moved.
	/// Endpoints are looked up fresh so a stale connector cannot
	/// survive a position change.
	pub fn refresh(&mut self, model: &NodeModel) {
		let (Ok(source), Ok(target)) = (model.get(&self.source_id), model.get(&self.target_id))
		else {
			// Rebuild guarantees both endpoints exist; a miss here
			// means the caller skipped the rebuild after a removal.
			return;
		};
		self.orient(source.position, target.position);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;

	const EPS: f64 = 1e-9;

	#[test]
	fn due_right_connector() {
		let c = Connector::new(
			"a".into(),
			"b".into(),
			Vec2::new(0.0, 0.0),
			Vec2::new(100.0, 0.0),
		);
		assert!(c.angle.abs() < EPS);
		assert!((c.length - 100.0).abs() < EPS);
		assert_eq!(c.midpoint, Vec2::new(50.0, 0.0));
	}

	#[test]
	fn orient_updates_all_geometry() {
		let mut c = Connector::new("a".into(), "b".into(), Vec2::ZERO, Vec2::new(10.0, 0.0));
		c.orient(Vec2::ZERO, Vec2::new(0.0, 40.0));
		assert!((c.angle - 90.0).abs() < EPS);
		assert!((c.length - 40.0).abs() < EPS);
		assert_eq!(c.midpoint, Vec2::new(0.0, 20.0));
	}

	#[test]
	fn touches_either_endpoint() {
		let c = Connector::new("a".into(), "b".into(), Vec2::ZERO, Vec2::new(1.0, 0.0));
		assert!(c.touches("a"));
		assert!(c.touches("b"));
		assert!(!c.touches("c"));
	}
}
