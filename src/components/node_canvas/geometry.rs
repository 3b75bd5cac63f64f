//! 2D vector and transform math for the canvas.
//!
//! All coordinates are f64 in canvas convention: X grows right, Y grows
//! down. World space is the coordinate system nodes live in; screen space
//! is pixels on the canvas after the viewport transform.

/// A 2D point or displacement.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
	pub x: f64,
	pub y: f64,
}

impl Vec2 {
	pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}
}

impl std::ops::Add for Vec2 {
	type Output = Vec2;

	fn add(self, rhs: Vec2) -> Vec2 {
		Vec2::new(self.x + rhs.x, self.y + rhs.y)
	}
}

impl std::ops::Sub for Vec2 {
	type Output = Vec2;

	fn sub(self, rhs: Vec2) -> Vec2 {
		Vec2::new(self.x - rhs.x, self.y - rhs.y)
	}
}

impl std::ops::Mul<f64> for Vec2 {
	type Output = Vec2;

	fn mul(self, rhs: f64) -> Vec2 {
		Vec2::new(self.x * rhs, self.y * rhs)
	}
}

impl std::ops::Div<f64> for Vec2 {
	type Output = Vec2;

	fn div(self, rhs: f64) -> Vec2 {
		Vec2::new(self.x / rhs, self.y / rhs)
	}
}

/// Euclidean distance between two points.
pub fn distance(a: Vec2, b: Vec2) -> f64 {
	let (dx, dy) = (b.x - a.x, b.y - a.y);
	(dx * dx + dy * dy).sqrt()
}

/// Angle of the vector `to - from`, in degrees.
///
/// Measured from the +X axis, range (-180, 180]. With canvas Y growing
/// down, positive angles rotate clockwise on screen. Connector rotation
/// depends on this convention matching the renderer's.
pub fn signed_angle(from: Vec2, to: Vec2) -> f64 {
	(to.y - from.y).atan2(to.x - from.x).to_degrees()
}

/// Linear interpolation between two points. `t` is not clamped.
pub fn lerp(a: Vec2, b: Vec2, t: f64) -> Vec2 {
	Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

/// A uniform scale followed by a translation: `p * zoom + offset`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
	pub offset: Vec2,
	pub zoom: f64,
}

impl Transform {
	/// The identity transform (no pan, zoom 1).
	pub const IDENTITY: Transform = Transform {
		offset: Vec2::ZERO,
		zoom: 1.0,
	};

	pub fn new(offset: Vec2, zoom: f64) -> Self {
		Self { offset, zoom }
	}

	/// Map a local-space point into the parent space.
	pub fn apply(&self, p: Vec2) -> Vec2 {
		p * self.zoom + self.offset
	}

	/// Map a parent-space point back into local space.
	pub fn unapply(&self, p: Vec2) -> Vec2 {
		(p - self.offset) / self.zoom
	}

	/// Compose with an outer transform: `self` first, then `outer`.
	pub fn then(&self, outer: &Transform) -> Transform {
		Transform {
			offset: outer.apply(self.offset),
			zoom: self.zoom * outer.zoom,
		}
	}
}

impl Default for Transform {
	fn default() -> Self {
		Self::IDENTITY
	}
}

/// Map a local point through a chain of ancestor transforms,
/// innermost first.
pub fn local_to_world(local: Vec2, ancestors: &[Transform]) -> Vec2 {
	ancestors.iter().fold(local, |p, t| t.apply(p))
}
