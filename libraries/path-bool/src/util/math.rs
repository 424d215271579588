use glam::DVec2;
pub use std::f64::consts::PI;

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
	a + (b - a) * t
}

pub fn deg2rad(degrees: f64) -> f64 {
	degrees / 360. * (2. * PI)
}

/// Signed angle from `u` to `v` in (-PI, PI]. With y pointing down, negative angles are turns to the left on screen.
pub fn vector_angle(u: DVec2, v: DVec2) -> f64 {
	const EPS: f64 = 1e-12;

	let sign = u.perp_dot(v);

	if sign.abs() < EPS && u.dot(v) < 0. {
		return PI;
	}

	sign.atan2(u.dot(v))
}

/// The normal on the left-hand side of travel along `direction` as seen on screen (y pointing down).
pub fn left_normal(direction: DVec2) -> DVec2 {
	DVec2::new(direction.y, -direction.x)
}
