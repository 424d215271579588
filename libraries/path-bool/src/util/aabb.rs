use glam::{BVec2, DVec2};

/// Axis-aligned bounding box in document coordinates (y pointing down, so `top` is the minimum y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
	min: DVec2,
	max: DVec2,
}

impl Default for Aabb {
	fn default() -> Self {
		Self {
			min: DVec2::INFINITY,
			max: DVec2::NEG_INFINITY,
		}
	}
}

impl Aabb {
	#[inline]
	pub fn min(&self) -> DVec2 {
		self.min
	}
	#[inline]
	pub fn max(&self) -> DVec2 {
		self.max
	}

	pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
		Aabb {
			min: DVec2::new(left, top),
			max: DVec2::new(right, bottom),
		}
	}

	pub fn from_corners(a: DVec2, b: DVec2) -> Self {
		Aabb { min: a.min(b), max: a.max(b) }
	}

	#[inline]
	pub fn top(&self) -> f64 {
		self.min.y
	}
	#[inline]
	pub fn left(&self) -> f64 {
		self.min.x
	}
	#[inline]
	pub fn right(&self) -> f64 {
		self.max.x
	}
	#[inline]
	pub fn bottom(&self) -> f64 {
		self.max.y
	}

	/// Width and height.
	pub fn dimensions(&self) -> DVec2 {
		self.max - self.min
	}

	/// Length of the diagonal, the characteristic size used to scale tolerances.
	pub fn diagonal(&self) -> f64 {
		self.dimensions().length()
	}

	pub fn contains(&self, point: DVec2) -> bool {
		(self.min.cmple(point) & point.cmple(self.max)) == BVec2::TRUE
	}
}

#[inline]
pub(crate) fn bounding_boxes_overlap(a: &Aabb, b: &Aabb) -> bool {
	(a.min.cmple(b.max) & b.min.cmple(a.max)) == BVec2::TRUE
}

#[inline]
pub fn merge_bounding_boxes(a: &Aabb, b: &Aabb) -> Aabb {
	Aabb {
		min: a.min.min(b.min),
		max: a.max.max(b.max),
	}
}

#[inline]
pub(crate) fn extend_bounding_box(bounding_box: Option<Aabb>, point: DVec2) -> Aabb {
	match bounding_box {
		Some(bb) => Aabb {
			min: bb.min.min(point),
			max: bb.max.max(point),
		},
		None => Aabb { min: point, max: point },
	}
}

pub(crate) fn bounding_box_max_extent(bounding_box: &Aabb) -> f64 {
	(bounding_box.max - bounding_box.min).max_element()
}

pub(crate) fn bounding_box_around_point(point: DVec2, padding: f64) -> Aabb {
	Aabb {
		min: point - DVec2::splat(padding),
		max: point + DVec2::splat(padding),
	}
}

pub(crate) fn expand_bounding_box(bounding_box: &Aabb, padding: f64) -> Aabb {
	Aabb {
		min: bounding_box.min - DVec2::splat(padding),
		max: bounding_box.max + DVec2::splat(padding),
	}
}
