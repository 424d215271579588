pub(crate) mod intersection_path_segment;
pub(crate) mod line_segment;
#[cfg(feature = "parsing")]
pub(crate) mod path_data;
pub(crate) mod path_segment;

use glam::DVec2;
use kurbo::{BezPath, PathEl, Point, Shape};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::BooleanError;
use crate::path::path_segment::PathSegment;
use crate::util::aabb::{Aabb, merge_bounding_boxes};

/// A contiguous chain of segments. A closed subpath's last segment ends where its first one starts.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubPath {
	pub segments: Vec<PathSegment>,
	pub closed: bool,
}

impl SubPath {
	pub fn new(segments: Vec<PathSegment>, closed: bool) -> Self {
		Self { segments, closed }
	}

	pub fn closed(segments: Vec<PathSegment>) -> Self {
		Self::new(segments, true)
	}

	pub fn open(segments: Vec<PathSegment>) -> Self {
		Self::new(segments, false)
	}

	pub fn is_empty(&self) -> bool {
		self.segments.is_empty()
	}

	pub fn len(&self) -> usize {
		self.segments.len()
	}

	pub fn start(&self) -> Option<DVec2> {
		self.segments.first().map(PathSegment::start)
	}

	pub fn end(&self) -> Option<DVec2> {
		self.segments.last().map(PathSegment::end)
	}

	/// Index of the first segment that does not start where its predecessor ends.
	pub fn discontinuity(&self, eps: f64) -> Option<usize> {
		let gap = self.segments.windows(2).position(|pair| !pair[0].end().abs_diff_eq(pair[1].start(), eps)).map(|index| index + 1);
		if gap.is_some() || !self.closed {
			return gap;
		}
		match (self.start(), self.end()) {
			(Some(start), Some(end)) if !end.abs_diff_eq(start, eps) => Some(0),
			_ => None,
		}
	}

	pub fn bounding_box(&self) -> Option<Aabb> {
		self.segments.iter().map(PathSegment::bounding_box).reduce(|a, b| merge_bounding_boxes(&a, &b))
	}

	/// Area enclosed by a closed subpath. Positive for outer boundaries, which run counter-clockwise on screen (y pointing down),
	/// and negative for holes.
	pub fn signed_area(&self) -> f64 {
		// kurbo's sign convention is positive for clockwise when y points down
		-BezPath::from(self).area()
	}

	pub fn reversed(&self) -> SubPath {
		SubPath::new(self.segments.iter().rev().map(PathSegment::reverse).collect(), self.closed)
	}

	/// A closed subpath with the same geometry that starts at the node beginning segment `index`.
	pub fn rotated_to_start(&self, index: usize) -> SubPath {
		let mut segments = self.segments.clone();
		if self.closed && !segments.is_empty() {
			segments.rotate_left(index % self.segments.len());
		}
		SubPath::new(segments, self.closed)
	}

	/// Rotates a closed subpath so it starts at its lexicographically smallest node, comparing x then y.
	pub fn with_canonical_start(&self) -> SubPath {
		let smallest = self.segments.iter().enumerate().min_by(|(_, a), (_, b)| compare_points(a.start(), b.start())).map(|(index, _)| index).unwrap_or(0);
		self.rotated_to_start(smallest)
	}

	pub fn approx_eq(&self, other: &SubPath, eps: f64) -> bool {
		self.closed == other.closed && self.len() == other.len() && self.segments.iter().zip(&other.segments).all(|(a, b)| a.approx_eq(b, eps))
	}

	/// Removes segments that collapse to a point and closes the gaps they leave.
	pub fn without_degenerate_segments(&self, eps: f64) -> SubPath {
		let mut segments: Vec<PathSegment> = Vec::with_capacity(self.segments.len());
		for segment in &self.segments {
			if segment.is_degenerate(eps) {
				continue;
			}
			match segments.last() {
				Some(previous) if !previous.end().abs_diff_eq(segment.start(), 0.) => {
					let start = previous.end();
					segments.push(segment.with_endpoints(start, segment.end()));
				}
				_ => segments.push(*segment),
			}
		}
		if self.closed {
			if let (Some(first), Some(last)) = (segments.first().copied(), segments.last_mut()) {
				*last = last.with_endpoints(last.start(), first.start());
			}
		}
		SubPath::new(segments, self.closed)
	}
}

/// Lexicographic order on points, x first.
pub fn compare_points(a: DVec2, b: DVec2) -> Ordering {
	a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y))
}

fn to_point(point: DVec2) -> Point {
	Point::new(point.x, point.y)
}

fn to_dvec2(point: Point) -> DVec2 {
	DVec2::new(point.x, point.y)
}

impl From<&SubPath> for BezPath {
	fn from(subpath: &SubPath) -> Self {
		let mut bez_path = BezPath::new();
		let Some(start) = subpath.start() else { return bez_path };
		bez_path.move_to(to_point(start));
		for segment in &subpath.segments {
			match *segment {
				PathSegment::Line(_, end) => bez_path.line_to(to_point(end)),
				PathSegment::Cubic(_, handle1, handle2, end) => bez_path.curve_to(to_point(handle1), to_point(handle2), to_point(end)),
			}
		}
		if subpath.closed {
			bez_path.close_path();
		}
		bez_path
	}
}

/// An ordered set of subpaths that together describe one vector shape.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PathVector {
	pub subpaths: Vec<SubPath>,
}

impl PathVector {
	pub fn new(subpaths: Vec<SubPath>) -> Self {
		Self { subpaths }
	}

	/// True when there is no geometry at all.
	pub fn is_empty(&self) -> bool {
		self.subpaths.iter().all(SubPath::is_empty)
	}

	pub fn len(&self) -> usize {
		self.subpaths.len()
	}

	pub fn iter(&self) -> impl Iterator<Item = &SubPath> {
		self.subpaths.iter()
	}

	pub fn closed_subpaths(&self) -> impl Iterator<Item = &SubPath> {
		self.subpaths.iter().filter(|subpath| subpath.closed && !subpath.is_empty())
	}

	pub fn open_subpaths(&self) -> impl Iterator<Item = &SubPath> {
		self.subpaths.iter().filter(|subpath| !subpath.closed && !subpath.is_empty())
	}

	pub fn has_closed_region(&self) -> bool {
		self.closed_subpaths().next().is_some()
	}

	/// Rejects subpaths whose segments do not join end to end.
	pub fn validate(&self, eps: f64) -> Result<(), BooleanError> {
		for (subpath_index, subpath) in self.subpaths.iter().enumerate() {
			if let Some(segment) = subpath.discontinuity(eps) {
				return Err(BooleanError::MalformedPath { subpath: subpath_index, segment });
			}
		}
		Ok(())
	}

	pub fn bounding_box(&self) -> Option<Aabb> {
		self.subpaths.iter().filter_map(SubPath::bounding_box).reduce(|a, b| merge_bounding_boxes(&a, &b))
	}

	pub fn signed_area(&self) -> f64 {
		self.closed_subpaths().map(SubPath::signed_area).sum()
	}

	pub fn reversed(&self) -> PathVector {
		self.subpaths.iter().map(SubPath::reversed).collect()
	}

	/// Closed subpaths start at their smallest node, outer boundaries come before holes, and subpaths of the same kind are ordered by
	/// start node. Open subpaths keep their order and follow the closed ones.
	pub fn canonicalized(&self) -> PathVector {
		let mut closed: Vec<(bool, SubPath)> = self.closed_subpaths().map(|subpath| (subpath.signed_area() < 0., subpath.with_canonical_start())).collect();
		closed.sort_by(|(hole_a, a), (hole_b, b)| {
			hole_a.cmp(hole_b).then_with(|| match (a.start(), b.start()) {
				(Some(a), Some(b)) => compare_points(a, b),
				_ => Ordering::Equal,
			})
		});
		closed.into_iter().map(|(_, subpath)| subpath).chain(self.open_subpaths().cloned()).collect()
	}

	/// Pairwise comparison of subpaths in order.
	pub fn approx_eq(&self, other: &PathVector, eps: f64) -> bool {
		self.len() == other.len() && self.subpaths.iter().zip(&other.subpaths).all(|(a, b)| a.approx_eq(b, eps))
	}

	/// Same closed and open geometry, ignoring subpath order and where each closed subpath starts.
	pub fn same_geometry(&self, other: &PathVector, eps: f64) -> bool {
		self.canonicalized().approx_eq(&other.canonicalized(), eps)
	}

	pub fn to_bez_path(&self) -> BezPath {
		BezPath::from(self)
	}

	pub fn from_bez_path(bez_path: &BezPath) -> PathVector {
		let mut subpaths = Vec::new();
		let mut segments = Vec::new();
		let mut start = DVec2::ZERO;
		let mut current = DVec2::ZERO;

		for element in bez_path.elements() {
			match *element {
				PathEl::MoveTo(point) => {
					if !segments.is_empty() {
						subpaths.push(SubPath::open(std::mem::take(&mut segments)));
					}
					start = to_dvec2(point);
					current = start;
				}
				PathEl::LineTo(point) => {
					let end = to_dvec2(point);
					segments.push(PathSegment::Line(current, end));
					current = end;
				}
				PathEl::QuadTo(handle, point) => {
					let end = to_dvec2(point);
					segments.push(quadratic_to_cubic(current, to_dvec2(handle), end));
					current = end;
				}
				PathEl::CurveTo(handle1, handle2, point) => {
					let end = to_dvec2(point);
					segments.push(PathSegment::Cubic(current, to_dvec2(handle1), to_dvec2(handle2), end));
					current = end;
				}
				PathEl::ClosePath => {
					if current != start {
						segments.push(PathSegment::Line(current, start));
					}
					if !segments.is_empty() {
						subpaths.push(SubPath::closed(std::mem::take(&mut segments)));
					}
					current = start;
				}
			}
		}
		if !segments.is_empty() {
			subpaths.push(SubPath::open(segments));
		}

		PathVector::new(subpaths)
	}
}

/// Degree elevation of a quadratic Bezier.
pub(crate) fn quadratic_to_cubic(start: DVec2, handle: DVec2, end: DVec2) -> PathSegment {
	PathSegment::Cubic(start, start + (handle - start) * (2. / 3.), end + (handle - end) * (2. / 3.), end)
}

impl From<&PathVector> for BezPath {
	fn from(path: &PathVector) -> Self {
		let mut bez_path = BezPath::new();
		for subpath in &path.subpaths {
			bez_path.extend(BezPath::from(subpath).elements().iter().copied());
		}
		bez_path
	}
}

impl FromIterator<SubPath> for PathVector {
	fn from_iter<I: IntoIterator<Item = SubPath>>(iter: I) -> Self {
		PathVector::new(iter.into_iter().collect())
	}
}

impl IntoIterator for PathVector {
	type Item = SubPath;
	type IntoIter = std::vec::IntoIter<SubPath>;

	fn into_iter(self) -> Self::IntoIter {
		self.subpaths.into_iter()
	}
}
