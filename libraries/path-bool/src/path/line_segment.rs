// Copyright 2024 Adam Platkevič <rflashster@gmail.com>
//
// SPDX-License-Identifier: MIT

use glam::DVec2;
use smallvec::{SmallVec, smallvec};

pub type LineSegment = [DVec2; 2];

const COLLINEAR_EPS: f64 = f64::EPSILON * 64.;

/// Parameters `(s, t)` at which two line segments cross, with `s` on the first segment and `t` on the second.
#[inline(never)]
pub fn line_segment_intersection([p1, p2]: LineSegment, [p3, p4]: LineSegment, eps: f64) -> Option<(f64, f64)> {
	// https://en.wikipedia.org/wiki/Intersection_(geometry)#Two_line_segments

	let a = p2 - p1;
	let b = p3 - p4;
	let c = p3 - p1;

	let denom = a.x * b.y - a.y * b.x;

	if denom.abs() < COLLINEAR_EPS * a.length() * b.length() {
		return None;
	}

	let s = (c.x * b.y - c.y * b.x) / denom;
	let t = (a.x * c.y - a.y * c.x) / denom;

	if (-eps..=1. + eps).contains(&s) && (-eps..=1. + eps).contains(&t) {
		Some((s.clamp(0., 1.), t.clamp(0., 1.)))
	} else {
		None
	}
}

pub fn line_segments_intersect(seg1: LineSegment, seg2: LineSegment, eps: f64) -> bool {
	line_segment_intersection(seg1, seg2, eps).is_some() || !line_segment_overlap(seg1, seg2, eps).is_empty()
}

fn project(point: DVec2, [start, end]: LineSegment) -> f64 {
	let direction = end - start;
	(point - start).dot(direction) / direction.length_squared()
}

/// Parameter pairs of the endpoints of the shared stretch of two collinear overlapping segments.
/// Segments that are not collinear, or only touch, yield at most the touching point.
pub fn line_segment_overlap(seg1: LineSegment, seg2: LineSegment, point_eps: f64) -> SmallVec<[(f64, f64); 2]> {
	let [p1, p2] = seg1;
	let [p3, p4] = seg2;
	let direction1 = p2 - p1;
	let direction2 = p4 - p3;
	let length1 = direction1.length();
	let length2 = direction2.length();
	if length1 == 0. || length2 == 0. {
		return SmallVec::new();
	}

	let distance = |point: DVec2, [start, _]: LineSegment, direction: DVec2, length: f64| direction.perp_dot(point - start).abs() / length;
	if distance(p3, seg1, direction1, length1) > point_eps || distance(p4, seg1, direction1, length1) > point_eps {
		return SmallVec::new();
	}
	if distance(p1, seg2, direction2, length2) > point_eps || distance(p2, seg2, direction2, length2) > point_eps {
		return SmallVec::new();
	}

	let param_eps1 = point_eps / length1;
	let param_eps2 = point_eps / length2;

	let mut params: SmallVec<[(f64, f64); 4]> = smallvec![];
	let mut push = |s: f64, t: f64| {
		if (-param_eps1..=1. + param_eps1).contains(&s) && (-param_eps2..=1. + param_eps2).contains(&t) {
			let pair = (s.clamp(0., 1.), t.clamp(0., 1.));
			if !params.iter().any(|&(existing_s, _)| (existing_s - pair.0).abs() <= param_eps1) {
				params.push(pair);
			}
		}
	};
	push(0., project(p1, seg2));
	push(1., project(p2, seg2));
	push(project(p3, seg1), 0.);
	push(project(p4, seg1), 1.);

	params.sort_by(|a, b| a.0.total_cmp(&b.0));
	match params.len() {
		0 => SmallVec::new(),
		1 => smallvec![params[0]],
		_ => smallvec![params[0], params[params.len() - 1]],
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn crossing_lines() {
		let result = line_segment_intersection([DVec2::new(0., 0.), DVec2::new(2., 2.)], [DVec2::new(0., 2.), DVec2::new(2., 0.)], 1e-9);
		assert_eq!(result, Some((0.5, 0.5)));
	}

	#[test]
	fn parallel_lines_do_not_cross() {
		let result = line_segment_intersection([DVec2::new(0., 0.), DVec2::new(2., 0.)], [DVec2::new(0., 1.), DVec2::new(2., 1.)], 1e-9);
		assert_eq!(result, None);
	}

	#[test]
	fn collinear_overlap_endpoints() {
		let overlap = line_segment_overlap([DVec2::new(0., 0.), DVec2::new(0., 2.)], [DVec2::new(0., 2.5), DVec2::new(0., 1.5)], 1e-6);
		assert_eq!(overlap.as_slice(), &[(0.75, 1.), (1., 0.5)]);
	}

	#[test]
	fn collinear_touching_end_to_end() {
		let overlap = line_segment_overlap([DVec2::new(0., 0.), DVec2::new(1., 0.)], [DVec2::new(1., 0.), DVec2::new(3., 0.)], 1e-6);
		assert_eq!(overlap.as_slice(), &[(1., 0.)]);
	}

	#[test]
	fn collinear_disjoint() {
		let overlap = line_segment_overlap([DVec2::new(0., 0.), DVec2::new(1., 0.)], [DVec2::new(2., 0.), DVec2::new(3., 0.)], 1e-6);
		assert!(overlap.is_empty());
	}
}
