// Copyright 2024 Adam Platkevič <rflashster@gmail.com>
//
// SPDX-License-Identifier: MIT

use log::warn;

use crate::path::line_segment::{LineSegment, line_segment_intersection, line_segment_overlap, line_segments_intersect};
use crate::path::path_segment::PathSegment;
use crate::util::aabb::{Aabb, bounding_box_max_extent, bounding_boxes_overlap, expand_bounding_box};
use crate::util::epsilons::Epsilons;
use crate::util::math::lerp;

/// Number of live candidate pairs after which bisection of a single segment pair is abandoned.
pub const MAX_SUBDIVISION_PAIRS: usize = 4096;

#[derive(Clone)]
struct IntersectionSegment {
	seg: PathSegment,
	start_param: f64,
	end_param: f64,
	bounding_box: Aabb,
}

impl IntersectionSegment {
	fn new(seg: &PathSegment) -> Self {
		IntersectionSegment {
			seg: *seg,
			start_param: 0.,
			end_param: 1.,
			bounding_box: seg.bounding_box(),
		}
	}

	fn subdivide(&self) -> [IntersectionSegment; 2] {
		let (seg0, seg1) = self.seg.split_at(0.5);
		let mid_param = (self.start_param + self.end_param) / 2.;
		[
			IntersectionSegment {
				seg: seg0,
				start_param: self.start_param,
				end_param: mid_param,
				bounding_box: seg0.bounding_box(),
			},
			IntersectionSegment {
				seg: seg1,
				start_param: mid_param,
				end_param: self.end_param,
				bounding_box: seg1.bounding_box(),
			},
		]
	}

	fn chord(&self) -> LineSegment {
		[self.seg.start(), self.seg.end()]
	}
}

fn intersection_segments_overlap(seg0: &IntersectionSegment, seg1: &IntersectionSegment, eps: &Epsilons) -> bool {
	match (&seg0.seg, &seg1.seg) {
		(PathSegment::Line(start0, end0), PathSegment::Line(start1, end1)) => line_segments_intersect([*start0, *end0], [*start1, *end1], eps.point),
		_ => bounding_boxes_overlap(&expand_bounding_box(&seg0.bounding_box, eps.point), &seg1.bounding_box),
	}
}

/// Whether two segments trace the same curve, in either direction.
pub fn segments_equal(seg0: &PathSegment, seg1: &PathSegment, point_epsilon: f64) -> bool {
	seg0.approx_eq(seg1, point_epsilon) || seg0.approx_eq(&seg1.reverse(), point_epsilon)
}

fn is_endpoint_param(param: f64, eps: &Epsilons) -> bool {
	param < eps.param || param > 1. - eps.param
}

fn line_line_intersection(line0: LineSegment, line1: LineSegment, endpoints: bool, eps: &Epsilons) -> Vec<[f64; 2]> {
	let mut params: Vec<[f64; 2]> = match line_segment_intersection(line0, line1, eps.param) {
		Some((s, t)) => vec![[s, t]],
		None => line_segment_overlap(line0, line1, eps.point).into_iter().map(|(s, t)| [s, t]).collect(),
	};
	if !endpoints {
		params.retain(|&[s, t]| !is_endpoint_param(s, eps) || !is_endpoint_param(t, eps));
	}
	params
}

/// Parameter pairs `[s, t]` at which `seg0` (at `s`) meets `seg1` (at `t`).
///
/// Line pairs are solved directly, including the ends of a collinear overlap. Everything else is found by recursive bisection,
/// discarding pieces whose bounding boxes do not overlap, until both pieces are flat enough to be treated as lines.
/// With `endpoints` false, hits where both parameters are at a segment end are omitted.
pub fn path_segment_intersection(seg0: &PathSegment, seg1: &PathSegment, endpoints: bool, eps: &Epsilons) -> Vec<[f64; 2]> {
	if let (PathSegment::Line(start0, end0), PathSegment::Line(start1, end1)) = (seg0, seg1) {
		return line_line_intersection([*start0, *end0], [*start1, *end1], endpoints, eps);
	}

	// Coincident curves only meet where their ends do
	if segments_equal(seg0, seg1, eps.point) {
		if !endpoints {
			return Vec::new();
		}
		return if seg0.start().abs_diff_eq(seg1.start(), eps.point) { vec![[0., 0.], [1., 1.]] } else { vec![[0., 1.], [1., 0.]] };
	}

	// https://math.stackexchange.com/questions/20321/how-can-i-tell-when-two-cubic-b%C3%A9zier-curves-intersect

	let mut pairs = vec![(IntersectionSegment::new(seg0), IntersectionSegment::new(seg1))];
	let mut params = Vec::new();

	while !pairs.is_empty() {
		if pairs.len() > MAX_SUBDIVISION_PAIRS {
			warn!("Degenerate geometry: abandoning intersection of {seg0:?} and {seg1:?} after {} candidate pairs", pairs.len());
			return Vec::new();
		}

		let mut next_pairs = Vec::new();

		for (seg0, seg1) in pairs {
			if segments_equal(&seg0.seg, &seg1.seg, eps.point) {
				continue;
			}

			let is_linear0 = bounding_box_max_extent(&seg0.bounding_box) <= eps.linear;
			let is_linear1 = bounding_box_max_extent(&seg1.bounding_box) <= eps.linear;

			if is_linear0 && is_linear1 {
				if let Some((s, t)) = line_segment_intersection(seg0.chord(), seg1.chord(), eps.param) {
					params.push([lerp(seg0.start_param, seg0.end_param, s), lerp(seg1.start_param, seg1.end_param, t)]);
				}
				continue;
			}

			let subdivided0 = if is_linear0 { vec![seg0] } else { seg0.subdivide().to_vec() };
			let subdivided1 = if is_linear1 { vec![seg1] } else { seg1.subdivide().to_vec() };

			for seg0 in &subdivided0 {
				for seg1 in &subdivided1 {
					if intersection_segments_overlap(seg0, seg1, eps) {
						next_pairs.push((seg0.clone(), seg1.clone()));
					}
				}
			}
		}

		pairs = next_pairs;
	}

	// Neighbouring pieces report the same crossing at their shared end
	params.sort_by(|a, b| a[0].total_cmp(&b[0]));
	params.dedup_by(|a, b| (a[0] - b[0]).abs() < eps.linear && (a[1] - b[1]).abs() < eps.linear);

	if !endpoints {
		params.retain(|&[s, t]| !is_endpoint_param(s, eps) || !is_endpoint_param(t, eps));
	}

	params
}

/// Parameter pairs `[s, t]`, `s < t`, at which a cubic crosses itself.
///
/// The cubic is cut into pieces that are monotone in x and y; a monotone piece cannot cross itself, so every loop shows up as
/// an intersection between two different pieces.
pub fn path_cubic_segment_self_intersection(seg: &PathSegment, eps: &Epsilons) -> Vec<[f64; 2]> {
	let splits = seg.monotone_split_params();
	if splits.is_empty() {
		return Vec::new();
	}

	let mut bounds = Vec::with_capacity(splits.len() + 2);
	bounds.push(0.);
	bounds.extend(splits);
	bounds.push(1.);

	let pieces: Vec<(f64, f64, PathSegment)> = bounds.windows(2).map(|w| (w[0], w[1], seg.subsegment(w[0], w[1]))).collect();

	let mut params = Vec::new();
	for (i, (s0, s1, piece0)) in pieces.iter().enumerate() {
		for (t0, t1, piece1) in pieces.iter().skip(i + 1) {
			for [s, t] in path_segment_intersection(piece0, piece1, false, eps) {
				let s = lerp(*s0, *s1, s);
				let t = lerp(*t0, *t1, t);
				// Adjacent pieces share their split point, which is not a crossing
				if (t - s).abs() > eps.linear {
					params.push([s, t]);
				}
			}
		}
	}
	params
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::util::epsilons::EPS;
	use glam::DVec2;

	#[test]
	fn cubic_crosses_line_twice() {
		let cubic = PathSegment::Cubic(DVec2::new(0., 0.), DVec2::new(0., 4.), DVec2::new(4., 4.), DVec2::new(4., 0.));
		let line = PathSegment::Line(DVec2::new(-1., 1.), DVec2::new(5., 1.));
		let params = path_segment_intersection(&cubic, &line, true, &EPS);
		assert_eq!(params.len(), 2);
		for [s, t] in params {
			assert!(cubic.sample_at(s).abs_diff_eq(line.sample_at(t), 1e-4));
		}
	}

	#[test]
	fn shared_endpoint_is_omitted_without_endpoints() {
		let line0 = PathSegment::Line(DVec2::new(0., 0.), DVec2::new(1., 0.));
		let line1 = PathSegment::Line(DVec2::new(1., 0.), DVec2::new(1., 1.));
		assert_eq!(path_segment_intersection(&line0, &line1, true, &EPS), vec![[1., 0.]]);
		assert!(path_segment_intersection(&line0, &line1, false, &EPS).is_empty());
	}

	#[test]
	fn disjoint_cubics() {
		let cubic0 = PathSegment::Cubic(DVec2::new(0., 0.), DVec2::new(1., 1.), DVec2::new(2., 1.), DVec2::new(3., 0.));
		let cubic1 = PathSegment::Cubic(DVec2::new(0., 10.), DVec2::new(1., 11.), DVec2::new(2., 11.), DVec2::new(3., 10.));
		assert!(path_segment_intersection(&cubic0, &cubic1, true, &EPS).is_empty());
	}

	#[test]
	fn overlapping_cubics_are_abandoned() {
		// Tracing the same curve with a different parameterisation keeps every subdivided pair alive
		let cubic = PathSegment::Cubic(DVec2::new(0., 0.), DVec2::new(100., 100.), DVec2::new(200., 100.), DVec2::new(300., 0.));
		let part = cubic.subsegment(0.1, 0.9);
		assert!(!segments_equal(&cubic, &part, EPS.point));
		assert!(path_segment_intersection(&cubic, &part, true, &EPS).is_empty());
	}

	#[test]
	fn looping_cubic_crosses_itself() {
		let cubic = PathSegment::Cubic(DVec2::new(0., 0.), DVec2::new(3., 3.), DVec2::new(-1., 3.), DVec2::new(2., 0.));
		let params = path_cubic_segment_self_intersection(&cubic, &EPS);
		assert_eq!(params.len(), 1);
		let [s, t] = params[0];
		assert!(s < t);
		assert!(cubic.sample_at(s).abs_diff_eq(cubic.sample_at(t), 1e-3));
	}
}
