// Copyright 2024 Adam Platkevič <rflashster@gmail.com>
//
// SPDX-License-Identifier: MIT

use glam::{DMat2, DVec2};
use kurbo::{CubicBez, Line, PathSeg, Point};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

use crate::util::aabb::{Aabb, bounding_box_max_extent, extend_bounding_box};
use crate::util::math::{deg2rad, lerp, vector_angle};

/// Parameter at which a tangent is probed when the exact end tangent is ambiguous.
const TANGENT_PROBE: f64 = 1e-3;

/// One curve of a subpath: a straight line or a cubic Bezier, each stored with its control points in order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum PathSegment {
	Line(DVec2, DVec2),
	Cubic(DVec2, DVec2, DVec2, DVec2),
}

impl PathSegment {
	pub fn start(&self) -> DVec2 {
		match *self {
			PathSegment::Line(start, _) => start,
			PathSegment::Cubic(start, _, _, _) => start,
		}
	}

	pub fn end(&self) -> DVec2 {
		match *self {
			PathSegment::Line(_, end) => end,
			PathSegment::Cubic(_, _, _, end) => end,
		}
	}

	pub fn is_line(&self) -> bool {
		matches!(self, PathSegment::Line(..))
	}

	pub fn reverse(&self) -> PathSegment {
		match *self {
			PathSegment::Line(start, end) => PathSegment::Line(end, start),
			PathSegment::Cubic(p1, p2, p3, p4) => PathSegment::Cubic(p4, p3, p2, p1),
		}
	}

	/// Replaces the endpoints, moving each adjacent handle along with its anchor.
	pub fn with_endpoints(&self, start: DVec2, end: DVec2) -> PathSegment {
		match *self {
			PathSegment::Line(..) => PathSegment::Line(start, end),
			PathSegment::Cubic(p0, p1, p2, p3) => PathSegment::Cubic(start, p1 + (start - p0), p2 + (end - p3), end),
		}
	}

	pub fn to_cubic(&self) -> [DVec2; 4] {
		match *self {
			PathSegment::Line(start, end) => [start, start, end, end],
			PathSegment::Cubic(s, c1, c2, e) => [s, c1, c2, e],
		}
	}

	pub fn sample_at(&self, t: f64) -> DVec2 {
		match *self {
			PathSegment::Line(start, end) => start.lerp(end, t),
			PathSegment::Cubic(p1, p2, p3, p4) => {
				let p01 = p1.lerp(p2, t);
				let p12 = p2.lerp(p3, t);
				let p23 = p3.lerp(p4, t);
				let p012 = p01.lerp(p12, t);
				let p123 = p12.lerp(p23, t);
				p012.lerp(p123, t)
			}
		}
	}

	pub fn derivative_at(&self, t: f64) -> DVec2 {
		match *self {
			PathSegment::Line(start, end) => end - start,
			PathSegment::Cubic(p0, p1, p2, p3) => {
				let mt = 1. - t;
				3. * (mt * mt * (p1 - p0) + 2. * mt * t * (p2 - p1) + t * t * (p3 - p2))
			}
		}
	}

	/// Unit direction of travel at `t`, falling back to the chord where the derivative vanishes.
	pub fn tangent_at(&self, t: f64) -> DVec2 {
		let derivative = self.derivative_at(t);
		if derivative.length_squared() > f64::EPSILON {
			return derivative.normalize();
		}
		let probe = if t < 0.5 { self.sample_at(t + TANGENT_PROBE) - self.sample_at(t) } else { self.sample_at(t) - self.sample_at(t - TANGENT_PROBE) };
		let probe = probe.normalize_or_zero();
		if probe != DVec2::ZERO { probe } else { (self.end() - self.start()).normalize_or_zero() }
	}

	/// Direction in which the segment leaves its start point.
	pub fn start_tangent(&self) -> DVec2 {
		self.tangent_at(0.)
	}

	/// Direction of travel as the segment arrives at its end point.
	pub fn end_tangent(&self) -> DVec2 {
		self.tangent_at(1.)
	}

	/// Direction from the start point towards a point slightly along the segment, which separates segments sharing a start tangent.
	pub fn start_probe_direction(&self) -> DVec2 {
		(self.sample_at(TANGENT_PROBE) - self.start()).normalize_or_zero()
	}

	pub fn bounding_box(&self) -> Aabb {
		match *self {
			PathSegment::Line(start, end) => Aabb::from_corners(start, end),
			PathSegment::Cubic(p1, p2, p3, p4) => {
				let (left, right) = cubic_bounding_interval(p1.x, p2.x, p3.x, p4.x);
				let (top, bottom) = cubic_bounding_interval(p1.y, p2.y, p3.y, p4.y);
				Aabb::new(left, top, right, bottom)
			}
		}
	}

	/// Bounding box of the control polygon, cheaper than [`Self::bounding_box`] and never smaller.
	pub fn control_bounding_box(&self) -> Aabb {
		self.to_cubic().iter().fold(None, |bounding_box, &point| Some(extend_bounding_box(bounding_box, point))).unwrap_or_default()
	}

	/// Whether the whole segment fits inside a box of size `eps`.
	pub fn is_degenerate(&self, eps: f64) -> bool {
		bounding_box_max_extent(&self.control_bounding_box()) < eps
	}

	/// Compares control points pairwise, so a segment and its reversal are not equal.
	pub fn approx_eq(&self, other: &PathSegment, eps: f64) -> bool {
		match (*self, *other) {
			(PathSegment::Line(start0, end0), PathSegment::Line(start1, end1)) => start0.abs_diff_eq(start1, eps) && end0.abs_diff_eq(end1, eps),
			(PathSegment::Cubic(p00, p01, p02, p03), PathSegment::Cubic(p10, p11, p12, p13)) => {
				p00.abs_diff_eq(p10, eps) && p01.abs_diff_eq(p11, eps) && p02.abs_diff_eq(p12, eps) && p03.abs_diff_eq(p13, eps)
			}
			_ => false,
		}
	}

	pub fn split_at(&self, t: f64) -> (PathSegment, PathSegment) {
		match *self {
			PathSegment::Line(start, end) => {
				let p = start.lerp(end, t);
				(PathSegment::Line(start, p), PathSegment::Line(p, end))
			}
			PathSegment::Cubic(p0, p1, p2, p3) => {
				let p01 = p0.lerp(p1, t);
				let p12 = p1.lerp(p2, t);
				let p23 = p2.lerp(p3, t);
				let p012 = p01.lerp(p12, t);
				let p123 = p12.lerp(p23, t);
				let p = p012.lerp(p123, t);

				(PathSegment::Cubic(p0, p01, p012, p), PathSegment::Cubic(p, p123, p23, p3))
			}
		}
	}

	/// Splits at every parameter in `params`, which must be sorted and lie strictly inside (0, 1).
	pub fn split_at_params(&self, params: &[f64]) -> Vec<PathSegment> {
		let mut pieces = Vec::with_capacity(params.len() + 1);
		let mut rest = *self;
		let mut consumed = 0.;
		for &t in params {
			let local_t = (t - consumed) / (1. - consumed);
			let (head, tail) = rest.split_at(local_t);
			pieces.push(head);
			rest = tail;
			consumed = t;
		}
		pieces.push(rest);
		pieces
	}

	/// The part of the segment between parameters `t0` and `t1`.
	pub fn subsegment(&self, t0: f64, t1: f64) -> PathSegment {
		let (_, tail) = self.split_at(t0);
		if t0 >= 1. {
			return tail;
		}
		let (head, _) = tail.split_at((t1 - t0) / (1. - t0));
		head
	}

	pub fn to_kurbo(&self) -> PathSeg {
		let point = |p: DVec2| Point::new(p.x, p.y);
		match *self {
			PathSegment::Line(start, end) => PathSeg::Line(Line::new(point(start), point(end))),
			PathSegment::Cubic(p0, p1, p2, p3) => PathSeg::Cubic(CubicBez::new(point(p0), point(p1), point(p2), point(p3))),
		}
	}

	/// Parameters in (0, 1) where the x or y coordinate has a local extremum. Between them the segment is monotone in both axes.
	pub fn monotone_split_params(&self) -> Vec<f64> {
		let PathSegment::Cubic(p0, p1, p2, p3) = *self else { return Vec::new() };

		let mut params = Vec::new();
		for axis in 0..2 {
			let a = 3. * (-p0[axis] + 3. * p1[axis] - 3. * p2[axis] + p3[axis]);
			let b = 6. * (p0[axis] - 2. * p1[axis] + p2[axis]);
			let c = 3. * (p1[axis] - p0[axis]);
			let roots = roots::find_roots_quadratic(a, b, c);
			params.extend(roots.as_ref().iter().copied().filter(|t| *t > 1e-9 && *t < 1. - 1e-9));
		}
		params.sort_by(f64::total_cmp);
		params.dedup_by(|a, b| (*a - *b).abs() < 1e-9);
		params
	}
}

fn eval_cubic_1d(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
	let p01 = lerp(p0, p1, t);
	let p12 = lerp(p1, p2, t);
	let p23 = lerp(p2, p3, t);
	let p012 = lerp(p01, p12, t);
	let p123 = lerp(p12, p23, t);
	lerp(p012, p123, t)
}

fn cubic_bounding_interval(p0: f64, p1: f64, p2: f64, p3: f64) -> (f64, f64) {
	let mut min = p0.min(p3);
	let mut max = p0.max(p3);

	let a = 3.0 * (-p0 + 3.0 * p1 - 3.0 * p2 + p3);
	let b = 6.0 * (p0 - 2.0 * p1 + p2);
	let c = 3.0 * (p1 - p0);

	let mut include = |t: f64| {
		if 0.0 < t && t < 1.0 {
			let x = eval_cubic_1d(p0, p1, p2, p3, t);
			min = min.min(x);
			max = max.max(x);
		}
	};

	if a.abs() < 1e-12 {
		if b.abs() > 1e-12 {
			include(-c / b);
		}
		return (min, max);
	}

	let d = b * b - 4.0 * a * c;
	if d < 0.0 {
		return (min, max);
	}

	let sqrt_d = d.sqrt();
	include((-b - sqrt_d) / (2.0 * a));
	include((-b + sqrt_d) / (2.0 * a));

	(min, max)
}

/// Endpoint parametrization of an elliptical arc as written in SVG path data.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ArcSegment {
	pub start: DVec2,
	pub rx: f64,
	pub ry: f64,
	/// Rotation of the ellipse's x axis, in degrees.
	pub x_axis_rotation: f64,
	pub large_arc: bool,
	pub sweep: bool,
	pub end: DVec2,
}

struct ArcCenterParametrization {
	center: DVec2,
	theta1: f64,
	delta_theta: f64,
	rx: f64,
	ry: f64,
	phi: f64,
}

// https://www.w3.org/TR/SVG2/implnote.html#ArcConversionEndpointToCenter
fn arc_segment_to_center(arc: &ArcSegment) -> Option<ArcCenterParametrization> {
	let ArcSegment { start: xy1, end: xy2, .. } = *arc;
	if arc.rx == 0. || arc.ry == 0. || xy1.abs_diff_eq(xy2, 1e-12) {
		return None;
	}

	let phi = deg2rad(arc.x_axis_rotation);
	let rotation_matrix = DMat2::from_angle(-phi);
	let xy1_prime = rotation_matrix * (xy1 - xy2) * 0.5;

	let mut rx = arc.rx.abs();
	let mut ry = arc.ry.abs();
	let x1_prime2 = xy1_prime.x * xy1_prime.x;
	let y1_prime2 = xy1_prime.y * xy1_prime.y;

	// https://www.w3.org/TR/SVG2/implnote.html#ArcCorrectionOutOfRangeRadii
	let lambda = x1_prime2 / (rx * rx) + y1_prime2 / (ry * ry);
	if lambda > 1. {
		let lambda_sqrt = lambda.sqrt();
		rx *= lambda_sqrt;
		ry *= lambda_sqrt;
	}
	let rx2 = rx * rx;
	let ry2 = ry * ry;

	let sign = if arc.large_arc == arc.sweep { -1. } else { 1. };
	let numerator = (rx2 * ry2 - rx2 * y1_prime2 - ry2 * x1_prime2).max(0.);
	let multiplier = (numerator / (rx2 * y1_prime2 + ry2 * x1_prime2)).sqrt();
	let cx_prime = sign * multiplier * ((rx * xy1_prime.y) / ry);
	let cy_prime = sign * multiplier * ((-ry * xy1_prime.x) / rx);

	let center = rotation_matrix.transpose() * DVec2::new(cx_prime, cy_prime) + (xy1 + xy2) * 0.5;

	let vec1 = DVec2::new((xy1_prime.x - cx_prime) / rx, (xy1_prime.y - cy_prime) / ry);
	let vec2 = DVec2::new((-xy1_prime.x - cx_prime) / rx, (-xy1_prime.y - cy_prime) / ry);
	let theta1 = vector_angle(DVec2::X, vec1);
	let mut delta_theta = vector_angle(vec1, vec2);

	if !arc.sweep && delta_theta > 0. {
		delta_theta -= TAU;
	} else if arc.sweep && delta_theta < 0. {
		delta_theta += TAU;
	}

	Some(ArcCenterParametrization {
		center,
		theta1,
		delta_theta,
		rx,
		ry,
		phi,
	})
}

/// Approximates an arc with cubic segments each spanning at most `max_delta_theta` radians.
pub(crate) fn arc_segment_to_cubics(arc: &ArcSegment, max_delta_theta: f64) -> Vec<PathSegment> {
	let Some(params) = arc_segment_to_center(arc) else {
		if arc.start.abs_diff_eq(arc.end, 1e-12) {
			return Vec::new();
		}
		return vec![PathSegment::Line(arc.start, arc.end)];
	};

	// The slack keeps an exact quarter turn from rounding up to two pieces
	let count = ((params.delta_theta.abs() / max_delta_theta - 1e-9).ceil() as usize).max(1);
	let step = params.delta_theta / count as f64;
	let k = (4. / 3.) * (step / 4.).tan();
	let rotation = DMat2::from_angle(params.phi);
	let to_document = |unit: DVec2| rotation * DVec2::new(unit.x * params.rx, unit.y * params.ry) + params.center;

	let mut cubics: Vec<PathSegment> = (0..count)
		.map(|i| {
			let theta = params.theta1 + i as f64 * step;
			let (sin0, cos0) = theta.sin_cos();
			let (sin1, cos1) = (theta + step).sin_cos();
			PathSegment::Cubic(
				to_document(DVec2::new(cos0, sin0)),
				to_document(DVec2::new(cos0 - k * sin0, sin0 + k * cos0)),
				to_document(DVec2::new(cos1 + k * sin1, sin1 - k * cos1)),
				to_document(DVec2::new(cos1, sin1)),
			)
		})
		.collect();

	// Pin the ends to the exact endpoints so the chain stays contiguous
	if let Some(first) = cubics.first_mut() {
		*first = first.with_endpoints(arc.start, first.end());
	}
	if let Some(last) = cubics.last_mut() {
		*last = last.with_endpoints(last.start(), arc.end);
	}
	cubics
}

/// Quarter turns keep the cubic approximation of an arc well within display precision.
pub(crate) const ARC_MAX_DELTA_THETA: f64 = PI / 2.;
