use glam::DVec2;
use kurbo::{ParamCurveNearest, Point};
use log::trace;
use path_bool::PathSegment;
use std::f64::consts::PI;

use crate::bezier_fit::fit_cubics;
use crate::coalesce::is_nearly_straight;

/// Nodes where the direction turns by more than this are corners and are never smoothed away.
const CORNER_ANGLE: f64 = PI / 6.;

/// Points taken along each segment of a run, both as fitting input and for the error check.
const SAMPLES_PER_SEGMENT: usize = 8;

/// Fitted curves this close to their chord, relative to the tolerance, are emitted as lines.
const STRAIGHT_FRACTION: f64 = 0.1;

const NEAREST_ACCURACY: f64 = 1e-9;

fn is_corner(incoming: &PathSegment, outgoing: &PathSegment) -> bool {
	incoming.end_tangent().dot(outgoing.start_tangent()) < CORNER_ANGLE.cos()
}

/// Splits `segments` into runs joined only by smooth nodes. The first node of the chain always starts a run.
fn smooth_runs(segments: &[PathSegment]) -> Vec<&[PathSegment]> {
	let mut runs = Vec::new();
	let mut start = 0;
	for index in 1..segments.len() {
		if is_corner(&segments[index - 1], &segments[index]) {
			runs.push(&segments[start..index]);
			start = index;
		}
	}
	if start < segments.len() {
		runs.push(&segments[start..]);
	}
	runs
}

/// The run's start followed by evenly spaced samples of every segment, without consecutive duplicates.
pub(crate) fn flatten(run: &[PathSegment]) -> Vec<DVec2> {
	let mut points: Vec<DVec2> = run.first().map(PathSegment::start).into_iter().collect();
	for segment in run {
		for k in 1..=SAMPLES_PER_SEGMENT {
			let point = segment.sample_at(k as f64 / SAMPLES_PER_SEGMENT as f64);
			if points.last() != Some(&point) {
				points.push(point);
			}
		}
	}
	points
}

/// Largest distance from any of `points` to the closest point on `segments`.
pub(crate) fn max_deviation(points: &[DVec2], segments: &[PathSegment]) -> f64 {
	let curves: Vec<_> = segments.iter().map(PathSegment::to_kurbo).collect();
	points
		.iter()
		.map(|point| {
			let point = Point::new(point.x, point.y);
			curves.iter().map(|curve| curve.nearest(point, NEAREST_ACCURACY).distance_sq).fold(f64::INFINITY, f64::min).sqrt()
		})
		.fold(0., f64::max)
}

fn to_segment([start, handle_start, handle_end, end]: [DVec2; 4], tolerance: f64) -> PathSegment {
	let cubic = PathSegment::Cubic(start, handle_start, handle_end, end);
	if is_nearly_straight(&cubic, tolerance * STRAIGHT_FRACTION) { PathSegment::Line(start, end) } else { cubic }
}

/// Replaces the run by fewer fitted curves, or returns `None` when no such replacement stays within `tolerance`.
fn refit_run(run: &[PathSegment], tolerance: f64) -> Option<Vec<PathSegment>> {
	if run.len() < 2 {
		return None;
	}

	let points = flatten(run);
	let fitted = fit_cubics(&points, run.len() - 1, tolerance)?;
	let mut replacement: Vec<PathSegment> = fitted.into_iter().map(|cubic| to_segment(cubic, tolerance)).collect();
	if replacement.len() >= run.len() {
		return None;
	}

	// The chain has to meet its neighbours exactly
	let (first, last) = (run[0].start(), run[run.len() - 1].end());
	if let Some(segment) = replacement.first_mut() {
		*segment = segment.with_endpoints(first, segment.end());
	}
	if let Some(segment) = replacement.last_mut() {
		*segment = segment.with_endpoints(segment.start(), last);
	}

	let deviation = max_deviation(&points, &replacement);
	if deviation > tolerance {
		trace!("Rejecting a fit of {} segments with deviation {deviation}", run.len());
		return None;
	}
	Some(replacement)
}

/// Refits every smooth run of `segments` with as few cubic curves as the tolerance allows. Corners stay where they are.
pub(crate) fn refit(segments: &[PathSegment], tolerance: f64) -> Vec<PathSegment> {
	smooth_runs(segments).into_iter().flat_map(|run| refit_run(run, tolerance).unwrap_or_else(|| run.to_vec())).collect()
}
