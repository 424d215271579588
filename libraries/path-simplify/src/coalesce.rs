use glam::DVec2;
use path_bool::PathSegment;

/// Points sampled along a cubic when deciding whether it is straight.
const STRAIGHTNESS_SAMPLES: usize = 16;

/// Distance from `point` to the segment between `start` and `end`.
pub(crate) fn distance_to_chord(point: DVec2, start: DVec2, end: DVec2) -> f64 {
	let chord = end - start;
	let length_squared = chord.length_squared();
	if length_squared == 0. {
		return point.distance(start);
	}
	let t = ((point - start).dot(chord) / length_squared).clamp(0., 1.);
	point.distance(start + chord * t)
}

/// Points along `segment` that must stay close to any straight replacement, excluding its start.
fn straightness_probes(segment: &PathSegment) -> impl Iterator<Item = DVec2> + '_ {
	let samples = if segment.is_line() { 1 } else { STRAIGHTNESS_SAMPLES };
	(1..=samples).map(move |k| segment.sample_at(k as f64 / samples as f64))
}

/// Whether the whole segment lies within `tolerance` of its own chord.
pub(crate) fn is_nearly_straight(segment: &PathSegment, tolerance: f64) -> bool {
	let (start, end) = (segment.start(), segment.end());
	segment.is_line() || straightness_probes(segment).all(|point| distance_to_chord(point, start, end) <= tolerance)
}

/// Replaces every maximal run of nearly straight segments by a single line, as long as the whole run stays within `tolerance`
/// of that line. Curves that bend further than the tolerance are kept as they are.
pub(crate) fn coalesce(segments: &[PathSegment], tolerance: f64) -> Vec<PathSegment> {
	let mut result = Vec::with_capacity(segments.len());
	let mut index = 0;

	while index < segments.len() {
		let first = segments[index];
		if !is_nearly_straight(&first, tolerance) {
			result.push(first);
			index += 1;
			continue;
		}

		let start = first.start();
		let mut probes: Vec<DVec2> = straightness_probes(&first).collect();
		let mut last = index;
		while let Some(next) = segments.get(last + 1) {
			if !is_nearly_straight(next, tolerance) {
				break;
			}
			let candidate_probes: Vec<DVec2> = straightness_probes(next).collect();
			let end = next.end();
			if !probes.iter().chain(&candidate_probes).all(|&point| distance_to_chord(point, start, end) <= tolerance) {
				break;
			}
			probes.extend(candidate_probes);
			last += 1;
		}

		result.push(PathSegment::Line(start, segments[last].end()));
		index = last + 1;
	}

	result
}

#[cfg(test)]
mod test {
	use super::*;

	fn line(a: (f64, f64), b: (f64, f64)) -> PathSegment {
		PathSegment::Line(DVec2::new(a.0, a.1), DVec2::new(b.0, b.1))
	}

	#[test]
	fn collinear_lines_merge() {
		let segments = [line((0., 0.), (1., 0.)), line((1., 0.), (2., 0.)), line((2., 0.), (3., 0.))];
		assert_eq!(coalesce(&segments, 1e-3), vec![line((0., 0.), (3., 0.))]);
	}

	#[test]
	fn corners_are_kept() {
		let segments = [line((0., 0.), (1., 0.)), line((1., 0.), (1., 1.))];
		assert_eq!(coalesce(&segments, 1e-3), segments.to_vec());
	}

	#[test]
	fn flat_cubic_becomes_line() {
		let flat = PathSegment::Cubic(DVec2::ZERO, DVec2::new(1., 1e-5), DVec2::new(2., -1e-5), DVec2::new(3., 0.));
		assert!(is_nearly_straight(&flat, 1e-3));
		assert_eq!(coalesce(&[flat], 1e-3), vec![line((0., 0.), (3., 0.))]);
	}

	#[test]
	fn bent_cubic_is_kept() {
		let bent = PathSegment::Cubic(DVec2::ZERO, DVec2::new(0., 1.), DVec2::new(1., 1.), DVec2::new(1., 0.));
		assert!(!is_nearly_straight(&bent, 1e-3));
		assert_eq!(coalesce(&[bent], 1e-3), vec![bent]);
	}

	#[test]
	fn doubling_back_is_not_straight() {
		// Stays on the x axis but overshoots both ends of its chord
		let overshoot = PathSegment::Cubic(DVec2::ZERO, DVec2::new(-2., 0.), DVec2::new(3., 0.), DVec2::new(1., 0.));
		assert!(!is_nearly_straight(&overshoot, 1e-3));
	}
}
