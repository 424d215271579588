// Copyright 2024 Adam Platkevič <rflashster@gmail.com>
//
// SPDX-License-Identifier: MIT

use log::warn;
use slotmap::SecondaryMap;
use smallvec::SmallVec;

use crate::path::path_segment::PathSegment;
use crate::path::{PathVector, SubPath};
use crate::path_boolean::PathBooleanOperation;
use crate::path_boolean::arrangement::{Arrangement, EdgeKey, VertexKey};
use crate::path_boolean::fill_classifier::{Classification, Inside};
use crate::util::math::vector_angle;

impl PathBooleanOperation {
	/// Whether a point with the given operand membership belongs to the result.
	pub fn includes(self, inside: Inside) -> bool {
		match self {
			PathBooleanOperation::Union => inside.a || inside.b,
			PathBooleanOperation::Intersection => inside.a && inside.b,
			// The second operand is the subject and the first one cuts into it
			PathBooleanOperation::Difference => inside.b && !inside.a,
			PathBooleanOperation::Xor => inside.a != inside.b,
		}
	}
}

/// A kept edge, pointing so that the result lies on its left.
#[derive(Clone, Copy, Debug)]
struct DirectedEdge {
	segment: PathSegment,
	from: VertexKey,
	to: VertexKey,
}

fn directed_edges(arrangement: &Arrangement, classification: &Classification, op: PathBooleanOperation) -> Vec<(EdgeKey, DirectedEdge)> {
	arrangement
		.edges
		.iter()
		.filter_map(|(key, edge)| {
			let sides = classification.get(key)?;
			let left = op.includes(sides.left);
			let right = op.includes(sides.right);
			match (left, right) {
				(true, false) => Some((
					key,
					DirectedEdge {
						segment: edge.segment,
						from: edge.from,
						to: edge.to,
					},
				)),
				(false, true) => Some((
					key,
					DirectedEdge {
						segment: edge.segment.reverse(),
						from: edge.to,
						to: edge.from,
					},
				)),
				_ => None,
			}
		})
		.collect()
}

/// Turning angle from the end of `incoming` into `outgoing`, with the probe direction as a tie breaker for tangent departures.
fn turn(incoming: &PathSegment, outgoing: &PathSegment) -> (f64, f64) {
	let direction = incoming.end_tangent();
	(vector_angle(direction, outgoing.start_tangent()), vector_angle(direction, outgoing.start_probe_direction()))
}

/// Keeps the edges whose two sides disagree about membership in the result and chains them into closed contours.
///
/// At a vertex with more than one way to continue, the walk takes the sharpest turn towards the result, which lies on the left.
/// The output is in canonical order (see [`PathVector::canonicalized`]).
pub fn combine(arrangement: &Arrangement, classification: &Classification, op: PathBooleanOperation) -> PathVector {
	let edges = directed_edges(arrangement, classification, op);

	let mut outgoing: SecondaryMap<VertexKey, SmallVec<[usize; 2]>> = SecondaryMap::with_capacity(arrangement.vertices.len());
	for (index, (_, edge)) in edges.iter().enumerate() {
		match outgoing.entry(edge.from) {
			Some(entry) => entry.or_default().push(index),
			None => warn!("Degenerate geometry: edge starts at a removed vertex"),
		}
	}

	let mut visited = vec![false; edges.len()];
	let mut contours = Vec::new();

	for start_index in 0..edges.len() {
		if visited[start_index] {
			continue;
		}

		let start_vertex = edges[start_index].1.from;
		let mut segments = Vec::new();
		let mut current = start_index;
		let closed = loop {
			visited[current] = true;
			let edge = &edges[current].1;
			segments.push(edge.segment);
			if edge.to == start_vertex {
				break true;
			}

			let next = outgoing.get(edge.to).and_then(|candidates| {
				candidates
					.iter()
					.copied()
					.filter(|&candidate| !visited[candidate])
					.min_by(|&x, &y| {
						let (angle_x, probe_x) = turn(&edge.segment, &edges[x].1.segment);
						let (angle_y, probe_y) = turn(&edge.segment, &edges[y].1.segment);
						angle_x.total_cmp(&angle_y).then(probe_x.total_cmp(&probe_y))
					})
			});
			match next {
				Some(next) => current = next,
				None => break false,
			}
		};

		if closed {
			contours.push(SubPath::closed(segments));
		} else {
			warn!("Degenerate geometry: dropping an unclosed contour of {} segments starting at {:?}", segments.len(), edges[start_index].1.segment.start());
		}
	}

	PathVector::new(contours).canonicalized()
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::path_boolean::FillRule;
	use crate::path_boolean::fill_classifier::classify;
	use glam::DVec2;

	#[test]
	fn operator_predicates() {
		let only_a = Inside { a: true, b: false };
		let only_b = Inside { a: false, b: true };
		let both = Inside { a: true, b: true };

		assert!(PathBooleanOperation::Union.includes(only_a));
		assert!(!PathBooleanOperation::Intersection.includes(only_a));
		assert!(PathBooleanOperation::Intersection.includes(both));
		assert!(PathBooleanOperation::Difference.includes(only_b));
		assert!(!PathBooleanOperation::Difference.includes(only_a));
		assert!(!PathBooleanOperation::Difference.includes(both));
		assert!(PathBooleanOperation::Xor.includes(only_a));
		assert!(!PathBooleanOperation::Xor.includes(both));
	}

	#[test]
	fn unclosed_walks_are_dropped() {
		let corners = [DVec2::ZERO, DVec2::new(0., 2.), DVec2::new(2., 2.), DVec2::new(2., 0.)];
		let square = PathVector::new(vec![SubPath::closed((0..4).map(|i| PathSegment::Line(corners[i], corners[(i + 1) % 4])).collect())]);
		let mut arrangement = Arrangement::build(&square, None).unwrap();
		let classification = classify(&arrangement, FillRule::NonZero, FillRule::NonZero);
		assert_eq!(combine(&arrangement, &classification, PathBooleanOperation::Union).len(), 1);

		let removed = arrangement.edges.keys().next().unwrap();
		arrangement.edges.remove(removed);
		let result = combine(&arrangement, &classification, PathBooleanOperation::Union);
		assert!(result.is_empty());
	}
}
