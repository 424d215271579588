// Copyright 2024 Adam Platkevič <rflashster@gmail.com>
//
// SPDX-License-Identifier: MIT

use glam::DVec2;
use kurbo::BezPath;
use log::debug;
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::BooleanError;
use crate::path::PathVector;
use crate::path::intersection_path_segment::{path_cubic_segment_self_intersection, path_segment_intersection};
use crate::path::path_segment::PathSegment;
use crate::util::aabb::{Aabb, bounding_box_around_point, bounding_box_max_extent, bounding_boxes_overlap, expand_bounding_box, merge_bounding_boxes};
use crate::util::epsilons::EPS;
use crate::util::grid::{BitVec, Grid};

/// Upper bound on the number of intersection points between all input segments, past which the input is rejected as degenerate.
pub const MAX_INTERSECTIONS: usize = 100_000;

new_key_type! {
	pub struct VertexKey;
	pub struct EdgeKey;
}

#[derive(Clone, Debug)]
pub struct Vertex {
	pub point: DVec2,
	/// Edges touching this vertex, in insertion order. A loop edge is listed once.
	pub edges: SmallVec<[EdgeKey; 4]>,
}

#[derive(Clone, Debug)]
pub struct Edge {
	pub segment: PathSegment,
	pub from: VertexKey,
	pub to: VertexKey,
	/// How much crossing this edge from its right to its left changes the winding number of each operand.
	pub winding: [i32; 2],
}

impl Edge {
	pub fn other_end(&self, vertex: VertexKey) -> VertexKey {
		if self.from == vertex { self.to } else { self.from }
	}
}

/// Planar subdivision of the closed subpaths of up to two operands: no two edges cross except at shared vertices.
#[derive(Clone, Debug, Default)]
pub struct Arrangement {
	pub vertices: SlotMap<VertexKey, Vertex>,
	pub edges: SlotMap<EdgeKey, Edge>,
	/// Closed subpaths of each operand, used for winding number queries.
	pub regions: [BezPath; 2],
}

#[derive(Clone, Copy)]
struct InputSegment {
	segment: PathSegment,
	operand: usize,
	bounding_box: Aabb,
}

fn collect_segments(operand: usize, path: &PathVector, segments: &mut Vec<InputSegment>) -> BezPath {
	let mut region = BezPath::new();
	for subpath in path.closed_subpaths() {
		let subpath = subpath.without_degenerate_segments(EPS.point);
		if subpath.is_empty() {
			continue;
		}
		region.extend(BezPath::from(&subpath).elements().iter().copied());
		segments.extend(subpath.segments.iter().map(|segment| InputSegment {
			segment: *segment,
			operand,
			bounding_box: segment.bounding_box(),
		}));
	}
	region
}

/// Finds the parameters at which every segment has to be split so that the pieces only meet at their ends.
fn find_split_params(segments: &[InputSegment], total_bounding_box: &Aabb, max_intersections: usize) -> Result<Vec<Vec<f64>>, BooleanError> {
	let mut split_params = vec![Vec::new(); segments.len()];
	let mut intersection_count = 0;

	for (index, input) in segments.iter().enumerate() {
		for [s, t] in path_cubic_segment_self_intersection(&input.segment, &EPS) {
			split_params[index].push(s);
			split_params[index].push(t);
			intersection_count += 1;
		}
	}

	let cell_size = (bounding_box_max_extent(total_bounding_box) / (segments.len() as f64).sqrt()).max(EPS.linear);
	let mut grid = Grid::new(cell_size, segments.len());
	for (index, input) in segments.iter().enumerate() {
		grid.insert(&input.bounding_box, index);
	}

	let mut candidates = BitVec::new(segments.len());
	for (index, input) in segments.iter().enumerate() {
		let query_box = expand_bounding_box(&input.bounding_box, EPS.point);
		candidates.clear();
		grid.query(&query_box, |other| {
			if other > index {
				candidates.set(other);
			}
		});

		for other in candidates.iter_set_bits() {
			if !bounding_boxes_overlap(&query_box, &segments[other].bounding_box) {
				continue;
			}
			for [s, t] in path_segment_intersection(&input.segment, &segments[other].segment, false, &EPS) {
				split_params[index].push(s);
				split_params[other].push(t);
				intersection_count += 1;
			}
			if intersection_count > max_intersections {
				return Err(BooleanError::DegenerateGeometry(format!("more than {max_intersections} intersections between the operands")));
			}
		}
	}

	debug!("Found {intersection_count} intersections between {} segments", segments.len());
	Ok(split_params)
}

/// Cuts a segment at the given parameters, ignoring parameters at its ends and ones that land on the same vertex twice.
fn split_segment(segment: &PathSegment, mut params: Vec<f64>) -> Vec<PathSegment> {
	params.retain(|t| *t > EPS.param && *t < 1. - EPS.param);
	params.sort_by(f64::total_cmp);

	let mut kept: Vec<f64> = Vec::with_capacity(params.len());
	let mut last_point = segment.start();
	for t in params {
		let point = segment.sample_at(t);
		if point.abs_diff_eq(last_point, EPS.linear) {
			continue;
		}
		kept.push(t);
		last_point = point;
	}
	if let Some(&t) = kept.last() {
		if segment.sample_at(t).abs_diff_eq(segment.end(), EPS.linear) {
			kept.pop();
		}
	}

	segment.split_at_params(&kept)
}

/// Merges points closer than `EPS.linear`, the accuracy of computed intersections, into one vertex.
struct VertexIndex {
	grid: Grid<VertexKey>,
}

impl VertexIndex {
	fn find(&self, vertices: &SlotMap<VertexKey, Vertex>, point: DVec2) -> Option<VertexKey> {
		let mut closest: Option<(VertexKey, f64)> = None;
		self.grid.query(&bounding_box_around_point(point, EPS.linear), |key| {
			let distance = vertices[key].point.distance(point);
			if distance <= EPS.linear && closest.is_none_or(|(_, best)| distance < best) {
				closest = Some((key, distance));
			}
		});
		closest.map(|(key, _)| key)
	}

	fn find_or_insert(&mut self, vertices: &mut SlotMap<VertexKey, Vertex>, point: DVec2) -> VertexKey {
		if let Some(key) = self.find(vertices, point) {
			return key;
		}

		let key = vertices.insert(Vertex { point, edges: SmallVec::new() });
		self.grid.insert(&bounding_box_around_point(point, EPS.point), key);
		key
	}
}

impl Arrangement {
	/// Overlays the closed subpaths of `a` and, if given, `b`, splitting every segment wherever it meets another one.
	///
	/// Input nodes become vertices first, so an intersection computed within `EPS.linear` of a node lands exactly on it.
	pub fn build(a: &PathVector, b: Option<&PathVector>) -> Result<Arrangement, BooleanError> {
		Self::build_with_limit(a, b, MAX_INTERSECTIONS)
	}

	pub(crate) fn build_with_limit(a: &PathVector, b: Option<&PathVector>, max_intersections: usize) -> Result<Arrangement, BooleanError> {
		let mut segments = Vec::new();
		let region_a = collect_segments(0, a, &mut segments);
		let region_b = b.map(|b| collect_segments(1, b, &mut segments)).unwrap_or_default();

		let mut arrangement = Arrangement {
			regions: [region_a, region_b],
			..Default::default()
		};
		let Some(total_bounding_box) = segments.iter().map(|input| input.bounding_box).reduce(|a, b| merge_bounding_boxes(&a, &b)) else {
			return Ok(arrangement);
		};

		let split_params = find_split_params(&segments, &total_bounding_box, max_intersections)?;

		let vertex_cell_size = (bounding_box_max_extent(&total_bounding_box) / 4096.).max(EPS.point * 16.);
		let mut vertex_index = VertexIndex {
			grid: Grid::new(vertex_cell_size, segments.len() * 2),
		};
		for input in &segments {
			vertex_index.find_or_insert(&mut arrangement.vertices, input.segment.start());
		}
		let mut edges_by_ends: FxHashMap<(VertexKey, VertexKey), SmallVec<[EdgeKey; 2]>> = FxHashMap::default();
		let mut merged_count = 0;

		for (input, params) in segments.iter().zip(split_params) {
			for fragment in split_segment(&input.segment, params) {
				let from = vertex_index.find_or_insert(&mut arrangement.vertices, fragment.start());
				let to = vertex_index.find_or_insert(&mut arrangement.vertices, fragment.end());
				let fragment = fragment.with_endpoints(arrangement.vertices[from].point, arrangement.vertices[to].point);
				if from == to && bounding_box_max_extent(&fragment.control_bounding_box()) <= EPS.linear {
					continue;
				}

				let ends = if from <= to { (from, to) } else { (to, from) };
				let coincident = edges_by_ends.get(&ends).and_then(|keys| {
					keys.iter().find_map(|&key| {
						let edge = &arrangement.edges[key];
						if edge.segment.approx_eq(&fragment, EPS.linear) {
							Some((key, 1))
						} else if edge.segment.approx_eq(&fragment.reverse(), EPS.linear) {
							Some((key, -1))
						} else {
							None
						}
					})
				});

				if let Some((key, sign)) = coincident {
					arrangement.edges[key].winding[input.operand] += sign;
					merged_count += 1;
					continue;
				}

				let mut winding = [0; 2];
				winding[input.operand] = 1;
				let key = arrangement.edges.insert(Edge { segment: fragment, from, to, winding });
				edges_by_ends.entry(ends).or_default().push(key);
				arrangement.vertices[from].edges.push(key);
				if to != from {
					arrangement.vertices[to].edges.push(key);
				}
			}
		}

		debug!(
			"Built arrangement with {} vertices and {} edges ({merged_count} coincident fragments merged)",
			arrangement.vertices.len(),
			arrangement.edges.len()
		);
		Ok(arrangement)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::path::SubPath;

	fn polygon(points: &[(f64, f64)]) -> PathVector {
		let points: Vec<DVec2> = points.iter().map(|&(x, y)| DVec2::new(x, y)).collect();
		let segments = (0..points.len()).map(|i| PathSegment::Line(points[i], points[(i + 1) % points.len()])).collect();
		PathVector::new(vec![SubPath::closed(segments)])
	}

	#[test]
	fn crossing_squares() {
		let a = polygon(&[(0., 0.), (0., 2.), (2., 2.), (2., 0.)]);
		let b = polygon(&[(1., 1.), (1., 3.), (3., 3.), (3., 1.)]);
		let arrangement = Arrangement::build(&a, Some(&b)).unwrap();
		// Four corners each plus the two crossings
		assert_eq!(arrangement.vertices.len(), 10);
		assert_eq!(arrangement.edges.len(), 12);
		assert!(arrangement.vertices.values().all(|vertex| vertex.edges.len() == 2 || vertex.edges.len() == 4));
	}

	#[test]
	fn shared_edge_is_merged() {
		let a = polygon(&[(0., 0.), (0., 2.), (2., 2.), (2., 0.)]);
		let b = polygon(&[(0., 2.), (0., 0.), (-2., 0.), (-2., 2.)]);
		let arrangement = Arrangement::build(&a, Some(&b)).unwrap();
		assert_eq!(arrangement.vertices.len(), 6);
		assert_eq!(arrangement.edges.len(), 7);
		let shared = arrangement.edges.values().find(|edge| edge.winding[0] != 0 && edge.winding[1] != 0).unwrap();
		assert_eq!(shared.winding[0], -shared.winding[1]);
	}

	#[test]
	fn degenerate_segments_are_dropped() {
		let mut a = polygon(&[(0., 0.), (0., 2.), (2., 2.), (2., 0.)]);
		a.subpaths[0].segments.insert(1, PathSegment::Line(DVec2::new(0., 2.), DVec2::new(0., 2.)));
		let arrangement = Arrangement::build(&a, None).unwrap();
		assert_eq!(arrangement.edges.len(), 4);
	}

	#[test]
	fn intersection_limit_rejects_input() {
		let a = polygon(&[(0., 0.), (0., 2.), (2., 2.), (2., 0.)]);
		let b = polygon(&[(1., 1.), (1., 3.), (3., 3.), (3., 1.)]);
		assert!(Arrangement::build_with_limit(&a, Some(&b), 2).is_ok());
		assert!(matches!(Arrangement::build_with_limit(&a, Some(&b), 1), Err(BooleanError::DegenerateGeometry(_))));
	}

	#[test]
	fn crossing_near_a_node_lands_on_it() {
		// The node at (2, 1) sits a few millionths off the other square's edge
		let a = polygon(&[(0., 0.), (0., 2.), (2., 2.), (2., 0.)]);
		let b = polygon(&[(2.000004, 1.), (4., 1.5), (4., 0.5)]);
		let b_crossing = polygon(&[(1.999996, 1.), (4., 1.5), (4., 0.5)]);
		for b in [b, b_crossing] {
			let arrangement = Arrangement::build(&a, Some(&b)).unwrap();
			let near: Vec<_> = arrangement.vertices.values().filter(|vertex| vertex.point.distance(DVec2::new(2., 1.)) < 1e-3).collect();
			assert_eq!(near.len(), 1);
			assert!(arrangement.edges.values().all(|edge| !edge.segment.is_degenerate(1e-3)));
		}
	}

	#[test]
	fn open_subpaths_are_ignored() {
		let a = PathVector::new(vec![SubPath::open(vec![PathSegment::Line(DVec2::ZERO, DVec2::ONE)])]);
		let arrangement = Arrangement::build(&a, None).unwrap();
		assert!(arrangement.edges.is_empty());
		assert!(arrangement.vertices.is_empty());
	}
}
