// Copyright 2024 Adam Platkevič <rflashster@gmail.com>
//
// SPDX-License-Identifier: MIT

use glam::DVec2;
use kurbo::{Point, Shape};
use slotmap::SecondaryMap;

use crate::path_boolean::FillRule;
use crate::path_boolean::arrangement::{Arrangement, Edge, EdgeKey};
use crate::util::epsilons::EPS;
use crate::util::math::left_normal;

/// Smallest distance from an edge at which its sides are sampled.
const MIN_SAMPLE_OFFSET: f64 = 1e-7;

/// Whether a point lies inside each operand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Inside {
	pub a: bool,
	pub b: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EdgeClassification {
	pub left: Inside,
	pub right: Inside,
}

pub type Classification = SecondaryMap<EdgeKey, EdgeClassification>;

impl FillRule {
	pub fn is_inside(self, winding: i32) -> bool {
		match self {
			FillRule::NonZero => winding != 0,
			FillRule::EvenOdd => winding % 2 != 0,
		}
	}
}

/// Points just to the left and right of the middle of an edge, as seen when travelling along it on screen.
fn side_samples(edge: &Edge) -> (Point, Point) {
	let midpoint = edge.segment.sample_at(0.5);
	let chord = (edge.segment.end() - edge.segment.start()).length();
	let offset = (chord * 1e-3).clamp(MIN_SAMPLE_OFFSET, EPS.linear);
	let normal = left_normal(edge.segment.tangent_at(0.5)) * offset;
	let to_point = |point: DVec2| Point::new(point.x, point.y);
	(to_point(midpoint + normal), to_point(midpoint - normal))
}

/// Decides for both sides of every edge whether it is inside each operand under that operand's fill rule.
pub fn classify(arrangement: &Arrangement, fill_rule_a: FillRule, fill_rule_b: FillRule) -> Classification {
	let fill_rules = [fill_rule_a, fill_rule_b];
	let mut classification = Classification::with_capacity(arrangement.edges.len());

	for (key, edge) in arrangement.edges.iter() {
		// Crossing this edge changes nothing, so both sides agree and no sampling is needed
		if edge.winding == [0, 0] {
			classification.insert(key, EdgeClassification::default());
			continue;
		}

		let (left_sample, right_sample) = side_samples(edge);
		let mut left = [false; 2];
		let mut right = [false; 2];
		for operand in 0..2 {
			let region = &arrangement.regions[operand];
			left[operand] = fill_rules[operand].is_inside(region.winding(left_sample));
			right[operand] = if edge.winding[operand] == 0 { left[operand] } else { fill_rules[operand].is_inside(region.winding(right_sample)) };
		}

		classification.insert(
			key,
			EdgeClassification {
				left: Inside { a: left[0], b: left[1] },
				right: Inside { a: right[0], b: right[1] },
			},
		);
	}

	classification
}
