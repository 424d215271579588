// Copyright 2024 Adam Platkevič <rflashster@gmail.com>
//
// SPDX-License-Identifier: MIT

pub(crate) mod arrangement;
pub(crate) mod edge_walk;
pub(crate) mod fill_classifier;

use log::debug;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::BooleanError;
use crate::path::PathVector;
use crate::util::epsilons::EPS;
use arrangement::Arrangement;
use edge_walk::combine;
use fill_classifier::classify;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FillRule {
	NonZero,
	EvenOdd,
}

impl FromStr for FillRule {
	type Err = BooleanError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
			"nonzero" => Ok(FillRule::NonZero),
			"evenodd" => Ok(FillRule::EvenOdd),
			_ => Err(BooleanError::InvalidFillRuleOrOperator(s.to_string())),
		}
	}
}

/// How two regions are combined. For [`PathBooleanOperation::Difference`] the second operand is the subject and the first operand
/// is cut out of it, as when the upper of two stacked shapes is subtracted from the lower one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PathBooleanOperation {
	Union,
	Intersection,
	Difference,
	Xor,
}

impl FromStr for PathBooleanOperation {
	type Err = BooleanError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"union" => Ok(PathBooleanOperation::Union),
			"intersection" | "intersect" => Ok(PathBooleanOperation::Intersection),
			"difference" | "subtract" => Ok(PathBooleanOperation::Difference),
			"xor" | "exclusion" => Ok(PathBooleanOperation::Xor),
			_ => Err(BooleanError::InvalidFillRuleOrOperator(s.to_string())),
		}
	}
}

fn closed_part(path: &PathVector) -> PathVector {
	path.closed_subpaths().cloned().collect()
}

/// Results that follow without building an arrangement: an operand without area, or two identical operands.
fn shortcut(a: &PathVector, fill_rule_a: FillRule, b: &PathVector, fill_rule_b: FillRule, op: PathBooleanOperation) -> Option<PathVector> {
	use PathBooleanOperation::*;

	let empty = PathVector::default;
	match (a.has_closed_region(), b.has_closed_region()) {
		(false, _) => {
			return Some(match op {
				Union | Difference | Xor => closed_part(b),
				Intersection => empty(),
			});
		}
		(_, false) => {
			return Some(match op {
				Union | Xor => closed_part(a),
				Intersection | Difference => empty(),
			});
		}
		_ => {}
	}

	let (a, b) = (closed_part(a), closed_part(b));
	if fill_rule_a == fill_rule_b && a.approx_eq(&b, EPS.point) {
		return Some(match op {
			Union | Intersection => a,
			Difference | Xor => empty(),
		});
	}

	None
}

/// Combines the regions enclosed by the closed subpaths of `a` and `b`, each filled by its own fill rule.
///
/// The result holds closed contours with outer boundaries counter-clockwise on screen and holes clockwise, in canonical order
/// (see [`PathVector::canonicalized`]). Open subpaths of both operands are passed through unchanged after the contours.
pub fn path_boolean(a: &PathVector, fill_rule_a: FillRule, b: &PathVector, fill_rule_b: FillRule, op: PathBooleanOperation) -> Result<PathVector, BooleanError> {
	a.validate(EPS.point)?;
	b.validate(EPS.point)?;

	let closed = match shortcut(a, fill_rule_a, b, fill_rule_b, op) {
		Some(result) => result,
		None => {
			let arrangement = Arrangement::build(a, Some(b))?;
			let classification = classify(&arrangement, fill_rule_a, fill_rule_b);
			combine(&arrangement, &classification, op)
		}
	};

	let open = a.open_subpaths().chain(b.open_subpaths()).cloned();
	Ok(closed.subpaths.into_iter().chain(open).collect())
}

/// Applies `op` cumulatively to a sequence of operands in order.
///
/// Union, intersection and xor fold from the first operand onwards. For difference the last operand is the subject and every
/// earlier operand is cut out of it.
pub fn path_boolean_all(operands: &[(PathVector, FillRule)], op: PathBooleanOperation) -> Result<PathVector, BooleanError> {
	let Some(((first, first_fill_rule), rest)) = operands.split_first() else {
		return Ok(PathVector::default());
	};
	debug!("Combining {} operands with {op:?}", operands.len());

	if op == PathBooleanOperation::Difference {
		let Some(((subject, subject_fill_rule), cutters)) = operands.split_last() else {
			return Ok(PathVector::default());
		};
		let mut result = subject.clone();
		let mut result_fill_rule = *subject_fill_rule;
		for (cutter, cutter_fill_rule) in cutters {
			result = path_boolean(cutter, *cutter_fill_rule, &result, result_fill_rule, op)?;
			result_fill_rule = FillRule::NonZero;
		}
		return Ok(result);
	}

	let mut result = first.clone();
	let mut result_fill_rule = *first_fill_rule;
	for (operand, fill_rule) in rest {
		result = path_boolean(&result, result_fill_rule, operand, *fill_rule, op)?;
		// Contours produced by the combinator never overlap, so non-zero reproduces their region
		result_fill_rule = FillRule::NonZero;
	}
	Ok(result)
}
