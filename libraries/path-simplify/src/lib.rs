//! Reduces the number of nodes in Bezier paths while keeping every point of the original within a tolerance of the result.
//!
//! The tolerance scales with the size of the selection, and calls repeated in quick succession simplify progressively harder
//! (see [`SimplifyState`]).

mod acceleration;
mod bezier_fit;
mod coalesce;
mod error;
mod refit;

pub use acceleration::{ACCELERATION_STEP, ACCELERATION_WINDOW, SimplifyState};
pub use bezier_fit::{CubicPoints, fit_cubics};
pub use error::SimplifyError;

use log::{debug, trace};
use path_bool::{BooleanError, EPS, PathVector, SubPath, merge_bounding_boxes};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Fraction of the selection size used as the tolerance when nothing else is configured.
pub const DEFAULT_THRESHOLD: f64 = 0.003;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimplifyOptions {
	/// Tolerance relative to the selection size.
	pub threshold: f64,
	/// Only merge nearly straight segments into lines instead of refitting curves.
	pub just_coalesce: bool,
}

impl Default for SimplifyOptions {
	fn default() -> Self {
		Self {
			threshold: DEFAULT_THRESHOLD,
			just_coalesce: false,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimplifyOutcome {
	/// One entry per input path, in input order.
	pub paths: Vec<PathVector>,
	/// How many paths came out different from how they went in.
	pub paths_changed: usize,
	/// State to pass to the next call.
	pub state: SimplifyState,
	/// Absolute tolerance this call used.
	pub tolerance: f64,
}

/// Diagonal of the combined bounding box of `paths`, or `None` when they have no extent.
pub fn selection_scale(paths: &[PathVector]) -> Option<f64> {
	let bounding_box = paths.iter().filter_map(PathVector::bounding_box).reduce(|a, b| merge_bounding_boxes(&a, &b))?;
	let diagonal = bounding_box.diagonal();
	(diagonal.is_finite() && diagonal > 0.).then_some(diagonal)
}

/// Applies one simplification pass after another until a pass changes nothing, so that simplifying the result again at the
/// same tolerance gives it back unchanged.
///
/// Every pass is checked against the samples of the original subpath. When the passes drift further than `tolerance` from
/// them, the subpath is left as it was.
fn simplify_subpath(subpath: &SubPath, tolerance: f64, just_coalesce: bool) -> Option<SubPath> {
	let cleaned = subpath.without_degenerate_segments(EPS.point);
	if cleaned.is_empty() {
		return None;
	}

	let samples = refit::flatten(&cleaned.segments);
	let mut current = cleaned;
	loop {
		let segments = if just_coalesce { coalesce::coalesce(&current.segments, tolerance) } else { refit::refit(&current.segments, tolerance) };
		let next = SubPath::new(segments, subpath.closed).without_degenerate_segments(EPS.point);
		if next == current {
			break;
		}
		let deviation = refit::max_deviation(&samples, &next.segments);
		if deviation > tolerance {
			trace!("Keeping a subpath of {} segments, repeated passes drift {deviation} from it", subpath.len());
			return None;
		}
		current = next;
	}
	(current != *subpath).then_some(current)
}

fn simplify_path(path: &PathVector, tolerance: f64, just_coalesce: bool) -> Option<PathVector> {
	let simplified: Vec<Option<SubPath>> = path.iter().map(|subpath| simplify_subpath(subpath, tolerance, just_coalesce)).collect();
	if simplified.iter().all(Option::is_none) {
		return None;
	}
	Some(path.iter().zip(simplified).map(|(original, simplified)| simplified.unwrap_or_else(|| original.clone())).collect())
}

/// Simplifies every path with the tolerance `options.threshold × multiplier × scale`, where the multiplier comes from advancing
/// `state` to `now` and `scale` is usually the [`selection_scale`] of the same paths.
///
/// Paths that cannot be reduced are returned unchanged and are not counted in [`SimplifyOutcome::paths_changed`].
pub fn simplify(paths: &[PathVector], options: &SimplifyOptions, scale: f64, state: SimplifyState, now: Instant) -> Result<SimplifyOutcome, SimplifyError> {
	for (index, path) in paths.iter().enumerate() {
		path.validate(EPS.point).map_err(|error| match error {
			BooleanError::MalformedPath { subpath, segment } => SimplifyError::MalformedPath { path: index, subpath, segment },
			error => SimplifyError::Geometry(error),
		})?;
	}

	let state = state.advance(now);
	let tolerance = options.threshold * state.multiplier * scale;
	if !tolerance.is_finite() || tolerance <= 0. {
		return Err(SimplifyError::InvalidTolerance(tolerance));
	}
	debug!("Simplifying {} paths with tolerance {tolerance} (multiplier {})", paths.len(), state.multiplier);

	let mut paths_changed = 0;
	let paths = paths
		.iter()
		.map(|path| match simplify_path(path, tolerance, options.just_coalesce) {
			Some(simplified) => {
				paths_changed += 1;
				simplified
			}
			None => path.clone(),
		})
		.collect();

	Ok(SimplifyOutcome {
		paths,
		paths_changed,
		state,
		tolerance,
	})
}
