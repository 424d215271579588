use log::{debug, error};
use path_bool::PathVector;
use path_simplify::{SimplifyState, selection_scale, simplify};
use std::time::Instant;

use super::EditorContext;
use crate::consts::{SIMPLIFY_EMPTY_SELECTION_MESSAGE, SIMPLIFY_FAILED_MESSAGE, SIMPLIFY_NO_CHANGE_MESSAGE, SIMPLIFY_UNDO_LABEL, simplified_paths_message};
use crate::document::ItemId;
use crate::misc::EditorError;
use crate::preferences::SimplifyPreferences;
use crate::utility_traits::MessageLevel;

/// Simplifies the selected paths in place. Keeps the acceleration state between invocations, so repeating the command in quick
/// succession simplifies harder.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimplifyCommand {
	pub state: SimplifyState,
}

impl SimplifyCommand {
	/// Returns how many of the selected paths changed.
	pub fn execute(&mut self, context: &mut EditorContext, now: Instant, skip_undo: bool) -> Result<usize, EditorError> {
		let selection = context.document.selection();
		if selection.is_empty() {
			context.status.flash(MessageLevel::Warning, SIMPLIFY_EMPTY_SELECTION_MESSAGE);
			return Ok(0);
		}

		let preferences = SimplifyPreferences::load(context.preferences);
		let (ids, paths): (Vec<ItemId>, Vec<PathVector>) = selection.iter().filter_map(|&id| context.document.path_item(id).map(|item| (id, item.path.clone()))).unzip();

		let Some(scale) = selection_scale(&paths) else {
			error!("Selection has no visual bounding box, nothing to simplify");
			return Ok(0);
		};

		let outcome = match simplify(&paths, &preferences.into(), scale, self.state, now) {
			Ok(outcome) => outcome,
			Err(simplify_error) => {
				error!("Simplify failed: {simplify_error}");
				context.status.flash(MessageLevel::Error, SIMPLIFY_FAILED_MESSAGE);
				if !skip_undo {
					context.undo.cancel();
				}
				return Err(simplify_error.into());
			}
		};
		self.state = outcome.state;
		debug!("Simplified with tolerance {} at multiplier {}", outcome.tolerance, outcome.state.multiplier);

		for ((id, original), simplified) in ids.into_iter().zip(&paths).zip(outcome.paths) {
			if simplified != *original {
				context.document.replace_path(id, simplified)?;
			}
		}

		if !skip_undo {
			if outcome.paths_changed > 0 {
				context.undo.done(SIMPLIFY_UNDO_LABEL);
			} else {
				context.undo.cancel();
			}
		}

		if outcome.paths_changed > 0 {
			context.status.flash(MessageLevel::Normal, &simplified_paths_message(outcome.paths_changed));
		} else {
			context.status.flash(MessageLevel::Error, SIMPLIFY_NO_CHANGE_MESSAGE);
		}

		Ok(outcome.paths_changed)
	}
}
