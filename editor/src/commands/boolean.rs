use log::{debug, error};
use path_bool::{FillRule, PathBooleanOperation, PathVector, path_boolean_all};

use super::EditorContext;
use crate::consts::{BOOLEAN_EMPTY_SELECTION_MESSAGE, BOOLEAN_FAILED_MESSAGE, BOOLEAN_NOT_A_PATH_MESSAGE, BOOLEAN_UNION_EMPTY_SELECTION_MESSAGE};
use crate::document::{ItemId, PathItem};
use crate::misc::EditorError;
use crate::utility_traits::MessageLevel;

/// Combines the selected paths into a single path item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BooleanCommand {
	pub operation: PathBooleanOperation,
}

impl BooleanCommand {
	pub fn new(operation: PathBooleanOperation) -> Self {
		Self { operation }
	}

	pub fn undo_label(&self) -> &'static str {
		match self.operation {
			PathBooleanOperation::Union => "Union",
			PathBooleanOperation::Intersection => "Intersection",
			PathBooleanOperation::Difference => "Difference",
			PathBooleanOperation::Xor => "Exclusion",
		}
	}

	/// Folds the operation over the selected paths in selection order, then replaces them by one item holding the result.
	///
	/// For difference the last selected path is the one being cut. The new item takes its fill rule and is selected. When the
	/// result has no area the selected paths are removed and nothing is selected. Returns the id of the new item, or `None` when
	/// the selection could not be combined.
	pub fn execute(&self, context: &mut EditorContext, skip_undo: bool) -> Result<Option<ItemId>, EditorError> {
		let selection = context.document.selection();
		let minimum = if self.operation == PathBooleanOperation::Union { 1 } else { 2 };
		if selection.len() < minimum {
			let message = if self.operation == PathBooleanOperation::Union { BOOLEAN_UNION_EMPTY_SELECTION_MESSAGE } else { BOOLEAN_EMPTY_SELECTION_MESSAGE };
			context.status.flash(MessageLevel::Warning, message);
			return Ok(None);
		}

		let Some(operands) = selection
			.iter()
			.map(|&id| context.document.path_item(id).map(|item| (item.path.clone(), item.fill_rule)))
			.collect::<Option<Vec<(PathVector, FillRule)>>>()
		else {
			context.status.flash(MessageLevel::Error, BOOLEAN_NOT_A_PATH_MESSAGE);
			return Ok(None);
		};

		debug!("{} of {} paths", self.undo_label(), operands.len());
		let result = match path_boolean_all(&operands, self.operation) {
			Ok(result) => result,
			Err(boolean_error) => {
				error!("Boolean operation failed: {boolean_error}");
				context.status.flash(MessageLevel::Error, BOOLEAN_FAILED_MESSAGE);
				if !skip_undo {
					context.undo.cancel();
				}
				return Err(boolean_error.into());
			}
		};

		let subject = match self.operation {
			PathBooleanOperation::Difference => operands.last(),
			_ => operands.first(),
		};
		let fill_rule = subject.map_or(FillRule::NonZero, |(_, fill_rule)| *fill_rule);

		context.document.remove_items(&selection);
		let created = (!result.is_empty()).then(|| context.document.add_path_item(PathItem::new(result, fill_rule)));
		context.document.set_selection(created.as_slice());

		if !skip_undo {
			context.undo.done(self.undo_label());
		}
		Ok(created)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::document::DocumentItem;
	use crate::test_utils::EditorTestUtils;
	use crate::utility_traits::SelectionDocument;
	use path_bool::path_to_path_data;
	use pretty_assertions::assert_eq;

	const BIG: &str = "M 0,0 L 0,2 L 2,2 L 2,0 z";
	const OVERLAPPING: &str = "M 0,1.5 L 0.5,1.5 L 0.5,2.5 L 0,2.5 z";
	const NESTED: &str = "M 0.5,0.5 L 0.5,1.5 L 1.5,1.5 L 1.5,0.5 z";

	fn result_data(editor: &EditorTestUtils, id: ItemId) -> String {
		path_to_path_data(&editor.path(id).path)
	}

	#[test]
	fn union_replaces_selection() {
		let mut editor = EditorTestUtils::create();
		let big = editor.add_path(BIG, FillRule::EvenOdd);
		let overlapping = editor.add_path(OVERLAPPING, FillRule::EvenOdd);
		editor.select(&[big, overlapping]);

		let created = BooleanCommand::new(PathBooleanOperation::Union).execute(&mut editor.context(), false).unwrap().unwrap();
		assert_eq!(result_data(&editor, created), "M0,0 L0,1.5 L0,2 L0,2.5 L0.5,2.5 L0.5,2 L2,2 L2,0 Z");
		assert_eq!(editor.document.len(), 1);
		assert_eq!(editor.selection(), vec![created]);
		assert_eq!(editor.undo.committed, vec!["Union".to_string()]);
	}

	#[test]
	fn difference_cuts_the_last_selected_path() {
		let mut editor = EditorTestUtils::create();
		let nested = editor.add_path(NESTED, FillRule::NonZero);
		let big = editor.add_path(BIG, FillRule::EvenOdd);
		editor.select(&[nested, big]);

		let created = BooleanCommand::new(PathBooleanOperation::Difference).execute(&mut editor.context(), false).unwrap().unwrap();
		assert_eq!(result_data(&editor, created), "M0,0 L0,2 L2,2 L2,0 Z M0.5,0.5 L1.5,0.5 L1.5,1.5 L0.5,1.5 Z");
		assert_eq!(editor.path(created).fill_rule, FillRule::EvenOdd);
	}

	#[test]
	fn empty_result_removes_the_selection() {
		let mut editor = EditorTestUtils::create();
		let big = editor.add_path(BIG, FillRule::EvenOdd);
		let nested = editor.add_path(NESTED, FillRule::EvenOdd);
		editor.select(&[big, nested]);

		let created = BooleanCommand::new(PathBooleanOperation::Difference).execute(&mut editor.context(), false).unwrap();
		assert_eq!(created, None);
		assert!(editor.document.is_empty());
		assert!(editor.selection().is_empty());
		assert_eq!(editor.undo.committed, vec!["Difference".to_string()]);
	}

	#[test]
	fn single_path_needs_union() {
		let mut editor = EditorTestUtils::create();
		let big = editor.add_path(BIG, FillRule::EvenOdd);
		editor.select(&[big]);

		assert_eq!(BooleanCommand::new(PathBooleanOperation::Intersection).execute(&mut editor.context(), false).unwrap(), None);
		assert_eq!(editor.status.last(), Some(&(MessageLevel::Warning, BOOLEAN_EMPTY_SELECTION_MESSAGE.to_string())));
		assert!(editor.undo.committed.is_empty());

		assert!(BooleanCommand::new(PathBooleanOperation::Union).execute(&mut editor.context(), true).unwrap().is_some());
		assert!(editor.undo.committed.is_empty());
	}

	#[test]
	fn empty_selection_is_reported() {
		let mut editor = EditorTestUtils::create();
		assert_eq!(BooleanCommand::new(PathBooleanOperation::Union).execute(&mut editor.context(), false).unwrap(), None);
		assert_eq!(editor.status.last(), Some(&(MessageLevel::Warning, BOOLEAN_UNION_EMPTY_SELECTION_MESSAGE.to_string())));
	}

	#[test]
	fn text_items_block_the_operation() {
		let mut editor = EditorTestUtils::create();
		let big = editor.add_path(BIG, FillRule::EvenOdd);
		let text = editor.document.add_item(DocumentItem::Text("caption".to_string()));
		editor.select(&[big, text]);

		assert_eq!(BooleanCommand::new(PathBooleanOperation::Xor).execute(&mut editor.context(), false).unwrap(), None);
		assert_eq!(editor.status.last(), Some(&(MessageLevel::Error, BOOLEAN_NOT_A_PATH_MESSAGE.to_string())));
		assert_eq!(editor.document.len(), 2);
	}

	#[test]
	fn failure_cancels_the_transaction() {
		let mut editor = EditorTestUtils::create();
		let big = editor.add_path(BIG, FillRule::EvenOdd);
		let broken = editor.add_path(NESTED, FillRule::EvenOdd);
		let mut path = editor.path(broken).path.clone();
		path.subpaths[0].segments.remove(1);
		editor.document.replace_path(broken, path).unwrap();
		editor.select(&[big, broken]);

		let result = BooleanCommand::new(PathBooleanOperation::Union).execute(&mut editor.context(), false);
		assert!(matches!(result, Err(EditorError::Boolean(_))));
		assert_eq!(editor.undo.cancelled, 1);
		assert_eq!(editor.document.len(), 2);
	}
}
