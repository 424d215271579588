use path_bool::{FillRule, path_from_path_data};

use crate::commands::EditorContext;
use crate::document::{ItemId, MemoryDocument, PathItem};
use crate::history::{StatusLog, UndoHistory};
use crate::preferences::MemoryPreferences;
use crate::utility_traits::SelectionDocument;

/// A set of utility functions to make the writing of command tests more declarative
pub struct EditorTestUtils {
	pub document: MemoryDocument,
	pub preferences: MemoryPreferences,
	pub undo: UndoHistory,
	pub status: StatusLog,
}

impl EditorTestUtils {
	pub fn create() -> Self {
		let _ = env_logger::builder().is_test(true).try_init();

		Self {
			document: MemoryDocument::new(),
			preferences: MemoryPreferences::default(),
			undo: UndoHistory::default(),
			status: StatusLog::default(),
		}
	}

	pub fn context(&mut self) -> EditorContext<'_> {
		EditorContext {
			document: &mut self.document,
			preferences: &self.preferences,
			undo: &mut self.undo,
			status: &mut self.status,
		}
	}

	pub fn add_path(&mut self, data: &str, fill_rule: FillRule) -> ItemId {
		let path = path_from_path_data(data).expect("test path data should parse");
		self.document.add_path_item(PathItem::new(path, fill_rule))
	}

	pub fn select(&mut self, ids: &[ItemId]) {
		self.document.set_selection(ids);
	}

	pub fn selection(&self) -> Vec<ItemId> {
		self.document.selection()
	}

	pub fn path(&self, id: ItemId) -> &PathItem {
		self.document.path_item(id).expect("item should be a path")
	}
}
