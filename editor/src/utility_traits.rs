use path_bool::PathVector;

use crate::document::{ItemId, PathItem};
use crate::misc::EditorError;

/// The document the commands operate on, seen through its current selection.
pub trait SelectionDocument {
	/// Selected items in selection order.
	fn selection(&self) -> Vec<ItemId>;

	/// The path of an item, or `None` when the item does not exist or is not a path.
	fn path_item(&self, id: ItemId) -> Option<&PathItem>;

	/// Replaces the geometry of a path item, keeping everything else about it.
	fn replace_path(&mut self, id: ItemId, path: PathVector) -> Result<(), EditorError>;

	/// Adds a new path item on top of the document and returns its id.
	fn add_path_item(&mut self, item: PathItem) -> ItemId;

	fn remove_items(&mut self, ids: &[ItemId]);

	fn set_selection(&mut self, ids: &[ItemId]);
}

/// Typed access to user preferences, falling back to a default for missing or mistyped entries.
pub trait PreferenceStore {
	fn get_double(&self, path: &str, default: f64) -> f64;
	fn get_bool(&self, path: &str, default: bool) -> bool;
}

/// Receives the outcome of a command as one undoable step.
pub trait UndoLog {
	/// Commits the changes made since the last commit under `description`.
	fn done(&mut self, description: &str);
	/// Discards the pending transaction.
	fn cancel(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum MessageLevel {
	Normal,
	Warning,
	Error,
}

/// Short-lived feedback shown to the user, which may contain `<b>` markup.
pub trait StatusMessages {
	fn flash(&mut self, level: MessageLevel, message: &str);
}
