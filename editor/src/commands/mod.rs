mod boolean;
mod simplify;

pub use boolean::BooleanCommand;
pub use simplify::SimplifyCommand;

use crate::utility_traits::{PreferenceStore, SelectionDocument, StatusMessages, UndoLog};

/// The collaborators a command reads from and reports to.
pub struct EditorContext<'a> {
	pub document: &'a mut dyn SelectionDocument,
	pub preferences: &'a dyn PreferenceStore,
	pub undo: &'a mut dyn UndoLog,
	pub status: &'a mut dyn StatusMessages,
}
