use path_bool::BooleanError;
use path_simplify::SimplifyError;

use thiserror::Error;

use crate::document::ItemId;

/// The error type used by the path operation commands.
#[derive(Clone, Debug, Error)]
pub enum EditorError {
	#[error("The boolean operation failed:\n{0}")]
	Boolean(String),

	#[error("Simplifying the selection failed:\n{0}")]
	Simplify(String),

	#[error("The document has no item with id {0}")]
	UnknownItem(ItemId),

	#[error("Item {0} is not a path")]
	NotAPath(ItemId),

	#[error("Could not read or write preferences:\n{0}")]
	Preferences(String),
}

macro_rules! derive_from {
	($type:ty, $kind:ident) => {
		impl From<$type> for EditorError {
			fn from(error: $type) -> Self {
				EditorError::$kind(format!("{:?}", error))
			}
		}
	};
}

derive_from!(BooleanError, Boolean);
derive_from!(SimplifyError, Simplify);
derive_from!(serde_json::Error, Preferences);
