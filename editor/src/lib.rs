//! Selection level commands that run the boolean and simplify path operations against a document, recording the outcome in an
//! undo log and reporting it through status messages.

pub mod commands;
pub mod consts;
pub mod document;
pub mod history;
pub mod misc;
pub mod preferences;
pub mod utility_traits;

#[cfg(test)]
pub mod test_utils;

#[doc(inline)]
pub use commands::{BooleanCommand, EditorContext, SimplifyCommand};
#[doc(inline)]
pub use document::{DocumentItem, ItemId, MemoryDocument, PathItem};
#[doc(inline)]
pub use misc::EditorError;
