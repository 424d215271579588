// PREFERENCES
pub const SIMPLIFY_THRESHOLD_PREFERENCE: &str = "/options/simplifythreshold/value";
pub const SIMPLIFY_JUST_COALESCE_PREFERENCE: &str = "/options/simplifyjustcoalesce/value";
pub const DEFAULT_SIMPLIFY_THRESHOLD: f64 = path_simplify::DEFAULT_THRESHOLD;
pub const DEFAULT_SIMPLIFY_JUST_COALESCE: bool = false;

// UNDO
pub const SIMPLIFY_UNDO_LABEL: &str = "Simplify";

// STATUS MESSAGES
pub const SIMPLIFY_EMPTY_SELECTION_MESSAGE: &str = "Select <b>path(s)</b> to simplify.";
pub const SIMPLIFY_NO_CHANGE_MESSAGE: &str = "<b>No paths</b> to simplify in the selection.";
pub const SIMPLIFY_FAILED_MESSAGE: &str = "Simplifying <b>failed</b> on this geometry.";
pub const BOOLEAN_UNION_EMPTY_SELECTION_MESSAGE: &str = "Select <b>at least 1 path</b> to perform a boolean union.";
pub const BOOLEAN_EMPTY_SELECTION_MESSAGE: &str = "Select <b>at least 2 paths</b> to perform a boolean operation.";
pub const BOOLEAN_NOT_A_PATH_MESSAGE: &str = "One of the objects is <b>not a path</b>, cannot perform boolean operation.";
pub const BOOLEAN_FAILED_MESSAGE: &str = "The boolean operation <b>failed</b> on this geometry.";

pub fn simplified_paths_message(count: usize) -> String {
	format!("<b>{count}</b> paths simplified.")
}
