use path_bool::BooleanError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimplifyError {
	#[error("Path {path} is malformed: subpath {subpath} is not contiguous at segment {segment}")]
	MalformedPath { path: usize, subpath: usize, segment: usize },
	#[error(transparent)]
	Geometry(#[from] BooleanError),
	#[error("Cannot simplify with a tolerance of {0}")]
	InvalidTolerance(f64),
}
