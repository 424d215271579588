// Copyright 2024 Adam Platkevič <rflashster@gmail.com>
//
// SPDX-License-Identifier: MIT

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BooleanError {
	#[error("Degenerate geometry: {0}")]
	DegenerateGeometry(String),
	#[error("Unknown fill rule or boolean operator `{0}`")]
	InvalidFillRuleOrOperator(String),
	#[error("Subpath {subpath} is not contiguous at segment {segment}")]
	MalformedPath { subpath: usize, segment: usize },
	#[error("Invalid path data at offset {offset}: {message}")]
	InvalidPathData { offset: usize, message: String },
}
