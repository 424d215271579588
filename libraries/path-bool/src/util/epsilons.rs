// Copyright 2024 Adam Platkevič <rflashster@gmail.com>
//
// SPDX-License-Identifier: MIT

/// Tolerances used throughout the boolean engine.
#[derive(Clone, Copy, Debug)]
pub struct Epsilons {
	/// Two points closer than this are the same arrangement vertex.
	pub point: f64,
	/// A subdivided curve whose bounding box is smaller than this is treated as a line.
	pub linear: f64,
	/// Curve parameters closer than this to 0 or 1 are treated as endpoints.
	pub param: f64,
}

pub const EPS: Epsilons = Epsilons {
	point: 1e-6,
	linear: 1e-4,
	param: 1e-8,
};
