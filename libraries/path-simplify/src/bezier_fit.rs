/*
* Modifications and Rust port copyright (C) 2024 by 0Hypercube.
*
* Original version by lib2geom: <https://gitlab.com/inkscape/lib2geom>
*
* The entirety of this file is specially licensed under MPL 1.1 terms:
*
*  Original code published in:
*    An Algorithm for Automatically Fitting Digitized Curves
*    by Philip J. Schneider
*   "Graphics Gems", Academic Press, 1990
*
*  Authors:
*    Philip J. Schneider
*    Lauris Kaplinski <lauris@kaplinski.com>
*    Peter Moulder <pmoulder@mail.csse.monash.edu.au>
*
*  Copyright (C) 1990 Philip J. Schneider
*  Copyright (C) 2001 Lauris Kaplinski
*  Copyright (C) 2001 Ximian, Inc.
*  Copyright (C) 2003,2004 Monash University

*  Original authors listed in the version control history of the following files:
*  - https://gitlab.com/inkscape/lib2geom/-/blob/master/src/2geom/bezier-utils.cpp
*
* This file is free software; you can redistribute it and/or modify it
* either under the terms of the Mozilla Public License Version 1.1 (the
* "MPL").
*
* The contents of this file are subject to the Mozilla Public License
* Version 1.1 (the "License"); you may not use this file except in
* compliance with the License. You may obtain a copy of the License at
* https://www.mozilla.org/MPL/1.1/
*
* This software is distributed on an "AS IS" basis, WITHOUT WARRANTY
* OF ANY KIND, either express or implied. See the MPL for the specific
* language governing rights and limitations.
*/

use glam::DVec2;

/// Control points of one cubic Bezier.
pub type CubicPoints = [DVec2; 4];

fn evaluate_cubic(q: &[DVec2], t: f64) -> DVec2 {
	let mt = 1. - t;
	mt * mt * mt * q[0] + 3. * mt * mt * t * q[1] + 3. * mt * t * t * q[2] + t * t * t * q[3]
}

fn evaluate_quadratic(q: &[DVec2; 3], t: f64) -> DVec2 {
	let mt = 1. - t;
	mt * mt * q[0] + 2. * mt * t * q[1] + t * t * q[2]
}

/// Fits a chain of at most `max_segments` cubic Beziers through `points`, leaving no point further than `tolerance` from the chain.
///
/// The chain starts at the first point and ends at the last one. Returns `None` when the points cannot be fitted within the budget.
pub fn fit_cubics(points: &[DVec2], max_segments: usize, tolerance: f64) -> Option<Vec<CubicPoints>> {
	if max_segments == 0 || points.len() < 2 {
		return None;
	}

	let mut bezier = vec![DVec2::ZERO; 4 * max_segments];
	let count = bezier_fit_cubic_full(&mut bezier, points, DVec2::ZERO, DVec2::ZERO, tolerance * tolerance, max_segments)?;
	if count == 0 {
		return None;
	}

	Some(bezier.chunks_exact(4).take(count).map(|c| [c[0], c[1], c[2], c[3]]).collect())
}

// https://gitlab.com/inkscape/lib2geom/-/blob/master/src/2geom/bezier-utils.cpp#L192
fn bezier_fit_cubic_full(bezier: &mut [DVec2], data: &[DVec2], t_hat_1: DVec2, t_hat_2: DVec2, error: f64, max_beziers: usize) -> Option<usize> {
	if data.len() < 2 {
		return Some(0);
	}
	if max_beziers == 0 || bezier.len() < 4 {
		return None;
	}
	if data.len() == 2 {
		bezier[0] = data[0];
		bezier[3] = data[1];
		let dist = bezier[0].distance(bezier[3]) / 3.;
		if dist.is_finite() {
			bezier[1] = if t_hat_1 == DVec2::ZERO { (2. * bezier[0] + bezier[3]) / 3. } else { bezier[0] + dist * t_hat_1 };
			bezier[2] = if t_hat_2 == DVec2::ZERO { (bezier[0] + 2. * bezier[3]) / 3. } else { bezier[3] + dist * t_hat_2 };
		} else {
			bezier[1] = bezier[0];
			bezier[2] = bezier[3];
		}
		return Some(1);
	}

	// Parameterize points, and attempt to fit curve
	let mut u = chord_length_parameterize(data);
	if u.last().is_none_or(|&last| last == 0.) {
		return Some(0);
	}

	generate_bezier(bezier, data, &u, t_hat_1, t_hat_2, error);
	reparameterize(data, &mut u, bezier);

	let tolerance = (error + 1e-9).sqrt();
	let (mut split_point, mut max_error_ratio) = compute_max_error_ratio(data, &u, bezier, tolerance, 0);

	if max_error_ratio.abs() <= 1. {
		return Some(1);
	}

	// If the error is not too large, try some reparameterization and iteration
	if (0.0..=3.).contains(&max_error_ratio) {
		const MAX_ITERATIONS: usize = 4;
		for _ in 0..MAX_ITERATIONS {
			generate_bezier(bezier, data, &u, t_hat_1, t_hat_2, error);
			reparameterize(data, &mut u, bezier);
			(split_point, max_error_ratio) = compute_max_error_ratio(data, &u, bezier, tolerance, split_point);
			if max_error_ratio.abs() <= 1. {
				return Some(1);
			}
		}
	}
	let is_corner = max_error_ratio < 0.;

	if is_corner {
		if split_point == 0 {
			if t_hat_1 == DVec2::ZERO {
				// Got a spike even with an unconstrained initial tangent
				split_point += 1;
			} else {
				return bezier_fit_cubic_full(bezier, data, DVec2::ZERO, t_hat_2, error, max_beziers);
			}
		} else if split_point == data.len() - 1 {
			if t_hat_2 == DVec2::ZERO {
				// Got a spike even with an unconstrained final tangent
				split_point -= 1;
			} else {
				return bezier_fit_cubic_full(bezier, data, t_hat_1, DVec2::ZERO, error, max_beziers);
			}
		}
	}

	if max_beziers <= 1 || split_point == 0 || split_point >= data.len() - 1 {
		return None;
	}

	// Fitting failed, so split at the point of maximum error and fit both halves
	let [rec_t_hat_1, rec_t_hat_2] = if is_corner {
		[DVec2::ZERO; 2]
	} else {
		let rec_t_hat_2 = darray_center_tangent(data, split_point);
		[-rec_t_hat_2, rec_t_hat_2]
	};
	let nsegs1 = bezier_fit_cubic_full(bezier, &data[..split_point + 1], t_hat_1, rec_t_hat_2, error, max_beziers - 1)?;
	if nsegs1 == 0 {
		return None;
	}
	let nsegs2 = bezier_fit_cubic_full(&mut bezier[nsegs1 * 4..], &data[split_point..], rec_t_hat_1, t_hat_2, error, max_beziers - nsegs1)?;
	Some(nsegs1 + nsegs2)
}

// https://gitlab.com/inkscape/lib2geom/-/blob/master/src/2geom/bezier-utils.cpp#L538
fn reparameterize(d: &[DVec2], u: &mut [f64], bez_curve: &[DVec2]) {
	let last = u.len() - 1;
	for i in 1..last {
		u[i] = newton_raphson_root_find(bez_curve, d[i], u[i]);
	}
}

// https://gitlab.com/inkscape/lib2geom/-/blob/master/src/2geom/bezier-utils.cpp#L567
fn newton_raphson_root_find(q: &[DVec2], p: DVec2, u: f64) -> f64 {
	// Control vertices of Q' and Q''
	let q1 = [3. * (q[1] - q[0]), 3. * (q[2] - q[1]), 3. * (q[3] - q[2])];
	let q2 = [2. * (q1[1] - q1[0]), 2. * (q1[2] - q1[1])];

	let q_u = evaluate_cubic(q, u);
	let q1_u = evaluate_quadratic(&q1, u);
	let q2_u = q2[0].lerp(q2[1], u);

	// Newton-Raphson on the derivative of half the squared distance from P to Q(u)
	let diff = q_u - p;
	let numerator = diff.dot(q1_u);
	let denominator = q1_u.dot(q1_u) + diff.dot(q2_u);

	let mut improved_u = if denominator > 0. {
		u - (numerator / denominator)
	} else if numerator > 0. {
		// Newton-Raphson would head towards a local maximum, so step an arbitrary amount the right way
		u * 0.98 - 0.001
	} else if numerator < 0. {
		// Asymmetrical to reduce the chance of cycling
		0.031 + u * 0.98
	} else {
		u
	};

	improved_u = if improved_u.is_finite() { improved_u.clamp(0., 1.) } else { u };

	// Ensure that improved_u isn't actually worse
	let diff_lensq = diff.length_squared();
	let mut proportion = 0.125;
	while (evaluate_cubic(q, improved_u) - p).length_squared() > diff_lensq {
		if proportion > 1. {
			improved_u = u;
			break;
		}
		improved_u = (1. - proportion) * improved_u + proportion * u;
		proportion += 0.125;
	}

	improved_u
}

// https://gitlab.com/inkscape/lib2geom/-/blob/master/src/2geom/bezier-utils.cpp#L807
fn darray_center_tangent(d: &[DVec2], center: usize) -> DVec2 {
	if d[center + 1] == d[center - 1] {
		// Rotate 90 degrees in an arbitrary direction
		(d[center] - d[center - 1]).perp()
	} else {
		d[center - 1] - d[center + 1]
	}
	.normalize_or_zero()
}

// https://gitlab.com/inkscape/lib2geom/-/blob/master/src/2geom/bezier-utils.cpp#L387
fn estimate_lengths(bezier: &mut [DVec2], data: &[DVec2], u_prime: &[f64], t_hat_1: DVec2, t_hat_2: DVec2) {
	let len = data.len();
	let mut c = [[0.; 2]; 2];
	let mut x = [0.; 2];

	// The end control points sit exactly on the first and last data points
	bezier[0] = data[0];
	bezier[3] = data[len - 1];

	for i in 0..len {
		let b0 = (1. - u_prime[i]) * (1. - u_prime[i]) * (1. - u_prime[i]);
		let b1 = 3. * u_prime[i] * (1. - u_prime[i]) * (1. - u_prime[i]);
		let b2 = 3. * u_prime[i] * u_prime[i] * (1. - u_prime[i]);
		let b3 = u_prime[i] * u_prime[i] * u_prime[i];

		let a1 = b1 * t_hat_1;
		let a2 = b2 * t_hat_2;

		c[0][0] += a1.dot(a1);
		c[0][1] += a1.dot(a2);
		c[1][0] = c[0][1];
		c[1][1] += a2.dot(a2);

		// Offset from the data point to the curve we'd get with the handles collapsed onto the end points
		let shortfall = data[i] - ((b0 + b1) * bezier[0]) - ((b2 + b3) * bezier[3]);
		x[0] += a1.dot(shortfall);
		x[1] += a2.dot(shortfall);
	}

	// Solve C * alpha = X
	let det_c0_c1 = c[0][0] * c[1][1] - c[1][0] * c[0][1];
	let [mut alpha_l, mut alpha_r] = if det_c0_c1 != 0. {
		let det_c0_x = c[0][0] * x[1] - c[0][1] * x[0];
		let det_x_c1 = x[0] * c[1][1] - x[1] * c[0][1];
		[det_x_c1 / det_c0_c1, det_c0_x / det_c0_c1]
	} else {
		// Under-determined, so require alpha_l == alpha_r by summing the columns of C, trying each row in turn
		let c0 = c[0][0] + c[0][1];
		let c1 = c[1][0] + c[1][1];
		if c0 != 0. {
			[x[0] / c0; 2]
		} else if c1 != 0. {
			[x[1] / c1; 2]
		} else {
			[0.; 2]
		}
	};

	// Wu/Barsky heuristic for negative or zero alpha, which would give coincident control points
	if alpha_l < 1e-6 || alpha_r < 1e-6 {
		alpha_l = data[0].distance(data[len - 1]) / 3.;
		alpha_r = alpha_l;
	}

	bezier[1] = alpha_l * t_hat_1 + bezier[0];
	bezier[2] = alpha_r * t_hat_2 + bezier[3];
}

// https://gitlab.com/inkscape/lib2geom/-/blob/master/src/2geom/bezier-utils.cpp#L745
fn darray_left_tangent(d: &[DVec2], tolerance_sq: f64) -> DVec2 {
	let mut last_offset = DVec2::ZERO;
	for point in &d[1..] {
		last_offset = *point - d[0];
		if tolerance_sq < last_offset.length_squared() {
			break;
		}
	}
	last_offset.normalize_or_zero()
}

// https://gitlab.com/inkscape/lib2geom/-/blob/master/src/2geom/bezier-utils.cpp#L776
fn darray_right_tangent(d: &[DVec2], tolerance_sq: f64) -> DVec2 {
	let last = d[d.len() - 1];
	let mut last_offset = DVec2::ZERO;
	for point in d[..d.len() - 1].iter().rev() {
		last_offset = *point - last;
		if tolerance_sq < last_offset.length_squared() {
			break;
		}
	}
	last_offset.normalize_or_zero()
}

// https://gitlab.com/inkscape/lib2geom/-/blob/master/src/2geom/bezier-utils.cpp#L360
fn generate_bezier(bezier: &mut [DVec2], data: &[DVec2], u: &[f64], t_hat_1: DVec2, t_hat_2: DVec2, tolerance_sq: f64) {
	let est1 = t_hat_1 == DVec2::ZERO;
	let est2 = t_hat_2 == DVec2::ZERO;
	let mut est_t_hat_1 = if est1 { darray_left_tangent(data, tolerance_sq) } else { t_hat_1 };
	let est_t_hat_2 = if est2 { darray_right_tangent(data, tolerance_sq) } else { t_hat_2 };
	estimate_lengths(bezier, data, u, est_t_hat_1, est_t_hat_2);
	if est1 {
		estimate_bi(bezier, 1, data, u);
		if bezier[1] != bezier[0] {
			est_t_hat_1 = (bezier[1] - bezier[0]).normalize_or_zero();
		}
		estimate_lengths(bezier, data, u, est_t_hat_1, est_t_hat_2);
	}
}

// https://gitlab.com/inkscape/lib2geom/-/blob/master/src/2geom/bezier-utils.cpp#L492
fn estimate_bi(bezier: &mut [DVec2], ei: usize, data: &[DVec2], u: &[f64]) {
	let oi = 3 - ei;
	let mut num = DVec2::ZERO;
	let mut den = 0.;
	for (point, &ui) in data.iter().zip(u) {
		let b = [(1. - ui) * (1. - ui) * (1. - ui), 3. * ui * (1. - ui) * (1. - ui), 3. * ui * ui * (1. - ui), ui * ui * ui];
		num += b[ei] * (b[0] * bezier[0] + b[oi] * bezier[oi] + b[3] * bezier[3] - *point);
		den -= b[ei] * b[ei];
	}

	bezier[ei] = if den != 0. { num / den } else { (oi as f64 * bezier[0] + ei as f64 * bezier[3]) / 3. };
}

// https://gitlab.com/inkscape/lib2geom/-/blob/master/src/2geom/bezier-utils.cpp#L898
fn compute_max_error_ratio(d: &[DVec2], u: &[f64], bezier_curve: &[DVec2], tolerance: f64, mut split_point: usize) -> (usize, f64) {
	let last = u.len() - 1;

	let mut max_distance_sq = 0.;
	let mut max_hook_ratio = 0.;
	let mut snap_end = 0;
	let mut previous_point = bezier_curve[0];
	for i in 1..=last {
		let current_point = evaluate_cubic(bezier_curve, u[i]);
		let distsq = (current_point - d[i]).length_squared();
		if distsq > max_distance_sq {
			max_distance_sq = distsq;
			split_point = i;
		}
		let hook_ratio = compute_hook(previous_point, current_point, 0.5 * (u[i - 1] + u[i]), bezier_curve, tolerance);
		if max_hook_ratio < hook_ratio {
			max_hook_ratio = hook_ratio;
			snap_end = i;
		}
		previous_point = current_point;
	}

	let dist_ratio = max_distance_sq.sqrt() / tolerance;
	if max_hook_ratio <= dist_ratio || snap_end == 0 {
		(split_point, dist_ratio)
	} else {
		(snap_end - 1, -max_hook_ratio)
	}
}

// https://gitlab.com/inkscape/lib2geom/-/blob/master/src/2geom/bezier-utils.cpp#L969
fn compute_hook(a: DVec2, b: DVec2, u: f64, bezier_curve: &[DVec2], tolerance: f64) -> f64 {
	let point = evaluate_cubic(bezier_curve, u);

	let distance = ((a + b) / 2.).distance(point);
	if distance < tolerance {
		return 0.;
	}
	let allowed = a.distance(b) + tolerance;
	distance / allowed
}

/// A value from 0..1 for each point in the path containing the total distance from the start along the path
// https://gitlab.com/inkscape/lib2geom/-/blob/master/src/2geom/bezier-utils.cpp#L833
fn chord_length_parameterize(d: &[DVec2]) -> Vec<f64> {
	let len = d.len();
	if len < 2 {
		return Vec::new();
	}

	let mut u = vec![0.; len];
	for i in 1..len {
		u[i] = u[i - 1] + d[i].distance(d[i - 1]);
	}

	let total_length = u[len - 1];
	if total_length <= 0. {
		return Vec::new();
	}
	if total_length.is_finite() {
		for u in u.iter_mut().skip(1) {
			*u /= total_length;
		}
	} else {
		for (i, u) in u.iter_mut().enumerate().skip(1) {
			*u = i as f64 / (len - 1) as f64;
		}
	}

	u[len - 1] = 1.;
	u
}
