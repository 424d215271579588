use std::time::{Duration, Instant};

/// Calls closer together than this count as one repeated gesture and simplify progressively harder.
pub const ACCELERATION_WINDOW: Duration = Duration::from_millis(500);

/// Growth of the threshold multiplier for each repeated call.
pub const ACCELERATION_STEP: f64 = 0.5;

/// Memory of the previous simplification, owned by whoever issues the calls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimplifyState {
	pub previous_call: Option<Instant>,
	pub multiplier: f64,
}

impl Default for SimplifyState {
	fn default() -> Self {
		Self { previous_call: None, multiplier: 1. }
	}
}

impl SimplifyState {
	/// The state after a call at `now`: the multiplier grows by [`ACCELERATION_STEP`] when the previous call was within
	/// [`ACCELERATION_WINDOW`], and resets to 1 otherwise.
	pub fn advance(self, now: Instant) -> SimplifyState {
		let repeated = self.previous_call.is_some_and(|previous| now.saturating_duration_since(previous) < ACCELERATION_WINDOW);
		let multiplier = if repeated { self.multiplier + ACCELERATION_STEP } else { 1. };
		SimplifyState { previous_call: Some(now), multiplier }
	}
}
