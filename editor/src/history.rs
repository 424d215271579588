use log::{info, warn};

use crate::utility_traits::{MessageLevel, StatusMessages, UndoLog};

/// Records committed and cancelled transactions instead of keeping document snapshots.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UndoHistory {
	pub committed: Vec<String>,
	pub cancelled: usize,
}

impl UndoLog for UndoHistory {
	fn done(&mut self, description: &str) {
		self.committed.push(description.to_string());
	}

	fn cancel(&mut self) {
		self.cancelled += 1;
	}
}

/// Keeps every flashed message in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusLog {
	pub messages: Vec<(MessageLevel, String)>,
}

impl StatusLog {
	pub fn last(&self) -> Option<&(MessageLevel, String)> {
		self.messages.last()
	}
}

impl StatusMessages for StatusLog {
	fn flash(&mut self, level: MessageLevel, message: &str) {
		match level {
			MessageLevel::Normal => info!("{message}"),
			MessageLevel::Warning | MessageLevel::Error => warn!("{message}"),
		}
		self.messages.push((level, message.to_string()));
	}
}
