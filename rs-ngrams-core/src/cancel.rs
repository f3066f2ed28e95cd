use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, Result};

/// Cooperative cancellation flag shared between a caller and a running job.
///
/// Cloning is cheap and every clone observes the same flag. Workers poll it
/// once per unit of input (a rune or a word); nothing is interrupted
/// preemptively and work already applied stays applied.
#[derive(Clone, Debug, Default)]
pub struct Cancellation {
	cancelled: Arc<AtomicBool>,
}

impl Cancellation {
	/// Creates a flag that is not cancelled.
	pub fn new() -> Self {
		Self::default()
	}

	/// Requests cancellation. Idempotent.
	pub fn cancel(&self) {
		self.cancelled.store(true, Ordering::Release);
	}

	/// Returns `true` once `cancel` has been called on any clone.
	pub fn is_cancelled(&self) -> bool {
		self.cancelled.load(Ordering::Acquire)
	}

	/// Returns `Err(Error::Cancelled)` if cancellation was requested.
	pub fn check(&self) -> Result<()> {
		if self.is_cancelled() {
			return Err(Error::Cancelled);
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn clones_share_the_flag() {
		let cancel = Cancellation::new();
		let other = cancel.clone();
		assert!(other.check().is_ok());

		cancel.cancel();
		assert!(other.is_cancelled());
		assert!(matches!(other.check(), Err(Error::Cancelled)));
	}
}
