//! Progress reporting and cancellation for filter execution.
//!
//! A host hands a [`Progress`] to `execute`. The filter reports percentages
//! through it; the host's callback can answer [`ControlFlow::Break`] to ask
//! the filter to stop, which surfaces as [`FilterError::OperationAborted`].
//!
//! Reported values are clamped so the callback always sees a non-decreasing
//! sequence within `0..=100`.
//!
//! # Example
//!
//! ```
//! use std::ops::ControlFlow;
//! use meshfilter::filter::Progress;
//!
//! let mut seen = Vec::new();
//! {
//!     let mut progress = Progress::new(|percent, _message| {
//!         seen.push(percent);
//!         ControlFlow::Continue(())
//!     });
//!     progress.report(40, "working").unwrap();
//!     progress.finish("done");
//! }
//! assert_eq!(seen, vec![40, 100]);
//! ```

use std::ops::ControlFlow;

use crate::error::{FilterError, Result};

type Callback<'a> = Box<dyn FnMut(u8, &str) -> ControlFlow<()> + 'a>;

/// A progress sink that can also carry a cancellation request back.
///
/// The callback receives:
/// - `percent`: completion in `0..=100`, never lower than the previous call
/// - `message`: description of the current step
pub struct Progress<'a> {
    callback: Option<Callback<'a>>,
    last: u8,
    finished: bool,
}

impl<'a> Progress<'a> {
    /// Create a new progress reporter with the given callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: FnMut(u8, &str) -> ControlFlow<()> + 'a,
    {
        Self {
            callback: Some(Box::new(callback)),
            last: 0,
            finished: false,
        }
    }

    /// Create a reporter that discards updates and never cancels.
    pub fn none() -> Self {
        Self {
            callback: None,
            last: 0,
            finished: false,
        }
    }

    /// Start a new run: the next report may go back to 0 and `finish` sends
    /// 100 again.
    pub(crate) fn begin(&mut self) {
        self.last = 0;
        self.finished = false;
    }

    /// Report progress and poll for cancellation.
    ///
    /// Returns [`FilterError::OperationAborted`] if the callback asks to stop.
    pub fn report(&mut self, percent: u8, message: &str) -> Result<()> {
        let percent = percent.min(100).max(self.last);
        self.last = percent;

        let Some(callback) = self.callback.as_mut() else {
            return Ok(());
        };
        match callback(percent, message) {
            ControlFlow::Continue(()) => Ok(()),
            ControlFlow::Break(()) => Err(FilterError::OperationAborted { percent }),
        }
    }

    /// Report progress of step `current` out of `total`, mapped into the
    /// percentage slice `[from, to]`.
    ///
    /// This lets a phase of a filter own part of the overall range.
    pub fn report_step(
        &mut self,
        current: usize,
        total: usize,
        from: u8,
        to: u8,
        message: &str,
    ) -> Result<()> {
        if total == 0 || to < from {
            return self.report(from, message);
        }
        let span = usize::from(to - from);
        let offset = (current.min(total) * span) / total;
        self.report(from + offset as u8, message)
    }

    /// Report completion.
    ///
    /// Sends 100 exactly once; later calls do nothing. A stop request returned
    /// at this point is ignored because the work has already been applied.
    pub fn finish(&mut self, message: &str) {
        if self.finished {
            return;
        }
        self.finished = true;
        let _ = self.report(100, message);
    }

    /// The last percentage reported.
    pub fn last_percent(&self) -> u8 {
        self.last
    }

    /// Whether [`Progress::finish`] has been called.
    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

impl Default for Progress<'_> {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress")
            .field("last", &self.last)
            .field("finished", &self.finished)
            .finish_non_exhaustive()
    }
}
