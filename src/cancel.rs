//! Cooperative cancellation shared between a caller and a running search.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Polls between two clock reads in a [`CancelPoll`]; a power of two.
pub const DEADLINE_STRIDE: u32 = 256;

/// A cloneable cancellation signal with an optional deadline.
///
/// Solvers poll [`CancelToken::is_cancelled`] at recursion entry, loop heads,
/// and before spawning each task. Clones share the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    /// Creates a token that is cancelled only by [`CancelToken::cancel`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a token that also reports cancellation once `timeout` has elapsed.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            flag: Arc::default(),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// Signals cancellation to every clone of this token.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// Returns `true` once [`CancelToken::cancel`] ran or an expired deadline was observed.
    ///
    /// Never reads the clock.
    #[inline]
    pub fn is_signalled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Returns `true` once cancelled or past the deadline.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        if self.is_signalled() {
            return true;
        }
        match self.deadline {
            Some(d) if Instant::now() >= d => {
                self.flag.store(true, Ordering::Relaxed);
                true
            }
            _ => false,
        }
    }

    /// Returns a per-thread poller for hot loops.
    pub fn poller(&self) -> CancelPoll<'_> {
        CancelPoll {
            token: self,
            ticks: 0,
        }
    }
}

/// Rate-limited view of a [`CancelToken`].
///
/// Every poll sees [`CancelToken::cancel`] immediately; the deadline is read
/// only on every [`DEADLINE_STRIDE`]-th poll.
#[derive(Debug)]
pub struct CancelPoll<'a> {
    token: &'a CancelToken,
    ticks: u32,
}

impl CancelPoll<'_> {
    /// Returns `true` once the underlying token is cancelled.
    #[inline]
    pub fn is_cancelled(&mut self) -> bool {
        self.ticks = self.ticks.wrapping_add(1);
        if self.token.deadline.is_some() && self.ticks & (DEADLINE_STRIDE - 1) == 0 {
            self.token.is_cancelled()
        } else {
            self.token.is_signalled()
        }
    }
}
