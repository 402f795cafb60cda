use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

/// A handle which lets the caller abandon a concurrent search.
///
/// Tokens are cheap to clone, and all clones share the same cancellation state, so one clone can be handed to the search while another one stays with whoever decides to give up on it. A token can also carry a deadline, after which it considers itself cancelled without anyone calling [`cancel`].
///
/// # Example
/// ```rust
/// use burkhard::CancellationToken;
/// use std::time::Duration;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// assert!(!token.is_cancelled());
/// handle.cancel();
/// assert!(token.is_cancelled());
///
/// let expired = CancellationToken::with_timeout(Duration::from_secs(0));
/// assert!(expired.is_cancelled());
/// ```
///
/// [`cancel`]: #method.cancel " "
#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}
impl CancellationToken {
    /// Creates a token which is only cancelled once [`cancel`] is called on it or one of its clones.
    ///
    /// [`cancel`]: #method.cancel " "
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }
    /// Creates a token with no deadline. Same as [`new`], but reads better at call sites which never intend to cancel.
    ///
    /// [`new`]: #method.new " "
    #[inline(always)]
    pub fn never() -> Self {
        Self::new()
    }
    /// Creates a token which cancels itself once the specified point in time is reached.
    #[inline]
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancelled: Arc::default(),
            deadline: Some(deadline),
        }
    }
    /// Creates a token which cancels itself once the specified amount of time passes.
    #[inline]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }
    /// Cancels the token and all of its clones.
    #[inline]
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
    /// Returns `true` if [`cancel`] was called or the deadline has passed, `false` otherwise.
    ///
    /// [`cancel`]: #method.cancel " "
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
            || self.deadline.map_or(false, |deadline| Instant::now() >= deadline)
    }
    /// Returns the deadline of the token, if it has one.
    #[inline(always)]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}
