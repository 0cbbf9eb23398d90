//! Event loop control and callback event types
//!
//! The loop itself lives in [`crate::Context::run_until`]; this module
//! holds the stop token handed to it and the event values passed to
//! notification callbacks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

use crate::debug_context;
use crate::notification::NotificationId;

/// Cloneable stop token for [`crate::Context::run_until`].
///
/// A signal can be cloned into callbacks or other threads; requesting a
/// stop wakes the loop, which finishes dispatching the current event and
/// returns. Each `run_until` call is a fresh loop: a stop request issued
/// while no loop is running is discarded.
#[derive(Clone, Default)]
pub struct LoopSignal {
    inner: Arc<SignalState>,
}

#[derive(Default)]
struct SignalState {
    notify: Notify,
    running: AtomicBool,
    stop_requested: AtomicBool,
}

impl LoopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the running loop to exit.
    ///
    /// No-op when no loop is running.
    pub fn request_stop(&self) {
        if !self.inner.running.load(Ordering::SeqCst) {
            debug_context!("LoopSignal", "stop requested with no loop running, ignored");
            return;
        }
        debug_context!("LoopSignal", "stop requested");
        self.inner.stop_requested.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    /// True while a `run_until` call is blocked on this signal
    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    /// Mark the loop started, clearing any stale stop request.
    pub(crate) fn begin(&self) {
        self.inner.stop_requested.store(false, Ordering::SeqCst);
        self.inner.running.store(true, Ordering::SeqCst);
    }

    /// Mark the loop fully released.
    pub(crate) fn end(&self) {
        self.inner.running.store(false, Ordering::SeqCst);
        self.inner.stop_requested.store(false, Ordering::SeqCst);
    }

    pub(crate) fn stop_requested(&self) -> bool {
        self.inner.stop_requested.load(Ordering::SeqCst)
    }

    /// Resolve when a stop is requested.
    ///
    /// Registers with the notifier before checking the flag so a request
    /// from another thread cannot slip between check and sleep.
    pub(crate) async fn stopped(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();
            if self.stop_requested() {
                return;
            }
            notified.await;
        }
    }
}

/// Why the daemon reported a notification closed.
///
/// Decoded from the close-reason code of the `NotificationClosed` signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// The notification expired
    Expired,
    /// The user dismissed it
    Dismissed,
    /// It was closed by a `dismiss` call
    CloseCall,
    /// Undefined or reserved reason code
    Other,
}

impl CloseReason {
    pub(crate) fn from_code(code: u32) -> Self {
        match code {
            1 => CloseReason::Expired,
            2 => CloseReason::Dismissed,
            3 => CloseReason::CloseCall,
            _ => CloseReason::Other,
        }
    }
}

/// Passed to action callbacks when the daemon reports a clicked action
pub struct ActionEvent<'a> {
    /// The notification the action belongs to
    pub id: NotificationId,
    /// The invoked action key (`"default"` for a body click)
    pub action: &'a str,
    /// The signal driving the current loop, for requesting shutdown
    pub signal: &'a LoopSignal,
}

/// Passed to the closed callback when the daemon reports a notification gone
pub struct ClosedEvent<'a> {
    pub id: NotificationId,
    pub reason: CloseReason,
    /// The signal driving the current loop, for requesting shutdown
    pub signal: &'a LoopSignal,
}

/// Callback invoked for a clicked action
pub type ActionCallback = Box<dyn FnMut(&ActionEvent) + Send>;

/// Callback invoked when a notification is closed or expires
pub type ClosedCallback = Box<dyn FnMut(&ClosedEvent) + Send>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_without_loop_is_noop() {
        let signal = LoopSignal::new();
        signal.request_stop();
        assert!(!signal.is_running());
        assert!(!signal.stop_requested());
    }

    #[test]
    fn test_stop_while_running() {
        let signal = LoopSignal::new();
        signal.begin();
        assert!(signal.is_running());

        signal.request_stop();
        assert!(signal.stop_requested());

        signal.end();
        assert!(!signal.is_running());
        assert!(!signal.stop_requested());
    }

    #[test]
    fn test_begin_clears_stale_request() {
        let signal = LoopSignal::new();
        signal.begin();
        signal.request_stop();
        signal.end();

        signal.begin();
        assert!(!signal.stop_requested());
        signal.end();
    }

    #[test]
    fn test_clones_share_state() {
        let signal = LoopSignal::new();
        let other = signal.clone();
        signal.begin();
        other.request_stop();
        assert!(signal.stop_requested());
        signal.end();
    }

    #[test]
    fn test_close_reason_codes() {
        assert_eq!(CloseReason::from_code(1), CloseReason::Expired);
        assert_eq!(CloseReason::from_code(2), CloseReason::Dismissed);
        assert_eq!(CloseReason::from_code(3), CloseReason::CloseCall);
        assert_eq!(CloseReason::from_code(0), CloseReason::Other);
        assert_eq!(CloseReason::from_code(42), CloseReason::Other);
    }
}
