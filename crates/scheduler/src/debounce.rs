//! Debounced render scheduling over a cancellable host timer.

use std::time::Duration;

use log::trace;

/// Identifier for one scheduled timer, issued by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// Cancellable one-shot timer owned by the host.
///
/// `schedule` arms a timer and returns a fresh handle; when it expires the
/// host calls back into the engine with that handle. `cancel` is idempotent:
/// cancelling an already-fired or unknown handle is a no-op.
pub trait RenderTimer {
    fn schedule(&mut self, delay: Duration) -> TimerHandle;
    fn cancel(&mut self, handle: TimerHandle);
}

/// Keeps at most one pending deferred render.
///
/// Repeated requests within one debounce window collapse into a single
/// execution. A renewing request pushes the deadline out by cancelling the
/// pending timer and arming a fresh one; a non-renewing request never
/// extends a pending deadline.
#[derive(Debug, Default)]
pub struct RenderScheduler {
    pending: Option<TimerHandle>,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a deferred render. Returns `true` if a timer was armed.
    pub fn request<T: RenderTimer>(&mut self, timer: &mut T, delay: Duration, renew: bool) -> bool {
        if let Some(handle) = self.pending {
            if !renew {
                trace!("render already pending ({handle:?}), coalescing");
                return false;
            }
            timer.cancel(handle);
        }

        let handle = timer.schedule(delay);
        trace!("render scheduled as {handle:?} in {delay:?}");
        self.pending = Some(handle);
        true
    }

    /// Handle a timer expiry reported by the host.
    ///
    /// Returns `true` when `handle` is the pending one and the render should
    /// run now. The handle is cleared before the caller renders, so a render
    /// pass that triggers loads (whose completions re-schedule) never sees
    /// itself as still pending. Expiries of renewed-away handles return
    /// `false`.
    pub fn fire(&mut self, handle: TimerHandle) -> bool {
        if self.pending != Some(handle) {
            trace!("ignoring stale timer {handle:?}");
            return false;
        }

        self.pending = None;
        true
    }

    /// Drop any pending schedule without rendering.
    pub fn cancel_pending<T: RenderTimer>(&mut self, timer: &mut T) {
        if let Some(handle) = self.pending.take() {
            timer.cancel(handle);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
