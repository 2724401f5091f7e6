//! Scroll listener lifecycle: mount delay, per-frame de-duplication, detach.

use std::time::{Duration, Instant};

/// Handle for a requested recompute frame.
///
/// Only the most recent request is live; older handles are stale and firing
/// them does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRequest(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerPhase {
    /// Created but not mounted yet
    Idle,
    /// Waiting for the mount delay before the first scan
    Mounting { deadline: Instant },
    /// Scroll events request frames
    Listening,
    /// Torn down; nothing fires again
    Detached,
}

/// Owns the timer and frame request behind one tracker.
///
/// Scroll events never stack recomputes: a new request replaces the pending
/// one. Dropping the listener detaches it, so a torn-down view cannot be
/// updated by a callback that was already scheduled.
#[derive(Debug)]
pub struct ScrollListener {
    phase: ListenerPhase,
    pending: Option<FrameRequest>,
    next_request: u64,
    mount_delay: Duration,
}

impl ScrollListener {
    pub fn new(mount_delay: Duration) -> Self {
        Self {
            phase: ListenerPhase::Idle,
            pending: None,
            next_request: 0,
            mount_delay,
        }
    }

    pub fn phase(&self) -> ListenerPhase {
        self.phase
    }

    /// Start the one-shot mount timer. Only an idle listener can be mounted.
    pub fn mount(&mut self, now: Instant) {
        if self.phase != ListenerPhase::Idle {
            tracing::debug!(phase = ?self.phase, "mount ignored");
            return;
        }
        self.phase = ListenerPhase::Mounting {
            deadline: now + self.mount_delay,
        };
    }

    /// Fire the mount timer if it is due.
    ///
    /// Once fired the listener starts accepting scroll events and requests
    /// the initial scan frame. Returns true when the timer fired.
    pub fn poll_timer(&mut self, now: Instant) -> bool {
        match self.phase {
            ListenerPhase::Mounting { deadline } if now >= deadline => {
                self.phase = ListenerPhase::Listening;
                self.request_frame();
                true
            }
            _ => false,
        }
    }

    /// Record a scroll event. Returns the live frame request, if listening.
    pub fn on_scroll(&mut self) -> Option<FrameRequest> {
        if self.phase != ListenerPhase::Listening {
            return None;
        }
        Some(self.request_frame())
    }

    fn request_frame(&mut self) -> FrameRequest {
        if let Some(stale) = self.pending.take() {
            tracing::trace!(request = stale.0, "frame request replaced");
        }
        let request = FrameRequest(self.next_request);
        self.next_request += 1;
        self.pending = Some(request);
        request
    }

    /// Consume `request` if it is still the live one.
    pub fn fire(&mut self, request: FrameRequest) -> bool {
        if self.pending == Some(request) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Consume whatever request is pending.
    pub fn take_pending(&mut self) -> Option<FrameRequest> {
        self.pending.take()
    }

    /// Cancel the mount timer and any pending frame. Idempotent.
    pub fn detach(&mut self) {
        if self.phase == ListenerPhase::Detached {
            return;
        }
        tracing::debug!(
            phase = ?self.phase,
            pending = self.pending.is_some(),
            "scroll listener detached"
        );
        self.phase = ListenerPhase::Detached;
        self.pending = None;
    }
}

impl Drop for ScrollListener {
    fn drop(&mut self) {
        self.detach();
    }
}
