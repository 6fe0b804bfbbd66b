//! 限流模块：按 (主体, 操作) 计数的固定窗口限流器。
//!
//! # Fixed-Window Rate Limiter Module
//!
//! Tracks per-subject-per-operation request counts in fixed time windows,
//! rejecting bursts above a configured ceiling. This is deliberately a
//! fixed-window counter, not a token bucket: it admits short bursts at
//! window boundaries, which is acceptable for abuse deterrence (the use
//! case here) as opposed to precise quota billing.
//!
//! A rejected request never mutates limiter state, so repeated rejected
//! attempts cannot extend a window; its natural expiry is the only way out.

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Ceiling and window length for one operation class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateQuota {
    pub max_requests: u32,
    pub window: Duration,
}

impl RateQuota {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }

    pub fn per_minute(max_requests: u32) -> Self {
        Self::new(max_requests, Duration::from_secs(60))
    }
}

/// Outcome of a limiter check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct WindowKey {
    subject: String,
    operation: String,
}

#[derive(Debug)]
struct RateWindow {
    count: u32,
    reset_at: Instant,
}

/// Point-in-time view of one live window.
#[derive(Debug, Clone)]
pub struct WindowSnapshot {
    pub count: u32,
    pub resets_in: Duration,
}

pub struct FixedWindowLimiter {
    windows: RwLock<HashMap<WindowKey, RateWindow>>,
}

impl FixedWindowLimiter {
    pub fn new() -> Self {
        Self {
            windows: RwLock::new(HashMap::new()),
        }
    }

    /// Check the quota for `(subject, operation)` and record the request if
    /// admitted. Check and increment happen under a single lock guard.
    pub fn check_and_increment(
        &self,
        subject: &str,
        operation: &str,
        quota: &RateQuota,
    ) -> Decision {
        let now = Instant::now();
        let key = WindowKey {
            subject: subject.to_string(),
            operation: operation.to_string(),
        };
        let mut windows = self.windows.write().unwrap();
        if let Some(window) = windows.get_mut(&key) {
            if now < window.reset_at {
                if window.count >= quota.max_requests {
                    return Decision::Limited {
                        retry_after: window.reset_at - now,
                    };
                }
                window.count += 1;
                return Decision::Allowed {
                    remaining: quota.max_requests - window.count,
                };
            }
        }
        // Absent or stale: replace with a fresh window counting this request.
        windows.insert(
            key,
            RateWindow {
                count: 1,
                reset_at: now + quota.window,
            },
        );
        Decision::Allowed {
            remaining: quota.max_requests.saturating_sub(1),
        }
    }

    /// Drop windows whose reset time has passed, bounding growth from
    /// one-off callers who are never seen again. Returns how many were
    /// removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut windows = self.windows.write().unwrap();
        let before = windows.len();
        windows.retain(|_, w| w.reset_at > now);
        before - windows.len()
    }

    /// Current state of a live window, if one exists.
    pub fn snapshot(&self, subject: &str, operation: &str) -> Option<WindowSnapshot> {
        let key = WindowKey {
            subject: subject.to_string(),
            operation: operation.to_string(),
        };
        let now = Instant::now();
        let windows = self.windows.read().unwrap();
        windows.get(&key).and_then(|w| {
            if w.reset_at > now {
                Some(WindowSnapshot {
                    count: w.count,
                    resets_in: w.reset_at - now,
                })
            } else {
                None
            }
        })
    }

    /// Number of tracked windows, stale ones included.
    pub fn tracked_windows(&self) -> usize {
        self.windows.read().unwrap().len()
    }
}

impl Default for FixedWindowLimiter {
    fn default() -> Self {
        Self::new()
    }
}
