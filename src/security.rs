//! 安全策略模块：按操作配额把共享限流器接到请求处理入口。
//!
//! # Security Policy Module
//!
//! Front door for request handlers: maps operation names to quotas and
//! enforces them against the shared [`FixedWindowLimiter`]. Rejections
//! surface as [`Error::RateLimited`], a distinct kind carrying the
//! retry-after hint so callers can implement backoff.

use std::collections::HashMap;
use std::sync::Arc;

use crate::limiter::{Decision, FixedWindowLimiter, RateQuota};
use crate::{Error, Result};

/// Operation names recognized by the default quota table.
pub mod ops {
    pub const KEYWORD_SUGGEST: &str = "keyword_suggest";
    pub const CONTENT_ANALYZE: &str = "content_analyze";
    pub const SITE_AUDIT: &str = "site_audit";
}

pub struct SecurityPolicy {
    limiter: Arc<FixedWindowLimiter>,
    quotas: HashMap<String, RateQuota>,
    default_quota: RateQuota,
}

impl SecurityPolicy {
    pub fn new(
        limiter: Arc<FixedWindowLimiter>,
        quotas: HashMap<String, RateQuota>,
        default_quota: RateQuota,
    ) -> Self {
        Self {
            limiter,
            quotas,
            default_quota,
        }
    }

    /// Quota applied to `operation`; unlisted operations get the default.
    pub fn quota_for(&self, operation: &str) -> RateQuota {
        self.quotas
            .get(operation)
            .copied()
            .unwrap_or(self.default_quota)
    }

    /// Admit or reject one request for `(subject, operation)`.
    pub fn enforce(&self, subject: &str, operation: &str) -> Result<()> {
        let quota = self.quota_for(operation);
        match self
            .limiter
            .check_and_increment(subject, operation, &quota)
        {
            Decision::Allowed { remaining } => {
                tracing::trace!(subject, operation, remaining, "request admitted");
                Ok(())
            }
            Decision::Limited { retry_after } => {
                tracing::debug!(
                    subject,
                    operation,
                    retry_after_ms = retry_after.as_millis() as u64,
                    "request rejected by quota"
                );
                Err(Error::RateLimited {
                    subject: subject.to_string(),
                    operation: operation.to_string(),
                    retry_after_ms: retry_after.as_millis() as u64,
                })
            }
        }
    }

    pub fn limiter(&self) -> &Arc<FixedWindowLimiter> {
        &self.limiter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn policy(max: u32) -> SecurityPolicy {
        let mut quotas = HashMap::new();
        quotas.insert(
            ops::KEYWORD_SUGGEST.to_string(),
            RateQuota::new(max, Duration::from_secs(60)),
        );
        SecurityPolicy::new(
            Arc::new(FixedWindowLimiter::new()),
            quotas,
            RateQuota::per_minute(60),
        )
    }

    #[test]
    fn test_enforce_uses_operation_quota() {
        let policy = policy(2);
        assert!(policy.enforce("u", ops::KEYWORD_SUGGEST).is_ok());
        assert!(policy.enforce("u", ops::KEYWORD_SUGGEST).is_ok());
        let err = policy.enforce("u", ops::KEYWORD_SUGGEST).unwrap_err();
        assert!(err.is_rate_limited());
        assert!(err.retry_after().is_some());
    }

    #[test]
    fn test_unlisted_operation_falls_back_to_default() {
        let policy = policy(1);
        assert_eq!(policy.quota_for("export_report").max_requests, 60);
        assert!(policy.enforce("u", "export_report").is_ok());
    }

    #[test]
    fn test_rejection_names_subject_and_operation() {
        let policy = policy(1);
        policy.enforce("user-9", ops::KEYWORD_SUGGEST).unwrap();
        match policy.enforce("user-9", ops::KEYWORD_SUGGEST) {
            Err(Error::RateLimited {
                subject, operation, ..
            }) => {
                assert_eq!(subject, "user-9");
                assert_eq!(operation, ops::KEYWORD_SUGGEST);
            }
            other => panic!("expected RateLimited, got {:?}", other),
        }
    }
}
