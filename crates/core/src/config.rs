//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Services never read process-wide environment variables while
//! handling a request.

use crate::constants::DEFAULT_RECENT_TREATMENTS_LIMIT;
use crate::{ServiceError, ServiceResult};
use record_store::{Clock, SystemClock};
use std::sync::Arc;

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    recent_treatments_limit: u32,
    clock: Arc<dyn Clock>,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Arguments
    ///
    /// * `recent_treatments_limit` - Default page size for "recent treatments"; must be non-zero.
    /// * `clock` - Calendar used for date defaults (for example a treatment's date).
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidInput`] if `recent_treatments_limit` is zero.
    pub fn new(recent_treatments_limit: u32, clock: Arc<dyn Clock>) -> ServiceResult<Self> {
        if recent_treatments_limit == 0 {
            return Err(ServiceError::InvalidInput(
                "recent_treatments_limit must be greater than zero".into(),
            ));
        }

        Ok(Self {
            recent_treatments_limit,
            clock,
        })
    }

    pub fn recent_treatments_limit(&self) -> u32 {
        self.recent_treatments_limit
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            recent_treatments_limit: DEFAULT_RECENT_TREATMENTS_LIMIT,
            clock: Arc::new(SystemClock),
        }
    }
}

/// Parse the recent-treatments limit from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_RECENT_TREATMENTS_LIMIT`].
pub fn recent_limit_from_env_value(value: Option<String>) -> ServiceResult<u32> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    match value {
        None => Ok(DEFAULT_RECENT_TREATMENTS_LIMIT),
        Some(v) => match v.parse::<u32>() {
            Ok(0) | Err(_) => Err(ServiceError::InvalidInput(format!(
                "recent treatments limit must be a positive integer, got '{v}'"
            ))),
            Ok(limit) => Ok(limit),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_limit_defaults_when_unset_or_blank() {
        assert_eq!(
            recent_limit_from_env_value(None).unwrap(),
            DEFAULT_RECENT_TREATMENTS_LIMIT
        );
        assert_eq!(
            recent_limit_from_env_value(Some("  ".into())).unwrap(),
            DEFAULT_RECENT_TREATMENTS_LIMIT
        );
    }

    #[test]
    fn recent_limit_parses_positive_integers() {
        assert_eq!(recent_limit_from_env_value(Some(" 25 ".into())).unwrap(), 25);
    }

    #[test]
    fn recent_limit_rejects_zero_and_garbage() {
        assert!(matches!(
            recent_limit_from_env_value(Some("0".into())),
            Err(ServiceError::InvalidInput(_))
        ));
        assert!(matches!(
            recent_limit_from_env_value(Some("ten".into())),
            Err(ServiceError::InvalidInput(_))
        ));
    }

    #[test]
    fn config_rejects_zero_limit() {
        assert!(CoreConfig::new(0, Arc::new(SystemClock)).is_err());
        assert_eq!(
            CoreConfig::new(5, Arc::new(SystemClock))
                .unwrap()
                .recent_treatments_limit(),
            5
        );
    }
}
