//! Review workflow tuning

use serde::Deserialize;

use super::error::ValidationError;
use crate::application::{
    DEFAULT_FANOUT_CONCURRENCY, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE,
};
use crate::adapters::websocket::DEFAULT_CHANNEL_CAPACITY;
use crate::domain::diff::DEFAULT_LCS_LINE_LIMIT;

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewConfig {
    /// Line count above which diffs use the linear-space algorithm
    #[serde(default = "default_lcs_line_limit")]
    pub lcs_line_limit: usize,

    /// Concurrent dispatch tasks per fan-out
    #[serde(default = "default_fanout_concurrency")]
    pub fanout_concurrency: usize,

    /// Queued events per live connection
    #[serde(default = "default_live_channel_capacity")]
    pub live_channel_capacity: usize,

    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

impl ReviewConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.lcs_line_limit == 0 {
            return Err(ValidationError::InvalidReviewSetting("lcs_line_limit"));
        }
        if self.fanout_concurrency == 0 {
            return Err(ValidationError::InvalidReviewSetting("fanout_concurrency"));
        }
        if self.live_channel_capacity < 2 {
            return Err(ValidationError::InvalidReviewSetting("live_channel_capacity"));
        }
        if self.default_page_size == 0 || self.default_page_size > self.max_page_size {
            return Err(ValidationError::InvalidReviewSetting("default_page_size"));
        }
        Ok(())
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            lcs_line_limit: default_lcs_line_limit(),
            fanout_concurrency: default_fanout_concurrency(),
            live_channel_capacity: default_live_channel_capacity(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_lcs_line_limit() -> usize {
    DEFAULT_LCS_LINE_LIMIT
}

fn default_fanout_concurrency() -> usize {
    DEFAULT_FANOUT_CONCURRENCY
}

fn default_live_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

fn default_max_page_size() -> u32 {
    MAX_PAGE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = ReviewConfig::default();
        assert_eq!(config.lcs_line_limit, 2000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_limits_are_rejected() {
        let config = ReviewConfig {
            fanout_concurrency: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidReviewSetting("fanout_concurrency"))
        );

        let config = ReviewConfig {
            default_page_size: 500,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
