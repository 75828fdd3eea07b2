use jiff::SignedDuration;
use typed_builder::TypedBuilder;

/// Immutable resolver configuration, constructed once at startup and
/// injected by value.
#[derive(Debug, Clone, TypedBuilder)]
pub struct LinkConfig {
    /// Public base URL the short code is appended to.
    #[builder(setter(into))]
    pub base_url: String,
    /// Length of generated short codes.
    #[builder(default = 6)]
    pub code_length: usize,
    /// Lifetime of new links. `None` disables expiration.
    #[builder(default = Some(SignedDuration::from_hours(7 * 24)))]
    pub link_ttl: Option<SignedDuration>,
    /// Cache TTL used for never-expiring links; caches need a bounded
    /// horizon even when the record itself does not.
    #[builder(default = SignedDuration::from_hours(30 * 24))]
    pub default_cache_ttl: SignedDuration,
    /// How many candidate codes to try before giving up with
    /// `GenerationExhausted`.
    #[builder(default = 10)]
    pub max_generate_attempts: u32,
}

/// Immutable reaper configuration.
#[derive(Debug, Clone, TypedBuilder)]
pub struct ReaperConfig {
    /// Upper bound on expired records fetched per sweep, so a large
    /// backlog never materializes in memory at once.
    #[builder(default = 1000)]
    pub batch_limit: usize,
    /// Watchdog alarm: a full sweep triggers once this many severely
    /// expired records accumulate.
    #[builder(default = 100)]
    pub alarm_threshold: u64,
    /// How far past expiry a record counts as severely expired.
    #[builder(default = SignedDuration::from_hours(24))]
    pub severe_age: SignedDuration,
}

impl Default for ReaperConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_config_defaults() {
        let config = LinkConfig::builder().base_url("https://hop.link").build();

        assert_eq!(config.base_url, "https://hop.link");
        assert_eq!(config.code_length, 6);
        assert_eq!(config.link_ttl, Some(SignedDuration::from_hours(7 * 24)));
        assert_eq!(config.max_generate_attempts, 10);
    }

    #[test]
    fn reaper_config_defaults() {
        let config = ReaperConfig::default();

        assert_eq!(config.batch_limit, 1000);
        assert_eq!(config.alarm_threshold, 100);
        assert_eq!(config.severe_age, SignedDuration::from_hours(24));
    }

    #[test]
    fn ttl_can_be_disabled() {
        let config = LinkConfig::builder()
            .base_url("https://hop.link")
            .link_ttl(None)
            .build();

        assert_eq!(config.link_ttl, None);
    }
}
