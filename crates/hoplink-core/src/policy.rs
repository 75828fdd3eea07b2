/// The URL acceptability predicate consulted before any state mutation.
///
/// Kept as a trait so deployments can swap in stricter checks (allowlists,
/// reachability probes) without touching the resolver.
pub trait UrlPolicy: Send + Sync + 'static {
    /// Returns `Err` with a human-readable reason when the URL must be
    /// rejected.
    fn check(&self, url: &str) -> Result<(), String>;
}

const MAX_URL_LENGTH: usize = 2048;

const REJECTED_SCHEMES: &[&str] = &["javascript:", "data:", "vbscript:", "file:", "ftp:"];

/// The default policy: http(s) URLs with a host, bounded length, and no
/// script-injection schemes.
#[derive(Debug, Clone, Default)]
pub struct StandardUrlPolicy;

impl UrlPolicy for StandardUrlPolicy {
    fn check(&self, url: &str) -> Result<(), String> {
        let url = url.trim();

        if url.is_empty() {
            return Err("URL must not be empty".to_string());
        }

        if url.len() > MAX_URL_LENGTH {
            return Err(format!(
                "URL exceeds the maximum length of {} characters",
                MAX_URL_LENGTH
            ));
        }

        let lower = url.to_ascii_lowercase();
        for scheme in REJECTED_SCHEMES {
            if lower.starts_with(scheme) {
                return Err(format!("unsupported scheme: {}", scheme));
            }
        }

        let rest = lower
            .strip_prefix("http://")
            .or_else(|| lower.strip_prefix("https://"))
            .ok_or_else(|| "URL must start with http:// or https://".to_string())?;

        let host = rest.split('/').next().unwrap_or_default();
        if host.is_empty() {
            return Err("URL must have a host".to_string());
        }

        Ok(())
    }
}
