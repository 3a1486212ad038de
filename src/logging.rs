// Diagnostics setup
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "KIRI_LOG";
pub const DEFAULT_FILTER: &str = "kiri=info";

/// Install the global subscriber. An explicit `filter` wins over `KIRI_LOG`.
pub fn init(filter: Option<&str>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(filter))
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

/// Directives from `filter` or `KIRI_LOG`; unparsable ones fall back to the default.
fn env_filter(filter: Option<&str>) -> EnvFilter {
    match filter {
        Some(directives) => EnvFilter::try_new(directives).ok(),
        None => EnvFilter::try_from_env(LOG_ENV).ok(),
    }
    .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_filter_is_used() {
        assert_eq!(env_filter(Some("kiri=debug")).to_string(), "kiri=debug");
    }

    #[test]
    fn test_bad_filter_falls_back_to_default() {
        assert_eq!(env_filter(Some("kiri=loudest")).to_string(), DEFAULT_FILTER);
    }
}
