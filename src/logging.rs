use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "stepmark=info";

/// Installs the global tracing subscriber. Safe to call more than once.
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_can_run_more_than_once() {
        init();
        init();
        tracing::info!("logging initialized twice without panicking");
    }
}
