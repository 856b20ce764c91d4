use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialize structured JSON logging for the binaries.
///
/// Defaults to `warn` unless overridden by `JUMPCUT_LOG`. Progress feedback
/// goes to the caller's progress observer, not the log stream, so the default
/// stays quiet enough for scripted use.
pub fn init() {
    let filter = EnvFilter::builder()
        .with_env_var("JUMPCUT_LOG")
        .with_default_directive(tracing::level_filters::LevelFilter::WARN.into())
        .from_env_lossy();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        init();
    }
}
