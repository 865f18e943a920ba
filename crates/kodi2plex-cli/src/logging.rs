use anyhow::Result;
use std::io;
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Install the global subscriber. Progress lines go to stdout.
pub fn init_logging(verbose_level: u8, quiet: bool) -> Result<()> {
    // 0 = info, 1 = debug (with hyper::proto::h1 suppressed), 2+ = trace
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        let filter_str = match verbose_level {
            0 => "info",
            1 => "debug,hyper::proto::h1=warn,hyper::client::pool=warn,rustls=warn",
            _ => "trace",
        };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_str))
    };

    let json = std::env::var("RUST_LOG_JSON")
        .map(|v| v == "true")
        .unwrap_or(false);

    let registry = Registry::default().with(filter);

    if json {
        let json_layer = fmt::layer()
            .json()
            .with_timer(ChronoUtc::rfc_3339())
            .with_writer(io::stdout);

        registry.with(json_layer).try_init()?;
    } else {
        let fmt_layer = fmt::layer()
            .with_timer(ChronoUtc::rfc_3339())
            .with_target(verbose_level > 0)
            .with_writer(io::stdout);

        registry.with(fmt_layer).try_init()?;
    }

    Ok(())
}
