//! Tracing subscriber set-up.
//!
//! Installed once by the binary. `RUST_LOG` selects the filter (default
//! `info`); production logs one JSON object per event, development logs
//! pretty multi-line text.

use tracing_subscriber::EnvFilter;

use crate::config::ApiConfig;

const DEFAULT_FILTER: &str = "info";

pub fn init(config: &ApiConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    if config.is_production() {
        builder.json().init();
    } else {
        builder.with_thread_ids(true).pretty().init();
    }
}
