#![forbid(unsafe_code)]

use std::sync::OnceLock;
use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber once; stdout and the socket stay free of log noise.
pub fn init_tracing() {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init()
            .ok();
    });
}
