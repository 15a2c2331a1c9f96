#![forbid(unsafe_code)]

use clap::Parser;
use std::path::PathBuf;

const DEFAULT_SPOOL_DIR: &str = "plug_spool";

/// One-shot plugin worker: serves a single host call on PORT, then exits.
#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct PluginArgs {
    /// TCP port the host connects to.
    pub port: u16,

    /// Host part of the listen address.
    #[arg(long, env = "PLUG_BIND_HOST", default_value = "0.0.0.0")]
    pub bind_host: String,

    /// Directory holding the job spool database.
    #[arg(long, env = "PLUG_STORAGE_DIR")]
    pub storage_dir: Option<PathBuf>,
}

impl PluginArgs {
    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_SPOOL_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_is_the_only_required_input() {
        let args = PluginArgs::try_parse_from(["saltkeys-plugin", "4040"]).unwrap();
        assert_eq!(args.port, 4040);
        assert!(
            args.storage_dir()
                .ends_with(std::path::Path::new(DEFAULT_SPOOL_DIR))
        );

        assert!(PluginArgs::try_parse_from(["saltkeys-plugin"]).is_err());
        assert!(PluginArgs::try_parse_from(["saltkeys-plugin", "not-a-port"]).is_err());
    }

    #[test]
    fn storage_dir_flag_overrides_the_default() {
        let args =
            PluginArgs::try_parse_from(["grains-plugin", "1", "--storage-dir", "/var/spool/x"])
                .unwrap();
        assert_eq!(args.storage_dir(), PathBuf::from("/var/spool/x"));
    }
}
