#![forbid(unsafe_code)]

mod config;
mod deployments;
mod dispatch;
mod entry;
mod logging;
#[cfg(test)]
mod test_support;

pub use config::PluginArgs;
pub use deployments::{CAPABILITY, GRAINS, SALTKEYS};
pub use dispatch::{BuildJob, Deployment, Dispatcher, HandlerError, Route, encode_reply};
pub use entry::{HANDLE_REQUEST_METHOD, OneShotServer, ServeError};
pub use logging::init_tracing;

use plug_storage::JobSpool;
use std::process::ExitCode;

/// Shared body of every plugin binary: open the spool, bind, serve one call, exit.
pub fn run_plugin(deployment: &'static Deployment, args: &PluginArgs) -> ExitCode {
    init_tracing();
    match serve(deployment, args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(plugin = deployment.name, error = %err, "plugin exiting");
            ExitCode::FAILURE
        }
    }
}

fn serve(deployment: &'static Deployment, args: &PluginArgs) -> Result<(), ServeError> {
    let storage_dir = args.storage_dir();
    let spool = JobSpool::open(&storage_dir)?;
    tracing::debug!(storage_dir = %storage_dir.display(), "job spool ready");

    let server = OneShotServer::bind(&args.bind_host, args.port)?;
    let mut dispatcher = Dispatcher::new(deployment, spool);
    server.serve_one(&mut dispatcher)
}
