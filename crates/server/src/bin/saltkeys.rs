#![forbid(unsafe_code)]

use clap::Parser;
use plug_server::{PluginArgs, SALTKEYS, run_plugin};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = PluginArgs::parse();
    run_plugin(&SALTKEYS, &args)
}
