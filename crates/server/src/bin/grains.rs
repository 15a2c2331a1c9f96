#![forbid(unsafe_code)]

use clap::Parser;
use plug_server::{GRAINS, PluginArgs, run_plugin};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = PluginArgs::parse();
    run_plugin(&GRAINS, &args)
}
