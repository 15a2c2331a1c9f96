#![forbid(unsafe_code)]

//! Per-plugin routing tables.

mod grains;
mod saltkeys;


pub use grains::GRAINS;
pub use saltkeys::SALTKEYS;

/// Worker class allowed to run every salt script these plugins schedule.
pub const CAPABILITY: &str = "SALT_WORKER";
