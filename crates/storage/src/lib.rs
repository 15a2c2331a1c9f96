#![forbid(unsafe_code)]

mod spool;

pub use spool::{JobSpool, SpooledJob, StoreError};
