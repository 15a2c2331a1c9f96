#![forbid(unsafe_code)]

mod framing;
mod oneshot;
mod rpc;

pub use oneshot::{HANDLE_REQUEST_METHOD, OneShotServer, ServeError};
