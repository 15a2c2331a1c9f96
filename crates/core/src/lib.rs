#![forbid(unsafe_code)]

pub mod job;
pub mod reply;
pub mod request;

pub use job::{
    BACKGROUND_JOB_TYPE, INLINE_JOB_TYPE, JobDescription, JobId, RunnerError, ScriptRunner,
};
pub use reply::{Reply, Status};
pub use request::{Param, Request, Verb};
