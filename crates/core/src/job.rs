#![forbid(unsafe_code)]

use crate::request::Request;
use serde::{Deserialize, Serialize};

/// Job type classifier: run the script inline and wait for it.
pub const INLINE_JOB_TYPE: i64 = 1;
/// Job type classifier: schedule the script and return immediately.
pub const BACKGROUND_JOB_TYPE: i64 = 2;

/// What the execution subsystem needs to run one script.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescription {
    #[serde(rename = "ScriptName")]
    pub script_name: String,
    #[serde(rename = "CmdArgs")]
    pub cmd_args: String,
    #[serde(rename = "EnvVars")]
    pub env_vars: String,
    #[serde(rename = "EnvCapDesc")]
    pub env_cap_desc: String,
    #[serde(rename = "Type")]
    pub job_type: i64,
}

impl JobDescription {
    /// A fire-and-forget job with no extra environment.
    pub fn background(
        script_name: impl Into<String>,
        cmd_args: impl Into<String>,
        capability: &str,
    ) -> Self {
        Self {
            script_name: script_name.into(),
            cmd_args: cmd_args.into(),
            env_vars: String::new(),
            env_cap_desc: capability.to_string(),
            job_type: BACKGROUND_JOB_TYPE,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(i64);

impl JobId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("job rejected: {0}")]
    Rejected(String),
    #[error("script runner unavailable: {0}")]
    Unavailable(String),
}

/// The execution subsystem as seen from a plugin.
///
/// Implementations must not wait for the script to finish: the plugin process
/// exits as soon as the reply is written.
pub trait ScriptRunner {
    fn run_script(&mut self, request: &Request, job: &JobDescription)
    -> Result<JobId, RunnerError>;
}

impl<T: ScriptRunner + ?Sized> ScriptRunner for &mut T {
    fn run_script(
        &mut self,
        request: &Request,
        job: &JobDescription,
    ) -> Result<JobId, RunnerError> {
        (**self).run_script(request, job)
    }
}

impl<T: ScriptRunner + ?Sized> ScriptRunner for Box<T> {
    fn run_script(
        &mut self,
        request: &Request,
        job: &JobDescription,
    ) -> Result<JobId, RunnerError> {
        (**self).run_script(request, job)
    }
}
