#![forbid(unsafe_code)]

//! Generic script-backed verb dispatcher.
//!
//! A plugin is nothing more than a [`Deployment`] table: for each supported
//! verb, the inputs that must be present and the function that turns a
//! validated request into a [`JobDescription`]. The dispatcher owns routing,
//! validation order, runner invocation and reply encoding for all of them.

mod encode;
mod validate;


pub use encode::encode_reply;
pub(crate) use validate::decode_payload;

use plug_core::{JobDescription, JobId, Param, Reply, Request, RunnerError, ScriptRunner, Verb};

pub type BuildJob = fn(&Request) -> Result<JobDescription, HandlerError>;

pub struct Route {
    pub verb: Verb,
    /// Checked in order; the first missing one is reported.
    pub required: &'static [Param],
    pub build: BuildJob,
}

pub struct Deployment {
    pub name: &'static str,
    pub routes: &'static [Route],
}

impl Deployment {
    pub fn route(&self, verb: Verb) -> Option<&Route> {
        self.routes.iter().find(|route| route.verb == verb)
    }
}

/// Every way a call can fail; the `Display` text is the reply message.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("internal error: verb not set")]
    VerbNotSet,
    #[error("internal error: invalid verb for this plugin, got {0}")]
    InvalidVerb(String),
    #[error("'{0}' must be set")]
    MissingParam(&'static str),
    #[error("Error decoding the POST data ({payload}). Error decoding JSON ('{source}').")]
    MalformedPayload {
        payload: String,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Runner(#[from] RunnerError),
}

impl HandlerError {
    /// Stable label for logs. Carries no request data.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::VerbNotSet => "verb_not_set",
            Self::InvalidVerb(_) => "invalid_verb",
            Self::MissingParam(_) => "missing_param",
            Self::MalformedPayload { .. } => "malformed_payload",
            Self::Runner(_) => "runner_failed",
        }
    }
}

pub struct Dispatcher<R> {
    deployment: &'static Deployment,
    runner: R,
}

impl<R: ScriptRunner> Dispatcher<R> {
    pub fn new(deployment: &'static Deployment, runner: R) -> Self {
        Self { deployment, runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn into_runner(self) -> R {
        self.runner
    }

    /// `HandleRequest`: always yields a well-formed serialized reply.
    pub fn handle_request(&mut self, request: &Request) -> Vec<u8> {
        encode_reply(&self.reply_for(request))
    }

    pub fn reply_for(&mut self, request: &Request) -> Reply {
        match self.schedule(request) {
            Ok(job_id) => Reply::success(job_id),
            Err(err) => {
                let plugin = self.deployment.name;
                let error_kind = err.kind();
                match &err {
                    HandlerError::Runner(_) => {
                        tracing::error!(plugin, error_kind, error = %err, "script runner failed");
                    }
                    // The reply echoes the body back to the host; the log must not.
                    HandlerError::MalformedPayload { source, .. } => {
                        tracing::warn!(
                            plugin,
                            error_kind,
                            category = ?source.classify(),
                            line = source.line(),
                            column = source.column(),
                            "request rejected"
                        );
                    }
                    _ => {
                        tracing::warn!(plugin, error_kind, error = %err, "request rejected");
                    }
                }
                Reply::failure(err.to_string())
            }
        }
    }

    /// Route, validate, build and hand the job to the runner.
    pub fn schedule(&mut self, request: &Request) -> Result<JobId, HandlerError> {
        let route = self.route_for(request)?;
        validate::require_all(request, route.required)?;
        let job = (route.build)(request)?;
        tracing::info!(
            plugin = self.deployment.name,
            verb = route.verb.as_str(),
            script = %job.script_name,
            capability = %job.env_cap_desc,
            "scheduling job"
        );

        let job_id = self.runner.run_script(request, &job)?;
        tracing::info!(plugin = self.deployment.name, job_id = %job_id, "job scheduled");
        Ok(job_id)
    }

    fn route_for(&self, request: &Request) -> Result<&'static Route, HandlerError> {
        let Some(raw) = request.raw_verb() else {
            return Err(HandlerError::VerbNotSet);
        };
        Verb::from_wire(raw)
            .and_then(|verb| self.deployment.route(verb))
            .ok_or_else(|| HandlerError::InvalidVerb(raw.to_string()))
    }
}
