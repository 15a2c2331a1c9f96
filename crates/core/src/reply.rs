#![forbid(unsafe_code)]

use crate::job::JobId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failure,
}

/// The envelope returned for every call.
///
/// Either a success with a job id and an empty message, or a failure with a
/// zero job id and a non-empty message. The constructors are the only way to
/// build one outside of decoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    #[serde(rename = "JobId", default)]
    job_id: i64,
    #[serde(rename = "Text", default)]
    text: String,
    #[serde(rename = "Status")]
    status: Status,
    #[serde(rename = "Message", default)]
    message: String,
}

impl Reply {
    pub fn success(job_id: JobId) -> Self {
        Self {
            job_id: job_id.get(),
            text: String::new(),
            status: Status::Success,
            message: String::new(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        let mut message = message.into();
        if message.trim().is_empty() {
            message = "internal error: empty failure message".to_string();
        }
        Self {
            job_id: 0,
            text: String::new(),
            status: Status::Failure,
            message,
        }
    }

    pub fn job_id(&self) -> Option<JobId> {
        match self.status {
            Status::Success => Some(JobId::new(self.job_id)),
            Status::Failure => None,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
