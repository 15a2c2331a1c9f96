#![forbid(unsafe_code)]

use super::CAPABILITY;
use crate::dispatch::{Deployment, HandlerError, Route};
use plug_core::{JobDescription, Param, Request, Verb};

pub(crate) const SHOW_KEYS: &str = "saltkey-showkeys.sh";
pub(crate) const ACCEPT_KEYS: &str = "saltkey-acceptkeys.sh";
pub(crate) const REJECT_KEYS: &str = "saltkey-rejectkeys.sh";
pub(crate) const DELETE_KEYS: &str = "saltkey-deletekeys.sh";

const ACCEPT: &str = "accept";
const REJECT: &str = "reject";

pub static SALTKEYS: Deployment = Deployment {
    name: "saltkeys",
    routes: &[
        Route {
            verb: Verb::Read,
            required: &[Param::Query("env_id")],
            build: list_keys,
        },
        Route {
            verb: Verb::Create,
            required: &[
                Param::Query("hostname"),
                Param::Query("type"),
                Param::Query("env_id"),
            ],
            build: decide_key,
        },
        Route {
            verb: Verb::Delete,
            required: &[Param::Query("env_id"), Param::Path("id")],
            build: delete_key,
        },
    ],
};

fn list_keys(_request: &Request) -> Result<JobDescription, HandlerError> {
    Ok(JobDescription::background(SHOW_KEYS, "", CAPABILITY))
}

fn decide_key(request: &Request) -> Result<JobDescription, HandlerError> {
    let hostname = request.query_first("hostname").unwrap_or_default();
    let kind = request.query_first("type").unwrap_or_default();
    Ok(JobDescription::background(
        key_decision_script(kind),
        hostname,
        CAPABILITY,
    ))
}

/// Anything other than `accept` rejects the key, unknown values included.
pub(crate) fn key_decision_script(kind: &str) -> &'static str {
    if kind == ACCEPT {
        return ACCEPT_KEYS;
    }
    if kind != REJECT {
        tracing::warn!(key_type = kind, "unrecognised key decision, rejecting");
    }
    REJECT_KEYS
}

fn delete_key(request: &Request) -> Result<JobDescription, HandlerError> {
    let id = request.path_param("id").unwrap_or_default();
    Ok(JobDescription::background(DELETE_KEYS, id, CAPABILITY))
}
