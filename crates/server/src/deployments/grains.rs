#![forbid(unsafe_code)]

use super::CAPABILITY;
use crate::dispatch::{Deployment, HandlerError, Route, decode_payload};
use plug_core::{JobDescription, Param, Request, Verb};
use serde::Deserialize;

pub(crate) const GET_GRAINS: &str = "saltkey-grains.sh";
pub(crate) const SET_GRAINS: &str = "saltkey-set-grains.sh";

pub static GRAINS: Deployment = Deployment {
    name: "grains",
    routes: &[
        Route {
            verb: Verb::Read,
            required: &[Param::Query("env_id"), Param::Query("salt_id")],
            build: get_grains,
        },
        // Hosts send the grain update as POST; PUT is accepted as well.
        Route {
            verb: Verb::Create,
            required: &[Param::Query("salt_id")],
            build: set_grain,
        },
        Route {
            verb: Verb::Update,
            required: &[Param::Query("salt_id")],
            build: set_grain,
        },
    ],
};

/// Body of a grain update. Absent fields decode as empty strings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GrainPatch {
    #[serde(rename = "Grain")]
    grain: String,
    #[serde(rename = "Text")]
    text: String,
}

fn get_grains(request: &Request) -> Result<JobDescription, HandlerError> {
    let salt_id = request.query_first("salt_id").unwrap_or_default();
    Ok(JobDescription::background(GET_GRAINS, salt_id, CAPABILITY))
}

fn set_grain(request: &Request) -> Result<JobDescription, HandlerError> {
    let patch: GrainPatch = decode_payload(request)?;
    let salt_id = request.query_first("salt_id").unwrap_or_default();
    Ok(JobDescription::background(
        SET_GRAINS,
        format!("{salt_id} {},{}", patch.grain, patch.text),
        CAPABILITY,
    ))
}
