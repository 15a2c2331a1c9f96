#![forbid(unsafe_code)]

use super::HandlerError;
use plug_core::{Param, Request};
use serde::de::DeserializeOwned;

/// Stops at the first missing input; errors are never aggregated.
pub(crate) fn require_all(request: &Request, required: &[Param]) -> Result<(), HandlerError> {
    match required
        .iter()
        .find(|param| request.lookup(**param).is_none())
    {
        Some(missing) => Err(HandlerError::MissingParam(missing.name())),
        None => Ok(()),
    }
}

pub(crate) fn decode_payload<T: DeserializeOwned>(request: &Request) -> Result<T, HandlerError> {
    serde_json::from_slice(request.payload()).map_err(|source| HandlerError::MalformedPayload {
        payload: String::from_utf8_lossy(request.payload()).into_owned(),
        source,
    })
}
