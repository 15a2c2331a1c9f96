#![forbid(unsafe_code)]

//! JSON-RPC 2.0 envelope for the single `Plugin.HandleRequest` call.

use super::oneshot::HANDLE_REQUEST_METHOD;
use plug_core::Request;
use serde::Deserialize;
use serde_json::{Value, json};

pub(crate) const PARSE_ERROR: i64 = -32700;
pub(crate) const INVALID_REQUEST: i64 = -32600;
pub(crate) const METHOD_NOT_FOUND: i64 = -32601;
pub(crate) const INVALID_PARAMS: i64 = -32602;

#[derive(Deserialize)]
struct Envelope {
    method: String,
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    params: Option<Value>,
}

/// A decoded call: the id to answer with and the host's request.
pub(crate) struct Call {
    pub(crate) id: Option<Value>,
    pub(crate) request: Request,
}

/// Decodes one frame body. `Err` holds the ready-to-send error envelope.
pub(crate) fn parse_call(body: &[u8]) -> Result<Call, Value> {
    let data: Value = serde_json::from_slice(body)
        .map_err(|e| error_envelope(None, PARSE_ERROR, &format!("Parse error: {e}")))?;
    let id = data.get("id").cloned();
    if !data.is_object() {
        return Err(error_envelope(None, INVALID_REQUEST, "Invalid Request"));
    }

    let envelope: Envelope = serde_json::from_value(data)
        .map_err(|e| error_envelope(id.clone(), INVALID_REQUEST, &format!("Invalid Request: {e}")))?;
    if envelope.method != HANDLE_REQUEST_METHOD {
        return Err(error_envelope(
            envelope.id,
            METHOD_NOT_FOUND,
            &format!("Method not found: {}", envelope.method),
        ));
    }

    let request = match envelope.params {
        Some(params @ Value::Object(_)) => serde_json::from_value::<Request>(params).map_err(|e| {
            error_envelope(envelope.id.clone(), INVALID_PARAMS, &format!("Invalid params: {e}"))
        })?,
        _ => {
            return Err(error_envelope(
                envelope.id,
                INVALID_PARAMS,
                "params must be an object",
            ));
        }
    };
    Ok(Call {
        id: envelope.id,
        request,
    })
}

/// Success envelope; the reply bytes travel as a JSON string.
pub(crate) fn reply_envelope(id: Option<Value>, reply: &[u8]) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": String::from_utf8_lossy(reply),
    })
}

pub(crate) fn error_envelope(id: Option<Value>, code: i64, message: &str) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "error": { "code": code, "message": message } })
}
