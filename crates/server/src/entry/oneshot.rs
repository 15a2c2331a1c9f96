#![forbid(unsafe_code)]

use super::framing::{read_frame, write_frame};
use crate::dispatch::Dispatcher;
use super::rpc::{parse_call, reply_envelope};
use plug_core::ScriptRunner;
use plug_storage::StoreError;
use serde_json::Value;
use std::io::{BufReader, BufWriter};
use std::net::{SocketAddr, TcpListener, TcpStream};

/// The only method a plugin registers.
pub const HANDLE_REQUEST_METHOD: &str = "Plugin.HandleRequest";

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("listen on {addr} failed: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("accept failed: {0}")]
    Accept(#[source] std::io::Error),
    #[error("connection io: {0}")]
    Io(#[from] std::io::Error),
    #[error("encode response: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("job spool: {0}")]
    Spool(#[from] StoreError),
}

/// Bind, accept one connection, serve one call, done.
///
/// `serve_one` consumes the server, so the listener is closed before the call
/// is handled and cannot be reused for a second connection.
#[derive(Debug)]
pub struct OneShotServer {
    listener: TcpListener,
}

impl OneShotServer {
    pub fn bind(host: &str, port: u16) -> Result<Self, ServeError> {
        let listener = TcpListener::bind((host, port)).map_err(|source| ServeError::Bind {
            addr: format!("{host}:{port}"),
            source,
        })?;
        tracing::info!(addr = %format!("{host}:{port}"), "plugin listening");
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServeError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn serve_one<R: ScriptRunner>(
        self,
        dispatcher: &mut Dispatcher<R>,
    ) -> Result<(), ServeError> {
        let (stream, peer) = self.listener.accept().map_err(ServeError::Accept)?;
        drop(self.listener);
        tracing::info!(%peer, "host connected");
        serve_connection(stream, dispatcher)
    }
}

fn serve_connection<R: ScriptRunner>(
    stream: TcpStream,
    dispatcher: &mut Dispatcher<R>,
) -> Result<(), ServeError> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = BufWriter::new(stream);

    let Some(frame) = read_frame(&mut reader)? else {
        tracing::warn!("host closed the connection before sending a request");
        return Ok(());
    };

    let response = handle_call(&frame.body, dispatcher);
    write_frame(&mut writer, frame.mode, &response)?;
    tracing::debug!("reply sent");
    Ok(())
}

pub(crate) fn handle_call<R: ScriptRunner>(body: &[u8], dispatcher: &mut Dispatcher<R>) -> Value {
    match parse_call(body) {
        Ok(call) => reply_envelope(call.id, &dispatcher.handle_request(&call.request)),
        Err(resp) => resp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deployments::SALTKEYS;
    use crate::entry::rpc::{INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR};
    use crate::test_support::RecordingRunner;
    use plug_core::Reply;
    use serde_json::json;

    fn call(body: Value) -> (Value, RecordingRunner) {
        let mut dispatcher = Dispatcher::new(&SALTKEYS, RecordingRunner::starting_at(31));
        let bytes = serde_json::to_vec(&body).unwrap();
        let resp = handle_call(&bytes, &mut dispatcher);
        (resp, dispatcher.into_runner())
    }

    #[test]
    fn domain_failures_are_transport_successes() {
        let (resp, runner) = call(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": HANDLE_REQUEST_METHOD,
            "params": { "QueryType": "POST", "QueryString": { "hostname": ["web01"] } }
        }));
        assert!(resp.get("error").is_none(), "got {resp}");
        let text = resp["result"].as_str().unwrap();
        let reply = Reply::from_slice(text.as_bytes()).unwrap();
        assert_eq!(reply.message(), "'type' must be set");
        assert!(runner.jobs.is_empty());
    }

    #[test]
    fn handle_request_returns_the_serialized_reply() {
        let (resp, runner) = call(json!({
            "jsonrpc": "2.0",
            "id": "abc",
            "method": HANDLE_REQUEST_METHOD,
            "params": { "QueryType": "GET", "QueryString": { "env_id": ["9"] } }
        }));
        assert_eq!(resp["id"], json!("abc"));
        let reply: Value = serde_json::from_str(resp["result"].as_str().unwrap()).unwrap();
        assert_eq!(
            reply,
            json!({ "JobId": 31, "Text": "", "Status": "success", "Message": "" })
        );
        assert_eq!(runner.jobs.len(), 1);
    }

    #[test]
    fn protocol_errors_use_json_rpc_codes() {
        let (resp, _) = call(json!({ "jsonrpc": "2.0", "id": 2, "method": "Plugin.Other" }));
        assert_eq!(resp["error"]["code"], json!(METHOD_NOT_FOUND));

        let (resp, _) = call(json!({
            "jsonrpc": "2.0", "id": 3, "method": HANDLE_REQUEST_METHOD, "params": [1, 2]
        }));
        assert_eq!(resp["error"]["code"], json!(INVALID_PARAMS));

        let (resp, _) = call(json!({
            "jsonrpc": "2.0", "id": 4, "method": HANDLE_REQUEST_METHOD,
            "params": { "QueryString": "env_id=1" }
        }));
        assert_eq!(resp["error"]["code"], json!(INVALID_PARAMS));

        let mut dispatcher = Dispatcher::new(&SALTKEYS, RecordingRunner::default());
        let resp = handle_call(b"{not json", &mut dispatcher);
        assert_eq!(resp["error"]["code"], json!(PARSE_ERROR));
    }
}
