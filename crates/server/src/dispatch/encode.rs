#![forbid(unsafe_code)]

use plug_core::Reply;

/// Serializes `reply`; a serialization failure becomes a failure reply of its own.
pub fn encode_reply(reply: &Reply) -> Vec<u8> {
    encode_with(reply, Reply::to_bytes)
}

pub(super) fn encode_with<F>(reply: &Reply, mut serialize: F) -> Vec<u8>
where
    F: FnMut(&Reply) -> Result<Vec<u8>, serde_json::Error>,
{
    let err = match serialize(reply) {
        Ok(bytes) => return bytes,
        Err(err) => err,
    };
    tracing::error!(error = %err, "reply serialization failed");

    let fallback = Reply::failure(format!("Marshal error: {err}"));
    match serialize(&fallback) {
        Ok(bytes) => bytes,
        Err(err) => {
            // Nothing sensible left to send; the host sees an empty reply.
            tracing::error!(error = %err, "fallback reply serialization failed");
            Vec::new()
        }
    }
}
