#![forbid(unsafe_code)]

use serde_json::Value;
use std::io::{BufRead, Write};

const MAX_CONTENT_LENGTH_BYTES: usize = 16 * 1024 * 1024;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TransportMode {
    NewlineJson,
    ContentLength,
}

/// One inbound call: the body plus the framing the reply must use.
#[derive(Debug)]
pub(crate) struct Frame {
    pub(crate) mode: TransportMode,
    pub(crate) body: Vec<u8>,
}

pub(crate) fn detect_mode_from_first_line(line: &str) -> Option<TransportMode> {
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with("content-length:") || lower.starts_with("content-type:") {
        return Some(TransportMode::ContentLength);
    }
    // Anything else is treated as a JSON line; garbage surfaces as a parse error reply.
    Some(TransportMode::NewlineJson)
}

pub(crate) fn parse_content_length_header(line: &str) -> Option<usize> {
    let trimmed = line.trim();
    let (key, value) = trimmed.split_once(':')?;
    if !key.trim().eq_ignore_ascii_case("content-length") {
        return None;
    }
    value.trim().parse::<usize>().ok()
}

/// Reads the single request frame; `None` when the peer closed before sending one.
pub(crate) fn read_frame<R: BufRead>(reader: &mut R) -> std::io::Result<Option<Frame>> {
    let mut first = String::new();
    let mode = loop {
        first.clear();
        if reader.read_line(&mut first)? == 0 {
            return Ok(None);
        }
        if let Some(mode) = detect_mode_from_first_line(&first) {
            break mode;
        }
    };

    match mode {
        TransportMode::NewlineJson => Ok(Some(Frame {
            mode,
            body: first.trim().as_bytes().to_vec(),
        })),
        TransportMode::ContentLength => {
            Ok(read_content_length_body(reader, first)?.map(|body| Frame { mode, body }))
        }
    }
}

fn read_content_length_body<R: BufRead>(
    reader: &mut R,
    mut header: String,
) -> std::io::Result<Option<Vec<u8>>> {
    let mut content_length: Option<usize> = parse_content_length_header(&header);

    loop {
        if header.trim_end().is_empty() {
            break;
        }

        header.clear();
        if reader.read_line(&mut header)? == 0 {
            return Ok(None);
        }

        if content_length.is_none() {
            content_length = parse_content_length_header(&header);
        }
    }

    let Some(len) = content_length else {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Missing Content-Length header",
        ));
    };
    if len > MAX_CONTENT_LENGTH_BYTES {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "Content-Length exceeds max allowed size",
        ));
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body)?;
    Ok(Some(body))
}

pub(crate) fn write_frame<W: Write>(
    writer: &mut W,
    mode: TransportMode,
    resp: &Value,
) -> Result<(), super::ServeError> {
    let body = serde_json::to_vec(resp)?;
    match mode {
        TransportMode::NewlineJson => {
            writer.write_all(&body)?;
            writer.write_all(b"\n")?;
        }
        TransportMode::ContentLength => {
            write!(writer, "Content-Length: {}\r\n\r\n", body.len())?;
            writer.write_all(&body)?;
        }
    }
    writer.flush()?;
    Ok(())
}
