#![forbid(unsafe_code)]
#![allow(dead_code)]

use serde_json::Value;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::path::PathBuf;
use std::time::Duration;

pub(crate) fn temp_dir(test_name: &str) -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!(
        "plug_server_{test_name}_{}_{nanos}",
        std::process::id()
    ))
}

pub(crate) fn connect(addr: SocketAddr) -> TcpStream {
    let stream = TcpStream::connect(addr).expect("connect to plugin");
    stream
        .set_read_timeout(Some(Duration::from_secs(10)))
        .expect("set read timeout");
    stream
}

/// Connects with retries, for plugins started as child processes.
pub(crate) fn connect_with_retry(addr: SocketAddr) -> TcpStream {
    for _ in 0..100 {
        if let Ok(stream) = TcpStream::connect(addr) {
            stream
                .set_read_timeout(Some(Duration::from_secs(10)))
                .expect("set read timeout");
            return stream;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    panic!("plugin never started listening on {addr}");
}

pub(crate) fn call_content_length(stream: TcpStream, req: &Value) -> Value {
    let mut writer = stream.try_clone().expect("clone stream");
    let body = serde_json::to_vec(req).expect("serialize request");
    write!(writer, "Content-Length: {}\r\n\r\n", body.len()).expect("write header");
    writer.write_all(&body).expect("write body");
    writer.flush().expect("flush request");

    let mut reader = BufReader::new(stream);
    let mut content_length: Option<usize> = None;
    loop {
        let mut line = String::new();
        let read = reader.read_line(&mut line).expect("read header line");
        assert!(read > 0, "unexpected EOF reading response headers");
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            break;
        }
        if let Some((key, value)) = trimmed.split_once(':')
            && key.trim().eq_ignore_ascii_case("content-length")
        {
            content_length = Some(value.trim().parse::<usize>().expect("content-length"));
        }
    }

    let len = content_length.expect("missing Content-Length in response");
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf).expect("read response body");
    serde_json::from_slice(&buf).expect("parse response json")
}

pub(crate) fn call_newline(stream: TcpStream, req: &Value) -> Value {
    let mut writer = stream.try_clone().expect("clone stream");
    writeln!(writer, "{req}").expect("write request");
    writer.flush().expect("flush request");

    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    reader.read_line(&mut line).expect("read response");
    assert!(!line.trim().is_empty(), "empty response line");
    serde_json::from_str(&line).expect("parse response json")
}

/// Decodes the reply envelope carried in a JSON-RPC result.
pub(crate) fn reply_of(resp: &Value) -> Value {
    let text = resp
        .get("result")
        .and_then(|v| v.as_str())
        .unwrap_or_else(|| panic!("expected a string result, got {resp}"));
    serde_json::from_str(text).expect("reply json")
}
