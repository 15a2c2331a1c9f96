#![forbid(unsafe_code)]

use plug_core::{JobDescription, JobId, Reply, Request, RunnerError, ScriptRunner};
use std::io;
use std::sync::{Arc, Mutex};

/// Runner fake that records every job it is handed.
#[derive(Debug, Default)]
pub(crate) struct RecordingRunner {
    pub(crate) jobs: Vec<JobDescription>,
    next_id: i64,
    fail_with: Option<String>,
}

impl RecordingRunner {
    pub(crate) fn starting_at(first_id: i64) -> Self {
        Self {
            next_id: first_id,
            ..Self::default()
        }
    }

    pub(crate) fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }
}

impl ScriptRunner for RecordingRunner {
    fn run_script(
        &mut self,
        _request: &Request,
        job: &JobDescription,
    ) -> Result<JobId, RunnerError> {
        self.jobs.push(job.clone());
        if let Some(message) = &self.fail_with {
            return Err(RunnerError::Unavailable(message.clone()));
        }
        let id = self.next_id;
        self.next_id += 1;
        Ok(JobId::new(id))
    }
}

pub(crate) fn decode(bytes: &[u8]) -> Reply {
    Reply::from_slice(bytes).expect("reply must be valid json")
}

/// Shared in-memory sink for a test-local `tracing` subscriber.
#[derive(Clone, Default)]
struct LogSink(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().expect("log sink lock").extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with every event at any level written to a buffer; returns both.
pub(crate) fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let sink = LogSink::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer({
            let sink = sink.clone();
            move || sink.clone()
        })
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();
    let out = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8_lossy(&sink.0.lock().expect("log sink lock")).into_owned();
    (out, logs)
}
