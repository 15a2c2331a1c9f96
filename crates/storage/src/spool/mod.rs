#![forbid(unsafe_code)]

mod error;

pub use error::StoreError;

use plug_core::{
    BACKGROUND_JOB_TYPE, INLINE_JOB_TYPE, JobDescription, JobId, Request, RunnerError,
    ScriptRunner,
};
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use std::time::Duration;
use time::OffsetDateTime;

const DB_FILE: &str = "plug_spool.db";
const STATUS_QUEUED: &str = "QUEUED";

/// Hand-off queue between plugins and the script execution subsystem.
///
/// A plugin only ever appends; the executor claims rows on its own schedule.
#[derive(Debug)]
pub struct JobSpool {
    conn: Connection,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpooledJob {
    pub id: JobId,
    pub status: String,
    pub job: JobDescription,
    pub env_id: Option<String>,
    pub created_at_ms: i64,
}

impl JobSpool {
    pub fn open(storage_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let storage_dir = storage_dir.as_ref();
        std::fs::create_dir_all(storage_dir)?;

        let conn = Connection::open(storage_dir.join(DB_FILE))?;
        conn.busy_timeout(Duration::from_secs(5))?;
        install_schema(&conn)?;

        Ok(Self { conn })
    }

    pub fn enqueue(
        &mut self,
        env_id: Option<&str>,
        job: &JobDescription,
    ) -> Result<JobId, StoreError> {
        if job.script_name.trim().is_empty() {
            return Err(StoreError::InvalidInput("script_name must not be empty"));
        }
        if job.job_type != BACKGROUND_JOB_TYPE && job.job_type != INLINE_JOB_TYPE {
            return Err(StoreError::InvalidInput("job type must be inline or background"));
        }
        let env_id = env_id.map(str::trim).filter(|s| !s.is_empty());

        let tx = self.conn.transaction()?;
        tx.execute(
            r#"
            INSERT INTO jobs(status, script_name, cmd_args, env_vars, env_cap_desc, job_type, env_id, created_at_ms)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                STATUS_QUEUED,
                job.script_name,
                job.cmd_args,
                job.env_vars,
                job.env_cap_desc,
                job.job_type,
                env_id,
                now_ms(),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(JobId::new(id))
    }

    pub fn job_get(&self, id: JobId) -> Result<Option<SpooledJob>, StoreError> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT id, status, script_name, cmd_args, env_vars, env_cap_desc, job_type, env_id, created_at_ms
                FROM jobs WHERE id = ?1
                "#,
                params![id.get()],
                |row| {
                    Ok(SpooledJob {
                        id: JobId::new(row.get(0)?),
                        status: row.get(1)?,
                        job: JobDescription {
                            script_name: row.get(2)?,
                            cmd_args: row.get(3)?,
                            env_vars: row.get(4)?,
                            env_cap_desc: row.get(5)?,
                            job_type: row.get(6)?,
                        },
                        env_id: row.get(7)?,
                        created_at_ms: row.get(8)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    pub fn queued_count(&self) -> Result<i64, StoreError> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM jobs WHERE status = ?1",
            params![STATUS_QUEUED],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

impl ScriptRunner for JobSpool {
    fn run_script(
        &mut self,
        request: &Request,
        job: &JobDescription,
    ) -> Result<JobId, RunnerError> {
        Ok(self.enqueue(request.query_first("env_id"), job)?)
    }
}

fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS jobs (
          id INTEGER PRIMARY KEY AUTOINCREMENT,
          status TEXT NOT NULL,
          script_name TEXT NOT NULL,
          cmd_args TEXT NOT NULL,
          env_vars TEXT NOT NULL,
          env_cap_desc TEXT NOT NULL,
          job_type INTEGER NOT NULL,
          env_id TEXT,
          created_at_ms INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS jobs_status ON jobs(status, id);
        "#,
    )?;
    Ok(())
}

fn now_ms() -> i64 {
    let ms = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000i128;
    ms.clamp(0, i64::MAX as i128) as i64
}
