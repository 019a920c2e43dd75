//! The LSF adapter.

use crate::bjobs::{self, BJOBS_SCHEMA};
use crate::submit;
use bridle_core::{AdapterError, BackendConfig, BatchAdapter, JobInfo, JobStatus};
use bridle_parsers::{CommandError, Invocation, TableError, Toolchain, invoke};
use camino::Utf8PathBuf;
use chrono::Utc;

/// Adapter over the LSF command-line tools.
///
/// State is the tool paths, resolved once at construction, and the
/// environment overrides derived from configuration; nothing is mutated
/// afterwards.
pub struct LsfAdapter {
    bsub: Utf8PathBuf,
    bjobs: Utf8PathBuf,
    bkill: Utf8PathBuf,
    env: Vec<(String, String)>,
}

impl LsfAdapter {
    pub fn new(config: &BackendConfig) -> Self {
        let tools = Toolchain::new(config.install_root.clone());
        let env = config
            .cluster
            .iter()
            .map(|cluster| ("LSB_DEFAULTCLUSTER".to_string(), cluster.clone()))
            .collect();
        Self {
            bsub: tools.resolve("bsub"),
            bjobs: tools.resolve("bjobs"),
            bkill: tools.resolve("bkill"),
            env,
        }
    }

    fn invocation(&self) -> Invocation {
        Invocation {
            env: self.env.clone(),
            ..Invocation::default()
        }
    }

    /// Parse the full wide listing into job descriptions.
    async fn listing(&self) -> Result<Vec<JobInfo>, AdapterError> {
        let stdout = invoke(&self.bjobs, &["-u", "all", "-W"], &self.invocation())
            .await
            .map_err(process_error)?;

        let rows = BJOBS_SCHEMA.parse(&stdout).map_err(table_error)?;
        let now = Utc::now();
        let mut jobs = Vec::with_capacity(rows.len());
        for row in &rows {
            match bjobs::job_from_row(row, now) {
                Some(job) => jobs.push(job),
                // The empty-listing marker yields one all-absent row.
                None if row.iter().all(Option::is_none) => {}
                None => tracing::warn!("skipping bjobs row without a job id"),
            }
        }
        Ok(jobs)
    }
}

/// Live-listing lookup with the completed-job fallback: LSF keeps no
/// reachable accounting store here, so a job the listing no longer
/// reports has left the system.
fn find_or_completed(jobs: Vec<JobInfo>, id: &str) -> JobInfo {
    jobs.into_iter()
        .find(|job| job.id == id)
        .unwrap_or_else(|| JobInfo::completed(id))
}

fn process_error(err: CommandError) -> AdapterError {
    match err {
        CommandError::Execution { command, error } => AdapterError::Process {
            tool: command,
            stderr: error,
        },
        CommandError::Failed { command, stderr } => AdapterError::Process {
            tool: command,
            stderr,
        },
    }
}

fn table_error(err: TableError) -> AdapterError {
    match err {
        TableError::Schema {
            tool,
            expected,
            actual,
        } => AdapterError::SchemaMismatch {
            tool: tool.to_string(),
            expected,
            actual,
        },
        row @ TableError::Row { .. } => AdapterError::Parse {
            tool: "bjobs".to_string(),
            detail: row.to_string(),
        },
    }
}

impl BatchAdapter for LsfAdapter {
    fn backend(&self) -> &'static str {
        "lsf"
    }

    async fn submit(
        &self,
        script: &str,
        dependencies: &[String],
    ) -> Result<String, AdapterError> {
        let mut args: Vec<String> = Vec::new();
        if !dependencies.is_empty() {
            let expression = dependencies
                .iter()
                .map(|id| format!("done({id})"))
                .collect::<Vec<_>>()
                .join(" && ");
            args.push("-w".to_string());
            args.push(expression);
        }
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();

        let mut options = self.invocation();
        options.stdin = Some(script.to_string());

        let stdout = invoke(&self.bsub, &arg_refs, &options)
            .await
            .map_err(process_error)?;

        submit::parse_submit_response(&stdout).ok_or_else(|| AdapterError::Parse {
            tool: "bsub".to_string(),
            detail: format!("no job id in response: {}", stdout.trim()),
        })
    }

    async fn info(&self, id: &str) -> Result<Option<JobInfo>, AdapterError> {
        let jobs = self.listing().await?;
        Ok(Some(find_or_completed(jobs, id)))
    }

    async fn info_all(&self) -> Result<Vec<JobInfo>, AdapterError> {
        self.listing().await
    }

    async fn status(&self, id: &str) -> Result<JobStatus, AdapterError> {
        let jobs = self.listing().await?;
        Ok(find_or_completed(jobs, id).status)
    }

    // hold and release keep the trait's capability-error defaults: this
    // backend does not drive bstop/bresume.

    async fn delete(&self, id: &str) -> Result<(), AdapterError> {
        invoke(&self.bkill, &[id], &self.invocation())
            .await
            .map_err(process_error)?;
        Ok(())
    }
}
