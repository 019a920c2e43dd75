//! The Grid Engine adapter.

use crate::qacct::{self, NOT_FOUND_MARKER};
use crate::qstat;
use crate::submit;
use bridle_core::{AdapterError, BackendConfig, BatchAdapter, JobInfo, JobStatus};
use bridle_parsers::{
    CommandError, Invocation, RawOutput, Toolchain, invoke, invoke_raw, parse_record,
};
use camino::Utf8PathBuf;
use chrono::Utc;
use std::collections::BTreeMap;

/// Adapter over the Grid Engine command-line tools.
///
/// State is the tool paths, resolved once at construction, and the
/// environment overrides derived from configuration; nothing is mutated
/// afterwards.
pub struct SgeAdapter {
    qsub: Utf8PathBuf,
    qstat: Utf8PathBuf,
    qacct: Utf8PathBuf,
    qhold: Utf8PathBuf,
    qrls: Utf8PathBuf,
    qdel: Utf8PathBuf,
    env: Vec<(String, String)>,
}

impl SgeAdapter {
    pub fn new(config: &BackendConfig) -> Self {
        let tools = Toolchain::new(config.install_root.clone());
        let env = config
            .cluster
            .iter()
            .map(|cell| ("SGE_CELL".to_string(), cell.clone()))
            .collect();
        Self {
            qsub: tools.resolve("qsub"),
            qstat: tools.resolve("qstat"),
            qacct: tools.resolve("qacct"),
            qhold: tools.resolve("qhold"),
            qrls: tools.resolve("qrls"),
            qdel: tools.resolve("qdel"),
            env,
        }
    }

    fn invocation(&self) -> Invocation {
        Invocation {
            env: self.env.clone(),
            ..Invocation::default()
        }
    }

    /// Parse the full live listing into job descriptions.
    async fn listing(&self) -> Result<Vec<JobInfo>, AdapterError> {
        let stdout = invoke(&self.qstat, &["-u", "*", "-xml"], &self.invocation())
            .await
            .map_err(process_error)?;

        let records = qstat::parse_listing(&stdout).map_err(|e| AdapterError::Parse {
            tool: "qstat".to_string(),
            detail: e.to_string(),
        })?;

        let now = Utc::now();
        let mut jobs = Vec::with_capacity(records.len());
        for fields in &records {
            match qstat::job_from_fields(fields, now) {
                Some(job) => jobs.push(job),
                None => tracing::warn!("skipping qstat job element without a job number"),
            }
        }
        Ok(jobs)
    }

    /// Query the accounting store for a job that has left the queue.
    async fn accounting(&self, id: &str) -> Result<Option<JobInfo>, AdapterError> {
        let output = invoke_raw(&self.qacct, &["-j", id], &self.invocation())
            .await
            .map_err(process_error)?;

        let Some(fields) = accounting_record(output)? else {
            return Ok(None);
        };
        match qacct::job_from_record(&fields) {
            Some(job) => Ok(Some(job)),
            None => Err(AdapterError::Parse {
                tool: "qacct".to_string(),
                detail: "record carries no job number".to_string(),
            }),
        }
    }
}

/// Interpret a finished qacct invocation: a record block, the tool's own
/// typed miss, or a genuine process failure. The miss is an ordinary
/// `Ok(None)` outcome and must never surface as a process error.
fn accounting_record(
    output: RawOutput,
) -> Result<Option<BTreeMap<String, String>>, AdapterError> {
    if !output.success {
        if output.stderr.contains(NOT_FOUND_MARKER) || output.stdout.contains(NOT_FOUND_MARKER) {
            return Ok(None);
        }
        return Err(AdapterError::Process {
            tool: "qacct".to_string(),
            stderr: output.stderr.trim().to_string(),
        });
    }
    Ok(Some(parse_record(&output.stdout)))
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

impl BatchAdapter for SgeAdapter {
    fn backend(&self) -> &'static str {
        "sge"
    }

    async fn submit(
        &self,
        script: &str,
        dependencies: &[String],
    ) -> Result<String, AdapterError> {
        let mut args: Vec<String> = Vec::new();
        if !dependencies.is_empty() {
            args.push("-hold_jid".to_string());
            args.push(dependencies.join(","));
        }
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();

        let mut options = self.invocation();
        options.stdin = Some(script.to_string());

        let stdout = invoke(&self.qsub, &arg_refs, &options)
            .await
            .map_err(process_error)?;

        submit::parse_submit_response(&stdout).ok_or_else(|| AdapterError::Parse {
            tool: "qsub".to_string(),
            detail: format!("no job id in response: {}", stdout.trim()),
        })
    }

    async fn info(&self, id: &str) -> Result<Option<JobInfo>, AdapterError> {
        let jobs = self.listing().await?;
        if let Some(job) = jobs.into_iter().find(|job| job.id == id) {
            return Ok(Some(job));
        }
        // Second tier: the job has left the queue; ask the accounting
        // store. Its own miss comes back as a typed empty result.
        self.accounting(id).await
    }

    async fn info_all(&self) -> Result<Vec<JobInfo>, AdapterError> {
        self.listing().await
    }

    async fn status(&self, id: &str) -> Result<JobStatus, AdapterError> {
        // Live listing only on this path; absence means the job is done.
        // The accounting store is deliberately not consulted here.
        let jobs = self.listing().await?;
        Ok(jobs
            .into_iter()
            .find(|job| job.id == id)
            .map(|job| job.status)
            .unwrap_or(JobStatus::Completed))
    }

    async fn hold(&self, id: &str) -> Result<(), AdapterError> {
        invoke(&self.qhold, &[id], &self.invocation())
            .await
            .map_err(process_error)?;
        Ok(())
    }

    async fn release(&self, id: &str) -> Result<(), AdapterError> {
        invoke(&self.qrls, &[id], &self.invocation())
            .await
            .map_err(process_error)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), AdapterError> {
        invoke(&self.qdel, &[id], &self.invocation())
            .await
            .map_err(process_error)?;
        Ok(())
    }
}
