//! Schedule analysis handoff.
//!
//! The analyzer itself is external: it receives every task's actual and
//! planned windows and answers with a summary, warnings and a 0-100 health
//! score. [`CommandAnalyzer`] runs a configured program, writing the request
//! JSON to its stdin and reading the report JSON from its stdout.

use std::io::{ErrorKind, Write};
use std::process::{Command, Stdio};
use std::sync::mpsc::{Receiver, TryRecvError};

use chrono::{Local, NaiveDate, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::config::GanttConfig;
use crate::error::AnalysisError;
use crate::model::Task;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActualWindow {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedWindow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
}

/// One task as sent to the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisItem {
    pub name: String,
    pub actual: ActualWindow,
    pub planned: PlannedWindow,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalysisReport {
    pub summary: String,
    pub warnings: Vec<String>,
    pub score: f64,
}

/// Local midnight of `date` as an ISO-8601 UTC timestamp.
fn timestamp(date: NaiveDate) -> String {
    let Some(midnight) = date.and_hms_opt(0, 0, 0) else {
        return date.to_string();
    };
    let utc = match Local.from_local_datetime(&midnight).earliest() {
        Some(local) => local.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&midnight),
    };
    utc.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn build_request(tasks: &[Task]) -> Vec<AnalysisItem> {
    tasks
        .iter()
        .map(|t| AnalysisItem {
            name: t.text.clone(),
            actual: ActualWindow {
                start: timestamp(t.start_date),
                end: timestamp(t.end_date),
            },
            planned: PlannedWindow {
                start: t.planned_start.map(timestamp),
                end: t.planned_end.map(timestamp),
            },
        })
        .collect()
}

/// Parse and check a report returned by the analyzer.
pub fn parse_report(bytes: &[u8]) -> Result<AnalysisReport, AnalysisError> {
    let report: AnalysisReport = serde_json::from_slice(bytes)?;
    if !(0.0..=100.0).contains(&report.score) {
        return Err(AnalysisError::InvalidScore(report.score));
    }
    Ok(report)
}

/// Result type carried from an analysis worker thread.
pub type AnalysisResult = Result<AnalysisReport, AnalysisError>;

/// Poll a worker's channel without blocking. `None` while it is still
/// running; a worker that hung up without sending is `WorkerLost`.
pub fn try_recv_report(rx: &Receiver<AnalysisResult>) -> Option<AnalysisResult> {
    match rx.try_recv() {
        Ok(result) => Some(result),
        Err(TryRecvError::Empty) => None,
        Err(TryRecvError::Disconnected) => Some(Err(AnalysisError::WorkerLost)),
    }
}

pub trait ScheduleAnalyzer: Send + Sync {
    fn analyze(&self, request: &[AnalysisItem]) -> Result<AnalysisReport, AnalysisError>;
}

/// Runs an external program as the analyzer.
#[derive(Debug, Clone)]
pub struct CommandAnalyzer {
    program: String,
    args: Vec<String>,
}

impl CommandAnalyzer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from `analysis_command`; `None` when it is empty.
    pub fn from_config(config: &GanttConfig) -> Option<Self> {
        let (program, args) = config.analysis_command.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }
}

impl ScheduleAnalyzer for CommandAnalyzer {
    fn analyze(&self, request: &[AnalysisItem]) -> Result<AnalysisReport, AnalysisError> {
        let payload = serde_json::to_vec(request)?;
        log::info!("running analyzer '{}' on {} tasks", self.program, request.len());

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| AnalysisError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Feed stdin from its own thread so a program that answers before
        // reading everything cannot block us or lose its report.
        let writer = child.stdin.take().map(|mut stdin| {
            std::thread::spawn(move || stdin.write_all(&payload))
        });
        let output = child.wait_with_output()?;
        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) if e.kind() == ErrorKind::BrokenPipe => {
                    log::debug!("analyzer '{}' closed stdin early", self.program);
                }
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => return Err(AnalysisError::WorkerLost),
            }
        }
        if !output.status.success() {
            return Err(AnalysisError::Status(output.status));
        }
        parse_report(&output.stdout)
    }
}
