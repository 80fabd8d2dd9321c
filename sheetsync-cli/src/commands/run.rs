//! `sheetsync run` — read JSONL messages and flush them per stream.
//!
//! Buffering lives here, not in the engine: records accumulate per stream and
//! a batch is flushed when a buffer reaches `max_batch_size` and again at end
//! of input. The last STATE message is echoed to stdout once every batch has
//! been acknowledged.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;

use sheetsync_client::{GraphTransport, Transport};
use sheetsync_core::{Batch, StreamName, SyncConfig};
use sheetsync_engine::{BatchState, FlushReport, StreamSink};

use crate::messages::Message;

/// Arguments for `sheetsync run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Path to the JSON target config.
    #[arg(long)]
    pub config: PathBuf,

    /// JSONL message file (reads stdin when omitted).
    #[arg(long)]
    pub input: Option<PathBuf>,
}

impl RunArgs {
    pub fn run(self) -> Result<()> {
        let config = SyncConfig::load(&self.config)
            .with_context(|| format!("loading config from {}", self.config.display()))?;
        let transport = GraphTransport::from_config(&config);
        let sink = StreamSink::new(transport, config.max_batch_size);

        let reader: Box<dyn BufRead> = match &self.input {
            Some(path) => Box::new(BufReader::new(
                File::open(path).with_context(|| format!("opening input {}", path.display()))?,
            )),
            None => Box::new(BufReader::new(io::stdin())),
        };

        let summary = process_messages(&sink, &config, reader)?;
        for report in &summary.reports {
            print_report(report);
        }
        if summary.reports.is_empty() {
            println!("No records in input; nothing to sync.");
        }

        if summary
            .reports
            .iter()
            .any(|r| r.state == BatchState::Failure)
        {
            bail!("one or more batches were not acknowledged by the workbook");
        }
        if let Some(state) = summary.last_state {
            println!("{state}");
        }
        Ok(())
    }
}

struct RunSummary {
    reports: Vec<FlushReport>,
    last_state: Option<serde_json::Value>,
}

fn process_messages<T: Transport>(
    sink: &StreamSink<T>,
    config: &SyncConfig,
    reader: impl BufRead,
) -> Result<RunSummary> {
    // Streams in order of first appearance, so end-of-input flushes are
    // deterministic.
    let mut order: Vec<String> = Vec::new();
    let mut buffers: HashMap<String, Batch> = HashMap::new();
    let mut keys: HashMap<String, String> = HashMap::new();
    let mut last_state = None;
    let mut reports = Vec::new();

    for (number, line) in reader.lines().enumerate() {
        let line = line.context("reading input")?;
        if line.trim().is_empty() {
            continue;
        }
        let message: Message = serde_json::from_str(&line)
            .with_context(|| format!("malformed message on line {}", number + 1))?;

        match message {
            Message::Schema {
                stream,
                key_properties,
            } => {
                if key_properties.len() > 1 {
                    bail!(
                        "stream '{stream}' declares a composite key {key_properties:?}; \
                         only single-field keys are supported"
                    );
                }
                if let Some(key) = key_properties.into_iter().next() {
                    keys.insert(stream, key);
                }
            }
            Message::Record { stream, record } => {
                if !buffers.contains_key(&stream) {
                    sink.start_batch(&StreamName::from(stream.as_str()))
                        .with_context(|| format!("start_batch failed for stream '{stream}'"))?;
                    order.push(stream.clone());
                }
                let buffer = buffers.entry(stream.clone()).or_default();
                buffer.push(record);
                if buffer.len() >= config.max_batch_size {
                    let records = std::mem::take(buffer);
                    reports.push(flush_stream(sink, config, &keys, &stream, records)?);
                }
            }
            Message::State { value } => last_state = Some(value),
        }
    }

    // Flush leftovers in first-seen stream order.
    for stream in &order {
        if let Some(records) = buffers.remove(stream) {
            if !records.is_empty() {
                reports.push(flush_stream(sink, config, &keys, stream, records)?);
            }
        }
    }

    Ok(RunSummary {
        reports,
        last_state,
    })
}

fn flush_stream<T: Transport>(
    sink: &StreamSink<T>,
    config: &SyncConfig,
    keys: &HashMap<String, String>,
    stream: &str,
    records: Batch,
) -> Result<FlushReport> {
    // A SCHEMA-declared key wins over the config's per-stream setting.
    let key = keys
        .get(stream)
        .map(String::as_str)
        .or_else(|| config.primary_key(stream));
    let report = sink
        .flush(&StreamName::from(stream), key, &records)
        .with_context(|| format!("flush failed for stream '{stream}'"))?;
    Ok(report)
}

fn print_report(report: &FlushReport) {
    let at = report.completed_at.to_rfc3339();
    match report.state {
        BatchState::Success => println!(
            "✓ '{}' synced ({} updated, {} appended) at {at}",
            report.stream, report.updated, report.appended
        ),
        BatchState::Failure => println!(
            "✗ '{}' batch not acknowledged ({} updated, {} appended) at {at}",
            report.stream, report.updated, report.appended
        ),
    }
}
