//! `matchbook-cli [--config <file.json>] [<orders.jsonl>]`
//!
//! Reads one `OrderRequest` JSON object per line (stdin when no file is
//! given), runs each through a single book and writes one JSON line per
//! request to stdout. Finishes with the book snapshot and a summary line
//! carrying the trade root. Logs go to stderr, filtered by `RUST_LOG`.

use std::io::Write;
use std::path::PathBuf;

use matchbook_ingress::{BookRunner, TradeLog};
use matchbook_matchcore::{BookSnapshot, MatchOutcome};
use matchbook_types::constants::{DEFAULT_SNAPSHOT_DEPTH, ENGINE_NAME, VERSION};
use matchbook_types::{EngineConfig, MatchbookError, OrderRequest, Result};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    config: Option<PathBuf>,
    orders: Option<PathBuf>,
}

impl Args {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self> {
        let mut parsed = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    let path = args.next().ok_or_else(|| {
                        MatchbookError::Configuration("--config expects a file path".into())
                    })?;
                    parsed.config = Some(PathBuf::from(path));
                }
                flag if flag.starts_with('-') => {
                    return Err(MatchbookError::Configuration(format!(
                        "unknown flag {flag}"
                    )));
                }
                path => {
                    if parsed.orders.replace(PathBuf::from(path)).is_some() {
                        return Err(MatchbookError::Configuration(
                            "only one orders file may be given".into(),
                        ));
                    }
                }
            }
        }
        Ok(parsed)
    }
}

/// One line of output.
#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Report<'a> {
    Outcome {
        line: usize,
        #[serde(flatten)]
        outcome: &'a MatchOutcome,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        sink_errors: Vec<String>,
    },
    Rejected {
        line: usize,
        error: String,
    },
    Snapshot {
        #[serde(flatten)]
        snapshot: &'a BookSnapshot,
    },
    Summary {
        trades: usize,
        volume: u64,
        trade_root: String,
    },
}

fn emit<W: Write>(out: &mut W, report: &Report<'_>) -> Result<()> {
    serde_json::to_writer(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

/// Drive every request in `input` through one book runner.
async fn run<R, W>(config: &EngineConfig, input: R, out: &mut W) -> Result<TradeLog>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let (handle, task) = BookRunner::spawn(config, TradeLog::new());

    let mut lines = input.lines();
    let mut line_no = 0usize;
    while let Some(raw) = lines.next_line().await? {
        line_no += 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let result = match serde_json::from_str::<OrderRequest>(line) {
            Ok(request) => handle.submit(request).await,
            Err(e) => Err(MatchbookError::from(e)),
        };
        match result {
            Ok(execution) => {
                if !execution.is_recorded() {
                    tracing::warn!(
                        line = line_no,
                        unrecorded = execution.unrecorded.len(),
                        "Trades not recorded"
                    );
                }
                let sink_errors = execution
                    .unrecorded
                    .iter()
                    .map(|(id, e)| format!("{id}: {e}"))
                    .collect();
                emit(
                    out,
                    &Report::Outcome {
                        line: line_no,
                        outcome: &execution.outcome,
                        sink_errors,
                    },
                )?;
            }
            Err(MatchbookError::EngineStopped) => return Err(MatchbookError::EngineStopped),
            Err(e) => {
                tracing::warn!(line = line_no, error = %e, "Order rejected");
                emit(
                    out,
                    &Report::Rejected {
                        line: line_no,
                        error: e.to_string(),
                    },
                )?;
            }
        }
    }

    let snapshot = handle.snapshot(DEFAULT_SNAPSHOT_DEPTH).await?;
    drop(handle);
    let (_, log) = task
        .await
        .map_err(|e| MatchbookError::Internal(format!("book runner failed: {e}")))?;

    emit(out, &Report::Snapshot { snapshot: &snapshot })?;
    emit(
        out,
        &Report::Summary {
            trades: log.len(),
            volume: log.volume(),
            trade_root: log.root_hex(),
        },
    )?;
    Ok(log)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args = Args::parse(std::env::args().skip(1))?;
    let config = match &args.config {
        Some(path) => EngineConfig::from_file(path)?,
        None => EngineConfig::default(),
    };
    tracing::info!(
        engine = ENGINE_NAME,
        version = VERSION,
        market = %config.market.symbol(),
        threshold = config.fill_policy.unfilled_threshold,
        "Starting"
    );

    let mut out = std::io::stdout();
    let log = match &args.orders {
        Some(path) => {
            let file = tokio::fs::File::open(path).await?;
            run(&config, BufReader::new(file), &mut out).await?
        }
        None => run(&config, BufReader::new(tokio::io::stdin()), &mut out).await?,
    };

    tracing::info!(trades = log.len(), trade_root = %log.root_hex(), "Done");
    Ok(())
}
