//! Headless runner: loads a saved graph and plays its game.
mod args;

use std::path::Path;

use anyhow::{Context, Result};
use args::Args;
use clap::Parser;
use scene_graph::{InputState, NodeGraph, Session, SessionConfig};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _guard = setup_logging()?;

    let args = Args::parse();
    let mut config = SessionConfig::from_env();
    if let Some(passes) = args.passes {
        config.max_passes = passes;
    }

    let graph = NodeGraph::load(&args.graph)
        .with_context(|| format!("failed to load graph from {}", args.graph.display()))?;
    tracing::info!("loaded {} nodes from {}", graph.len(), args.graph.display());

    let mut session = Session::start(&graph, config)?;
    let input: InputState = args.keys.iter().copied().collect();
    // `run` enforces the pass limit.
    let executed = session.run(std::iter::repeat(input));
    tracing::info!("executed {} passes", executed);

    let report = session.finish();
    println!("game:     {}", report.game);
    println!("passes:   {}", report.passes);
    println!("finished: {}", report.finished);
    if !report.has_run.is_empty() {
        let ids: Vec<String> = report.has_run.iter().map(ToString::to_string).collect();
        println!("has run:  {}", ids.join(", "));
    }
    for (id, value) in report.variables.iter() {
        println!("variable: {} = {}", id, value);
    }
    if let Some(status) = report.last_status {
        println!("status:   {:?}", status);
    }

    Ok(())
}

/// Logs to stderr, or to `SHAPEZ_LOG_DIR/shapez.log` when that is set.
///
/// The returned guard flushes the file writer on drop.
fn setup_logging() -> Result<Option<WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    match std::env::var_os("SHAPEZ_LOG_DIR") {
        Some(dir) => {
            let dir = Path::new(&dir);
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;

            let file_appender = tracing_appender::rolling::never(dir, "shapez.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer)
                .init();

            tracing::info!("Log file: {}/shapez.log", dir.display());
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
            Ok(None)
        }
    }
}
