use anyhow::Context;
use batch::loader::load_batch;
use batch::sample::{build_sample_batch, SampleConfig};
use bridge::server::StubBackend;
use clap::Parser;
use job::config::ExportJob;
use job::runner::Runner;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;

mod batch;
mod bridge;
mod job;

#[derive(Parser)]
#[command(author, version, about = "Offline export driver for the NSV pavement dashboard")]
struct Args {
    /// Load a measurement batch from a JSON file
    #[arg(long)]
    input: Option<PathBuf>,
    /// Points in the generated sample batch (used when no input is given)
    #[arg(long, default_value_t = 100)]
    count: usize,
    /// Seed for the deterministic sample generator
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Run an export job described in YAML
    #[arg(long)]
    job: Option<PathBuf>,
    /// Host the stub backend for the dashboard (Ctrl+C to stop)
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let points = if let Some(path) = &args.input {
        load_batch(path)?
    } else {
        build_sample_batch(&SampleConfig {
            count: args.count,
            seed: args.seed,
            ..Default::default()
        })
    };
    log::info!("loaded batch of {} points", points.len());

    if let Some(job_path) = &args.job {
        let job = ExportJob::load(job_path)?;
        let runner = Runner::new(job);
        let summary = runner.execute(&points)?;
        println!(
            "Export -> {} matched, {} rows x {} columns written to {}",
            summary.matched,
            summary.exported,
            summary.columns,
            summary.output.display()
        );
    }

    if args.serve {
        let backend = StubBackend::new(points);
        backend.publish_status("Stub backend running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
