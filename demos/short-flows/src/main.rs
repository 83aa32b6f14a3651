//! short-flows: fat-tree short-flow workload with link telemetry.
//!
//! Builds a fat-tree, promotes part of the connection matrix to long-lived
//! flows, runs the short-flow arrival process against a bookkeeping
//! transport and writes the per-layer and overall `.data` reports.
//!
//! ```text
//! short-flows --config run.json --out output/short-flows --seed 3
//! RUST_LOG=ft_traffic=debug short-flows --sim-time 5
//! ```

mod matrix;

use std::fs;
use std::io::{self, Cursor, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ft_core::{ExperimentConfig, FatTreeDims, Layer, SocketKind, TrafficPattern};
use ft_output::{DataFileWriter, ReportObserver};
use ft_sim::{ExperimentBuilder, LedgerTransport};
use ft_traffic::{load_connections_csv, load_connections_reader};

use matrix::CONNECTIONS_CSV;

/// Command-line arguments.  Flags override the JSON configuration.
#[derive(Parser)]
#[command(about = "Fat-tree short-flow workload with link telemetry")]
struct Cli {
    /// JSON experiment configuration; missing fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// `source,destination` CSV; the embedded 16-host matrix otherwise.
    #[arg(long)]
    connections: Option<PathBuf>,

    /// Directory the reports are written to.
    #[arg(long, default_value = "output/short-flows")]
    out: PathBuf,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, default_value = "info")]
    log: String,

    #[arg(long)]
    seed: Option<u64>,

    /// Switch radix K.
    #[arg(long)]
    radix: Option<u32>,

    /// Simulation horizon in seconds.
    #[arg(long)]
    sim_time: Option<u64>,

    /// Short-flow arrival rate per second.
    #[arg(long)]
    lambda: Option<f64>,

    #[arg(long)]
    socket: Option<SocketKind>,

    #[arg(long)]
    traffic_matrix: Option<TrafficPattern>,

    #[arg(long)]
    short_flow_matrix: Option<TrafficPattern>,

    /// Share of the matrix carrying long-lived flows, in percent.
    #[arg(long)]
    large_flow_percent: Option<u32>,

    /// Under-provision the queues of this layer.
    #[arg(long)]
    hotspot_layer: Option<Layer>,

    #[arg(long)]
    instance: Option<String>,
}

impl Cli {
    fn apply(&self, config: &mut ExperimentConfig) {
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(radix) = self.radix {
            config.radix = radix;
        }
        if let Some(secs) = self.sim_time {
            config.sim_time_secs = secs;
        }
        if let Some(lambda) = self.lambda {
            config.arrival.lambda = lambda;
        }
        if let Some(socket) = self.socket {
            config.socket = socket;
        }
        if let Some(tm) = self.traffic_matrix {
            config.traffic_matrix = tm;
        }
        if let Some(tm) = self.short_flow_matrix {
            config.short_flow_matrix = tm;
        }
        if let Some(percent) = self.large_flow_percent {
            config.large_flow_percent = percent;
        }
        if let Some(layer) = self.hotspot_layer {
            config.hotspot.enabled = true;
            config.hotspot.layer = layer;
        }
        if let Some(instance) = &self.instance {
            config.instance = instance.clone();
        }
    }

    fn load_config(&self) -> Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
                serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?
            }
            None => ExperimentConfig::default(),
        };
        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log)))
        .with_target(true)
        .init();

    // 1. Configuration and connection matrix.
    let config = cli.load_config()?;
    let dims = config.dims()?;
    let connections = match &cli.connections {
        Some(path) => load_connections_csv(path, dims.total_host())
            .with_context(|| format!("load {}", path.display()))?,
        None => load_connections_reader(Cursor::new(CONNECTIONS_CSV), dims.total_host())?,
    };
    info!(
        radix = config.radix,
        hosts = dims.total_host(),
        connections = connections.len(),
        socket = config.socket.name(),
        "configuration loaded"
    );

    // 2. Build the experiment.
    let transport = LedgerTransport::new(config.link_rate_bps);
    let mut exp = ExperimentBuilder::new(config, transport).connections(connections).build()?;

    // 3. Set up output.
    fs::create_dir_all(&cli.out).with_context(|| format!("create {}", cli.out.display()))?;
    let writer = report_writer(&cli.out, exp.config(), *exp.dims())?;
    let mut obs = ReportObserver::new(writer);

    // 4. Run.
    let t0 = Instant::now();
    exp.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    // 5. Summary.
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "Simulation complete in {:.3} s", elapsed.as_secs_f64())?;
    writeln!(
        stdout,
        "  flows: {} large, {} short, {} installed",
        exp.promoted().len(),
        exp.short_flows(),
        exp.transport().installed()
    )?;
    if let Some(run) = obs.report() {
        writeln!(stdout, "{:<6} {:>12} {:>12}", "Layer", "Util %", "Loss %")?;
        writeln!(stdout, "{}", "-".repeat(32))?;
        for layer in Layer::ALL {
            let s = run.summary(layer);
            writeln!(stdout, "{:<6} {:>12.4} {:>12.4}", layer.name(), s.mean_utilization, s.mean_loss)?;
        }
    }
    writeln!(stdout)?;
    exp.counters().write_table(&mut stdout)?;

    Ok(())
}

// ── Writers ───────────────────────────────────────────────────────────────────

#[cfg(not(feature = "sqlite"))]
type Writer = DataFileWriter;

#[cfg(feature = "sqlite")]
type Writer = BothWriters<DataFileWriter, ft_output::SqliteWriter>;

#[cfg(not(feature = "sqlite"))]
fn report_writer(out: &Path, config: &ExperimentConfig, dims: FatTreeDims) -> Result<Writer> {
    Ok(DataFileWriter::new(out, config, dims))
}

#[cfg(feature = "sqlite")]
fn report_writer(out: &Path, config: &ExperimentConfig, dims: FatTreeDims) -> Result<Writer> {
    let files = DataFileWriter::new(out, config, dims);
    let db = ft_output::SqliteWriter::new(out)?;
    Ok(BothWriters(files, db))
}

/// Forwards every report to two backends.
#[cfg(feature = "sqlite")]
struct BothWriters<A, B>(A, B);

#[cfg(feature = "sqlite")]
impl<A: ft_output::ReportWriter, B: ft_output::ReportWriter> ft_output::ReportWriter for BothWriters<A, B> {
    fn write_layer(&mut self, report: &ft_output::LayerReport) -> ft_output::OutputResult<()> {
        self.0.write_layer(report)?;
        self.1.write_layer(report)
    }

    fn write_overall(&mut self, record: &ft_output::OverallRecord<'_>) -> ft_output::OutputResult<()> {
        self.0.write_overall(record)?;
        self.1.write_overall(record)
    }

    fn write_locality(&mut self, counters: &ft_traffic::FlowCounters) -> ft_output::OutputResult<()> {
        self.0.write_locality(counters)?;
        self.1.write_locality(counters)
    }

    fn finish(&mut self) -> ft_output::OutputResult<()> {
        self.0.finish()?;
        self.1.finish()
    }
}
