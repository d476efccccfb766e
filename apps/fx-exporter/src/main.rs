use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::thread;
use time::format_description::well_known::Rfc3339;
use tracing::{error, info, warn};

use extender_probe::{
    Catalogue, ExtenderProbe, MemorySink, PrometheusSink, Sentinels, CMDB_EXTENDER_PATH,
    MONITOR_EXTENDER_PATH,
};
use forti_transport::{ApiClient, HttpApi, MockApi};

mod config;
use config::{load_config_file, ExporterConfig};

#[derive(Parser, Debug)]
#[command(
    name = "fx-exporter",
    version,
    about = "FortiExtender metrics exporter",
    disable_help_subcommand = true
)]
struct Cli {
    /// YAML config file; flags below override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// FortiGate base URL
    #[arg(long, global = true)]
    target: Option<String>,
    /// Environment variable holding the API token
    #[arg(long, global = true)]
    token_env: Option<String>,
    /// Accept self-signed certificates
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    insecure: bool,
    /// Metric name prefix
    #[arg(long, global = true)]
    namespace: Option<String>,
    /// VDOM scope passed to the API
    #[arg(long, global = true)]
    vdom: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run one poll cycle and print the text exposition
    Probe {
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Poll repeatedly, rewriting a textfile-collector file each cycle
    Watch {
        #[arg(long)]
        out: PathBuf,
        /// Seconds between cycles (default from config)
        #[arg(long)]
        interval_secs: Option<u64>,
        /// Stop after this many cycles
        #[arg(long)]
        count: Option<u64>,
    },
    /// Run one cycle against captured API responses
    Replay {
        /// Captured extender-controller CMDB response
        #[arg(long)]
        cmdb: PathBuf,
        /// Captured extender-controller monitor response
        #[arg(long)]
        monitor: PathBuf,
        /// Print samples as JSON lines instead of the text exposition
        #[arg(long, action = ArgAction::SetTrue)]
        json: bool,
    },
    /// Load the configuration and print it resolved
    ConfigCheck,
}

fn main() -> Result<()> {
    setup_tracing();
    let cli = Cli::parse();
    let cfg = resolve_config(&cli)?;

    match cli.command {
        Commands::Probe { out } => {
            cfg.validate()?;
            let api = HttpApi::open(cfg.api_target()?)?;
            let text = probe_once(&cfg, &api)?;
            match out {
                Some(path) => write_atomic(&path, &text),
                None => {
                    std::io::stdout().write_all(text.as_bytes())?;
                    Ok(())
                }
            }
        }
        Commands::Watch {
            out,
            interval_secs,
            count,
        } => {
            let mut cfg = cfg;
            if let Some(secs) = interval_secs {
                cfg.interval_secs = secs;
            }
            cfg.validate()?;
            watch(&cfg, &out, count)
        }
        Commands::Replay {
            cmdb,
            monitor,
            json,
        } => replay(&cfg, &cmdb, &monitor, json),
        Commands::ConfigCheck => {
            cfg.validate()?;
            println!("{}", serde_json::to_string_pretty(&cfg.redacted())?);
            Ok(())
        }
    }
}

fn setup_tracing() {
    // Best-effort; avoid panics if already set
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn resolve_config(cli: &Cli) -> Result<ExporterConfig> {
    let mut cfg = match &cli.config {
        Some(path) => load_config_file(path)?,
        None => ExporterConfig::default(),
    };
    if let Some(t) = &cli.target {
        cfg.target = t.clone();
    }
    if let Some(var) = &cli.token_env {
        cfg.token = None;
        cfg.token_env = Some(var.clone());
    }
    if cli.insecure {
        cfg.insecure_tls = true;
    }
    if let Some(ns) = &cli.namespace {
        cfg.namespace = ns.clone();
    }
    if let Some(v) = &cli.vdom {
        cfg.vdom = v.clone();
    }
    Ok(cfg)
}

fn build_probe(cfg: &ExporterConfig) -> Result<ExtenderProbe> {
    let catalogue =
        Catalogue::new(&cfg.namespace).with_sentinels(Sentinels::from(&cfg.sentinels));
    Ok(ExtenderProbe::new(catalogue)?.with_vdom(cfg.vdom.clone()))
}

/// One cycle into a fresh registry. A failed fetch still yields the health gauges.
fn probe_once<A: ApiClient>(cfg: &ExporterConfig, api: &A) -> Result<String> {
    let probe = build_probe(cfg)?;
    let mut sink = PrometheusSink::new(&cfg.namespace)?;
    match probe.poll_prometheus(api, &mut sink) {
        Ok(report) => {
            let started = report
                .started_at
                .format(&Rfc3339)
                .unwrap_or_else(|_| report.started_at.to_string());
            info!(started = %started, extenders = report.extenders, "cycle exported");
        }
        Err(e) => warn!(error = %e, "cycle failed; exporting health gauges only"),
    }
    Ok(sink.encode_text()?)
}

fn watch(cfg: &ExporterConfig, out: &Path, count: Option<u64>) -> Result<()> {
    let api = HttpApi::open(cfg.api_target()?)?;
    let interval = cfg.interval();
    info!(fortigate = %cfg.target, out = %out.display(), interval_secs = cfg.interval_secs, "watching");
    let mut cycles = 0u64;
    loop {
        match probe_once(cfg, &api).and_then(|text| write_atomic(out, &text)) {
            Ok(()) => {}
            Err(e) => error!(error = %e, "cycle export failed"),
        }
        cycles += 1;
        if count.is_some_and(|n| cycles >= n) {
            return Ok(());
        }
        thread::sleep(interval);
    }
}

fn replay(cfg: &ExporterConfig, cmdb: &Path, monitor: &Path, json: bool) -> Result<()> {
    cfg.validate_namespace()?;
    let read = |p: &Path| {
        fs::read_to_string(p).with_context(|| format!("reading capture: {}", p.display()))
    };
    let mut api = MockApi::new();
    api.prepare(CMDB_EXTENDER_PATH, &read(cmdb)?)?;
    api.prepare(MONITOR_EXTENDER_PATH, &read(monitor)?)?;

    if !json {
        let probe = build_probe(cfg)?;
        let mut sink = PrometheusSink::new(&cfg.namespace)?;
        probe.poll_prometheus(&api, &mut sink)?;
        print!("{}", sink.encode_text()?);
        return Ok(());
    }

    let probe = build_probe(cfg)?;
    let mut sink = MemorySink::default();
    probe.poll(&api, &mut sink)?;
    for s in &sink.samples {
        let labels: serde_json::Map<String, serde_json::Value> = s
            .labels
            .iter()
            .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
            .collect();
        let line = serde_json::json!({ "name": s.name, "labels": labels, "value": s.value });
        println!("{line}");
    }
    Ok(())
}

/// Write via a sibling temp file and rename, so scrapers never see a partial file.
fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents).with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("renaming onto {}", path.display()))?;
    Ok(())
}
