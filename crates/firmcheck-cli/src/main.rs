use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use firmcheck_core::checks::{AnalysisInput, CheckId, CheckStatus, analyze};
use firmcheck_core::config::EngineConfig;
use firmcheck_core::health::compute_health;
use firmcheck_core::inspect;
use firmcheck_core::project::Project;
use firmcheck_core::project::examples::example;
use firmcheck_core::project::read::read_project;
use firmcheck_core::remediation::{FixTarget, build_fix_prompt, fix_prompts};
use firmcheck_core::report::{model::ToolInfo, render};
use firmcheck_core::sequencer::Sequencer;
use firmcheck_core::simulator::{Simulator, waveform};

mod args;

use args::{Cli, Command, EngineArgs, OutputFormat};

/// Logs go to stderr so stdout stays clean for reports.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "firmcheck=info,firmcheck_core=info".into()),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();
    tracing::debug!(command = ?cli.command, "starting");

    let code = match cli.command {
        Command::Check {
            project,
            format,
            out,
            commit,
        } => check(&project, format, out.as_deref(), commit)?,
        Command::Verify { project, engine } => verify(&project, &engine).await?,
        Command::Simulate {
            project,
            ticks,
            engine,
        } => simulate(&project, ticks, &engine).await?,
        Command::FixPrompt { project, check } => fix_prompt(&project, check.as_deref())?,
        Command::Example { name } => {
            let project = example(&name)?;
            println!("{}", serde_json::to_string_pretty(&project)?);
            0
        }
    };

    std::process::exit(code);
}

fn check(
    path: &Path,
    format: OutputFormat,
    out: Option<&Path>,
    commit: Option<String>,
) -> Result<i32> {
    let tool = ToolInfo {
        name: firmcheck_core::TOOL_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit,
    };

    let report = inspect(path, tool)?;

    let output = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        OutputFormat::Text => render::render_text(&report),
    };

    match out {
        Some(path) => std::fs::write(path, &output)
            .with_context(|| format!("writing report to {}", path.display()))?,
        None => print!("{output}"),
    }

    Ok(report.summary.exit_code)
}

fn load_project(path: &Path) -> Result<Project> {
    let file = read_project(path).with_context(|| format!("loading project {}", path.display()))?;
    Ok(file.project)
}

fn engine_config(args: &EngineArgs) -> Result<EngineConfig> {
    let config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    Ok(match args.seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    })
}

async fn verify(path: &Path, engine: &EngineArgs) -> Result<i32> {
    let project = load_project(path)?;
    let config = engine_config(engine)?;
    let sequencer = Sequencer::new(config.sequencer)?;

    let mut rx = sequencer.subscribe();
    let mut printed = rx.borrow_and_update().log.pushed();
    sequencer.start(&project);

    loop {
        {
            let snapshot = rx.borrow_and_update();
            for line in snapshot.log.since(printed) {
                println!("{line}");
            }
            printed = snapshot.log.pushed();
            if !snapshot.is_running() {
                return Ok(snapshot.summary().exit_code);
            }
        }
        rx.changed()
            .await
            .context("verification stopped unexpectedly")?;
    }
}

async fn simulate(path: &Path, ticks: u32, engine: &EngineArgs) -> Result<i32> {
    let project = load_project(path)?;
    let config = engine_config(engine)?;
    let simulator = Simulator::new(config.simulator)?;

    let mut rx = simulator.subscribe();
    simulator.start(&project);
    rx.wait_for(|s| s.tick >= u64::from(ticks))
        .await
        .context("simulation stopped unexpectedly")?;
    let load = simulator.snapshot().cpu_load_percent();
    simulator.stop();

    let snapshot = simulator.snapshot();
    for line in snapshot.log.entries() {
        println!("{line}");
    }
    println!("Pins:");
    for (pin, state) in &snapshot.pin_states {
        println!("  {pin}: {state}");
    }
    println!("CPU load: {load:.1}%");
    println!("Waveform: {}", waveform::svg_path(&snapshot.waveform()));
    Ok(0)
}

fn fix_prompt(path: &Path, only: Option<&str>) -> Result<i32> {
    let project = load_project(path)?;
    let results = analyze(&AnalysisInput::from_project(&project));

    if let Some(raw) = only {
        let Some(id) = CheckId::parse(raw) else {
            bail!("unknown check id `{raw}`");
        };
        let Some(result) = results.iter().find(|r| r.id == id) else {
            bail!("check `{id}` did not run");
        };
        if result.status != CheckStatus::Fail {
            println!("{id} is {}, nothing to fix.", result.status.tag());
            return Ok(0);
        }
        println!("{}", build_fix_prompt(FixTarget::Check(result)));
        return Ok(0);
    }

    let health = compute_health(&project);
    for fix in fix_prompts(&results, &health) {
        println!("{}", fix.prompt);
    }
    Ok(0)
}
