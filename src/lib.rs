// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod instance;
pub mod logging;
pub mod plan;
pub mod registry;
pub mod report;
pub mod templates;
pub mod types;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cli::{CliArgs, Command, ConfigArgs, ProcessArgs, RunArgs, SessionArgs, TemplatesArgs};
use crate::config::loader::default_config_path;
use crate::config::validate::validate_config;
use crate::config::{load_or_init, save, Config};
use crate::engine::{
    NoOutputPrompt, Orchestrator, OrchestratorOptions, OutputPrompt, StdinOutputPrompt, TaskEvent,
};
use crate::errors::BatchError;
use crate::exec::{RealToolRunner, DEFAULT_TIMEOUT};
use crate::fs::{FileSystem, RealFileSystem};
use crate::plan::{collect_patterns, load_plan, Plan, DEFAULT_PATTERN_GLOB};
use crate::templates::TemplateCatalog;
use crate::types::{TaskId, TaskState};

/// Report used when the operator accepts the default at the output prompt.
pub const DEFAULT_REPORT_NAME: &str = "result.csv";

/// Subdirectory of the application directory holding scratch scripts.
pub const SCRATCH_DIR_NAME: &str = "scratch";

/// High-level entry point used by `main.rs`.
///
/// Returns `Ok(false)` when the command ran but some task failed.
pub async fn run(args: CliArgs, app_dir: &Path) -> Result<bool> {
    match args.command {
        Command::Config(cmd) => run_config(app_dir, cmd),
        Command::Templates(cmd) => run_templates(app_dir, cmd),
        Command::Run(cmd) => run_plan(app_dir, cmd).await,
        Command::Process(cmd) => run_process(app_dir, cmd).await,
    }
}

/// Figure out the application directory.
///
/// - An explicit `--app-dir` wins.
/// - Otherwise the directory containing the executable.
/// - If that cannot be determined, the current working directory.
pub fn resolve_app_dir(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Settings plus template catalog, loaded once per invocation.
struct Session {
    config: Config,
    catalog: TemplateCatalog,
}

fn open_session(app_dir: &Path) -> Result<Session> {
    let config = load_or_init(default_config_path(app_dir))?;

    let inp_dir = config.inp_dir(app_dir);
    if !inp_dir.exists() {
        info!(dir = %inp_dir.display(), "creating template directory");
        std::fs::create_dir_all(&inp_dir)?;
    }
    let catalog = TemplateCatalog::scan(&RealFileSystem, &inp_dir)?;

    Ok(Session { config, catalog })
}

fn build_orchestrator(app_dir: &Path, config: Config, session: &SessionArgs) -> Orchestrator {
    let options = OrchestratorOptions {
        timeout: session
            .timeout
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT),
        scratch_dir: app_dir.join(SCRATCH_DIR_NAME),
    };
    Orchestrator::new(
        config,
        Arc::new(RealFileSystem),
        Box::new(RealToolRunner),
        options,
    )
}

fn output_prompt(app_dir: &Path, session: &SessionArgs) -> Box<dyn OutputPrompt> {
    if session.no_prompt {
        Box::new(NoOutputPrompt)
    } else {
        Box::new(StdinOutputPrompt::new(app_dir.join(DEFAULT_REPORT_NAME)))
    }
}

async fn run_plan(app_dir: &Path, cmd: RunArgs) -> Result<bool> {
    let plan = load_plan(&cmd.plan)?;

    if cmd.dry_run {
        print_dry_run(&plan);
        return Ok(true);
    }

    let _guard = instance::acquire(&app_dir.join(instance::PID_FILE_NAME))?;
    let Session { config, catalog } = open_session(app_dir)?;

    let (tx, rx) = mpsc::unbounded_channel();
    let mut orchestrator = build_orchestrator(app_dir, config, &cmd.session).with_events(tx);
    let mut prompt = output_prompt(app_dir, &cmd.session);

    let fs = RealFileSystem;
    let config = orchestrator.config().clone();
    let ids = plan::register(&plan, orchestrator.registry_mut(), &catalog, &config, &fs)?;
    let printer = spawn_status_printer(rx, task_names(&orchestrator, &ids));

    let ok = match cmd.task {
        Some(name) => {
            let id = find_task(&orchestrator, &ids, &name)?;
            let result = orchestrator.process(id, prompt.as_mut()).await;
            drop(orchestrator);
            printer.await?;
            result?;
            true
        }
        None => {
            let summary = orchestrator.process_all(prompt.as_mut()).await;
            drop(orchestrator);
            printer.await?;
            summary.is_success()
        }
    };

    Ok(ok)
}

async fn run_process(app_dir: &Path, cmd: ProcessArgs) -> Result<bool> {
    let _guard = instance::acquire(&app_dir.join(instance::PID_FILE_NAME))?;
    let Session { config, catalog } = open_session(app_dir)?;
    let fs = RealFileSystem;

    let template = catalog.resolve(&cmd.template);
    let program = cmd
        .program
        .clone()
        .unwrap_or_else(|| config.path.tc_location.clone());

    let (tx, rx) = mpsc::unbounded_channel();
    let mut orchestrator = build_orchestrator(app_dir, config, &cmd.session).with_events(tx);
    let mut prompt = output_prompt(app_dir, &cmd.session);

    let id = orchestrator
        .registry_mut()
        .create("adhoc", program, template);
    {
        let task = orchestrator.registry_mut().get_mut(id)?;
        task.add_patterns(cmd.patterns.iter().cloned());
        for dir in &cmd.pattern_dirs {
            if fs.is_dir(dir) {
                task.add_patterns(collect_patterns(&fs, dir, DEFAULT_PATTERN_GLOB)?);
            } else {
                warn!(dir = %dir.display(), "pattern directory is invalid; skipped");
            }
        }
        if let Some(output) = &cmd.output {
            task.set_output(output.clone());
        }
    }

    let printer = spawn_status_printer(rx, task_names(&orchestrator, &[id]));
    let result = orchestrator.process(id, prompt.as_mut()).await;
    drop(orchestrator);
    printer.await?;
    result?;
    Ok(true)
}

fn run_templates(app_dir: &Path, cmd: TemplatesArgs) -> Result<bool> {
    let Session { mut catalog, .. } = open_session(app_dir)?;
    let mut missing = 0usize;
    for path in cmd.imports {
        match catalog.import_file(&RealFileSystem, path) {
            Some(name) => debug!(name = %name, "template imported"),
            None => missing += 1,
        }
    }

    for (name, path) in catalog.iter() {
        println!("{name}\t{}", path.display());
    }
    Ok(missing == 0)
}

fn run_config(app_dir: &Path, cmd: ConfigArgs) -> Result<bool> {
    let path = default_config_path(app_dir);
    let mut config = load_or_init(&path)?;

    if cmd.has_updates() {
        if let Some(tc) = cmd.tc {
            config.path.tc_location = tc;
        }
        if let Some(topas) = cmd.topas {
            config.path.topas_location = topas;
        }
        if let Some(inp_path) = cmd.inp_path {
            config.path.inp_path = inp_path;
        }
        if let Some(theme) = cmd.theme {
            config.appearance.theme = theme;
        }
        validate_config(&config)?;
        save(&path, &config)?;
        info!(path = %path.display(), "settings updated");
    }

    print!("{}", toml::to_string(&config).map_err(BatchError::from)?);
    Ok(true)
}

fn find_task(orchestrator: &Orchestrator, ids: &[TaskId], name: &str) -> Result<TaskId> {
    ids.iter()
        .copied()
        .find(|id| {
            orchestrator
                .registry()
                .get(*id)
                .is_ok_and(|t| t.name == name)
        })
        .ok_or_else(|| BatchError::Config(format!("plan has no task named '{name}'")).into())
}

fn task_names(orchestrator: &Orchestrator, ids: &[TaskId]) -> HashMap<TaskId, String> {
    ids.iter()
        .filter_map(|id| {
            orchestrator
                .registry()
                .get(*id)
                .ok()
                .map(|t| (*id, t.name.clone()))
        })
        .collect()
}

/// Print one pass/fail line per finished task.
///
/// The printer ends when the orchestrator (and with it the sender) is dropped.
fn spawn_status_printer(
    mut rx: mpsc::UnboundedReceiver<TaskEvent>,
    names: HashMap<TaskId, String>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                TaskEvent::StateChanged { task, state } if state.is_terminal() => {
                    let name = names.get(&task).map(String::as_str).unwrap_or("?");
                    let marker = if state == TaskState::Succeeded { "ok" } else { "FAIL" };
                    println!("[{marker}] {task} {name}");
                }
                TaskEvent::StateChanged { .. } => {}
                TaskEvent::BatchFinished(summary) => {
                    println!(
                        "batch: {} completed, {} failed",
                        summary.completed.len(),
                        summary.failure_count()
                    );
                    for failure in &summary.failures {
                        println!("  {} {}: {}", failure.task, failure.name, failure.message);
                    }
                }
            }
        }
    })
}

/// Simple dry-run output: print tasks, templates and patterns.
fn print_dry_run(plan: &Plan) {
    println!("xrdbatch dry-run");
    println!("  plan dir = {}", plan.base_dir.display());
    println!();

    println!("tasks ({}):", plan.tasks.len());
    for task in &plan.tasks {
        println!("  - {}", task.name);
        println!("      template: {}", task.template);
        if let Some(ref program) = task.program {
            println!("      program: {}", program.display());
        }
        if !task.patterns.is_empty() {
            println!("      patterns: {:?}", task.patterns);
        }
        if !task.pattern_dirs.is_empty() {
            println!("      pattern_dirs: {:?} ({})", task.pattern_dirs, task.pattern_glob);
        }
        match task.output {
            Some(ref output) => println!("      output: {}", output.display()),
            None => println!("      output: <prompt>"),
        }
    }

    debug!("dry-run complete (no execution)");
}
