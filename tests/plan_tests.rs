// tests/plan_tests.rs

use std::path::{Path, PathBuf};

use xrdbatch::config::Config;
use xrdbatch::fs::RealFileSystem;
use xrdbatch::plan::{self, load_plan};
use xrdbatch::registry::TaskRegistry;
use xrdbatch::templates::TemplateCatalog;
use xrdbatch::types::TaskState;
use xrdbatch_test_utils::init_tracing;

fn demos_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("demos")
}

#[test]
fn demo_plan_loads_with_defaults_applied() {
    init_tracing();
    let plan = load_plan(demos_dir().join("plan.toml")).unwrap();

    assert_eq!(plan.base_dir, demos_dir());
    let names: Vec<&str> = plan.tasks.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["quartz", "quartz-rerun"]);

    let quartz = &plan.tasks[0];
    assert_eq!(quartz.output, Some(demos_dir().join("results.csv")));
    assert_eq!(quartz.pattern_dirs, vec![demos_dir().join("data")]);

    let rerun = &plan.tasks[1];
    assert_eq!(rerun.output, Some(demos_dir().join("rerun.csv")));
    assert_eq!(rerun.patterns.len(), 2);
}

#[test]
fn demo_plan_registers_tasks_from_directory_and_list() {
    init_tracing();
    let plan = load_plan(demos_dir().join("plan.toml")).unwrap();
    let config = Config::default();
    let catalog = TemplateCatalog::new();
    let mut registry = TaskRegistry::new();

    let ids = plan::register(&plan, &mut registry, &catalog, &config, &RealFileSystem).unwrap();
    assert_eq!(ids.len(), 2);

    let quartz = registry.get(ids[0]).unwrap();
    assert_eq!(quartz.template, demos_dir().join("quartz.inp"));
    assert_eq!(quartz.program, config.path.tc_location);
    assert_eq!(
        quartz.patterns(),
        &[demos_dir().join("data/S1.raw"), demos_dir().join("data/S2.raw")]
    );
    assert_eq!(quartz.state(), TaskState::Ready);

    let rerun = registry.get(ids[1]).unwrap();
    assert_eq!(
        rerun.patterns(),
        &[demos_dir().join("data/S2.raw"), demos_dir().join("more/S3.raw")]
    );
}

#[test]
fn catalog_name_wins_over_plan_relative_path() {
    init_tracing();
    let plan = load_plan(demos_dir().join("plan.toml")).unwrap();
    let mut catalog = TemplateCatalog::new();
    catalog.import("/app/INP/quartz.inp");
    let mut registry = TaskRegistry::new();

    let ids = plan::register(
        &plan,
        &mut registry,
        &catalog,
        &Config::default(),
        &RealFileSystem,
    )
    .unwrap();

    assert_eq!(
        registry.get(ids[0]).unwrap().template,
        PathBuf::from("/app/INP/quartz.inp")
    );
}

#[test]
fn missing_pattern_directory_is_skipped() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let plan_path = dir.path().join("plan.toml");
    std::fs::write(
        &plan_path,
        "[task.a]\ntemplate = \"a.inp\"\npattern_dirs = [\"nope\"]\noutput = \"a.csv\"\n",
    )
    .unwrap();

    let plan = load_plan(&plan_path).unwrap();
    let mut registry = TaskRegistry::new();
    let ids = plan::register(
        &plan,
        &mut registry,
        &TemplateCatalog::new(),
        &Config::default(),
        &RealFileSystem,
    )
    .unwrap();

    assert!(registry.get(ids[0]).unwrap().patterns().is_empty());
}
