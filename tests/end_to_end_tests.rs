// tests/end_to_end_tests.rs
//
// Drives the orchestrator against a stand-in refinement tool written as a
// shell script. Kept in its own test binary with a single test so that no
// other test forks while the tool file is being written.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tempfile::tempdir;
use xrdbatch::config::Config;
use xrdbatch::engine::{NoOutputPrompt, Orchestrator, OrchestratorOptions, ProcessOutcome};
use xrdbatch::exec::RealToolRunner;
use xrdbatch::fs::RealFileSystem;
use xrdbatch_test_utils::builders::TEMPLATE;
use xrdbatch_test_utils::init_tracing;

/// Fails unless the script points at a pattern, then writes a fixed result.
const FAKE_TC: &str = r#"#!/bin/sh
grep -q '^xdd "/' "$1" || exit 2
out="${1%.inp}.out"
printf 'r_wp  7.25 gof 1.1\n\tstr\n\t\tphase_name "Quartz"\n\t\tMVW( 60.08, 113.0`, 88.8`_0.4)\n' > "$out"
"#;

fn install_tool(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("tc");
    std::fs::write(&path, FAKE_TC).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

#[tokio::test]
async fn processes_patterns_with_a_real_tool() {
    init_tracing();
    let dir = tempdir().unwrap();
    let root = dir.path();

    let tool = install_tool(root);
    let template = root.join("quartz.inp");
    std::fs::write(&template, TEMPLATE).unwrap();
    for name in ["S1.raw", "S2.raw"] {
        std::fs::write(root.join(name), "10.0 100\n").unwrap();
    }

    let mut config = Config::default();
    config.path.tc_location = tool.clone();
    config.path.topas_location = root.join("topas");

    let scratch = root.join("scratch");
    let mut orch = Orchestrator::new(
        config,
        Arc::new(RealFileSystem),
        Box::new(RealToolRunner),
        OrchestratorOptions {
            timeout: Duration::from_secs(30),
            scratch_dir: scratch.clone(),
        },
    );
    let id = orch.registry_mut().create("quartz", &tool, &template);
    {
        let task = orch.registry_mut().get_mut(id).unwrap();
        task.add_patterns([root.join("S1.raw"), root.join("S2.raw")]);
        task.set_output(root.join("out.csv"));
    }

    let outcome = orch.process(id, &mut NoOutputPrompt).await.unwrap();

    assert_eq!(
        outcome,
        ProcessOutcome::Written {
            output: root.join("out.csv"),
            rows: 2
        }
    );
    assert_eq!(
        std::fs::read_to_string(root.join("out.csv")).unwrap(),
        "id,r_wp,Quartz\r\nS1,7.25,88.8\r\nS2,7.25,88.8\r\n"
    );
    assert_eq!(std::fs::read_dir(&scratch).unwrap().count(), 0);
    assert_eq!(std::fs::read_to_string(&template).unwrap(), TEMPLATE);
}
