// tests/config_tests.rs

use std::fs;
use std::path::PathBuf;

use tempfile::tempdir;
use xrdbatch::config::loader::default_config_path;
use xrdbatch::config::{load_or_init, save, Config};
use xrdbatch::errors::BatchError;

#[test]
fn missing_file_is_created_with_defaults() {
    let dir = tempdir().unwrap();
    let path = default_config_path(dir.path());

    let cfg = load_or_init(&path).unwrap();

    assert_eq!(cfg, Config::default());
    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("[PATH]"));
    assert!(written.contains("[APPEARANCE]"));
    assert!(written.contains("theme = \"clam\""));
}

#[test]
fn missing_section_is_filled_and_persisted() {
    let dir = tempdir().unwrap();
    let path = default_config_path(dir.path());
    fs::write(
        &path,
        "[PATH]\ninp_path = \"scripts\"\ntc_location = \"/opt/topas/tc\"\ntopas_location = \"/opt/topas/topas\"\n",
    )
    .unwrap();

    let cfg = load_or_init(&path).unwrap();

    assert_eq!(cfg.path.inp_path, PathBuf::from("scripts"));
    assert_eq!(cfg.appearance.theme, "clam");
    assert!(fs::read_to_string(&path).unwrap().contains("[APPEARANCE]"));
}

#[test]
fn missing_keys_inside_a_section_take_defaults() {
    let dir = tempdir().unwrap();
    let path = default_config_path(dir.path());
    fs::write(&path, "[PATH]\ntc_location = \"/opt/tc\"\n\n[APPEARANCE]\n").unwrap();

    let cfg = load_or_init(&path).unwrap();

    assert_eq!(cfg.path.tc_location, PathBuf::from("/opt/tc"));
    assert_eq!(cfg.path.inp_path, PathBuf::from("INP"));
    assert_eq!(cfg.appearance.theme, "clam");

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("tc_location = \"/opt/tc\""));
    assert!(written.contains("inp_path = \"INP\""));
    assert!(written.contains("theme = \"clam\""));
}

#[test]
fn empty_sections_are_filled_and_persisted() {
    let dir = tempdir().unwrap();
    let path = default_config_path(dir.path());
    fs::write(&path, "[PATH]\n\n[APPEARANCE]\n").unwrap();

    let cfg = load_or_init(&path).unwrap();

    assert_eq!(cfg, Config::default());
    let written = fs::read_to_string(&path).unwrap();
    assert_ne!(written, "[PATH]\n\n[APPEARANCE]\n");
    assert!(written.contains("inp_path"));
    assert!(written.contains("topas_location"));
    assert!(written.contains("theme = \"clam\""));
}

#[test]
fn complete_file_is_not_rewritten() {
    let dir = tempdir().unwrap();
    let path = default_config_path(dir.path());
    let text = "# local tools\n[PATH]\ninp_path = \"INP\"\ntc_location = \"/opt/tc\"\ntopas_location = \"/opt/topas\"\n\n[APPEARANCE]\ntheme = \"alt\"\n";
    fs::write(&path, text).unwrap();

    load_or_init(&path).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), text);
}

#[test]
fn malformed_file_is_an_error_and_left_alone() {
    let dir = tempdir().unwrap();
    let path = default_config_path(dir.path());
    fs::write(&path, "[PATH\ninp_path = ").unwrap();

    let err = load_or_init(&path).unwrap_err();

    assert!(matches!(err, BatchError::TomlDe(_)), "got {err:?}");
    assert_eq!(fs::read_to_string(&path).unwrap(), "[PATH\ninp_path = ");
}

#[test]
fn saved_settings_round_trip() {
    let dir = tempdir().unwrap();
    let path = default_config_path(dir.path());
    let mut cfg = Config::default();
    cfg.path.tc_location = PathBuf::from("/srv/topas/tc");
    cfg.appearance.theme = "alt".to_string();

    save(&path, &cfg).unwrap();

    assert_eq!(load_or_init(&path).unwrap(), cfg);
}
