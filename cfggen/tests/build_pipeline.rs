// Licensed under the Apache-2.0 license

use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::fs;

use pic32_cfggen::build;

const MANIFEST: &str = r#"
device = "PIC32MX250F128B"

[[setting]]
index = 6
option = "3x Divider"

[[setting]]
index = 26
option = "Debugger is disabled"

[[setting]]
index = 27
option = "JTAG Port Enabled"

[[pin]]
signal = "U2RX"
pin = "RPB11"
direction = "input"

[[pin]]
signal = "U2TX"
pin = "RPB14"
direction = "output"
"#;

#[test]
fn test_build_writes_all_artifacts() {
    let _ = SimpleLogger::new().with_level(LevelFilter::Info).init();
    let dir = tempfile::tempdir().unwrap();
    let manifest_path = dir.path().join("project.toml");
    fs::write(&manifest_path, MANIFEST).unwrap();

    let out_dir = dir.path().join("generated");
    let outputs = build(&manifest_path, &out_dir).unwrap();
    assert_eq!(outputs.warning_count, 0);
    assert_eq!(outputs.conflict_count, 0);

    let header = fs::read_to_string(&outputs.header_path).unwrap();
    assert!(header.contains("#define DEVCFG2_VALUE 0xFFFFFFFA"));
    assert!(header.contains("#define DEVCFG0_VALUE 0xFFFFFFFC"));
    assert!(header.contains("#define U2RXR_VALUE 0x00000003"));
    assert!(header.contains("#define RPB14R_VALUE 0x00000001"));

    let report = fs::read_to_string(&outputs.report_path).unwrap();
    assert!(report.contains("PIC32MX250F128B"));
    assert!(report.contains("U2RX <- RPB11"));

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&outputs.json_path).unwrap()).unwrap();
    assert_eq!(json["registers"]["DEVCFG2"], "0xFFFFFFFA");
    assert_eq!(json["pps"]["RPB14R"], 1);
}

#[test]
fn test_unroutable_assignment_fails_and_writes_nothing() {
    let _ = SimpleLogger::new().with_level(LevelFilter::Info).init();
    let dir = tempfile::tempdir().unwrap();
    let manifest_path = dir.path().join("project.toml");
    // U2RX lives in group 2; RPA0 is a group 1 pin.
    fs::write(
        &manifest_path,
        r#"
[[pin]]
signal = "U2RX"
pin = "RPA0"
direction = "input"
"#,
    )
    .unwrap();

    let out_dir = dir.path().join("generated");
    assert!(build(&manifest_path, &out_dir).is_err());
    assert!(!out_dir.exists());
}

#[test]
fn test_conflicts_are_reported_but_do_not_fail() {
    let _ = SimpleLogger::new().with_level(LevelFilter::Info).init();
    let dir = tempfile::tempdir().unwrap();
    let manifest_path = dir.path().join("project.toml");
    fs::write(
        &manifest_path,
        r#"
[[pin]]
signal = "U1TX"
pin = "RPB3"
direction = "output"

[[pin]]
signal = "SS1"
pin = "RPB3"
direction = "output"
"#,
    )
    .unwrap();

    let out_dir = dir.path().join("generated");
    let outputs = build(&manifest_path, &out_dir).unwrap();
    assert_eq!(outputs.conflict_count, 1);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&outputs.json_path).unwrap()).unwrap();
    assert_eq!(json["conflicts"][0]["pin"], "RPB3");
    assert_eq!(json["conflicts"][0]["signals"][0], "U1TX");
    assert_eq!(json["conflicts"][0]["signals"][1], "SS1");
    // First claim keeps the selector.
    assert_eq!(json["pps"]["RPB3R"], 1);
}

#[test]
fn test_unknown_option_is_a_warning_not_an_error() {
    let _ = SimpleLogger::new().with_level(LevelFilter::Info).init();
    let dir = tempfile::tempdir().unwrap();
    let manifest_path = dir.path().join("project.toml");
    fs::write(
        &manifest_path,
        r#"
[[setting]]
index = 6
option = "7x Divider"
"#,
    )
    .unwrap();

    let out_dir = dir.path().join("generated");
    let outputs = build(&manifest_path, &out_dir).unwrap();
    assert_eq!(outputs.warning_count, 1);

    // The field keeps its erased value.
    let header = fs::read_to_string(&outputs.header_path).unwrap();
    assert!(header.contains("#define DEVCFG2_VALUE 0xFFFFFFFF"));
}
