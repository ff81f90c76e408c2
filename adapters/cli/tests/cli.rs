use std::{fs, process::Command};

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_path-defence"))
}

#[test]
fn json_summary_reports_the_run() {
    let output = cli()
        .args(["--seed", "4", "--json", "--max-ticks", "3000"])
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to launch the path-defence binary");
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout holds a JSON summary");
    assert_eq!(report["map"], "grasslands");
    assert_eq!(report["difficulty"], "normal");
    assert_eq!(report["seed"], 4);
    assert_eq!(report["towers_placed"]["basic"], 1);
    assert!(report["ticks"].as_u64().expect("tick count") <= 3000);
}

#[test]
fn identical_seeds_print_identical_summaries() {
    let run = || {
        cli()
            .args(["--seed", "9", "--json", "--max-ticks", "2000", "--speed", "3"])
            .env("RUST_LOG", "off")
            .output()
            .expect("failed to launch the path-defence binary")
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn unknown_maps_are_reported() {
    let output = cli()
        .args(["--map", "atlantis"])
        .output()
        .expect("failed to launch the path-defence binary");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown map `atlantis`"));
}

#[test]
fn malformed_catalogs_name_the_file() {
    let path = std::env::temp_dir().join(format!("path-defence-bad-{}.toml", std::process::id()));
    fs::write(&path, "[waves]\nspawn_delay_ticks = \"soon\"\n").expect("write temp catalog");

    let output = cli()
        .arg("--catalog")
        .arg(&path)
        .output()
        .expect("failed to launch the path-defence binary");
    let _ = fs::remove_file(&path);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("parsing catalog"));
}

#[test]
fn maps_can_be_listed() {
    let output = cli()
        .arg("--list-maps")
        .output()
        .expect("failed to launch the path-defence binary");
    assert!(output.status.success());
    let listing = String::from_utf8_lossy(&output.stdout);
    for id in ["grasslands", "desert", "forest", "mountains", "swamp", "volcano", "castle"] {
        assert!(listing.contains(id), "missing {id} in {listing}");
    }
}
