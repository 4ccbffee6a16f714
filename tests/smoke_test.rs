/// Smoke tests to verify the binary runs without panicking
use std::process::Command;

fn flightglobe() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_flightglobe"));
    // keep a user's settings file out of the picture
    cmd.env("XDG_CONFIG_HOME", env!("CARGO_TARGET_TMPDIR"));
    cmd.env("HOME", env!("CARGO_TARGET_TMPDIR"));
    cmd
}

#[test]
fn binary_shows_help() {
    let output = flightglobe()
        .arg("--help")
        .output()
        .expect("Failed to execute flightglobe");

    assert!(
        output.status.success(),
        "Binary failed to run --help: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("flightglobe"), "Help output should mention flightglobe");
    assert!(stdout.contains("params"));
}

#[test]
fn binary_shows_version() {
    let output = flightglobe()
        .arg("--version")
        .output()
        .expect("Failed to execute flightglobe");

    assert!(
        output.status.success(),
        "Binary failed to run --version: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn invalid_subcommand_fails_gracefully() {
    let output = flightglobe()
        .arg("nonexistent-command")
        .output()
        .expect("Failed to execute flightglobe");

    assert!(
        !output.status.success(),
        "Invalid subcommand should return error status"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains("panicked at"),
        "Invalid subcommand should not cause panic"
    );
}

#[test]
fn params_prints_render_json() {
    let output = flightglobe()
        .args(["params", "--seed", "4", "--set", "num_rings=2"])
        .output()
        .expect("Failed to execute flightglobe");

    assert!(
        output.status.success(),
        "params failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("params output should be JSON");
    assert_eq!(json["config"]["num_rings"], 2);
    let period = json["animation"]["ring_repeat_period"].as_f64().unwrap_or_default();
    assert!((period - 900.0).abs() < 1e-6);
    assert_eq!(json["animation"]["points_merge"], true);
    assert_eq!(json["outline"]["show_atmosphere"], true);
    assert!(json["animation"]["arcs"].as_array().is_some_and(|a| !a.is_empty()));
    assert_eq!(json["material"]["color"], "#3b42ec");
}

#[test]
fn params_rejects_malformed_override() {
    let output = flightglobe()
        .args(["params", "--set", "num_rings"])
        .output()
        .expect("Failed to execute flightglobe");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("panicked at"));
}
