use std::process::Command;

fn neon_arcade(args: &[&str]) -> String {
    let output = Command::new(env!("CARGO_BIN_EXE_neon-arcade"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to launch the neon-arcade binary");
    assert!(
        output.status.success(),
        "neon-arcade {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is utf-8")
}

#[test]
fn defense_session_prints_banner_hud_and_layout() {
    let stdout = neon_arcade(&["--seed", "3", "defense", "--frames", "600", "--export-layout"]);
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("Welcome to the Neon Arcade."));
    assert!(lines.next().is_some_and(|hud| hud.starts_with("wave 1 |")));
    assert!(lines.next().is_some_and(|layout| layout.starts_with("gridlock:v1:20x15:")));
}

#[test]
fn survivor_session_reports_progress() {
    let stdout = neon_arcade(&["survivor", "--frames", "300"]);
    assert!(stdout.starts_with("Welcome to the Neon Arcade.\n"));
    assert!(stdout.contains("| frame 300"));
}

#[test]
fn malformed_configuration_is_reported() {
    let path = std::env::temp_dir().join(format!("neon-arcade-bad-{}.toml", std::process::id()));
    std::fs::write(&path, "[survivor]\nfriction = 2.0\n").expect("write config");
    let output = Command::new(env!("CARGO_BIN_EXE_neon-arcade"))
        .arg("--config")
        .arg(&path)
        .args(["survivor", "--frames", "1"])
        .output()
        .expect("failed to launch the neon-arcade binary");
    std::fs::remove_file(&path).expect("cleanup");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("friction"));
}
