use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_launcher-icon-gen"))
}

fn run(args: &[&str], output_dir: &Path) -> Output {
    let output = Command::new(binary_path())
        .args(args)
        .arg("-o")
        .arg(output_dir)
        .output()
        .expect("Failed to run launcher-icon-gen");

    if !output.status.success() {
        eprintln!("stdout: {}", String::from_utf8_lossy(&output.stdout));
        eprintln!("stderr: {}", String::from_utf8_lossy(&output.stderr));
    }
    output
}

/// Runs the generator with no options and checks every density folder.
#[test]
fn test_default_density_table() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let res_dir = temp_dir.path().join("res");

    let output = run(&[], &res_dir);
    assert!(output.status.success(), "launcher-icon-gen failed");

    let expected = [
        ("mipmap-mdpi", 48),
        ("mipmap-hdpi", 72),
        ("mipmap-xhdpi", 96),
        ("mipmap-xxhdpi", 144),
        ("mipmap-xxxhdpi", 192),
    ];

    for (folder, size) in expected {
        let square = image::open(res_dir.join(folder).join("ic_launcher.png"))
            .unwrap_or_else(|e| panic!("{folder}/ic_launcher.png: {e}"))
            .to_rgba8();
        assert_eq!(square.dimensions(), (size, size));
        assert_eq!(square.get_pixel(0, 0)[3], 255);

        let round = image::open(res_dir.join(folder).join("ic_launcher_round.png"))
            .unwrap_or_else(|e| panic!("{folder}/ic_launcher_round.png: {e}"))
            .to_rgba8();
        assert_eq!(round.dimensions(), (size, size));
        assert_eq!(round.get_pixel(0, 0)[3], 0, "{folder} corner should be transparent");
        assert_eq!(round.get_pixel(size / 2, size / 2)[3], 255);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✓ Generated mipmap-xxxhdpi/ic_launcher_round.png"));
    assert!(stdout.contains("Generated launcher icons in:"));
}

#[test]
fn test_custom_sizes_round_only() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let out = temp_dir.path().join("custom");

    let output = run(&["--png", "16,40", "--round-only"], &out);
    assert!(output.status.success());

    for size in [16u32, 40] {
        let round = out.join(format!("{size}x{size}_round.png"));
        assert!(round.is_file(), "{} should exist", round.display());
        assert_eq!(image::open(&round).unwrap().width(), size);
        assert!(!out.join(format!("{size}x{size}.png")).exists());
    }
}

#[test]
fn test_custom_density_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let table = temp_dir.path().join("densities.json");
    std::fs::write(&table, r#"[{ "folder": "mipmap-ldpi", "size": 36 }]"#).unwrap();
    let res_dir = temp_dir.path().join("res");

    let output = run(&["--densities", table.to_str().unwrap(), "--square-only"], &res_dir);
    assert!(output.status.success());

    let icon = res_dir.join("mipmap-ldpi").join("ic_launcher.png");
    assert_eq!(image::open(&icon).unwrap().width(), 36);
    assert!(!res_dir.join("mipmap-ldpi").join("ic_launcher_round.png").exists());
    assert!(!res_dir.join("mipmap-mdpi").exists());
}

#[test]
fn test_conflicting_flags_fail() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output = run(&["--square-only", "--round-only"], temp_dir.path());
    assert!(!output.status.success());
}

#[test]
fn test_zero_size_fails() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output = run(&["--png", "16,0"], temp_dir.path());
    assert!(!output.status.success());
    assert!(!temp_dir.path().join("16x16.png").exists());
    assert!(!temp_dir.path().join("16x16_round.png").exists());
}
