use anyhow::{Context, Result};
use colored::Colorize;
use std::process::{Command, Output};
use std::time::Instant;

/// Library crates that must build for the device (no_std, no alloc).
const EMBEDDED_CRATES: &[&str] = &["platform", "srlv", "playback"];

const EMBEDDED_TARGET: &str = "thumbv7em-none-eabihf";

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking workspace builds...".cyan().bold());
    println!();

    let total_start = Instant::now();

    // Check 1: codec + player on the device target
    println!(
        "{}",
        format!("  Checking no_std crates ({EMBEDDED_TARGET})...").cyan()
    );
    let start = Instant::now();
    let mut args = vec!["check", "--target", EMBEDDED_TARGET, "--features", "defmt"];
    for krate in EMBEDDED_CRATES {
        args.extend(["-p", krate]);
    }
    let output = cargo(&args).context("Failed to check embedded build")?;
    require(&output, "no_std check")?;
    passed("no_std check", start);

    // Check 2: host build with every optional feature
    println!("{}", "  Checking host build (all features)...".cyan());
    let start = Instant::now();
    let output = cargo(&["check", "--workspace", "--all-targets", "--all-features"])
        .context("Failed to check host build")?;
    require(&output, "Host check")?;
    passed("Host check", start);

    // Check 3: Clippy lints
    println!("{}", "  Running clippy lints...".cyan());
    let start = Instant::now();
    let output = cargo(&["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"])
        .context("Failed to run clippy")?;
    if output.status.success() {
        passed("Clippy", start);
    } else {
        eprintln!("{}", "  ⚠ Clippy warnings found".yellow().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        // Don't fail on clippy warnings, just show them
        println!();
    }

    // Check 4: Format check
    println!("{}", "  Checking code formatting...".cyan());
    let output = cargo(&["fmt", "--all", "--check"]).context("Failed to run cargo fmt")?;
    if output.status.success() {
        println!("{}", "  ✓ Formatting check passed".green());
    } else {
        eprintln!("{}", "  ⚠ Formatting issues found".yellow().bold());
        eprintln!("     Run 'cargo fmt --all' to fix");
    }
    println!();

    println!(
        "{}",
        format!(
            "✓ All checks completed in {:.2}s",
            total_start.elapsed().as_secs_f64()
        )
        .green()
        .bold()
    );
    println!();

    Ok(())
}

fn cargo(args: &[&str]) -> std::io::Result<Output> {
    Command::new("cargo").args(args).output()
}

fn require(output: &Output, what: &str) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    eprintln!("{}", format!("  ✗ {what} failed").red().bold());
    eprintln!();
    eprintln!("{}", String::from_utf8_lossy(&output.stderr));
    anyhow::bail!("{what} failed")
}

fn passed(what: &str, start: Instant) {
    println!(
        "{}",
        format!(
            "  ✓ {what} passed in {:.2}s",
            start.elapsed().as_secs_f64()
        )
        .green()
    );
    println!();
}
