use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;
use std::time::Instant;

/// Crates with public API docs; xtask itself is not documented.
const DOC_CRATES: &[&str] = &["platform", "srlv", "playback"];

pub fn run(open: bool, private: bool) -> Result<()> {
    println!();
    println!("{}", "📚 Building documentation...".cyan().bold());
    println!();

    let start = Instant::now();

    let mut cmd = Command::new("cargo");
    cmd.arg("doc").arg("--no-deps").arg("--all-features");
    for krate in DOC_CRATES {
        cmd.args(["-p", krate]);
    }
    if private {
        cmd.arg("--document-private-items");
    }
    if open {
        cmd.arg("--open");
    }

    let output = cmd.output().context("Failed to build documentation")?;

    if !output.status.success() {
        eprintln!("{}", "✗ Documentation build failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        anyhow::bail!("Documentation build failed");
    }

    println!(
        "{}",
        format!(
            "✓ Documentation for {} crates built in {:.2}s",
            DOC_CRATES.len(),
            start.elapsed().as_secs_f64()
        )
        .green()
    );

    if !open {
        println!();
        println!(
            "   {}",
            "Open target/doc/playback/index.html in your browser".dimmed()
        );
        println!("   {}", "Or run 'cargo xtask doc --open'".dimmed());
    }

    println!();

    Ok(())
}
