//! Development tasks for the scfaccel workspace.
//!
//! Usage: `cargo xtask <command>`

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Development tasks for scfaccel")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate workspace documentation
    Doc {
        /// Open documentation in browser after generation
        #[arg(long)]
        open: bool,
    },
    /// Run all CI checks (fmt, clippy, test, doc)
    Ci,
    /// Run the dense solver benchmarks
    Bench {
        /// Criterion filter passed through to the bench binary
        filter: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Doc { open } => cmd_doc(open),
        Commands::Ci => cmd_ci(),
        Commands::Bench { filter } => cmd_bench(filter.as_deref()),
    }
}

fn project_root() -> Result<PathBuf> {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(Path::to_path_buf)
        .context("xtask manifest has no parent directory")
}

fn cmd_doc(open: bool) -> Result<()> {
    let root = project_root()?;

    println!("📚 Generating documentation...");
    let mut args = vec!["doc", "--workspace", "--no-deps", "--exclude", "xtask"];
    if open {
        args.push("--open");
    }
    run_cargo(&root, &args)?;

    println!("✅ Documentation generated in target/doc");
    Ok(())
}

fn cmd_ci() -> Result<()> {
    let root = project_root()?;

    println!("🔧 Running cargo fmt...");
    run_cargo(&root, &["fmt", "--all", "--", "--check"])?;

    println!("📎 Running cargo clippy...");
    run_cargo(&root, &["clippy", "--workspace", "--", "-D", "warnings"])?;

    println!("🧪 Running cargo test...");
    run_cargo(&root, &["test", "--workspace"])?;

    println!("📚 Checking documentation...");
    run_cargo(&root, &["doc", "--workspace", "--no-deps"])?;

    println!("✅ All CI checks passed!");
    Ok(())
}

fn cmd_bench(filter: Option<&str>) -> Result<()> {
    let root = project_root()?;

    println!("⏱️  Running benchmarks...");
    let mut args = vec!["bench", "-p", "scfaccel-linalg"];
    if let Some(filter) = filter {
        args.extend(["--", filter]);
    }
    run_cargo(&root, &args)
}

fn run_cargo(dir: &Path, args: &[&str]) -> Result<()> {
    let status = Command::new("cargo")
        .args(args)
        .current_dir(dir)
        .status()
        .with_context(|| format!("Failed to run cargo {}", args.join(" ")))?;

    if !status.success() {
        anyhow::bail!("cargo {} failed", args.join(" "));
    }
    Ok(())
}
