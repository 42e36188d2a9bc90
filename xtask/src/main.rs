//! Build automation tasks for the sipo-chain project.
//!
//! Run with: `cargo xtask <command>`

use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::process::{Command, ExitCode};

/// The only board the demos target so far.
const PICO1_TARGET: &str = "thumbv6m-none-eabi";

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for sipo-chain", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: host tests, embedded library build, demos, docs
    CheckAll,
    /// Build the library for the Pico 1
    Build {
        /// Compile defmt logging in
        #[arg(long)]
        defmt: bool,
    },
    /// Build a demo
    Demo {
        /// Demo name (e.g., chain_walk)
        name: String,
    },
    /// Build UF2 firmware file for flashing to Pico
    Uf2 {
        /// Demo name (e.g., chain_walk)
        name: String,
    },
}

const DEMOS: [&str; 1] = ["chain_walk"];

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::CheckAll => check_all(),
        Commands::Build { defmt } => build_lib(defmt),
        Commands::Demo { name } => build_demo(&name),
        Commands::Uf2 { name } => build_uf2(&name),
    }
}

fn check_all() -> ExitCode {
    let workspace_root = workspace_root();

    println!("{}", "==> Running host tests...".cyan());
    let host_target = host_target();
    match host_target.as_deref() {
        Some(target) => {
            println!(
                "  {}",
                format!("Using host target: {target}").bright_black()
            );
        }
        None => {
            println!(
                "{}",
                "  Unable to detect host target; relying on cargo default.".bright_black()
            );
        }
    }

    let mut test_cmd = Command::new("cargo");
    test_cmd
        .current_dir(&workspace_root)
        .args(["test", "-p", "sipo-chain"]);
    if let Some(target) = &host_target {
        test_cmd.arg("--target").arg(target);
    }
    if !run_command(&mut test_cmd) {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> Building library (no logging)...".cyan());
    if !run_command(Command::new("cargo").current_dir(&workspace_root).args([
        "build",
        "--lib",
        "--target",
        PICO1_TARGET,
    ])) {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> Building library (defmt)...".cyan());
    if !run_command(Command::new("cargo").current_dir(&workspace_root).args([
        "build",
        "--lib",
        "--target",
        PICO1_TARGET,
        "--features",
        "defmt",
    ])) {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> Building demos (pico1)...".cyan());
    for demo in &DEMOS {
        println!("  {}", format!("- {demo}").bright_black());
        if !run_command(Command::new("cargo").current_dir(&workspace_root).args([
            "build",
            "--bin",
            demo,
            "--target",
            PICO1_TARGET,
            "--features",
            "pico1",
        ])) {
            return ExitCode::FAILURE;
        }
    }

    println!("\n{}", "==> Building documentation...".cyan());
    if !run_command(Command::new("cargo").current_dir(&workspace_root).args([
        "doc",
        "-p",
        "sipo-chain",
        "--target",
        PICO1_TARGET,
        "--no-deps",
        "--features",
        "defmt",
    ])) {
        return ExitCode::FAILURE;
    }

    println!("\n{}", "==> All checks passed! 🎉".green().bold());
    ExitCode::SUCCESS
}

fn build_lib(defmt: bool) -> ExitCode {
    let workspace_root = workspace_root();
    let mut cmd = Command::new("cargo");
    cmd.current_dir(&workspace_root)
        .args(["build", "--lib", "--target", PICO1_TARGET]);
    if defmt {
        cmd.args(["--features", "defmt"]);
    }
    println!(
        "{}",
        format!("Building library (defmt: {defmt}) for {PICO1_TARGET}").cyan()
    );

    if run_command(&mut cmd) {
        println!("{}", "Build successful! ✨".green());
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn build_demo(name: &str) -> ExitCode {
    let workspace_root = workspace_root();
    println!("{}", format!("Building demo '{name}'").cyan());

    if run_command(Command::new("cargo").current_dir(&workspace_root).args([
        "build",
        "--bin",
        name,
        "--target",
        PICO1_TARGET,
        "--features",
        "pico1",
    ])) {
        println!("{}", "Build successful! ✨".green());
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn build_uf2(name: &str) -> ExitCode {
    let workspace_root = workspace_root();

    println!("{}", format!("Building UF2 for demo '{name}'").cyan());
    println!("  Target: {}", PICO1_TARGET.bright_black());

    // Build in release mode for UF2
    if !run_command(Command::new("cargo").current_dir(&workspace_root).args([
        "build",
        "--bin",
        name,
        "--release",
        "--target",
        PICO1_TARGET,
        "--features",
        "pico1",
    ])) {
        return ExitCode::FAILURE;
    }

    // Convert to UF2 using elf2uf2-rs
    let elf_path = format!("target/{PICO1_TARGET}/release/{name}");
    let uf2_path = format!("{name}.uf2");

    println!("\n{}", "Converting to UF2 format...".cyan());

    if run_command(
        Command::new("elf2uf2-rs")
            .current_dir(&workspace_root)
            .args([&elf_path, &uf2_path]),
    ) {
        println!("{}", format!("UF2 created: {uf2_path} 🚀").green().bold());
        println!("{}", "Ready to drag-and-drop to your Pico!".bright_black());
        ExitCode::SUCCESS
    } else {
        println!(
            "{}",
            "Note: Install elf2uf2-rs with: cargo install elf2uf2-rs".yellow()
        );
        ExitCode::FAILURE
    }
}

fn workspace_root() -> std::path::PathBuf {
    // `cargo xtask` runs from the workspace root via the alias in .cargo/config.toml
    std::env::current_dir().expect("Failed to get current directory")
}

fn host_target() -> Option<String> {
    let output = Command::new("rustc").arg("-vV").output().ok()?;
    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    for line in stdout.lines() {
        if let Some(host) = line.strip_prefix("host: ") {
            return Some(host.trim().to_string());
        }
    }
    None
}

fn run_command(cmd: &mut Command) -> bool {
    match cmd.status() {
        Ok(status) => status.success(),
        Err(e) => {
            eprintln!("{}", format!("Failed to execute command: {e}").red());
            false
        }
    }
}
