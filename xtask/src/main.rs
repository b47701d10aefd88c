use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for trigon")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks: shader lint, fmt, clippy, tests
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates with warnings denied
    Clippy,
    /// Run all tests
    Test,
    /// Static sanity checks on the bundled GLSL sources
    Shaders {
        #[arg(long, default_value = "assets/shaders")]
        dir: PathBuf,
    },
    /// Launch the desktop demo, forwarding any extra arguments
    Run {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

fn main() -> Result<()> {
    match Cli::parse().command {
        Commands::Check => {
            lint_shaders(Path::new("assets/shaders"))?;
            cargo("fmt", &["fmt", "--all", "--", "--check"])?;
            cargo("clippy", &clippy_args())?;
            cargo("test", &["test", "--workspace"])?;
        }
        Commands::Fmt => cargo("fmt", &["fmt", "--all", "--", "--check"])?,
        Commands::Clippy => cargo("clippy", &clippy_args())?,
        Commands::Test => cargo("test", &["test", "--workspace"])?,
        Commands::Shaders { dir } => lint_shaders(&dir)?,
        Commands::Run { args } => {
            let mut full = vec!["run", "-p", "trigon-desktop", "--"];
            full.extend(args.iter().map(String::as_str));
            cargo("run", &full)?;
        }
    }
    Ok(())
}

fn clippy_args() -> [&'static str; 6] {
    ["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"]
}

fn cargo(step: &str, args: &[&str]) -> Result<()> {
    println!("==> cargo {}", args.join(" "));
    let status = Command::new("cargo")
        .args(args)
        .status()
        .with_context(|| format!("failed to spawn cargo for {step}"))?;
    if !status.success() {
        bail!("cargo {step} failed");
    }
    Ok(())
}

/// Uniforms the renderer uploads, and the stage that must declare each.
const REQUIRED_UNIFORMS: &[(&str, &str)] = &[
    ("triangle.vert", "u_model"),
    ("triangle.vert", "u_view"),
    ("triangle.vert", "u_projection"),
];

fn lint_shaders(dir: &Path) -> Result<()> {
    println!("==> Checking shaders in {}", dir.display());
    let mut problems = Vec::new();
    for name in ["triangle.vert", "triangle.frag"] {
        let path = dir.join(name);
        let source =
            std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        problems.extend(lint_source(name, &source));
    }
    if !problems.is_empty() {
        for problem in &problems {
            eprintln!("  {problem}");
        }
        bail!("{} shader problem(s)", problems.len());
    }
    Ok(())
}

fn lint_source(name: &str, source: &str) -> Vec<String> {
    let mut problems = Vec::new();
    let first = source.lines().map(str::trim).find(|line| !line.is_empty());
    if first != Some("#version 330 core") {
        problems.push(format!("{name}: first line must be `#version 330 core`"));
    }
    for (_, uniform) in REQUIRED_UNIFORMS.iter().filter(|(file, _)| *file == name) {
        let declared = source.lines().any(|line| {
            let mut words = line.trim().trim_end_matches(';').split_whitespace();
            words.next() == Some("uniform") && words.nth(1) == Some(*uniform)
        });
        if !declared {
            problems.push(format!("{name}: missing `uniform ... {uniform};`"));
        }
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_shaders_pass() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../assets/shaders");
        lint_shaders(&dir).unwrap();
    }

    #[test]
    fn missing_version_and_uniform_reported() {
        let problems = lint_source("triangle.vert", "uniform mat4 u_model;\nuniform mat4 u_view;\n");
        assert_eq!(problems.len(), 2);
        assert!(problems[0].contains("#version"));
        assert!(problems[1].contains("u_projection"));
    }

    #[test]
    fn fragment_has_no_required_uniforms() {
        assert!(lint_source("triangle.frag", "#version 330 core\nvoid main() {}\n").is_empty());
    }
}
