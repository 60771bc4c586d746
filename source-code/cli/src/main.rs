use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::exit;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::*;
use simpleshell_core::{decode_program, Conversion, Converter, Options, Radix};
use tracing_subscriber::EnvFilter;

mod config;
mod presets;
mod ui;

use ui::{report_error, step_info, step_ok};

#[derive(Parser, Debug)]
#[command(name = "simpleshell", author, version, about = "Obfuscate one-call-per-line PHP into chr()-encoded PHP")]
struct Cli {
    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    /// Config file instead of <config dir>/simpleshell/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a script (file, stdin or preset)
    Convert(ConvertArgs),
    /// Replace every chr() chain in generated code by its string literal
    Decode {
        file: Option<PathBuf>,
    },
    /// List the canned scripts, or print one
    Presets {
        preset: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
struct ConvertArgs {
    /// Input script; stdin when absent
    file: Option<PathBuf>,
    /// Use a canned script (index or name) instead of FILE
    #[arg(short, long, conflicts_with = "file")]
    preset: Option<String>,
    /// Write here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Seed for the mixed radix
    #[arg(long)]
    seed: Option<u64>,
    /// decimal, octal or mixed
    #[arg(long)]
    radix: Option<Radix>,
    /// Treat `//` lines as statements
    #[arg(long)]
    keep_comments: bool,
    /// One declaration or call per line
    #[arg(long)]
    newlines: bool,
    /// Print a JSON report instead of raw code
    #[arg(long)]
    json: bool,
}

// ─────────────────────────────────────────────────────────────
// main
// ─────────────────────────────────────────────────────────────
fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => {}
        Ok(false) => exit(1),
        Err(e) => {
            ui::step_err(&format!("{:#}", e));
            exit(1);
        }
    }
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// `Ok(false)` when the conversion stopped at a bad line.
fn run(cli: Cli) -> Result<bool> {
    match cli.command {
        Command::Convert(args) => {
            let options = apply_overrides(config::load(cli.config.as_deref())?, &args);
            cmd_convert(&args, options)
        }
        Command::Decode { file } => {
            let source = read_input(file.as_deref())?;
            let mut stdout = io::stdout().lock();
            stdout.write_all(decode_program(&source).as_bytes())?;
            writeln!(stdout)?;
            Ok(true)
        }
        Command::Presets { preset } => {
            cmd_presets(preset.as_deref())?;
            Ok(true)
        }
    }
}

// ═════════════════════════════════════════════════════════════
// simpleshell convert
// ═════════════════════════════════════════════════════════════
fn apply_overrides(mut options: Options, args: &ConvertArgs) -> Options {
    if let Some(seed) = args.seed {
        options.seed = Some(seed);
    }
    if let Some(radix) = args.radix {
        options.radix = radix;
    }
    if args.keep_comments {
        options.skip_comments = false;
    }
    if args.newlines {
        options.statement_separator = "\n".to_string();
    }
    options
}

fn cmd_convert(args: &ConvertArgs, options: Options) -> Result<bool> {
    let source = match &args.preset {
        Some(key) => {
            let preset = presets::find(key).ok_or_else(|| anyhow!("no preset '{}'", key))?;
            step_info(&format!("preset {}: {}", preset.name, preset.summary));
            preset.source.to_string()
        }
        None => read_input(args.file.as_deref())?,
    };

    let conversion = Converter::new(options).convert(&source);
    let rendered = if args.json {
        json_report(&conversion)?
    } else {
        conversion.output.clone()
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("cannot write {}", path.display()))?;
            step_ok(&format!("{} statement(s) → {}", conversion.statements, path.display().to_string().bold()));
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            writeln!(stdout)?;
        }
    }

    match &conversion.error {
        Some(err) => {
            report_error(&source, err, conversion.statements);
            Ok(false)
        }
        None => Ok(true),
    }
}

fn json_report(conversion: &Conversion) -> Result<String> {
    let error = conversion.error.as_ref().map(|e| {
        serde_json::json!({
            "line": e.line(),
            "kind": e.kind(),
            "message": e.to_string(),
        })
    });
    let report = serde_json::json!({
        "output": conversion.output,
        "complete": conversion.is_complete(),
        "statements": conversion.statements,
        "error": error,
    });
    Ok(serde_json::to_string_pretty(&report)?)
}

// ═════════════════════════════════════════════════════════════
// simpleshell presets
// ═════════════════════════════════════════════════════════════
fn cmd_presets(key: Option<&str>) -> Result<()> {
    match key {
        Some(key) => {
            let preset = presets::find(key).ok_or_else(|| anyhow!("no preset '{}'", key))?;
            println!("{}", preset.source);
        }
        None => {
            for (idx, preset) in presets::PRESETS.iter().enumerate() {
                println!("  {} {:<14} {}", idx.to_string().bright_cyan(), preset.name.bold(), preset.summary.dimmed());
            }
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────
// Input
// ─────────────────────────────────────────────────────────────
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p != Path::new("-") => {
            fs::read_to_string(p).with_context(|| format!("cannot read {}", p.display()))
        }
        _ => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("cannot read stdin")?;
            Ok(buf)
        }
    }
}

// ─────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_override_config() {
        let args = ConvertArgs {
            seed: Some(3),
            radix: Some(Radix::Octal),
            keep_comments: true,
            newlines: true,
            ..ConvertArgs::default()
        };
        let options = apply_overrides(Options::default(), &args);
        assert_eq!(options.seed, Some(3));
        assert_eq!(options.radix, Radix::Octal);
        assert!(!options.skip_comments);
        assert_eq!(options.statement_separator, "\n");
    }

    #[test]
    fn parses_convert_invocation() {
        let cli = Cli::try_parse_from(["simpleshell", "convert", "--preset", "2", "--radix", "decimal", "--json"]).unwrap();
        let Command::Convert(args) = cli.command else {
            panic!("expected convert");
        };
        assert_eq!(args.preset.as_deref(), Some("2"));
        assert_eq!(args.radix, Some(Radix::Decimal));
        assert!(args.json);
    }

    #[test]
    fn preset_and_file_conflict() {
        assert!(Cli::try_parse_from(["simpleshell", "convert", "in.txt", "--preset", "0"]).is_err());
    }

    #[test]
    fn json_report_carries_error() {
        let conversion = Converter::new(Options { radix: Radix::Decimal, ..Options::default() })
            .convert("f(1);\nbad");
        let report: serde_json::Value = serde_json::from_str(&json_report(&conversion).unwrap()).unwrap();
        assert_eq!(report["complete"], false);
        assert_eq!(report["statements"], 1);
        assert_eq!(report["error"]["line"], 1);
        assert_eq!(report["error"]["kind"], "malformed_statement");
    }
}
