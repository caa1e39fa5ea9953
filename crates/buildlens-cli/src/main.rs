//! Buildlens CLI
//!
//! The `buildlens` command turns a build host's diagnostics into a short,
//! prioritized console report.
//!
//! ## Commands
//!
//! - `render`: Report one finished build (a `BuildOutcome` JSON document)
//! - `stream`: Follow a watch session given as newline-delimited host events
//! - `config`: Print the effective configuration as TOML

use anyhow::{Context, Result};
use buildlens_core::{
    BuildOutcome, ConsoleSink, FriendlyReporter, MemorySink, OutputSink, Report,
    ReporterBuilder, ReporterConfig, CONFIG_FILE_NAME,
};
use clap::{Parser, Subcommand};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, Level};

#[derive(Parser)]
#[command(name = "buildlens")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Friendly build diagnostics", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    /// Config file (default: buildlens.toml in the project root, if present)
    #[arg(short, long, global = true, env = "BUILDLENS_CONFIG")]
    config: Option<PathBuf>,

    /// Project root used for config lookup and package manager detection
    #[arg(long, global = true, default_value = ".")]
    project_root: PathBuf,

    /// Never clear the terminal
    #[arg(long, global = true)]
    no_clear: bool,

    /// Disable colored titles
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report one finished build
    Render {
        /// BuildOutcome JSON file, or `-` for stdin
        input: PathBuf,

        /// Print the assembled report as JSON instead of console text
        #[arg(long)]
        report_json: bool,

        /// Exit non-zero when the build has errors
        #[arg(long)]
        fail_on_errors: bool,
    },

    /// Follow newline-delimited host events
    Stream {
        /// Event file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },

    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    buildlens_core::init_tracing(cli.json, level);

    let mut config = load_config(cli.config.as_deref(), &cli.project_root)?;
    if cli.no_clear {
        config.clear_console = false;
    }

    match cli.command {
        Commands::Render {
            input,
            report_json,
            fail_on_errors,
        } => {
            let outcome: BuildOutcome = read_json(&input)?;
            let report = if report_json {
                let mut reporter = reporter(&config, &cli.project_root).build(MemorySink::new());
                let report = cmd_render(&mut reporter, &outcome)?;
                println!("{}", serde_json::to_string_pretty(&report)?);
                report
            } else {
                let mut reporter =
                    reporter(&config, &cli.project_root).build(console(&config, cli.no_color));
                cmd_render(&mut reporter, &outcome)?
            };
            if fail_on_errors && outcome.has_errors() {
                anyhow::bail!("{}", report.title.subtitle);
            }
            Ok(())
        }
        Commands::Stream { input } => {
            let reader = open_input(&input)?;
            let mut reporter =
                reporter(&config, &cli.project_root).build(console(&config, cli.no_color));
            let handled = cmd_stream(&mut reporter, BufReader::new(reader))?;
            debug!(events = handled, "stream closed");
            Ok(())
        }
        Commands::Config => {
            print!("{}", cmd_config(&config)?);
            Ok(())
        }
    }
}

/// Explicit path, else `buildlens.toml` under the project root, else defaults.
fn load_config(explicit: Option<&Path>, project_root: &Path) -> Result<ReporterConfig> {
    if let Some(path) = explicit {
        return ReporterConfig::load(path)
            .with_context(|| format!("Failed to load config {:?}", path));
    }
    let candidate = project_root.join(CONFIG_FILE_NAME);
    if candidate.is_file() {
        info!(path = %candidate.display(), "using project config");
        return ReporterConfig::load(&candidate)
            .with_context(|| format!("Failed to load config {:?}", candidate));
    }
    Ok(ReporterConfig::default())
}

fn reporter(config: &ReporterConfig, project_root: &Path) -> ReporterBuilder {
    ReporterBuilder::default()
        .config(config.clone())
        .project_root(project_root)
}

fn console(config: &ReporterConfig, no_color: bool) -> ConsoleSink<std::io::Stdout> {
    let sink = ConsoleSink::stdout().with_timestamp(config.show_timestamp);
    if no_color {
        sink.with_color(false)
    } else {
        sink
    }
}

fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    if path == Path::new("-") {
        return Ok(Box::new(std::io::stdin()));
    }
    let file = std::fs::File::open(path).context(format!("Failed to open {:?}", path))?;
    Ok(Box::new(file))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let mut content = String::new();
    open_input(path)?
        .read_to_string(&mut content)
        .context(format!("Failed to read {:?}", path))?;
    serde_json::from_str(&content).context(format!("Failed to parse JSON from {:?}", path))
}

fn cmd_render<S: OutputSink>(
    reporter: &mut FriendlyReporter<S>,
    outcome: &BuildOutcome,
) -> Result<Report> {
    reporter
        .on_done(outcome)
        .context("Failed to write report")
}

/// Feed every event line to the reporter. Blank lines are skipped.
fn cmd_stream<S: OutputSink, R: BufRead>(
    reporter: &mut FriendlyReporter<S>,
    reader: R,
) -> Result<usize> {
    let mut handled = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read event stream")?;
        if line.trim().is_empty() {
            continue;
        }
        reporter
            .handle_json(&line)
            .with_context(|| format!("Failed to handle host event on line {}", index + 1))?;
        handled += 1;
    }
    Ok(handled)
}

fn cmd_config(config: &ReporterConfig) -> Result<String> {
    toml::to_string(config).context("Failed to serialize config")
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildlens_core::{CompilationStats, LifecycleState, PackageManager, RawError};

    fn memory_reporter(config: &ReporterConfig) -> FriendlyReporter<MemorySink> {
        reporter(config, Path::new(".")).build(MemorySink::new())
    }

    #[test]
    fn test_load_config_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(None, dir.path()).unwrap();
        assert_eq!(config, ReporterConfig::default());
    }

    #[test]
    fn test_load_config_from_project_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "clear_console = false\npackage_manager = \"yarn\"\n",
        )
        .unwrap();

        let config = load_config(None, dir.path()).unwrap();
        assert!(!config.clear_console);
        assert_eq!(config.package_manager, Some(PackageManager::Yarn));
    }

    #[test]
    fn test_load_config_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = load_config(Some(&missing), dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("nope.toml"));
    }

    #[test]
    fn test_render_error_outcome() {
        let mut reporter = memory_reporter(&ReporterConfig::default());
        let outcome = BuildOutcome::Single(CompilationStats {
            start_time: 0,
            end_time: 9,
            errors: vec![RawError::new("boom").with_file("./a.js")],
            warnings: Vec::new(),
        });

        let report = cmd_render(&mut reporter, &outcome).unwrap();

        assert_eq!(report.title.subtitle, "Failed to compile with 1 error");
        assert_eq!(reporter.sink().lines()[2], " error  in ./a.js");
    }

    #[test]
    fn test_read_json_outcome_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outcome.json");
        std::fs::write(&path, r#"{"stats":[{"start_time":1,"end_time":4}]}"#).unwrap();

        let outcome: BuildOutcome = read_json(&path).unwrap();
        assert_eq!(outcome.children().len(), 1);
    }

    #[test]
    fn test_stream_events() {
        let input = "\
{\"event\":\"invalidated\"}

{\"event\":\"after_compile\"}
{\"event\":\"done\",\"outcome\":{\"start_time\":0,\"end_time\":3}}
";
        let mut reporter = memory_reporter(&ReporterConfig::default());

        let handled = cmd_stream(&mut reporter, input.as_bytes()).unwrap();

        assert_eq!(handled, 3);
        assert_eq!(reporter.state(), LifecycleState::Idle);
        assert_eq!(
            reporter.sink().lines(),
            &[
                " WAIT  Compiling...",
                "",
                " DONE  Compiled successfully in 3ms",
                "",
            ]
        );
    }

    #[test]
    fn test_stream_rejects_bad_event() {
        let mut reporter = memory_reporter(&ReporterConfig::default());
        let err = cmd_stream(&mut reporter, "{\"event\":\"nope\"}\n".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_config_roundtrips_through_toml() {
        let config = ReporterConfig {
            clear_console: false,
            show_timestamp: true,
            ..Default::default()
        };
        let text = cmd_config(&config).unwrap();
        assert_eq!(ReporterConfig::from_toml_str(&text).unwrap(), config);
    }
}
