//! oidtrim - Regenerate a whitelisted OpenSSL object table
//!
//! This tool renumbers the objects listed in `objects.txt`, regenerates
//! `obj_mac.h` and `obj_dat.h` from the trimmed numbering, and backfills
//! removed symbols so code that still names them keeps compiling.

use anyhow::{bail, Context, Result};
use clap::Parser;
use oidtrim_core::{Layout, Pipeline, ProcessInvoker, RunReport};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, Level};
use tracing_subscriber::EnvFilter;

/// Regenerate a trimmed OpenSSL object table from a whitelist
#[derive(Parser, Debug)]
#[command(name = "oidtrim")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory holding objects.txt; outputs are written below it
    #[arg(short, long, default_value = ".")]
    root: PathBuf,

    /// Upstream OpenSSL checkout, relative to the root
    #[arg(short, long, default_value = oidtrim_core::layout::DEFAULT_UPSTREAM)]
    upstream: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn layout(&self) -> Layout {
        Layout::new(&self.root).upstream(&self.upstream)
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .init();

    if let Err(e) = run(&cli) {
        std::process::exit(report_failure(&e));
    }
}

/// Run the pipeline and summarize what was published
fn run(cli: &Cli) -> Result<()> {
    if !cli.root.is_dir() {
        bail!("Root directory does not exist: {}", cli.root.display());
    }

    let layout = cli.layout();
    debug!("Layout: {:?}", layout);

    let report = Pipeline::new(layout, ProcessInvoker::new())
        .run()
        .with_context(|| format!("Failed to regenerate object tables in {}", cli.root.display()))?;

    print_summary(&report)
}

/// Print the failure and pick the process exit status.
///
/// A failed generator script keeps its own exit status, with its captured
/// stderr echoed first.
fn report_failure(err: &anyhow::Error) -> i32 {
    let core = err.downcast_ref::<oidtrim_core::Error>();

    if let Some(stderr) = core.and_then(|e| e.tool_stderr()) {
        eprint!("{}", stderr);
        if !stderr.is_empty() && !stderr.ends_with('\n') {
            eprintln!();
        }
    }
    error!("{:#}", err);

    core.map_or(oidtrim_core::error::GENERIC_EXIT_CODE, |e| e.exit_code())
}

/// Compute a short hash of the content (first 8 chars of blake3)
fn content_hash(content: &[u8]) -> String {
    let hash = blake3::hash(content);
    hash.to_hex()[..8].to_string()
}

fn artifact_hash(path: &Path) -> Result<String> {
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(content_hash(&data))
}

fn print_summary(report: &RunReport) -> Result<()> {
    for artifact in &report.artifacts {
        let hash = artifact_hash(&artifact.path)?;
        println!("Wrote {} ({})", artifact.path.display(), hash);
        debug!("{}: {}", artifact.kind.as_str(), artifact.path.display());
    }

    for symbol in &report.missing {
        debug!("Placeholder: {}", symbol);
    }

    info!(
        "Summary: {} of {} objects retained, {} placeholders, {} files written",
        report.retained,
        report.upstream,
        report.missing.len(),
        report.artifacts.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use oidtrim_core::{Artifact, ArtifactKind};
    use tempfile::TempDir;

    #[test]
    fn test_content_hash() {
        let hash1 = content_hash(b"hello");
        let hash2 = content_hash(b"hello");
        let hash3 = content_hash(b"world");

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
        assert_eq!(hash1.len(), 8);
    }

    #[test]
    fn test_default_layout_matches_flagless_run() {
        let cli = Cli::parse_from(["oidtrim"]);
        let layout = cli.layout();

        assert_eq!(layout.root, PathBuf::from("."));
        assert_eq!(layout.upstream, PathBuf::from("../openssl"));
        assert_eq!(layout.interpreter, "perl");
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_flags_override_layout() {
        let cli = Cli::parse_from([
            "oidtrim",
            "--root",
            "/stub",
            "--upstream",
            "/src/openssl",
            "-vv",
        ]);
        let layout = cli.layout();

        assert_eq!(
            layout.full_numbering(),
            PathBuf::from("/src/openssl/crypto/objects/obj_mac.num")
        );
        assert_eq!(layout.interpreter, "perl");
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_interpreter_is_not_a_flag() {
        assert!(Cli::try_parse_from(["oidtrim", "--interpreter", "perl5"]).is_err());
    }

    #[test]
    fn test_report_failure_keeps_tool_exit_code() {
        let err = anyhow::Error::new(oidtrim_core::Error::external_tool("perl", 4, "bad"))
            .context("Failed to regenerate object tables");
        assert_eq!(report_failure(&err), 4);

        let err = anyhow::Error::new(oidtrim_core::Error::external_tool("perl", 300, ""));
        assert_eq!(report_failure(&err), 300);

        let err = anyhow::anyhow!("Root directory does not exist");
        assert_eq!(report_failure(&err), 1);
    }

    #[test]
    fn test_print_summary_reads_artifacts() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("obj_mac.h");
        fs::write(&path, "#define NID_undef 0\r\n").unwrap();

        let report = RunReport {
            artifacts: vec![Artifact {
                kind: ArtifactKind::SymbolHeader,
                path,
            }],
            retained: 1,
            upstream: 2,
            missing: vec!["NID_B".to_string()],
        };
        assert!(print_summary(&report).is_ok());
    }

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
