//! The `check` command: fetch the log and merge info, run the analysis and
//! print the collision report.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use tracing::{debug, info};

use ticketmerge_core::config::AppConfig;
use ticketmerge_core::merge::{
    parse_revision, parse_revision_list, AnalysisOutcome, MergeAnalysis, MergeAnalyzer, MergeRequest,
    RevisionRange,
};
use ticketmerge_core::svn::SvnClient;

use crate::style;

/// Arguments of `ticketmerge check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Revision range of the source path to inspect, e.g. 8000:9000 or 8000:HEAD.
    #[arg(long, required_unless_present = "log_file")]
    pub range: Option<String>,

    /// Single revision to merge.
    #[arg(long, conflicts_with = "revisions", required_unless_present = "revisions")]
    pub revision: Option<String>,

    /// Comma-separated revisions to merge together.
    #[arg(long)]
    pub revisions: Option<String>,

    /// Comma-separated revisions to leave out of collision detection.
    #[arg(long)]
    pub ignore: Option<String>,

    /// Also list the colliding files of every collision.
    #[arg(long)]
    pub show_colliding_files: bool,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,

    /// Read `svn log -v` output from a file instead of running svn.
    #[arg(long, requires = "mergeinfo_file")]
    pub log_file: Option<PathBuf>,

    /// Read the svn:mergeinfo value from a file instead of running svn.
    #[arg(long, requires = "log_file")]
    pub mergeinfo_file: Option<PathBuf>,
}

impl CheckArgs {
    fn request(&self) -> Result<MergeRequest> {
        let request = match (&self.revision, &self.revisions) {
            (Some(single), _) => MergeRequest::single(parse_revision("--revision", single)?),
            (None, Some(list)) => MergeRequest::new(parse_revision_list("--revisions", list)?),
            (None, None) => anyhow::bail!("one of --revision or --revisions is required"),
        };
        let ignored = match &self.ignore {
            Some(list) => parse_revision_list("--ignore", list)?,
            None => Vec::new(),
        };
        Ok(request.with_ignored(ignored))
    }
}

/// Run the check command.
pub async fn run_check(config: &AppConfig, args: &CheckArgs) -> Result<()> {
    let request = args.request()?;
    let (log_text, mergeinfo_text) = load_inputs(config, args).await?;

    let analyzer = MergeAnalyzer::from_config(config);
    info!(source = analyzer.source_path(), revisions = ?request.revisions, "checking merge");
    let outcome = analyzer.analyze(&request, &log_text, &mergeinfo_text)?;

    if args.json {
        print_json(&outcome)?;
        return Ok(());
    }

    match outcome {
        AnalysisOutcome::Completed(analysis) => print_analysis(&analysis, args.show_colliding_files),
        stopped => {
            if let Some(message) = stopped.stop_message() {
                println!("{}", message);
            }
        }
    }
    Ok(())
}

/// The log and merge-info texts, either from files or from svn.
async fn load_inputs(config: &AppConfig, args: &CheckArgs) -> Result<(String, String)> {
    if let (Some(log_file), Some(mergeinfo_file)) = (&args.log_file, &args.mergeinfo_file) {
        debug!(log = %log_file.display(), mergeinfo = %mergeinfo_file.display(), "reading inputs from files");
        let log_text = std::fs::read_to_string(log_file)
            .with_context(|| format!("failed to read {}", log_file.display()))?;
        let mergeinfo_text = std::fs::read_to_string(mergeinfo_file)
            .with_context(|| format!("failed to read {}", mergeinfo_file.display()))?;
        return Ok((log_text, mergeinfo_text));
    }

    let range_arg = args
        .range
        .as_deref()
        .context("--range is required when reading from svn")?;
    let range = RevisionRange::parse(range_arg)?;
    let client = SvnClient::from_config(&config.svn);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));

    spinner.set_message(format!("Fetching svn log -r {}...", range));
    let log_text = client.log(&range).await;
    let log_text = match log_text {
        Ok(text) => text,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e).context("failed to fetch svn log");
        }
    };

    // Nothing to merge: merge info would not be looked at.
    if log_text.trim().is_empty() {
        spinner.finish_and_clear();
        return Ok((log_text, String::new()));
    }

    spinner.set_message("Reading svn:mergeinfo...");
    let mergeinfo_text = client.mergeinfo().await;
    spinner.finish_and_clear();
    let mergeinfo_text = mergeinfo_text.context("failed to read svn:mergeinfo")?;

    Ok((log_text, mergeinfo_text))
}

fn print_json(outcome: &AnalysisOutcome) -> Result<()> {
    let value = match outcome {
        AnalysisOutcome::Completed(analysis) => json!({
            "status": "completed",
            "analysis": analysis,
        }),
        AnalysisOutcome::NothingToMerge => json!({
            "status": "nothing_to_merge",
            "message": outcome.stop_message(),
        }),
        AnalysisOutcome::NotInMergeList { requested, single } => json!({
            "status": "not_in_merge_list",
            "requested": requested,
            "single": single,
            "message": outcome.stop_message(),
        }),
    };
    let rendered = serde_json::to_string_pretty(&value).context("failed to serialize result")?;
    println!("{}", rendered);
    Ok(())
}

fn print_analysis(analysis: &MergeAnalysis, show_colliding_files: bool) {
    for revision in &analysis.missing {
        println!("{}", style::warn(&format!("Revision [{}] is not in the merge list", revision)));
    }
    for revision in &analysis.already_merged {
        println!("{}", style::warn(&format!("Revision [{}] is already merged", revision)));
    }
    if !analysis.warnings.is_empty() {
        println!(
            "{}",
            style::dim(&format!(
                "{} malformed log/mergeinfo entries were skipped (run with -v for details)",
                analysis.warnings.len()
            ))
        );
    }

    println!("{}", style::rule('-'));
    println!("There are [{}] commits to be merged.", analysis.pending_count);
    println!();

    let report = &analysis.report;
    if report.is_empty() {
        println!("{}", style::success("No collisions detected, merge can be performed"));
    } else {
        for line in analysis.summary_lines() {
            match line.strip_prefix(" * Task ") {
                Some(rest) => println!(" * Task {}", style::ticket(rest)),
                None if line.starts_with("Revision") || line.starts_with("Provided") => {
                    println!("{}", style::header(&line))
                }
                None => println!("{}", line),
            }
        }
        println!("{}", style::rule('~'));
        println!("One liner: {}", analysis.one_liner());
        println!("{}", style::rule('~'));

        if show_colliding_files {
            println!("{}", style::rule('~'));
            println!("{}", style::header("Detailed report listing colliding files follows:"));
            println!("{}", style::rule('~'));
            for block in report.detail_lines() {
                println!("{}", style::rule('~'));
                for line in block {
                    println!("{}", line);
                }
                println!("{}", style::rule('~'));
                println!();
            }
        }
    }

    println!("{}", style::rule('-'));
    println!("Done.");
}
