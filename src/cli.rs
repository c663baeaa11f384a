use crate::options::{DEFAULT_MIN_COMMITS, DEFAULT_TOP_N};
use crate::rank::RankView;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gitgrind")]
#[command(about = "Rank git contributors by code volume, commit count and overtime intensity")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, env = "GITGRIND_REPO", help = "Path to git repository")]
    pub repo: Option<PathBuf>,

    #[arg(long, help = "Start date (YYYY-MM-DD)")]
    pub since: Option<String>,

    #[arg(long, help = "End date (YYYY-MM-DD)")]
    pub until: Option<String>,

    #[arg(short = 'y', long, help = "Year or year range to analyze (e.g. 2024 or 2022-2024)")]
    pub year: Option<String>,

    #[arg(long, help = "Analyze the whole history", conflicts_with = "year")]
    pub all_time: bool,

    #[arg(long = "self", help = "Only count commits by the configured git user.name")]
    pub self_only: bool,

    #[arg(long, help = "Exclude authors matching this regex (case-insensitive)")]
    pub exclude_authors: Option<String>,

    #[arg(long, help = "Exclude commits whose message matches this regex")]
    pub exclude_messages: Option<String>,

    #[arg(long, allow_hyphen_values = true, help = "Only keep commits with this UTC offset (e.g. +0800)")]
    pub timezone: Option<String>,

    #[arg(long, env = "GITGRIND_MIN_COMMITS", default_value_t = DEFAULT_MIN_COMMITS, help = "Minimum commits for an author to be ranked")]
    pub min_commits: u32,

    #[arg(long, help = "Merge authors sharing a name but using different emails")]
    pub merge_authors: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    Rank {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,

        #[arg(long, default_value_t = DEFAULT_TOP_N, help = "Number of authors to display")]
        top: usize,

        #[arg(long, value_enum, default_value_t = RankView::Index996, help = "Ranking to display")]
        sort_by: RankView,

        #[arg(long, help = "Show details for the author whose name or email contains this text")]
        author: Option<String>,

        #[arg(long, help = "Write a plain-text report with all rankings to this file")]
        export: Option<PathBuf>,
    },
    Hours {
        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Rank { json, ndjson, top, sort_by, author, export } => {
                crate::rank::exec(self.common, json, ndjson, top, sort_by, author, export)
            }
            Commands::Hours { json } => crate::hours::exec(self.common, json),
        }
    }
}
