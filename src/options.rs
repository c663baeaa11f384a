use crate::cli::CommonArgs;
use std::path::PathBuf;

pub const DEFAULT_MIN_COMMITS: u32 = 5;
pub const DEFAULT_TOP_N: usize = 10;

/// Values the analysis pipeline consumes. Flag syntax lives in `cli`.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub repo: Option<PathBuf>,
    pub since: Option<String>,
    pub until: Option<String>,
    /// `2024` or `2022-2024`
    pub year: Option<String>,
    pub all_time: bool,
    /// Only analyze commits by the configured `user.name`.
    pub self_only: bool,
    pub author_pattern: Option<String>,
    pub exclude_authors: Option<String>,
    pub exclude_messages: Option<String>,
    /// Exact `+HHMM` / `-HHMM` offset to keep.
    pub timezone: Option<String>,
    pub min_commits: u32,
    pub merge_authors: bool,
    pub top_n: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            repo: None,
            since: None,
            until: None,
            year: None,
            all_time: false,
            self_only: false,
            author_pattern: None,
            exclude_authors: None,
            exclude_messages: None,
            timezone: None,
            min_commits: DEFAULT_MIN_COMMITS,
            merge_authors: false,
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl From<&CommonArgs> for AnalysisOptions {
    fn from(common: &CommonArgs) -> Self {
        Self {
            repo: common.repo.clone(),
            since: common.since.clone(),
            until: common.until.clone(),
            year: common.year.clone(),
            all_time: common.all_time,
            self_only: common.self_only,
            author_pattern: None,
            exclude_authors: common.exclude_authors.clone(),
            exclude_messages: common.exclude_messages.clone(),
            timezone: common.timezone.clone(),
            min_commits: common.min_commits,
            merge_authors: common.merge_authors,
            top_n: DEFAULT_TOP_N,
        }
    }
}
