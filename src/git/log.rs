use crate::error::{GrindError, Result};
use crate::git::GitRepo;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

const TIMING_FORMAT: &str = "--format=%an <%ae>|%ad|%ai";
const LOCAL_DATE_FORMAT: &str = "--date=format:%Y-%m-%d %H:%M:%S";
const NUMSTAT_FORMAT: &str = "--format=%an <%ae>|%ai";

/// Filters shared by both log queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    pub since: Option<NaiveDate>,
    pub until: Option<NaiveDate>,
    /// Extended regex passed to `--author`.
    pub author_pattern: Option<String>,
    /// Extended regex of commit messages to leave out.
    pub exclude_messages: Option<String>,
}

impl LogQuery {
    fn filter_args(&self) -> Vec<String> {
        let mut args = Vec::new();

        if let Some(since) = self.since {
            args.push(format!("--since={} 00:00:00", since.format("%Y-%m-%d")));
        }
        if let Some(until) = self.until {
            args.push(format!("--until={} 23:59:59", until.format("%Y-%m-%d")));
        }
        args.push("--no-merges".to_string());

        if self.author_pattern.is_some() || self.exclude_messages.is_some() {
            args.push("--regexp-ignore-case".to_string());
            args.push("--extended-regexp".to_string());
        }
        if let Some(pattern) = &self.author_pattern {
            args.push(format!("--author={pattern}"));
        }
        if let Some(pattern) = &self.exclude_messages {
            args.push(format!("--grep={pattern}"));
            args.push("--invert-grep".to_string());
        }

        args
    }
}

/// Producer of the raw log text the analysis consumes.
pub trait LogSource {
    /// One `<author> <<email>>|<local date time>|<iso timestamp>` line per commit.
    fn timing_log(&self, query: &LogQuery) -> Result<String>;

    /// Per commit: an `<author> <<email>>|<iso timestamp>` header, then
    /// `added\tdeleted\tpath` lines.
    fn numstat_log(&self, query: &LogQuery) -> Result<String>;

    fn first_commit_date(&self) -> Result<Option<NaiveDate>>;

    fn last_commit_date(&self) -> Result<Option<NaiveDate>>;
}

/// Log source backed by the `git` binary.
pub struct GitLogSource {
    workdir: PathBuf,
}

impl GitLogSource {
    pub fn new(repo: &GitRepo) -> Self {
        Self {
            workdir: repo.path().to_path_buf(),
        }
    }

    fn run(&self, args: &[String]) -> Result<String> {
        debug!("git {}", args.join(" "));

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| GrindError::SourceUnavailable(format!("failed to run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(GrindError::SourceUnavailable(format!(
                "git {} exited with {}: {}",
                args.first().map(String::as_str).unwrap_or(""),
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn commit_date(&self, reverse: bool) -> Result<Option<NaiveDate>> {
        let mut args = vec![
            "log".to_string(),
            "--no-merges".to_string(),
            "--format=%ad".to_string(),
            "--date=short".to_string(),
        ];
        if reverse {
            args.push("--reverse".to_string());
        } else {
            args.push("-1".to_string());
        }

        let output = self.run(&args)?;
        Ok(output
            .lines()
            .map(str::trim)
            .find(|l| !l.is_empty())
            .and_then(|l| NaiveDate::parse_from_str(l, "%Y-%m-%d").ok()))
    }
}

impl LogSource for GitLogSource {
    fn timing_log(&self, query: &LogQuery) -> Result<String> {
        let mut args = vec![
            "log".to_string(),
            TIMING_FORMAT.to_string(),
            LOCAL_DATE_FORMAT.to_string(),
        ];
        args.extend(query.filter_args());
        self.run(&args)
    }

    fn numstat_log(&self, query: &LogQuery) -> Result<String> {
        let mut args = vec![
            "log".to_string(),
            "--numstat".to_string(),
            NUMSTAT_FORMAT.to_string(),
        ];
        args.extend(query.filter_args());
        self.run(&args)
    }

    fn first_commit_date(&self) -> Result<Option<NaiveDate>> {
        self.commit_date(true)
    }

    fn last_commit_date(&self) -> Result<Option<NaiveDate>> {
        self.commit_date(false)
    }
}
