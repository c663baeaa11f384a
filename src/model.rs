use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

pub const SCHEMA_VERSION: u32 = 1;

/// First hour (inclusive) of the work-hours window.
pub const WORK_START_HOUR: u32 = 9;
/// Last hour (exclusive) of the work-hours window.
pub const WORK_END_HOUR: u32 = 18;

/// Display name and email parsed out of a `Name <email>` author key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuthorIdentity {
    pub name: String,
    pub email: String,
}

impl AuthorIdentity {
    /// Splits a raw author key. Keys without an `<email>` part keep the
    /// whole key as the name and an empty email.
    pub fn parse(key: &str) -> Self {
        static AUTHOR_RE: OnceLock<Regex> = OnceLock::new();
        let re = AUTHOR_RE.get_or_init(|| {
            Regex::new(r"^(.+?)\s*<(.+?)>$").expect("author regex is valid")
        });

        match re.captures(key) {
            Some(caps) => Self {
                name: caps[1].trim().to_string(),
                email: caps[2].trim().to_string(),
            },
            None => Self {
                name: key.to_string(),
                email: String::new(),
            },
        }
    }

    /// Name used when comparing identities for merging.
    pub fn normalized_name(&self) -> &str {
        self.name.trim()
    }
}

/// Calendar position of one commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStamp {
    pub date: NaiveDate,
    pub hour: u32,
    /// 0 = Sunday .. 6 = Saturday
    pub weekday: u32,
}

impl CommitStamp {
    pub fn is_weekend(&self) -> bool {
        self.weekday == 0 || self.weekday == 6
    }

    pub fn is_work_hour(&self) -> bool {
        (WORK_START_HOUR..WORK_END_HOUR).contains(&self.hour)
    }
}

/// One commit as read from the timing stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Raw `Name <email>` key, identical in both log streams.
    pub author_key: String,
    pub stamp: CommitStamp,
    /// `+HHMM` / `-HHMM` suffix of the absolute timestamp.
    pub offset: String,
    pub lines_added: u64,
    pub lines_deleted: u64,
}

/// Running statistics for one author identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthorAccumulator {
    pub total_commits: u32,
    pub work_hours_commits: u32,
    pub overtime_commits: u32,
    pub workday_commits: u32,
    pub weekend_commits: u32,
    pub hour_histogram: [u32; 24],
    pub commit_stamps: Vec<CommitStamp>,
    pub lines_added: u64,
    pub lines_deleted: u64,
    pub lines_total: u64,
    /// Distinct emails folded into this accumulator by the identity merge.
    pub emails: Vec<String>,
}

impl AuthorAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_commit(&mut self, record: &CommitRecord) {
        let stamp = record.stamp;
        self.total_commits += 1;

        if stamp.is_work_hour() {
            self.work_hours_commits += 1;
        } else {
            self.overtime_commits += 1;
        }

        if stamp.is_weekend() {
            self.weekend_commits += 1;
        } else {
            self.workday_commits += 1;
        }

        if let Some(slot) = self.hour_histogram.get_mut(stamp.hour as usize) {
            *slot += 1;
        }
        self.commit_stamps.push(stamp);
        self.add_lines(record.lines_added, record.lines_deleted);
    }

    pub fn add_lines(&mut self, added: u64, deleted: u64) {
        self.lines_added += added;
        self.lines_deleted += deleted;
        self.lines_total += added + deleted;
    }

    /// Folds `other` into `self`. Every count is additive; stamps are
    /// concatenated.
    pub fn absorb(&mut self, other: &AuthorAccumulator) {
        self.total_commits += other.total_commits;
        self.work_hours_commits += other.work_hours_commits;
        self.overtime_commits += other.overtime_commits;
        self.workday_commits += other.workday_commits;
        self.weekend_commits += other.weekend_commits;
        for (slot, count) in self.hour_histogram.iter_mut().zip(other.hour_histogram.iter()) {
            *slot += count;
        }
        self.commit_stamps.extend_from_slice(&other.commit_stamps);
        self.lines_added += other.lines_added;
        self.lines_deleted += other.lines_deleted;
        self.lines_total += other.lines_total;
    }

    pub fn add_email(&mut self, email: &str) {
        if !self.emails.iter().any(|e| e == email) {
            self.emails.push(email.to_string());
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntensityTier {
    Normal,
    Moderate,
    Heavy,
}

impl fmt::Display for IntensityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IntensityTier::Normal => "normal",
            IntensityTier::Moderate => "moderate",
            IntensityTier::Heavy => "heavy",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingItem {
    /// 1-based position inside one view. Zero until the view is ranked.
    pub rank: u32,
    pub author: String,
    pub email: String,
    pub emails: Vec<String>,
    pub total_commits: u32,
    pub index_996: f64,
    pub overtime_rate: f64,
    pub weekend_ratio: f64,
    pub overtime_commits: u32,
    pub weekend_commits: u32,
    pub work_hours_commits: u32,
    pub intensity: IntensityTier,
    pub lines_added: u64,
    pub lines_deleted: u64,
    pub lines_total: u64,
    pub weekend_days: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_authors: usize,
    pub avg_index_996: f64,
    pub median_index_996: f64,
    pub highest_index_996: f64,
    pub lowest_index_996: f64,
    pub top_author: Option<String>,
    pub top_email: Option<String>,
}

/// Inclusive calendar window the analysis covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub since: NaiveDate,
    pub until: NaiveDate,
}

impl TimeWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.since <= date && date <= self.until
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub time_range: TimeWindow,
    pub total_commits: u32,
    pub filter_threshold: u32,
    pub top_n: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingResult {
    pub by_lines: Vec<RankingItem>,
    pub by_commits: Vec<RankingItem>,
    pub by_index_996: Vec<RankingItem>,
    pub summary: Summary,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: String,
    #[serde(flatten)]
    pub result: RankingResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoursEntry {
    pub author: String,
    pub email: String,
    pub total_commits: u32,
    pub peak_hour: u32,
    pub histogram: [u32; 24],
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoursOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub repository_path: String,
    pub time_range: TimeWindow,
    pub authors: Vec<HoursEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(hour: u32, weekday: u32) -> CommitRecord {
        CommitRecord {
            author_key: "Alice <a@x.com>".to_string(),
            stamp: CommitStamp {
                date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
                hour,
                weekday,
            },
            offset: "+0000".to_string(),
            lines_added: 0,
            lines_deleted: 0,
        }
    }

    #[test]
    fn parses_name_and_email() {
        let id = AuthorIdentity::parse("Alice Smith <alice@example.com>");
        assert_eq!(id.name, "Alice Smith");
        assert_eq!(id.email, "alice@example.com");
    }

    #[test]
    fn key_without_email_keeps_whole_name() {
        let id = AuthorIdentity::parse("ci-bot");
        assert_eq!(id.name, "ci-bot");
        assert_eq!(id.email, "");
    }

    #[test]
    fn work_hours_are_half_open() {
        let mut acc = AuthorAccumulator::new();
        acc.add_commit(&record(8, 1));
        acc.add_commit(&record(9, 1));
        acc.add_commit(&record(17, 1));
        acc.add_commit(&record(18, 1));
        assert_eq!(acc.work_hours_commits, 2);
        assert_eq!(acc.overtime_commits, 2);
    }

    #[test]
    fn day_and_hour_axes_are_independent() {
        let mut acc = AuthorAccumulator::new();
        acc.add_commit(&record(22, 2));
        acc.add_commit(&record(10, 6));
        acc.add_commit(&record(10, 0));

        assert_eq!(acc.total_commits, 3);
        assert_eq!(acc.overtime_commits, 1);
        assert_eq!(acc.work_hours_commits, 2);
        assert_eq!(acc.weekend_commits, 2);
        assert_eq!(acc.workday_commits, 1);
        assert_eq!(acc.work_hours_commits + acc.overtime_commits, acc.total_commits);
        assert_eq!(acc.workday_commits + acc.weekend_commits, acc.total_commits);
        assert_eq!(acc.hour_histogram[10], 2);
        assert_eq!(acc.hour_histogram[22], 1);
    }

    #[test]
    fn tier_serializes_lowercase() {
        let json = serde_json::to_string(&IntensityTier::Moderate).unwrap();
        assert_eq!(json, "\"moderate\"");
    }
}
