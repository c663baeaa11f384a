use crate::error::Result;
use crate::model::{AuthorAccumulator, CommitRecord, TimeWindow};
use crate::options::AnalysisOptions;
use crate::parse::{parse_numstat_line, parse_timing_line, CommitHeader, NumstatLine};
use chrono::NaiveDate;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Author key to accumulator map that iterates in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorStats {
    entries: Vec<(String, AuthorAccumulator)>,
    index: HashMap<String, usize>,
}

impl AuthorStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&AuthorAccumulator> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut AuthorAccumulator> {
        match self.index.get(key) {
            Some(&i) => Some(&mut self.entries[i].1),
            None => None,
        }
    }

    /// Accumulator for `key`, created empty on first sighting.
    pub fn entry(&mut self, key: &str) -> &mut AuthorAccumulator {
        let i = match self.index.get(key) {
            Some(&i) => i,
            None => {
                self.entries.push((key.to_string(), AuthorAccumulator::new()));
                self.index.insert(key.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[i].1
    }

    /// Inserts or replaces the accumulator for `key`, keeping its position.
    pub fn insert(&mut self, key: String, acc: AuthorAccumulator) {
        match self.index.get(&key) {
            Some(&i) => self.entries[i].1 = acc,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, acc));
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AuthorAccumulator)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl IntoIterator for AuthorStats {
    type Item = (String, AuthorAccumulator);
    type IntoIter = std::vec::IntoIter<(String, AuthorAccumulator)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, AuthorAccumulator)> for AuthorStats {
    fn from_iter<I: IntoIterator<Item = (String, AuthorAccumulator)>>(iter: I) -> Self {
        let mut stats = AuthorStats::new();
        for (key, acc) in iter {
            stats.insert(key, acc);
        }
        stats
    }
}

/// Commit-level filters, applied identically to both log streams.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    exclude_authors: Option<Regex>,
    timezone: Option<String>,
    window: Option<TimeWindow>,
}

impl RecordFilter {
    pub fn new(exclude_authors: Option<&str>, timezone: Option<&str>) -> Result<Self> {
        let exclude_authors = exclude_authors
            .filter(|p| !p.trim().is_empty())
            .map(|p| RegexBuilder::new(p).case_insensitive(true).build())
            .transpose()?;

        Ok(Self {
            exclude_authors,
            timezone: timezone.map(|tz| tz.trim().to_string()),
            window: None,
        })
    }

    /// Keeps only commits whose date, in their own offset, lies in `window`.
    pub fn with_window(mut self, window: TimeWindow) -> Self {
        self.window = Some(window);
        self
    }

    pub fn from_options(options: &AnalysisOptions) -> Result<Self> {
        Self::new(options.exclude_authors.as_deref(), options.timezone.as_deref())
    }

    pub fn accepts(&self, record: &CommitRecord) -> bool {
        self.admits(&record.author_key, record.stamp.date, &record.offset)
    }

    pub fn accepts_header(&self, header: &CommitHeader) -> bool {
        self.admits(&header.author_key, header.date, &header.offset)
    }

    fn admits(&self, author_key: &str, date: NaiveDate, offset: &str) -> bool {
        if let Some(re) = &self.exclude_authors {
            if re.is_match(author_key) {
                return false;
            }
        }
        if let Some(tz) = &self.timezone {
            if offset != tz {
                return false;
            }
        }
        match &self.window {
            Some(window) => window.contains(date),
            None => true,
        }
    }
}

/// Output of one aggregation run.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub stats: AuthorStats,
    /// Commits that passed every filter.
    pub total_commits: u32,
}

/// Folds parsed log lines into per-author accumulators.
pub struct AuthorStatsAggregator {
    filter: RecordFilter,
    stats: AuthorStats,
    accepted: u32,
    skipped: u32,
}

impl AuthorStatsAggregator {
    pub fn new(filter: RecordFilter) -> Self {
        Self {
            filter,
            stats: AuthorStats::new(),
            accepted: 0,
            skipped: 0,
        }
    }

    pub fn add_record(&mut self, record: &CommitRecord) {
        if !self.filter.accepts(record) {
            self.skipped += 1;
            return;
        }
        self.stats.entry(&record.author_key).add_commit(record);
        self.accepted += 1;
    }

    /// First pass: commit timing.
    pub fn fold_timing(&mut self, text: &str) {
        let mut malformed = 0usize;
        for line in text.lines() {
            match parse_timing_line(line) {
                Some(record) => self.add_record(&record),
                None if line.trim().is_empty() => {}
                None => malformed += 1,
            }
        }
        debug!(
            accepted = self.accepted,
            filtered = self.skipped,
            malformed,
            "folded timing log"
        );
        if malformed > 0 {
            warn!(malformed, "skipped malformed timing lines");
        }
    }

    /// Second pass: line counts. Each commit header goes through the same
    /// filter as the timing pass, and counts are only attributed to authors
    /// already seen there.
    pub fn fold_numstat(&mut self, text: &str) {
        let mut current: Option<String> = None;
        let mut dropped = 0usize;

        for line in text.lines() {
            match parse_numstat_line(line) {
                Some(NumstatLine::Header(header)) => {
                    current = self.filter.accepts_header(&header).then_some(header.author_key);
                }
                Some(NumstatLine::BadHeader) => current = None,
                Some(NumstatLine::Counts { added, deleted }) => {
                    let acc = match current.as_deref() {
                        Some(author) => self.stats.get_mut(author),
                        None => None,
                    };
                    match acc {
                        Some(acc) => acc.add_lines(added, deleted),
                        None => dropped += 1,
                    }
                }
                None => {}
            }
        }
        debug!(dropped, "folded numstat log");
    }

    pub fn finish(self) -> Aggregation {
        Aggregation {
            stats: self.stats,
            total_commits: self.accepted,
        }
    }
}

/// Runs both passes over already fetched log text.
pub fn aggregate(timing: &str, numstat: &str, filter: RecordFilter) -> Aggregation {
    let mut aggregator = AuthorStatsAggregator::new(filter);
    aggregator.fold_timing(timing);
    aggregator.fold_numstat(numstat);
    aggregator.finish()
}
