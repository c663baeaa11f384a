//! Line grammars of the two git log streams.
//!
//! Malformed timing lines yield `None` and are skipped by callers. An
//! unreadable numstat header is reported as `NumstatLine::BadHeader`.
//! Nothing here is fatal.

use crate::model::{CommitRecord, CommitStamp};
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate};

/// `Name <email>|<absolute timestamp>` line opening one numstat commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitHeader {
    pub author_key: String,
    /// Calendar date in the commit's own offset.
    pub date: NaiveDate,
    pub offset: String,
}

/// One meaningful line of the numstat stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NumstatLine {
    Header(CommitHeader),
    /// Header without a readable timestamp; its counts belong to no one.
    BadHeader,
    /// `added\tdeleted\tpath` line; binary placeholders count as zero.
    Counts { added: u64, deleted: u64 },
}

/// Parses `<author>|<local date time>|<absolute timestamp>`.
///
/// The two date fields are taken from the right so an author name
/// containing `|` still parses. Weekday and date come from the absolute
/// timestamp, the hour from the local field.
pub fn parse_timing_line(line: &str) -> Option<CommitRecord> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return None;
    }

    let mut fields = line.rsplitn(3, '|');
    let absolute = fields.next()?;
    let local = fields.next()?;
    let author = fields.next()?.trim();
    if author.is_empty() {
        return None;
    }

    let instant = parse_absolute(absolute)?;
    let hour = parse_local_hour(local)?;

    Some(CommitRecord {
        author_key: author.to_string(),
        stamp: CommitStamp {
            date: instant.date_naive(),
            hour,
            weekday: instant.weekday().num_days_from_sunday(),
        },
        offset: instant.format("%z").to_string(),
        lines_added: 0,
        lines_deleted: 0,
    })
}

/// Classifies one numstat line. Blank lines and count lines with fewer
/// than two fields yield `None`.
pub fn parse_numstat_line(line: &str) -> Option<NumstatLine> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return None;
    }

    if !line.contains('\t') {
        return Some(match parse_commit_header(line) {
            Some(header) => NumstatLine::Header(header),
            None => NumstatLine::BadHeader,
        });
    }

    let mut parts = line.split('\t');
    let added = parts.next()?;
    let deleted = parts.next()?;

    Some(NumstatLine::Counts {
        added: parse_count(added),
        deleted: parse_count(deleted),
    })
}

fn parse_commit_header(line: &str) -> Option<CommitHeader> {
    let (author, absolute) = line.rsplit_once('|')?;
    let author = author.trim();
    if author.is_empty() {
        return None;
    }
    let instant = parse_absolute(absolute)?;

    Some(CommitHeader {
        author_key: author.to_string(),
        date: instant.date_naive(),
        offset: instant.format("%z").to_string(),
    })
}

fn parse_count(field: &str) -> u64 {
    match field.trim() {
        "-" => 0,
        other => other.parse().unwrap_or(0),
    }
}

fn parse_absolute(input: &str) -> Option<DateTime<FixedOffset>> {
    let input = input.trim();

    // git %ai: "2024-03-04 10:15:00 +0800"
    if let Ok(dt) = DateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S %z") {
        return Some(dt);
    }

    // git %aI: strict ISO 8601
    DateTime::parse_from_rfc3339(input).ok()
}

fn parse_local_hour(input: &str) -> Option<u32> {
    let (_, time) = input.trim().split_once(' ')?;
    let hour: u32 = time.split(':').next()?.trim().parse().ok()?;
    (hour < 24).then_some(hour)
}
