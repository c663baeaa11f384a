use crate::error::{GrindError, Result};
use crate::model::TimeWindow;
use crate::options::AnalysisOptions;
use chrono::{DateTime, Duration, Months, NaiveDate};

/// First and last commit dates of the repository.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepoBounds {
    pub first: Option<NaiveDate>,
    pub last: Option<NaiveDate>,
}

/// Whether resolving the window for `options` needs the repository bounds.
pub fn needs_bounds(options: &AnalysisOptions) -> bool {
    match (&options.since, &options.until) {
        (Some(_), Some(_)) => false,
        (Some(_), None) | (None, Some(_)) => true,
        (None, None) => options.all_time || options.year.is_none(),
    }
}

/// Resolves the reporting window.
///
/// Precedence: explicit since/until, then all-time, then year or year
/// range, then the year leading up to the last commit. A missing
/// since/until bound falls back to the first/last commit date.
pub fn resolve_window(
    options: &AnalysisOptions,
    bounds: RepoBounds,
    today: NaiveDate,
) -> Result<TimeWindow> {
    let first = bounds.first.unwrap_or(today);
    let last = bounds.last.unwrap_or(today);

    let window = if options.since.is_some() || options.until.is_some() {
        let since = match options.since.as_deref() {
            Some(s) => parse_date(s, today)?,
            None => first,
        };
        let until = match options.until.as_deref() {
            Some(u) => parse_date(u, today)?,
            None => last,
        };
        TimeWindow { since, until }
    } else if options.all_time {
        TimeWindow { since: first, until: last }
    } else if let Some(year) = options.year.as_deref() {
        year_window(year)?
    } else {
        let since = last
            .checked_sub_months(Months::new(12))
            .ok_or_else(|| GrindError::InvalidDate(format!("Cannot go back one year from {last}")))?;
        TimeWindow { since, until: last }
    };

    if window.since > window.until {
        return Err(GrindError::Config(format!(
            "Invalid range: since ({}) is after until ({})",
            window.since, window.until
        )));
    }

    Ok(window)
}

fn year_window(input: &str) -> Result<TimeWindow> {
    let parse_year = |s: &str| -> Result<i32> {
        s.trim()
            .parse::<i32>()
            .map_err(|_| GrindError::InvalidDate(format!("Invalid year '{input}'")))
    };

    let (start, end) = match input.split_once('-') {
        Some((a, b)) => (parse_year(a)?, parse_year(b)?),
        None => {
            let y = parse_year(input)?;
            (y, y)
        }
    };

    let since = NaiveDate::from_ymd_opt(start, 1, 1)
        .ok_or_else(|| GrindError::InvalidDate(format!("Invalid year '{input}'")))?;
    let until = NaiveDate::from_ymd_opt(end, 12, 31)
        .ok_or_else(|| GrindError::InvalidDate(format!("Invalid year '{input}'")))?;

    Ok(TimeWindow { since, until })
}

/// Accepts RFC3339, `YYYY-MM-DD`, or `N days|weeks|months ago`.
pub fn parse_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    // RFC3339
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.date_naive());
    }

    // YYYY-MM-DD
    if let Ok(date) = NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d") {
        return Ok(date);
    }

    parse_relative(input, today)
        .ok_or_else(|| GrindError::InvalidDate(format!("Unrecognized date '{input}'")))
}

fn parse_relative(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let input = input.trim().to_lowercase();

    if let Some(days) = input.strip_suffix(" days ago") {
        let n: i64 = days.trim().parse().ok()?;
        return today.checked_sub_signed(Duration::days(n));
    }

    if let Some(weeks) = input.strip_suffix(" weeks ago") {
        let n: i64 = weeks.trim().parse().ok()?;
        return today.checked_sub_signed(Duration::weeks(n));
    }

    if let Some(months) = input.strip_suffix(" months ago") {
        let n: u32 = months.trim().parse().ok()?;
        return today.checked_sub_months(Months::new(n));
    }

    None
}
