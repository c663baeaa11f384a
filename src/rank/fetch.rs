use super::window::{needs_bounds, resolve_window, RepoBounds};
use crate::aggregate::{Aggregation, AuthorStatsAggregator, RecordFilter};
use crate::error::Result;
use crate::git::{LogQuery, LogSource};
use crate::model::TimeWindow;
use crate::options::AnalysisOptions;
use crate::util::spinner;
use chrono::{Days, NaiveDate};
use tracing::info;

/// Extra days read on each side of a bounded window. git applies
/// `--since`/`--until` in the local zone while commit dates are in each
/// author's own offset, and the two can differ by up to 26 hours.
const QUERY_SLACK_DAYS: u64 = 2;

/// Per-author statistics for the resolved window, before merging.
#[derive(Debug, Clone)]
pub struct Collected {
    pub window: TimeWindow,
    pub aggregation: Aggregation,
}

/// Resolves the window and folds both log streams, timing first.
pub fn collect_author_stats(
    source: &dyn LogSource,
    options: &AnalysisOptions,
    today: NaiveDate,
    progress: bool,
) -> Result<Collected> {
    let filter = RecordFilter::from_options(options)?;

    let bounds = if needs_bounds(options) {
        RepoBounds {
            first: source.first_commit_date()?,
            last: source.last_commit_date()?,
        }
    } else {
        RepoBounds::default()
    };
    let window = resolve_window(options, bounds, today)?;
    info!(since = %window.since, until = %window.until, "resolved analysis window");

    // All-time runs read the whole log. Bounded runs read a wider slice and
    // clip per commit on its own calendar date.
    let bounded = options.since.is_some() || options.until.is_some() || !options.all_time;
    let (filter, since, until) = if bounded {
        let slack = Days::new(QUERY_SLACK_DAYS);
        (
            filter.with_window(window),
            Some(window.since.checked_sub_days(slack).unwrap_or(window.since)),
            Some(window.until.checked_add_days(slack).unwrap_or(window.until)),
        )
    } else {
        (filter, None, None)
    };
    let query = LogQuery {
        since,
        until,
        author_pattern: options.author_pattern.clone(),
        exclude_messages: options.exclude_messages.clone(),
    };

    let pb = spinner(progress, "Reading commit times...");
    let mut aggregator = AuthorStatsAggregator::new(filter);

    let timing = source.timing_log(&query)?;
    aggregator.fold_timing(&timing);

    pb.set_message("Reading line counts...");
    let numstat = source.numstat_log(&query)?;
    aggregator.fold_numstat(&numstat);
    pb.finish_and_clear();

    let aggregation = aggregator.finish();
    info!(
        commits = aggregation.total_commits,
        authors = aggregation.stats.len(),
        "collected author statistics"
    );

    Ok(Collected { window, aggregation })
}
