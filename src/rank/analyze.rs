use super::engine::{commit_threshold, rank_authors, summarize};
use super::fetch::collect_author_stats;
use super::merge::merge_authors;
use crate::error::Result;
use crate::git::LogSource;
use crate::model::{Metadata, RankingResult};
use crate::options::AnalysisOptions;
use chrono::NaiveDate;
use tracing::info;

/// Full ranking pipeline: collect, merge, filter, derive, rank, summarize.
pub fn analyze(
    source: &dyn LogSource,
    options: &AnalysisOptions,
    today: NaiveDate,
    progress: bool,
) -> Result<RankingResult> {
    let collected = collect_author_stats(source, options, today, progress)?;
    let total_commits = collected.aggregation.total_commits;

    let stats = merge_authors(collected.aggregation.stats, options.merge_authors);
    let views = rank_authors(stats, options.min_commits);
    let summary = summarize(&views.by_index_996);
    info!(ranked = summary.total_authors, "ranking complete");

    Ok(RankingResult {
        by_lines: views.by_lines,
        by_commits: views.by_commits,
        by_index_996: views.by_index_996,
        summary,
        metadata: Metadata {
            time_range: collected.window,
            total_commits,
            filter_threshold: commit_threshold(options.min_commits),
            top_n: options.top_n,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GrindError;
    use crate::git::LogQuery;
    use crate::model::{IntensityTier, TimeWindow};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    struct FakeSource {
        timing: String,
        numstat: String,
        first: Option<NaiveDate>,
        last: Option<NaiveDate>,
        queries: RefCell<Vec<LogQuery>>,
    }

    impl FakeSource {
        fn new(timing: &str, numstat: &str) -> Self {
            Self {
                timing: timing.to_string(),
                numstat: numstat.to_string(),
                first: NaiveDate::from_ymd_opt(2023, 1, 2),
                last: NaiveDate::from_ymd_opt(2024, 3, 10),
                queries: RefCell::new(Vec::new()),
            }
        }
    }

    impl LogSource for FakeSource {
        fn timing_log(&self, query: &LogQuery) -> Result<String> {
            self.queries.borrow_mut().push(query.clone());
            Ok(self.timing.clone())
        }

        fn numstat_log(&self, query: &LogQuery) -> Result<String> {
            self.queries.borrow_mut().push(query.clone());
            Ok(self.numstat.clone())
        }

        fn first_commit_date(&self) -> Result<Option<NaiveDate>> {
            Ok(self.first)
        }

        fn last_commit_date(&self) -> Result<Option<NaiveDate>> {
            Ok(self.last)
        }
    }

    struct BrokenSource;

    impl LogSource for BrokenSource {
        fn timing_log(&self, _: &LogQuery) -> Result<String> {
            Err(GrindError::SourceUnavailable("not a git repository".to_string()))
        }

        fn numstat_log(&self, _: &LogQuery) -> Result<String> {
            Err(GrindError::SourceUnavailable("not a git repository".to_string()))
        }

        fn first_commit_date(&self) -> Result<Option<NaiveDate>> {
            Ok(None)
        }

        fn last_commit_date(&self) -> Result<Option<NaiveDate>> {
            Ok(None)
        }
    }

    const TIMING: &str = "\
Alice <a@x.com>|2024-03-04 10:00:00|2024-03-04 10:00:00 +0800
Alice <a@x.com>|2024-03-04 14:00:00|2024-03-04 14:00:00 +0800
Alice <a@x.com>|2024-03-04 23:00:00|2024-03-04 23:00:00 +0800
Bob <b1@x.com>|2024-03-04 10:00:00|2024-03-04 10:00:00 +0000
Bob <b1@x.com>|2024-03-05 10:00:00|2024-03-05 10:00:00 +0000
Bob <b1@x.com>|2024-03-06 10:00:00|2024-03-06 10:00:00 +0000
Bob <b1@x.com>|2024-03-07 10:00:00|2024-03-07 10:00:00 +0000
Bob <b2@x.com>|2024-03-09 21:00:00|2024-03-09 21:00:00 +0000
Bob <b2@x.com>|2024-03-10 21:00:00|2024-03-10 21:00:00 +0000
";

    const NUMSTAT: &str = "\
Alice <a@x.com>|2024-03-04 23:00:00 +0800

40\t2\tsrc/a.rs
Bob <b1@x.com>|2024-03-07 10:00:00 +0000

5\t1\tsrc/b.rs
Bob <b2@x.com>|2024-03-10 21:00:00 +0000

-\t-\timg.png
3\t3\tsrc/c.rs
";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn ranks_alice_scenario() {
        let source = FakeSource::new(TIMING, NUMSTAT);
        let options = AnalysisOptions { min_commits: 3, ..Default::default() };
        let result = analyze(&source, &options, today(), false).unwrap();

        assert_eq!(result.by_index_996.len(), 2);
        let alice = &result.by_index_996[0];
        assert_eq!(alice.author, "Alice");
        assert_eq!(alice.rank, 1);
        assert_eq!(alice.index_996, 100.0);
        assert_eq!(alice.overtime_rate, 33.33);
        assert_eq!(alice.intensity, IntensityTier::Heavy);
        assert_eq!(alice.lines_total, 42);

        assert_eq!(result.summary.top_author.as_deref(), Some("Alice"));
        assert_eq!(result.metadata.total_commits, 9);
        assert_eq!(result.metadata.filter_threshold, 3);
        assert_eq!(result.metadata.top_n, 10);
        assert_eq!(
            result.metadata.time_range,
            TimeWindow {
                since: NaiveDate::from_ymd_opt(2023, 3, 10).unwrap(),
                until: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            }
        );
    }

    #[test]
    fn below_threshold_author_is_absent_from_every_view() {
        let source = FakeSource::new(TIMING, NUMSTAT);
        let result = analyze(&source, &AnalysisOptions::default(), today(), false).unwrap();

        // Alice has 3 commits, under the default threshold of 5.
        for view in [&result.by_lines, &result.by_commits, &result.by_index_996] {
            assert!(view.iter().all(|i| i.author != "Alice"));
        }
    }

    #[test]
    fn merges_bob_identities() {
        let source = FakeSource::new(TIMING, NUMSTAT);
        let options = AnalysisOptions {
            min_commits: 5,
            merge_authors: true,
            ..Default::default()
        };
        let result = analyze(&source, &options, today(), false).unwrap();

        assert_eq!(result.by_commits.len(), 1);
        let bob = &result.by_commits[0];
        assert_eq!(bob.author, "Bob");
        assert_eq!(bob.email, "b1@x.com");
        assert_eq!(bob.total_commits, 6);
        assert_eq!(bob.emails, vec!["b1@x.com", "b2@x.com"]);
        assert_eq!(bob.weekend_commits, 2);
        assert_eq!(bob.weekend_days, 2);
        assert_eq!(bob.lines_total, 12);
    }

    #[test]
    fn no_qualifying_authors_is_empty_not_error() {
        let source = FakeSource::new(TIMING, NUMSTAT);
        let options = AnalysisOptions { min_commits: 50, ..Default::default() };
        let result = analyze(&source, &options, today(), false).unwrap();

        assert!(result.by_lines.is_empty());
        assert_eq!(result.summary.total_authors, 0);
        assert!(result.summary.top_author.is_none());
        assert_eq!(result.metadata.total_commits, 9);
    }

    #[test]
    fn queries_use_resolved_window() {
        let source = FakeSource::new(TIMING, NUMSTAT);
        let options = AnalysisOptions {
            year: Some("2024".to_string()),
            exclude_messages: Some("^chore".to_string()),
            ..Default::default()
        };
        analyze(&source, &options, today(), false).unwrap();

        let queries = source.queries.borrow();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0], queries[1]);
        // Two days of slack either side; the window is enforced per commit.
        assert_eq!(queries[0].since, NaiveDate::from_ymd_opt(2023, 12, 30));
        assert_eq!(queries[0].until, NaiveDate::from_ymd_opt(2025, 1, 2));
        assert_eq!(queries[0].exclude_messages.as_deref(), Some("^chore"));
    }

    #[test]
    fn commits_outside_window_are_clipped_by_local_date() {
        let source = FakeSource::new(TIMING, NUMSTAT);
        let options = AnalysisOptions {
            since: Some("2024-03-05".to_string()),
            until: Some("2024-03-09".to_string()),
            min_commits: 1,
            ..Default::default()
        };
        let result = analyze(&source, &options, today(), false).unwrap();

        // Bob's b1 commits on 5..7 and b2's Saturday commit; Alice (4th)
        // and b2's Sunday commit fall outside.
        assert_eq!(result.metadata.total_commits, 4);
        let names: Vec<&str> = result.by_commits.iter().map(|i| i.email.as_str()).collect();
        assert_eq!(names, vec!["b1@x.com", "b2@x.com"]);
        let b2 = &result.by_commits[1];
        assert_eq!(b2.total_commits, 1);
        // b2's only header is dated the 10th, so its lines stay out.
        assert_eq!(b2.lines_total, 0);
    }

    #[test]
    fn reports_applied_threshold() {
        let source = FakeSource::new(TIMING, NUMSTAT);
        let options = AnalysisOptions { min_commits: 0, ..Default::default() };
        let result = analyze(&source, &options, today(), false).unwrap();
        assert_eq!(result.metadata.filter_threshold, 1);
        assert_eq!(result.by_commits.len(), 3);
    }

    #[test]
    fn all_time_reads_unbounded_log() {
        let source = FakeSource::new(TIMING, NUMSTAT);
        let options = AnalysisOptions { all_time: true, ..Default::default() };
        let result = analyze(&source, &options, today(), false).unwrap();

        let queries = source.queries.borrow();
        assert_eq!(queries[0].since, None);
        assert_eq!(queries[0].until, None);
        assert_eq!(result.metadata.time_range.since, NaiveDate::from_ymd_opt(2023, 1, 2).unwrap());
    }

    #[test]
    fn source_failure_aborts_analysis() {
        let options = AnalysisOptions { all_time: true, ..Default::default() };
        let err = analyze(&BrokenSource, &options, today(), false).unwrap_err();
        assert!(matches!(err, GrindError::SourceUnavailable(_)));
    }
}
