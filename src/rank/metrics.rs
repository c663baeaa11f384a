use crate::model::{AuthorAccumulator, AuthorIdentity, IntensityTier, RankingItem};
use crate::util::round2;
use std::collections::HashSet;

/// Weight of a weekend commit relative to an out-of-hours commit.
pub const WEEKEND_WEIGHT: f64 = 0.8;
pub const INDEX_SCALE: f64 = 3.0;
pub const MODERATE_FROM: f64 = 30.0;
pub const HEAVY_FROM: f64 = 60.0;

/// Unrounded 996 index. Not capped; values above 300 are possible.
pub fn index_996(overtime_commits: u32, weekend_commits: u32, total_commits: u32) -> f64 {
    debug_assert!(total_commits > 0, "index_996 needs at least one commit");
    let weighted = overtime_commits as f64 + weekend_commits as f64 * WEEKEND_WEIGHT;
    let overtime_ratio = weighted / total_commits as f64 * 100.0;
    overtime_ratio * INDEX_SCALE
}

pub fn intensity_tier(index_996: f64) -> IntensityTier {
    if index_996 < MODERATE_FROM {
        IntensityTier::Normal
    } else if index_996 < HEAVY_FROM {
        IntensityTier::Moderate
    } else {
        IntensityTier::Heavy
    }
}

fn percent(part: u32, total: u32) -> f64 {
    round2(part as f64 / total as f64 * 100.0)
}

/// Distinct calendar dates with at least one weekend commit.
pub fn weekend_days(acc: &AuthorAccumulator) -> u32 {
    acc.commit_stamps
        .iter()
        .filter(|s| s.is_weekend())
        .map(|s| s.date)
        .collect::<HashSet<_>>()
        .len() as u32
}

/// Builds the unranked item for one author. `acc.total_commits` must be
/// non-zero.
pub fn derive_item(key: &str, acc: AuthorAccumulator) -> RankingItem {
    let identity = AuthorIdentity::parse(key);
    let total = acc.total_commits;
    let raw_index = index_996(acc.overtime_commits, acc.weekend_commits, total);

    let emails = if acc.emails.is_empty() && !identity.email.is_empty() {
        vec![identity.email.clone()]
    } else {
        acc.emails.clone()
    };

    RankingItem {
        rank: 0,
        weekend_days: weekend_days(&acc),
        author: identity.name,
        email: identity.email,
        emails,
        total_commits: total,
        index_996: round2(raw_index),
        overtime_rate: percent(acc.overtime_commits, total),
        weekend_ratio: percent(acc.weekend_commits, total),
        overtime_commits: acc.overtime_commits,
        weekend_commits: acc.weekend_commits,
        work_hours_commits: acc.work_hours_commits,
        intensity: intensity_tier(raw_index),
        lines_added: acc.lines_added,
        lines_deleted: acc.lines_deleted,
        lines_total: acc.lines_total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CommitRecord, CommitStamp};
    use chrono::NaiveDate;

    fn commit(acc: &mut AuthorAccumulator, day: u32, hour: u32) {
        let date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        acc.add_commit(&CommitRecord {
            author_key: String::new(),
            stamp: CommitStamp {
                date,
                hour,
                weekday: chrono::Datelike::weekday(&date).num_days_from_sunday(),
            },
            offset: "+0000".to_string(),
            lines_added: 0,
            lines_deleted: 0,
        });
    }

    #[test]
    fn monday_late_commit_scenario() {
        let mut acc = AuthorAccumulator::new();
        commit(&mut acc, 4, 10);
        commit(&mut acc, 4, 14);
        commit(&mut acc, 4, 23);

        let item = derive_item("Alice <a@x.com>", acc);
        assert_eq!(item.rank, 0);
        assert_eq!(item.author, "Alice");
        assert_eq!(item.email, "a@x.com");
        assert_eq!(item.total_commits, 3);
        assert_eq!(item.work_hours_commits, 2);
        assert_eq!(item.overtime_commits, 1);
        assert_eq!(item.overtime_rate, 33.33);
        assert_eq!(item.weekend_commits, 0);
        assert_eq!(item.index_996, 100.0);
        assert_eq!(item.intensity, IntensityTier::Heavy);
    }

    #[test]
    fn office_hours_only_scores_zero() {
        let mut acc = AuthorAccumulator::new();
        for day in 4..=8 {
            commit(&mut acc, day, 9);
            commit(&mut acc, day, 17);
        }
        let item = derive_item("Dan <d@x.com>", acc);
        assert_eq!(item.index_996, 0.0);
        assert_eq!(item.overtime_rate, 0.0);
        assert_eq!(item.weekend_ratio, 0.0);
        assert_eq!(item.intensity, IntensityTier::Normal);
        assert_eq!(item.weekend_days, 0);
    }

    #[test]
    fn weekend_days_counts_distinct_dates() {
        let mut acc = AuthorAccumulator::new();
        commit(&mut acc, 9, 10); // Saturday
        commit(&mut acc, 9, 11);
        commit(&mut acc, 10, 10); // Sunday
        commit(&mut acc, 11, 10); // Monday

        let item = derive_item("Eve <e@x.com>", acc);
        assert_eq!(item.weekend_commits, 3);
        assert_eq!(item.weekend_days, 2);
        assert_eq!(item.weekend_ratio, 75.0);
        // (0 + 3 * 0.8) / 4 * 100 * 3
        assert_eq!(item.index_996, 180.0);
    }

    #[test]
    fn index_is_not_capped() {
        let index = index_996(10, 10, 10);
        assert!((index - 540.0).abs() < 1e-9);
        assert_eq!(intensity_tier(index), IntensityTier::Heavy);
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(intensity_tier(0.0), IntensityTier::Normal);
        assert_eq!(intensity_tier(29.99), IntensityTier::Normal);
        assert_eq!(intensity_tier(30.0), IntensityTier::Moderate);
        assert_eq!(intensity_tier(59.99), IntensityTier::Moderate);
        assert_eq!(intensity_tier(60.0), IntensityTier::Heavy);
    }

    #[test]
    fn index_grows_with_weighted_overtime() {
        let mut previous = -1.0;
        for overtime in 0..=10 {
            let index = index_996(overtime, 0, 10);
            assert!(index >= previous);
            previous = index;
        }
        assert!(index_996(0, 5, 10) > index_996(0, 4, 10));
        assert!(index_996(3, 0, 10) < index_996(0, 5, 10));
    }
}
