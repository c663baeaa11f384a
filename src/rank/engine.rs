use super::metrics::derive_item;
use super::RankView;
use crate::aggregate::AuthorStats;
use crate::model::{RankingItem, Summary};
use crate::util::round2;
use tracing::debug;

/// The three independently ranked projections of one item set.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedViews {
    pub by_lines: Vec<RankingItem>,
    pub by_commits: Vec<RankingItem>,
    pub by_index_996: Vec<RankingItem>,
}

/// Commit count an author needs to be reported. Never below one, so
/// zero-commit accumulators never reach derivation.
pub fn commit_threshold(min_commits: u32) -> u32 {
    min_commits.max(1)
}

/// Drops authors under `min_commits` and derives one item per survivor,
/// in map order.
pub fn derive_items(stats: AuthorStats, min_commits: u32) -> Vec<RankingItem> {
    let threshold = commit_threshold(min_commits);
    let before = stats.len();

    let items: Vec<RankingItem> = stats
        .into_iter()
        .filter(|(_, acc)| acc.total_commits >= threshold)
        .map(|(key, acc)| derive_item(&key, acc))
        .collect();

    debug!(before, after = items.len(), threshold, "applied min-commit filter");
    items
}

/// Sort key of `item` in `view`; larger ranks first.
pub fn sort_key(item: &RankingItem, view: RankView) -> f64 {
    match view {
        RankView::Lines => item.lines_total as f64,
        RankView::Commits => item.total_commits as f64,
        RankView::Index996 => item.index_996,
    }
}

/// Stable descending sort, so ties keep map order.
fn sort_view(items: &mut [RankingItem], view: RankView) {
    match view {
        RankView::Lines => items.sort_by(|a, b| b.lines_total.cmp(&a.lines_total)),
        RankView::Commits => items.sort_by(|a, b| b.total_commits.cmp(&a.total_commits)),
        RankView::Index996 => items.sort_by(|a, b| b.index_996.total_cmp(&a.index_996)),
    }
}

fn assign_ranks(items: &mut [RankingItem]) {
    for (i, item) in items.iter_mut().enumerate() {
        item.rank = i as u32 + 1;
    }
}

/// Owned copy of `items`, sorted and ranked for `view`.
pub fn ranked_view(items: &[RankingItem], view: RankView) -> Vec<RankingItem> {
    let mut ranked = items.to_vec();
    sort_view(&mut ranked, view);
    assign_ranks(&mut ranked);
    ranked
}

pub fn rank_items(items: &[RankingItem]) -> RankedViews {
    RankedViews {
        by_lines: ranked_view(items, RankView::Lines),
        by_commits: ranked_view(items, RankView::Commits),
        by_index_996: ranked_view(items, RankView::Index996),
    }
}

pub fn rank_authors(stats: AuthorStats, min_commits: u32) -> RankedViews {
    rank_items(&derive_items(stats, min_commits))
}

/// Population summary over the 996-index view.
///
/// The median of an even-length sample is the upper-middle value, without
/// averaging.
pub fn summarize(by_index_996: &[RankingItem]) -> Summary {
    let Some(top) = by_index_996.first() else {
        return Summary::default();
    };

    let mut indices: Vec<f64> = by_index_996.iter().map(|i| i.index_996).collect();
    indices.sort_by(|a, b| a.total_cmp(b));

    let count = indices.len();
    let mean = indices.iter().sum::<f64>() / count as f64;

    Summary {
        total_authors: count,
        avg_index_996: round2(mean),
        median_index_996: round2(indices[count / 2]),
        highest_index_996: round2(indices[count - 1]),
        lowest_index_996: round2(indices[0]),
        top_author: Some(top.author.clone()),
        top_email: Some(top.email.clone()),
    }
}
