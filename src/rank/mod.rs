pub mod analyze;
pub mod engine;
pub mod exec;
pub mod fetch;
pub mod merge;
pub mod metrics;
pub mod output;
pub mod window;

pub use analyze::analyze;
pub use engine::{commit_threshold, rank_authors, summarize, RankedViews};
pub use exec::exec;
pub use fetch::{collect_author_stats, Collected};
pub use merge::merge_authors;
pub use output::{render_author_detail, render_report, render_text};

use crate::model::{RankingItem, RankingResult};

/// Which of the three rankings to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum RankView {
    #[value(name = "index996")]
    Index996,
    Commits,
    Lines,
}

impl RankView {
    pub fn title(&self) -> &'static str {
        match self {
            RankView::Index996 => "996 Index Ranking",
            RankView::Commits => "Commit Count Ranking",
            RankView::Lines => "Code Volume Ranking",
        }
    }

    pub fn items<'a>(&self, result: &'a RankingResult) -> &'a [RankingItem] {
        match self {
            RankView::Index996 => &result.by_index_996,
            RankView::Commits => &result.by_commits,
            RankView::Lines => &result.by_lines,
        }
    }
}
