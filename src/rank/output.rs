use super::RankView;
use crate::model::{IntensityTier, RankOutput, RankingItem, RankingResult, SCHEMA_VERSION};
use anyhow::Result;
use chrono::Utc;
use console::{style, StyledObject};
use std::path::Path;

const RULE_WIDTH: usize = 100;

fn line(out: &mut String, text: impl AsRef<str>) {
    out.push_str(text.as_ref());
    out.push('\n');
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut s: String = text.chars().take(max.saturating_sub(1)).collect();
        s.push('…');
        s
    }
}

fn styled_index(index: f64) -> StyledObject<String> {
    let text = format!("{index:.2}");
    if index < 30.0 {
        style(text).green()
    } else if index < 60.0 {
        style(text).yellow()
    } else {
        style(text).red().bold()
    }
}

fn tier_badge(tier: IntensityTier) -> StyledObject<&'static str> {
    match tier {
        IntensityTier::Normal => style("●").green(),
        IntensityTier::Moderate => style("●").yellow(),
        IntensityTier::Heavy => style("●").red(),
    }
}

fn tier_text(tier: IntensityTier) -> &'static str {
    match tier {
        IntensityTier::Normal => "normal (0-30)",
        IntensityTier::Moderate => "moderate (30-60)",
        IntensityTier::Heavy => "heavy (60+)",
    }
}

/// Terminal table of one view, truncated to `top_n`, with summary and
/// metadata.
pub fn render_text(result: &RankingResult, view: RankView, top_n: usize) -> String {
    let mut out = String::new();
    let items = view.items(result);

    line(&mut out, style(view.title()).bold().to_string());
    line(&mut out, "─".repeat(RULE_WIDTH));

    if items.is_empty() {
        line(
            &mut out,
            style(format!(
                "No authors with at least {} commits in this window",
                result.metadata.filter_threshold
            ))
            .yellow()
            .to_string(),
        );
    } else {
        line(
            &mut out,
            format!(
                "{:<5} {:<22} {:<28} {:>7} {:>9} {:>9} {:>8}  {}",
                style("Rank").bold(),
                style("Author").bold(),
                style("Email").bold(),
                style("Commits").bold(),
                style("996").bold(),
                style("Overtime").bold(),
                style("Weekend").bold(),
                style("Lines").bold()
            ),
        );
        for item in items.iter().take(top_n) {
            line(
                &mut out,
                format!(
                    "{:<5} {} {:<20} {:<28} {:>7} {:>9} {:>8.1}% {:>7.1}%  {} {}",
                    item.rank,
                    tier_badge(item.intensity),
                    truncate(&item.author, 20),
                    style(truncate(&item.email, 28)).dim(),
                    item.total_commits,
                    styled_index(item.index_996),
                    item.overtime_rate,
                    item.weekend_ratio,
                    style(format!("+{}", item.lines_added)).green(),
                    style(format!("-{}", item.lines_deleted)).red()
                ),
            );
        }
        if items.len() > top_n {
            line(&mut out, format!("\n... and {} more authors", items.len() - top_n));
        }
    }
    line(&mut out, "");

    let summary = &result.summary;
    if summary.total_authors > 0 {
        line(&mut out, style("Summary").bold().to_string());
        line(&mut out, format!("  Authors ranked:   {}", summary.total_authors));
        line(&mut out, format!("  Average 996:      {}", style(format!("{:.2}", summary.avg_index_996)).yellow()));
        line(&mut out, format!("  Median 996:       {}", style(format!("{:.2}", summary.median_index_996)).yellow()));
        line(&mut out, format!("  Highest 996:      {}", style(format!("{:.2}", summary.highest_index_996)).red()));
        line(&mut out, format!("  Lowest 996:       {}", style(format!("{:.2}", summary.lowest_index_996)).green()));
        if let Some(top) = &summary.top_author {
            line(
                &mut out,
                format!(
                    "  Top:              {} ({})",
                    style(top).red().bold(),
                    style(summary.top_email.as_deref().unwrap_or("")).dim()
                ),
            );
        }
        line(&mut out, "");
    }

    let meta = &result.metadata;
    line(&mut out, style("─".repeat(RULE_WIDTH)).dim().to_string());
    line(&mut out, style(format!("Window: {} ~ {}", meta.time_range.since, meta.time_range.until)).dim().to_string());
    line(&mut out, style(format!("Commits in window: {}", meta.total_commits)).dim().to_string());
    line(&mut out, style(format!("Minimum commits: {}", meta.filter_threshold)).dim().to_string());
    out
}

fn report_view(out: &mut String, title: &str, items: &[RankingItem]) {
    line(out, "─".repeat(RULE_WIDTH));
    line(out, title);
    line(out, "─".repeat(RULE_WIDTH));
    line(
        out,
        format!(
            "{:<6}{:<22}{:<32}{:>8}{:>10}{:>10}{:>12}",
            "Rank", "Author", "Email", "Commits", "996", "Tier", "Lines"
        ),
    );
    for item in items {
        line(
            out,
            format!(
                "{:<6}{:<22}{:<32}{:>8}{:>10.2}{:>10}{:>12}",
                item.rank,
                truncate(&item.author, 20),
                truncate(&item.email, 30),
                item.total_commits,
                item.index_996,
                item.intensity.to_string(),
                item.lines_total
            ),
        );
    }
    line(out, "");
}

/// Plain-text report with all three views, for `--export`.
pub fn render_report(result: &RankingResult) -> String {
    let mut out = String::new();
    let meta = &result.metadata;
    let summary = &result.summary;

    line(&mut out, "=".repeat(RULE_WIDTH));
    line(&mut out, "Contributor Work Intensity Report");
    line(&mut out, "=".repeat(RULE_WIDTH));
    line(&mut out, format!("Generated: {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC")));
    line(&mut out, format!("Window: {} ~ {}", meta.time_range.since, meta.time_range.until));
    line(&mut out, "");

    report_view(&mut out, RankView::Lines.title(), &result.by_lines);
    report_view(&mut out, RankView::Commits.title(), &result.by_commits);
    report_view(&mut out, RankView::Index996.title(), &result.by_index_996);

    line(&mut out, "─".repeat(RULE_WIDTH));
    line(&mut out, "Summary");
    line(&mut out, "─".repeat(RULE_WIDTH));
    line(&mut out, format!("Authors ranked: {}", summary.total_authors));
    line(&mut out, format!("Average 996: {:.2}", summary.avg_index_996));
    line(&mut out, format!("Median 996: {:.2}", summary.median_index_996));
    line(&mut out, format!("Highest 996: {:.2}", summary.highest_index_996));
    line(&mut out, format!("Lowest 996: {:.2}", summary.lowest_index_996));
    if let Some(top) = &summary.top_author {
        line(
            &mut out,
            format!("Top: {} ({})", top, summary.top_email.as_deref().unwrap_or("")),
        );
    }
    line(&mut out, "");
    line(&mut out, format!("Commits in window: {}", meta.total_commits));
    line(&mut out, format!("Minimum commits: {}", meta.filter_threshold));
    out
}

/// First author in the 996 view whose name or email contains `needle`.
pub fn find_author<'a>(result: &'a RankingResult, needle: &str) -> Option<&'a RankingItem> {
    result
        .by_index_996
        .iter()
        .find(|i| i.author.contains(needle) || i.email.contains(needle))
}

pub fn render_author_detail(item: &RankingItem) -> String {
    let rows = [
        ("Author", item.author.clone()),
        ("Email", item.emails.join(", ")),
        ("Commits", item.total_commits.to_string()),
        ("996 index", format!("{:.2}", item.index_996)),
        ("Overtime rate", format!("{:.1}%", item.overtime_rate)),
        ("Work-hour commits", item.work_hours_commits.to_string()),
        ("Overtime commits", item.overtime_commits.to_string()),
        (
            "Weekend commits",
            format!("{} ({:.1}%)", item.weekend_commits, item.weekend_ratio),
        ),
        ("Weekend days", item.weekend_days.to_string()),
        (
            "Lines",
            format!("+{} -{} (total {})", item.lines_added, item.lines_deleted, item.lines_total),
        ),
        ("Intensity", tier_text(item.intensity).to_string()),
    ];

    let mut out = String::new();
    line(&mut out, style("Author Detail").bold().to_string());
    line(&mut out, "─".repeat(52));
    for (label, value) in rows {
        line(&mut out, format!("{label:<18} {value}"));
    }
    out
}

pub fn output_json(result: &RankingResult, repository_path: &Path) -> Result<()> {
    let output = RankOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository_path: repository_path.to_string_lossy().to_string(),
        result: result.clone(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn output_ndjson(items: &[RankingItem]) -> Result<()> {
    for item in items {
        println!("{}", serde_json::to_string(item)?);
    }
    Ok(())
}
