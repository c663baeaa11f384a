use crate::cli::CommonArgs;
use crate::git::GitLogSource;
use crate::model::{AuthorIdentity, HoursEntry, HoursOutput, TimeWindow, SCHEMA_VERSION};
use crate::rank::exec::prepare;
use crate::rank::{collect_author_stats, commit_threshold, merge_authors};
use anyhow::Context;
use chrono::{Local, Utc};
use console::style;

pub fn exec(common: CommonArgs, json: bool) -> anyhow::Result<()> {
    let (repo, options) = prepare(&common)?;
    let source = GitLogSource::new(&repo);

    let collected = collect_author_stats(&source, &options, Local::now().date_naive(), !json)
        .context("Failed to collect commit history")?;
    let stats = merge_authors(collected.aggregation.stats, options.merge_authors);

    let threshold = commit_threshold(options.min_commits);
    let mut entries: Vec<HoursEntry> = stats
        .iter()
        .filter(|(_, acc)| acc.total_commits >= threshold)
        .map(|(key, acc)| {
            let identity = AuthorIdentity::parse(key);
            HoursEntry {
                author: identity.name,
                email: identity.email,
                total_commits: acc.total_commits,
                peak_hour: peak_hour(&acc.hour_histogram),
                histogram: acc.hour_histogram,
            }
        })
        .collect();
    entries.sort_by(|a, b| b.total_commits.cmp(&a.total_commits));

    if json {
        output_json(&entries, &collected.window, repo.path())?;
    } else {
        print!("{}", render_hours(&entries, &collected.window));
    }
    Ok(())
}

/// Earliest hour with the most commits.
fn peak_hour(histogram: &[u32; 24]) -> u32 {
    let mut peak = 0;
    for (hour, &count) in histogram.iter().enumerate() {
        if count > histogram[peak] {
            peak = hour;
        }
    }
    peak as u32
}

fn intensity_char(count: u32, max: u32) -> &'static str {
    if count == 0 || max == 0 {
        return "·";
    }
    match ((count as f64 / max as f64) * 5.0).ceil() as u32 {
        0 | 1 => "▁",
        2 => "▃",
        3 => "▅",
        4 => "▇",
        _ => "█",
    }
}

fn render_hours(entries: &[HoursEntry], window: &TimeWindow) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", style("Commit Hours by Author").bold()));
    out.push_str(&format!("{}\n", style(format!("{} ~ {}", window.since, window.until)).dim()));
    out.push_str(&format!("{}\n", "─".repeat(72)));

    if entries.is_empty() {
        out.push_str("No data to display\n");
        return out;
    }

    out.push_str(&format!("{:<24} {}\n", "", "0  3  6  9  12 15 18 21"));
    for entry in entries {
        let max = entry.histogram.iter().copied().max().unwrap_or(0);
        let strip: String = entry
            .histogram
            .iter()
            .enumerate()
            .map(|(hour, &count)| {
                let c = intensity_char(count, max);
                if (9..18).contains(&hour) {
                    style(c).green().to_string()
                } else {
                    style(c).red().to_string()
                }
            })
            .collect();
        let name: String = entry.author.chars().take(23).collect();
        out.push_str(&format!(
            "{:<24} {} commits: {:>4}, peak: {:02}:00\n",
            name, strip, entry.total_commits, entry.peak_hour
        ));
    }

    out.push_str(&format!("\n{}\n", style("Legend").bold()));
    out.push_str(&format!("  {} work hours (09-18)\n", style("▁▃▅▇█").green()));
    out.push_str(&format!("  {} outside work hours\n", style("▁▃▅▇█").red()));
    out
}

fn output_json(entries: &[HoursEntry], window: &TimeWindow, repo_path: &std::path::Path) -> anyhow::Result<()> {
    let output = HoursOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository_path: repo_path.to_string_lossy().to_string(),
        time_range: *window,
        authors: entries.to_vec(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
