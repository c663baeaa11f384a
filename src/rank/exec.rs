use super::output::{find_author, output_json, output_ndjson, render_author_detail, render_report, render_text};
use super::{analyze, RankView};
use crate::cli::CommonArgs;
use crate::git::{GitLogSource, GitRepo};
use crate::options::AnalysisOptions;
use anyhow::Context;
use chrono::Local;
use console::style;
use std::path::PathBuf;

/// Opens the repository and turns CLI arguments into analysis options,
/// resolving `--self` against the repository configuration.
pub fn prepare(common: &CommonArgs) -> anyhow::Result<(GitRepo, AnalysisOptions)> {
    let repo = GitRepo::open(common.repo.as_ref()).context("Failed to open git repository")?;
    let mut options = AnalysisOptions::from(common);

    if options.self_only {
        let pattern = repo
            .self_author_pattern()
            .context("Failed to resolve the current git user")?;
        options.author_pattern = Some(pattern);
    }

    Ok((repo, options))
}

pub fn exec(
    common: CommonArgs,
    json: bool,
    ndjson: bool,
    top: usize,
    sort_by: RankView,
    author: Option<String>,
    export: Option<PathBuf>,
) -> anyhow::Result<()> {
    let (repo, mut options) = prepare(&common)?;
    options.top_n = top;

    let source = GitLogSource::new(&repo);
    // Keep machine-readable output clean
    let progress = !(json || ndjson);
    let result = analyze(&source, &options, Local::now().date_naive(), progress)
        .context("Failed to analyze commit history")?;

    if json {
        output_json(&result, repo.path())?;
    } else if ndjson {
        output_ndjson(sort_by.items(&result))?;
    } else {
        print!("{}", render_text(&result, sort_by, top));

        if let Some(needle) = author.as_deref() {
            match find_author(&result, needle) {
                Some(item) => print!("\n{}", render_author_detail(item)),
                None => println!("\n{}", style(format!("Author not found: {needle}")).yellow()),
            }
        }
    }

    if let Some(path) = export {
        std::fs::write(&path, render_report(&result))
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        eprintln!("Report written to {}", path.display());
    }

    Ok(())
}
