use crate::error::{GrindError, Result};
use gix::{discover, Repository};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        debug!("Opened git repository at {}", path.display());

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Author pattern matching the configured `user.name`, for `--self`.
    pub fn self_author_pattern(&self) -> Result<String> {
        let config = self.repo.config_snapshot();
        let name = config
            .string("user.name")
            .map(|n| n.to_string())
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| {
                GrindError::Config("git user.name is not set; cannot resolve --self".to_string())
            })?;

        Ok(regex::escape(name.trim()))
    }
}
