pub mod log;
pub mod repo;

pub use log::{GitLogSource, LogQuery, LogSource};
pub use repo::GitRepo;
