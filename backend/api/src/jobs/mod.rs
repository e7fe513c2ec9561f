/// Background jobs
pub mod story_sweeper;
