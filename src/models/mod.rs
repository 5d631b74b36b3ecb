pub mod daily_record;

pub use daily_record::{ArtifactPaths, DailyRecord};
