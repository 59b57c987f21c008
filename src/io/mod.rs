pub mod analysis;

pub use analysis::{AnalysisReport, CommandAnalyzer, ScheduleAnalyzer};
