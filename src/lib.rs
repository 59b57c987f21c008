//! Interactive Gantt timeline engine: calendar math, hierarchical row
//! visibility, and drag editing of task dates, progress and baselines.

pub mod config;
pub mod error;
pub mod io;
pub mod model;

pub use config::GanttConfig;
pub use error::{AnalysisError, ConfigError, TaskError};
