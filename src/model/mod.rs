pub mod chart;
pub mod interaction;
pub mod mutation;
pub mod project;
pub mod task;
pub mod timeline;
pub mod tree;

pub use chart::{AxisTick, BarGeometry, GanttChart};
pub use interaction::{DragKind, DragState, DragTarget};
pub use mutation::{BaselineEdit, NewTask, TaskEdit};
pub use project::Project;
pub use task::{DateSpan, Task, TaskType};
pub use timeline::{Calendar, DateAxis, Granularity, TimelineRange, WeekStart};
pub use tree::VisibleRow;
