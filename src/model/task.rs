use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a task is drawn: a date-range bar, a summary bar, or a zero-width marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    #[default]
    Task,
    Project,
    Milestone,
}

impl TaskType {
    pub fn all() -> &'static [TaskType] {
        &[TaskType::Task, TaskType::Project, TaskType::Milestone]
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskType::Task => "Task",
            TaskType::Project => "Project",
            TaskType::Milestone => "Milestone",
        }
    }
}

/// An inclusive pair of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Whole days from start to end, never negative.
    pub fn duration_days(&self) -> i64 {
        duration_days(self.start, self.end)
    }
}

/// `ceil((end - start) / 1 day)` clamped to zero. Dates carry no time of day,
/// so the ceiling is the plain day difference.
pub fn duration_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().max(0)
}

/// `date` moved by `days`, or `None` when the result leaves the calendar.
pub fn offset_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    }
}

/// A single row of the schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Derived from the actual window; recomputed by every mutation.
    pub duration: i64,
    /// Progress from 0.0 (not started) to 1.0 (complete).
    pub progress: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Whether children are shown. Meaningless for leaf tasks.
    #[serde(default = "default_open")]
    pub open: bool,
    #[serde(rename = "type", default)]
    pub task_type: TaskType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_start: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub planned_end: Option<NaiveDate>,
}

fn default_open() -> bool {
    true
}

impl Task {
    /// Create a task whose baseline equals its actual window.
    pub fn new(text: impl Into<String>, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            id: fresh_id(),
            text: text.into(),
            start_date: start,
            end_date: end,
            duration: duration_days(start, end),
            progress: 0.0,
            parent: None,
            open: true,
            task_type: TaskType::Task,
            planned_start: Some(start),
            planned_end: Some(end),
        }
    }

    /// Create a milestone on a single date.
    pub fn new_milestone(text: impl Into<String>, date: NaiveDate) -> Self {
        let mut task = Self::new(text, date, date);
        task.task_type = TaskType::Milestone;
        task
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn is_milestone(&self) -> bool {
        self.task_type == TaskType::Milestone
    }

    pub fn actual(&self) -> DateSpan {
        DateSpan::new(self.start_date, self.end_date)
    }

    /// The baseline window, only when both ends are recorded.
    pub fn baseline(&self) -> Option<DateSpan> {
        match (self.planned_start, self.planned_end) {
            (Some(start), Some(end)) => Some(DateSpan::new(start, end)),
            _ => None,
        }
    }

    /// Replace the actual window and recompute `duration`.
    pub fn set_actual(&mut self, span: DateSpan) {
        self.start_date = span.start;
        self.end_date = span.end;
        self.duration = span.duration_days();
    }

    pub fn set_baseline(&mut self, span: DateSpan) {
        self.planned_start = Some(span.start);
        self.planned_end = Some(span.end);
    }

    /// Progress as a whole percentage for display.
    pub fn progress_percent(&self) -> i32 {
        (self.progress * 100.0).round() as i32
    }
}

/// A new unique task id.
pub fn fresh_id() -> String {
    format!("task-{}", Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn new_task_copies_window_into_baseline() {
        let task = Task::new("Design", date(2024, 4, 9), date(2024, 4, 18));
        assert_eq!(task.duration, 9);
        assert_eq!(task.baseline(), Some(task.actual()));
        assert!(task.open);
        assert_eq!(task.progress, 0.0);
    }

    #[test]
    fn milestone_has_zero_duration() {
        let task = Task::new_milestone("Beta", date(2024, 4, 29));
        assert!(task.is_milestone());
        assert_eq!(task.duration, 0);
    }

    #[test]
    fn duration_never_negative() {
        assert_eq!(duration_days(date(2024, 4, 10), date(2024, 4, 1)), 0);
    }

    #[test]
    fn partial_baseline_is_absent() {
        let mut task = Task::new("Spec", date(2024, 4, 1), date(2024, 4, 5));
        task.planned_end = None;
        assert_eq!(task.baseline(), None);
    }

    #[test]
    fn fresh_ids_differ() {
        assert_ne!(fresh_id(), fresh_id());
    }

    #[test]
    fn deserializes_without_optional_fields() {
        let json = r#"{
            "id": "1",
            "text": "Launch",
            "start_date": "2024-04-01",
            "end_date": "2024-04-30",
            "duration": 29,
            "progress": 0.35,
            "type": "project"
        }"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.task_type, TaskType::Project);
        assert!(task.open);
        assert_eq!(task.parent, None);
        assert_eq!(task.baseline(), None);
    }
}
