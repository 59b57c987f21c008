//! Pure task updates: drag deltas and edit-form payloads.
//!
//! Every path that writes an actual window keeps `start_date <= end_date` and
//! recomputes `duration`; baseline paths keep `planned_start <= planned_end`.

use chrono::NaiveDate;

use super::task::{offset_days, DateSpan, Task, TaskType};
use crate::error::TaskError;

/// Progress within this distance of 0 or 1 snaps to the extreme.
pub const PROGRESS_SNAP: f32 = 0.02;

/// How a date drag reshapes a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEdit {
    Move,
    ResizeStart,
    ResizeEnd,
}

/// Shift `span` by `delta_days` according to `edit`.
///
/// Resizing clamps so the window keeps at least one day: a start pushed onto
/// or past the end lands one day before it, and an end pulled onto or before
/// the start lands one day after it. A shift that would leave the calendar
/// returns `span` unchanged.
pub fn shift_window(span: DateSpan, edit: WindowEdit, delta_days: i64) -> DateSpan {
    let shifted = match edit {
        WindowEdit::Move => offset_days(span.start, delta_days)
            .zip(offset_days(span.end, delta_days))
            .map(|(start, end)| DateSpan::new(start, end)),
        WindowEdit::ResizeStart => offset_days(span.start, delta_days)
            .and_then(|start| {
                if start >= span.end {
                    span.end.pred_opt()
                } else {
                    Some(start)
                }
            })
            .map(|start| DateSpan::new(start, span.end)),
        WindowEdit::ResizeEnd => offset_days(span.end, delta_days)
            .and_then(|end| {
                if end <= span.start {
                    span.start.succ_opt()
                } else {
                    Some(end)
                }
            })
            .map(|end| DateSpan::new(span.start, end)),
    };
    shifted.unwrap_or(span)
}

/// Progress after dragging the progress handle `delta_x` pixels across a bar
/// `bar_width` pixels wide. `bar_width` is floored at `min_bar_width` so
/// zero-length bars never divide by zero.
pub fn drag_progress(initial: f32, delta_x: f32, bar_width: f32, min_bar_width: f32) -> f32 {
    let width = bar_width.max(min_bar_width).max(f32::EPSILON);
    let progress = initial + delta_x / width;
    if progress > 1.0 - PROGRESS_SNAP {
        1.0
    } else if progress < PROGRESS_SNAP {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

/// Width of a grid column after dragging its border.
pub fn drag_column_width(initial: f32, delta_x: f32, min_width: f32) -> f32 {
    (initial + delta_x).max(min_width)
}

/// Write a dragged actual window onto `task`.
pub fn apply_actual(task: &Task, span: DateSpan) -> Task {
    let mut updated = task.clone();
    updated.set_actual(span);
    updated
}

/// Write a dragged baseline window onto `task`. Actual dates are untouched.
pub fn apply_baseline(task: &Task, span: DateSpan) -> Task {
    let mut updated = task.clone();
    updated.set_baseline(span);
    updated
}

pub fn apply_progress(task: &Task, progress: f32) -> Task {
    let mut updated = task.clone();
    updated.progress = progress;
    updated
}

/// Parse a `YYYY-MM-DD` form value.
pub fn parse_form_date(field: &'static str, value: &str) -> Result<NaiveDate, TaskError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| TaskError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Parse a start/end pair; an end before the start is raised to the start.
fn parse_window(start: &str, end: &str) -> Result<DateSpan, TaskError> {
    let start = parse_form_date("start", start)?;
    let end = parse_form_date("end", end)?;
    Ok(DateSpan::new(start, end.max(start)))
}

/// Payload of the "add task" form.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub text: String,
    pub start: String,
    pub end: String,
    pub task_type: TaskType,
}

impl NewTask {
    /// Build the task: fresh id, baseline equal to the actual window, open,
    /// no progress. Blank text is rejected.
    pub fn build(&self) -> Result<Task, TaskError> {
        if self.text.trim().is_empty() {
            return Err(TaskError::EmptyText);
        }
        let span = parse_window(&self.start, &self.end)?;
        let mut task = Task::new(self.text.clone(), span.start, span.end);
        task.task_type = self.task_type;
        Ok(task)
    }
}

/// Payload of the task edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskEdit {
    pub text: String,
    pub start: String,
    pub end: String,
    pub task_type: TaskType,
}

impl TaskEdit {
    /// Prefill from the current task.
    pub fn from_task(task: &Task) -> Self {
        Self {
            text: task.text.clone(),
            start: task.start_date.format("%Y-%m-%d").to_string(),
            end: task.end_date.format("%Y-%m-%d").to_string(),
            task_type: task.task_type,
        }
    }

    /// Replace text, window and type wholesale.
    pub fn apply(&self, task: &Task) -> Result<Task, TaskError> {
        let span = parse_window(&self.start, &self.end)?;
        let mut updated = apply_actual(task, span);
        updated.text = self.text.clone();
        updated.task_type = self.task_type;
        Ok(updated)
    }
}

/// Payload of the baseline edit form.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineEdit {
    pub start: String,
    pub end: String,
}

impl BaselineEdit {
    /// Prefill from the baseline, or from the actual window when none is set.
    pub fn from_task(task: &Task) -> Self {
        let span = task.baseline().unwrap_or_else(|| task.actual());
        Self {
            start: span.start.format("%Y-%m-%d").to_string(),
            end: span.end.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn apply(&self, task: &Task) -> Result<Task, TaskError> {
        let span = parse_window(&self.start, &self.end)?;
        Ok(apply_baseline(task, span))
    }
}
