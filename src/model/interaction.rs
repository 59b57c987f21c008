//! Pointer-drag state machine.
//!
//! The host calls [`DragState::begin`] on pointer-down over a handle,
//! [`DragState::update`] on every pointer move while a drag is active (wherever
//! the pointer is), and [`DragState::end`] on pointer release. Every update is
//! computed from the snapshot taken at `begin` plus the total pointer delta,
//! never from the live task, so repeated moves do not accumulate rounding.

use super::mutation::{self, WindowEdit};
use super::task::{DateSpan, Task};
use super::timeline::Calendar;

/// Which handle started the drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Move,
    ResizeStart,
    ResizeEnd,
    ProgressResize,
    BaselineMove,
    BaselineResizeStart,
    BaselineResizeEnd,
    ColumnResize,
}

impl DragKind {
    pub fn is_baseline(&self) -> bool {
        matches!(
            self,
            DragKind::BaselineMove | DragKind::BaselineResizeStart | DragKind::BaselineResizeEnd
        )
    }

    /// The window reshaping done by date kinds.
    pub fn window_edit(&self) -> Option<WindowEdit> {
        match self {
            DragKind::Move | DragKind::BaselineMove => Some(WindowEdit::Move),
            DragKind::ResizeStart | DragKind::BaselineResizeStart => Some(WindowEdit::ResizeStart),
            DragKind::ResizeEnd | DragKind::BaselineResizeEnd => Some(WindowEdit::ResizeEnd),
            DragKind::ProgressResize | DragKind::ColumnResize => None,
        }
    }
}

/// What the handle belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragTarget {
    Task(String),
    Column(usize),
}

/// Values copied at pointer-down.
#[derive(Debug, Clone, PartialEq)]
pub enum DragOrigin {
    Window(DateSpan),
    Progress(f32),
    Columns(Vec<f32>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveDrag {
    pub kind: DragKind,
    pub target: DragTarget,
    pub initial_x: f32,
    pub origin: DragOrigin,
}

/// Geometry the drag math needs from the current view.
#[derive(Debug, Clone, Copy)]
pub struct DragContext {
    pub calendar: Calendar,
    pub min_bar_width: f32,
    pub min_column_width: f32,
}

/// A write requested by a pointer move.
#[derive(Debug, Clone, PartialEq)]
pub enum DragEffect {
    None,
    /// Replace the task with the same id.
    Task(Task),
    Columns(Vec<f32>),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Active(ActiveDrag),
}

impl DragState {
    pub fn is_active(&self) -> bool {
        matches!(self, DragState::Active(_))
    }

    pub fn active(&self) -> Option<&ActiveDrag> {
        match self {
            DragState::Active(drag) => Some(drag),
            DragState::Idle => None,
        }
    }

    /// Id of the task being dragged, if any.
    pub fn task_id(&self) -> Option<&str> {
        match self.active()?.target {
            DragTarget::Task(ref id) => Some(id.as_str()),
            DragTarget::Column(_) => None,
        }
    }

    /// Start a drag. Returns false and stays as-is when the target does not
    /// fit the kind, the task or column does not exist, or a baseline drag
    /// starts on a task without a baseline. A successful begin replaces any
    /// drag already in progress.
    pub fn begin(
        &mut self,
        kind: DragKind,
        target: DragTarget,
        x: f32,
        tasks: &[Task],
        columns: &[f32],
    ) -> bool {
        let origin = match (&target, kind) {
            (DragTarget::Column(index), DragKind::ColumnResize) => {
                if *index >= columns.len() {
                    log::debug!("column-resize ignored: no column {index}");
                    return false;
                }
                DragOrigin::Columns(columns.to_vec())
            }
            (DragTarget::Task(id), kind) if kind != DragKind::ColumnResize => {
                let Some(task) = tasks.iter().find(|t| &t.id == id) else {
                    log::debug!("{kind:?} ignored: no task '{id}'");
                    return false;
                };
                if kind == DragKind::ProgressResize {
                    DragOrigin::Progress(task.progress)
                } else if kind.is_baseline() {
                    let Some(baseline) = task.baseline() else {
                        log::debug!("{kind:?} ignored: task '{id}' has no baseline");
                        return false;
                    };
                    DragOrigin::Window(baseline)
                } else {
                    DragOrigin::Window(task.actual())
                }
            }
            _ => {
                log::debug!("{kind:?} ignored: mismatched target {target:?}");
                return false;
            }
        };

        log::debug!("drag {kind:?} started on {target:?} at x={x}");
        *self = DragState::Active(ActiveDrag {
            kind,
            target,
            initial_x: x,
            origin,
        });
        true
    }

    /// Compute the write for the pointer now at `x`.
    pub fn update(&self, x: f32, ctx: &DragContext, tasks: &[Task]) -> DragEffect {
        let Some(drag) = self.active() else {
            return DragEffect::None;
        };
        let delta_x = x - drag.initial_x;

        match (&drag.target, &drag.origin) {
            (DragTarget::Column(index), DragOrigin::Columns(initial)) => {
                let mut widths = initial.clone();
                if let Some(width) = widths.get_mut(*index) {
                    *width = mutation::drag_column_width(*width, delta_x, ctx.min_column_width);
                }
                DragEffect::Columns(widths)
            }
            (DragTarget::Task(id), origin) => {
                let Some(task) = tasks.iter().find(|t| &t.id == id) else {
                    return DragEffect::None;
                };
                match (origin, drag.kind.window_edit()) {
                    (DragOrigin::Progress(initial), _) => {
                        let bar_width = ctx.calendar.span_width(task.start_date, task.end_date);
                        let progress = mutation::drag_progress(
                            *initial,
                            delta_x,
                            bar_width,
                            ctx.min_bar_width,
                        );
                        DragEffect::Task(mutation::apply_progress(task, progress))
                    }
                    (DragOrigin::Window(span), Some(edit)) => {
                        let days = ctx.calendar.drag_days(delta_x);
                        let span = mutation::shift_window(*span, edit, days);
                        if drag.kind.is_baseline() {
                            DragEffect::Task(mutation::apply_baseline(task, span))
                        } else {
                            DragEffect::Task(mutation::apply_actual(task, span))
                        }
                    }
                    _ => DragEffect::None,
                }
            }
            _ => DragEffect::None,
        }
    }

    /// Finish the drag, wherever the pointer was released.
    pub fn end(&mut self) {
        if let Some(drag) = self.active() {
            log::debug!("drag {:?} on {:?} finished", drag.kind, drag.target);
        }
        *self = DragState::Idle;
    }
}
