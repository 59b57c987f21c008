//! The timeline engine as seen by a host UI.
//!
//! `GanttChart` owns the task collection, the grid column widths, the
//! granularity and the drag state. Hosts read rows, ticks and bar geometry
//! from it to draw, and feed pointer events to `begin_drag`, `update_drag`
//! and `end_drag`.

use chrono::NaiveDate;

use super::interaction::{DragContext, DragEffect, DragKind, DragState, DragTarget};
use super::mutation::{BaselineEdit, NewTask, TaskEdit};
use super::project::Project;
use super::task::Task;
use super::timeline::{self, Calendar, DateAxis, Granularity, MonthGroup, TimelineRange};
use super::tree::VisibleRow;
use crate::config::GanttConfig;
use crate::error::TaskError;

/// Horizontal placement of a bar, relative to the first tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarGeometry {
    pub x: f32,
    pub width: f32,
}

/// One header cell.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub date: NaiveDate,
    pub x: f32,
    pub width: f32,
    pub label: String,
    /// Only set at day granularity.
    pub weekend: bool,
}

pub struct GanttChart {
    pub project: Project,
    config: GanttConfig,
    granularity: Granularity,
    column_widths: Vec<f32>,
    drag: DragState,
    today: NaiveDate,
}

impl GanttChart {
    pub fn new(project: Project, config: GanttConfig, today: NaiveDate) -> Self {
        Self {
            project,
            granularity: config.default_granularity,
            column_widths: config.column_widths.clone(),
            config,
            drag: DragState::Idle,
            today,
        }
    }

    pub fn config(&self) -> &GanttConfig {
        &self.config
    }

    pub fn tasks(&self) -> &[Task] {
        &self.project.tasks
    }

    /// Anchor for the range of an empty project.
    pub fn set_today(&mut self, today: NaiveDate) {
        self.today = today;
    }

    // ── View ────────────────────────────────────────────────────

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Switch granularity. All geometry is derived on demand, so nothing
    /// needs recomputing here.
    pub fn set_granularity(&mut self, granularity: Granularity) {
        if self.granularity != granularity {
            log::debug!("granularity {:?} -> {:?}", self.granularity, granularity);
            self.granularity = granularity;
        }
    }

    pub fn cell_width(&self) -> f32 {
        self.config.cell_width(self.granularity)
    }

    /// Resolved from the current tasks on every call.
    pub fn range(&self) -> TimelineRange {
        self.project.range(
            self.today,
            self.config.range_lead_days,
            self.config.range_tail_days,
        )
    }

    pub fn axis(&self) -> DateAxis {
        DateAxis::new(self.range(), self.granularity, self.config.week_start)
    }

    pub fn calendar(&self) -> Calendar {
        self.axis().calendar(self.cell_width())
    }

    pub fn ticks(&self) -> Vec<AxisTick> {
        let width = self.cell_width();
        let granularity = self.granularity;
        self.axis()
            .ticks()
            .enumerate()
            .map(|(i, date)| AxisTick {
                date,
                x: i as f32 * width,
                width,
                label: timeline::tick_label(date, granularity),
                weekend: granularity == Granularity::Day && timeline::is_weekend(date),
            })
            .collect()
    }

    pub fn month_groups(&self) -> Vec<MonthGroup> {
        timeline::month_groups(self.axis().ticks(), self.cell_width())
    }

    /// Width of the scrollable timeline body.
    pub fn timeline_width(&self) -> f32 {
        self.axis().ticks().count() as f32 * self.cell_width()
    }

    pub fn column_widths(&self) -> &[f32] {
        &self.column_widths
    }

    pub fn grid_width(&self) -> f32 {
        self.column_widths.iter().sum()
    }

    pub fn visible_rows(&self) -> Vec<VisibleRow> {
        self.project.visible_rows()
    }

    /// Actual bar: zero width for milestones, otherwise at least
    /// `min_bar_width`.
    pub fn actual_bar(&self, task: &Task) -> BarGeometry {
        let calendar = self.calendar();
        let width = if task.is_milestone() {
            0.0
        } else {
            calendar
                .span_width(task.start_date, task.end_date)
                .max(self.config.min_bar_width)
        };
        BarGeometry {
            x: calendar.date_to_x(task.start_date),
            width,
        }
    }

    /// Baseline bar, when both planned dates are recorded.
    pub fn baseline_bar(&self, task: &Task) -> Option<BarGeometry> {
        let baseline = task.baseline()?;
        let calendar = self.calendar();
        Some(BarGeometry {
            x: calendar.date_to_x(baseline.start),
            width: calendar
                .span_width(baseline.start, baseline.end)
                .max(self.config.min_baseline_width),
        })
    }

    // ── Drag ────────────────────────────────────────────────────

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    fn drag_context(&self) -> DragContext {
        DragContext {
            calendar: self.calendar(),
            min_bar_width: self.config.min_bar_width,
            min_column_width: self.config.min_column_width,
        }
    }

    /// Pointer-down on a handle. Returns whether a drag started.
    pub fn begin_drag(&mut self, kind: DragKind, target: DragTarget, x: f32) -> bool {
        self.drag
            .begin(kind, target, x, &self.project.tasks, &self.column_widths)
    }

    /// Pointer moved to `x`. Returns whether anything changed.
    pub fn update_drag(&mut self, x: f32) -> bool {
        match self.drag.update(x, &self.drag_context(), &self.project.tasks) {
            DragEffect::None => false,
            DragEffect::Task(task) => {
                let changed = self.project.find(&task.id) != Some(&task);
                changed && self.project.replace(task)
            }
            DragEffect::Columns(widths) => {
                let changed = widths != self.column_widths;
                self.column_widths = widths;
                changed
            }
        }
    }

    /// Pointer released anywhere.
    pub fn end_drag(&mut self) {
        self.drag.end();
    }

    // ── Forms ───────────────────────────────────────────────────

    pub fn add_task(&mut self, form: &NewTask) -> Result<String, TaskError> {
        self.project.add_task(form).map(|t| t.id.clone())
    }

    pub fn edit_task(&mut self, id: &str, form: &TaskEdit) -> Result<(), TaskError> {
        self.project.edit_task(id, form)
    }

    pub fn edit_baseline(&mut self, id: &str, form: &BaselineEdit) -> Result<(), TaskError> {
        self.project.edit_baseline(id, form)
    }

    pub fn toggle_open(&mut self, id: &str) -> bool {
        self.project.toggle_open(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn chart() -> GanttChart {
        let mut app = Task::new("App", date(2024, 4, 1), date(2024, 4, 30)).with_id("1");
        app.planned_start = None;
        app.planned_end = None;
        let beta = Task::new_milestone("Beta", date(2024, 4, 29))
            .with_id("5")
            .with_parent("1");
        GanttChart::new(
            Project::new("p").with_tasks(vec![app, beta]),
            GanttConfig::default(),
            date(2026, 10, 16),
        )
    }

    #[test]
    fn ticks_cover_range_at_cell_width() {
        let c = chart();
        let ticks = c.ticks();
        assert_eq!(ticks.first().unwrap().date, date(2024, 3, 31));
        assert_eq!(ticks.last().unwrap().date, date(2024, 5, 7));
        assert_eq!(ticks.len(), 38);
        assert_eq!(ticks[2].x, 100.0);
        assert!(ticks[0].weekend);
        assert_eq!(c.timeline_width(), 38.0 * 50.0);
    }

    #[test]
    fn bars_use_calendar_geometry() {
        let c = chart();
        let app = c.project.find("1").unwrap();
        assert_eq!(c.actual_bar(app), BarGeometry { x: 50.0, width: 1450.0 });
        assert_eq!(c.baseline_bar(app), None);

        let beta = c.project.find("5").unwrap();
        assert_eq!(c.actual_bar(beta).width, 0.0);
        assert_eq!(c.baseline_bar(beta).unwrap().width, 10.0);
    }

    #[test]
    fn short_bar_gets_minimum_width() {
        let mut c = chart();
        c.project
            .tasks
            .push(Task::new("Short", date(2024, 4, 3), date(2024, 4, 3)).with_id("s"));
        let task = c.project.find("s").unwrap();
        assert_eq!(c.actual_bar(task).width, 30.0);
    }

    #[test]
    fn week_granularity_rescales() {
        let mut c = chart();
        c.set_granularity(Granularity::Week);
        assert_eq!(c.cell_width(), 100.0);
        // 2024-03-31 is a Sunday, so the origin stays put.
        let app = c.project.find("1").unwrap();
        let bar = c.actual_bar(app);
        assert!((bar.x - 100.0 / 7.0).abs() < 1e-4);
    }

    #[test]
    fn drag_cycle_updates_task() {
        let mut c = chart();
        assert!(c.begin_drag(DragKind::ResizeEnd, DragTarget::Task("1".into()), 400.0));
        assert!(c.update_drag(500.0));
        assert_eq!(c.project.find("1").unwrap().end_date, date(2024, 5, 2));
        assert_eq!(c.project.find("1").unwrap().duration, 31);
        assert!(!c.update_drag(500.0));
        c.end_drag();
        assert!(!c.is_dragging());
        assert!(!c.update_drag(900.0));
    }

    #[test]
    fn column_drag_updates_grid_width() {
        let mut c = chart();
        assert_eq!(c.grid_width(), 550.0);
        c.begin_drag(DragKind::ColumnResize, DragTarget::Column(0), 10.0);
        c.update_drag(60.0);
        c.end_drag();
        assert_eq!(c.column_widths()[0], 300.0);
        assert_eq!(c.grid_width(), 600.0);
    }

    #[test]
    fn month_groups_span_ticks() {
        let c = chart();
        let groups = c.month_groups();
        let widths: Vec<_> = groups.iter().map(|g| g.width).collect();
        assert_eq!(widths, vec![50.0, 1500.0, 350.0]);
    }
}
