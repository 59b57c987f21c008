use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use gantt_timeline::model::{
    BaselineEdit, DragKind, DragTarget, GanttChart, Granularity, NewTask, Project, Task, TaskEdit,
    TaskType,
};
use gantt_timeline::{GanttConfig, TaskError};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn without_baseline(mut task: Task) -> Task {
    task.planned_start = None;
    task.planned_end = None;
    task
}

fn chart_with(tasks: Vec<Task>) -> GanttChart {
    GanttChart::new(
        Project::new("Test").with_tasks(tasks),
        GanttConfig::default(),
        date(2026, 10, 16),
    )
}

#[test]
fn range_pads_single_task() {
    let chart = chart_with(vec![without_baseline(Task::new(
        "Build",
        date(2024, 4, 1),
        date(2024, 4, 30),
    ))]);
    let range = chart.range();
    assert_eq!(range.start, date(2024, 3, 31));
    assert_eq!(range.end, date(2024, 5, 7));
}

#[test]
fn range_of_empty_project_surrounds_today() {
    let chart = chart_with(Vec::new());
    let range = chart.range();
    assert_eq!(range.start, date(2026, 10, 15));
    assert_eq!(range.end, date(2026, 10, 23));
}

#[test]
fn resize_start_stops_a_day_before_end() {
    let task = without_baseline(Task::new("QA", date(2024, 4, 10), date(2024, 4, 12))).with_id("qa");
    let mut chart = chart_with(vec![task]);

    assert!(chart.begin_drag(DragKind::ResizeStart, DragTarget::Task("qa".into()), 100.0));
    // 250px at 50px per day is +5 days
    assert!(chart.update_drag(350.0));
    chart.end_drag();

    let task = chart.project.find("qa").unwrap();
    assert_eq!(task.start_date, date(2024, 4, 11));
    assert_eq!(task.end_date, date(2024, 4, 12));
    assert_eq!(task.duration, 1);
    assert!(!chart.is_dragging());
}

#[test]
fn progress_drag_clamps_to_zero() {
    let mut task = without_baseline(Task::new("QA", date(2024, 4, 10), date(2024, 4, 12))).with_id("qa");
    task.progress = 0.5;
    let mut chart = chart_with(vec![task]);

    // Two days at day granularity: a 100px bar, so -60px is -0.6
    assert_eq!(chart.actual_bar(chart.project.find("qa").unwrap()).width, 100.0);
    assert!(chart.begin_drag(DragKind::ProgressResize, DragTarget::Task("qa".into()), 200.0));
    chart.update_drag(140.0);
    assert_eq!(chart.project.find("qa").unwrap().progress, 0.0);
}

#[test]
fn move_keeps_duration_and_measures_from_press() {
    let task = Task::new("Design", date(2024, 4, 10), date(2024, 4, 15)).with_id("d");
    let mut chart = chart_with(vec![task]);

    assert!(chart.begin_drag(DragKind::Move, DragTarget::Task("d".into()), 300.0));
    chart.update_drag(400.0);
    chart.update_drag(450.0);
    chart.end_drag();

    let task = chart.project.find("d").unwrap();
    assert_eq!(task.start_date, date(2024, 4, 13));
    assert_eq!(task.end_date, date(2024, 4, 18));
    assert_eq!(task.duration, 5);
    // The baseline stays where it was planned
    assert_eq!(task.planned_start, Some(date(2024, 4, 10)));
    assert_eq!(task.planned_end, Some(date(2024, 4, 15)));
}

#[test]
fn baseline_move_leaves_actual_window() {
    let task = Task::new("Design", date(2024, 4, 10), date(2024, 4, 15)).with_id("d");
    let mut chart = chart_with(vec![task]);

    assert!(chart.begin_drag(DragKind::BaselineMove, DragTarget::Task("d".into()), 0.0));
    chart.update_drag(-100.0);
    chart.end_drag();

    let task = chart.project.find("d").unwrap();
    assert_eq!(task.planned_start, Some(date(2024, 4, 8)));
    assert_eq!(task.planned_end, Some(date(2024, 4, 13)));
    assert_eq!(task.start_date, date(2024, 4, 10));
}

#[test]
fn zero_cell_width_drag_leaves_task_in_place() {
    let mut config = GanttConfig::default();
    config.cell_widths.day = 0.0;
    assert_eq!(config.validate(), Err("cell_widths.day"));

    let task = Task::new("QA", date(2024, 4, 10), date(2024, 4, 12)).with_id("qa");
    let mut chart = GanttChart::new(Project::new("Test").with_tasks(vec![task]), config, date(2026, 10, 16));

    for kind in [DragKind::Move, DragKind::ResizeStart, DragKind::BaselineResizeEnd] {
        assert!(chart.begin_drag(kind, DragTarget::Task("qa".into()), 0.0));
        assert!(!chart.update_drag(10.0));
        chart.end_drag();
    }
    let task = chart.project.find("qa").unwrap();
    assert_eq!(task.start_date, date(2024, 4, 10));
    assert_eq!(task.end_date, date(2024, 4, 12));
    assert_eq!(task.planned_end, Some(date(2024, 4, 12)));
}

#[test]
fn baseline_drag_needs_a_baseline() {
    let task = without_baseline(Task::new("QA", date(2024, 4, 10), date(2024, 4, 12))).with_id("qa");
    let mut chart = chart_with(vec![task]);
    assert!(!chart.begin_drag(DragKind::BaselineMove, DragTarget::Task("qa".into()), 0.0));
    assert!(!chart.is_dragging());
}

#[test]
fn updates_after_end_are_ignored() {
    let task = Task::new("QA", date(2024, 4, 10), date(2024, 4, 12)).with_id("qa");
    let mut chart = chart_with(vec![task]);

    chart.begin_drag(DragKind::ResizeEnd, DragTarget::Task("qa".into()), 0.0);
    chart.end_drag();
    assert!(!chart.update_drag(500.0));
    assert_eq!(chart.project.find("qa").unwrap().end_date, date(2024, 4, 12));
}

#[test]
fn column_resize_respects_minimum() {
    let mut chart = chart_with(Vec::new());
    assert_eq!(chart.column_widths(), &[250.0, 110.0, 110.0, 80.0]);

    assert!(chart.begin_drag(DragKind::ColumnResize, DragTarget::Column(1), 500.0));
    chart.update_drag(520.0);
    assert_eq!(chart.column_widths(), &[250.0, 130.0, 110.0, 80.0]);
    chart.update_drag(300.0);
    assert_eq!(chart.column_widths(), &[250.0, 40.0, 110.0, 80.0]);
    chart.end_drag();
    assert_eq!(chart.grid_width(), 480.0);

    assert!(!chart.begin_drag(DragKind::ColumnResize, DragTarget::Column(9), 0.0));
}

#[test]
fn week_granularity_rescales_drag() {
    let task = Task::new("QA", date(2024, 4, 10), date(2024, 4, 20)).with_id("qa");
    let mut chart = chart_with(vec![task]);
    chart.set_granularity(Granularity::Week);
    assert_eq!(chart.cell_width(), 100.0);

    // 100px per 7 days: 100px is one week
    chart.begin_drag(DragKind::Move, DragTarget::Task("qa".into()), 0.0);
    chart.update_drag(100.0);
    chart.end_drag();
    assert_eq!(chart.project.find("qa").unwrap().start_date, date(2024, 4, 17));
}

#[test]
fn created_task_may_be_zero_length() {
    let mut chart = chart_with(Vec::new());
    let id = chart
        .add_task(&NewTask {
            text: "Kickoff".into(),
            start: "2024-04-01".into(),
            end: "2024-04-01".into(),
            task_type: TaskType::Task,
        })
        .unwrap();

    let task = chart.project.find(&id).unwrap();
    assert_eq!(task.duration, 0);
    assert_eq!(task.progress, 0.0);
    assert!(task.open);
    assert_eq!(task.planned_start, Some(date(2024, 4, 1)));
    assert_eq!(task.planned_end, Some(date(2024, 4, 1)));
}

#[test]
fn blank_task_name_is_rejected() {
    let mut chart = chart_with(Vec::new());
    let err = chart
        .add_task(&NewTask {
            text: "  ".into(),
            start: "2024-04-01".into(),
            end: "2024-04-02".into(),
            task_type: TaskType::Task,
        })
        .unwrap_err();
    assert!(matches!(err, TaskError::EmptyText));
    assert!(chart.tasks().is_empty());
}

#[test]
fn edit_forms_round_through_chart() {
    let task = Task::new("QA", date(2024, 4, 10), date(2024, 4, 12)).with_id("qa");
    let mut chart = chart_with(vec![task]);

    let mut form = TaskEdit::from_task(chart.project.find("qa").unwrap());
    assert_eq!(form.start, "2024-04-10");
    form.text = "QA pass".into();
    form.end = "2024-04-16".into();
    chart.edit_task("qa", &form).unwrap();

    let mut baseline = BaselineEdit::from_task(chart.project.find("qa").unwrap());
    baseline.start = "2024-04-09".into();
    chart.edit_baseline("qa", &baseline).unwrap();

    let task = chart.project.find("qa").unwrap();
    assert_eq!(task.text, "QA pass");
    assert_eq!(task.duration, 6);
    assert_eq!(task.planned_start, Some(date(2024, 4, 9)));

    let err = chart.edit_task("missing", &form).unwrap_err();
    assert!(matches!(err, TaskError::NotFound(_)));
}

#[test]
fn orphan_stays_visible_when_others_collapse() {
    let parent = Task::new("Parent", date(2024, 4, 1), date(2024, 4, 5)).with_id("p");
    let child = Task::new("Child", date(2024, 4, 2), date(2024, 4, 3))
        .with_id("c")
        .with_parent("p");
    let orphan = Task::new("Orphan", date(2024, 4, 2), date(2024, 4, 3))
        .with_id("o")
        .with_parent("gone");
    let mut chart = chart_with(vec![parent, child, orphan]);

    assert!(chart.toggle_open("p"));
    let ids: Vec<&str> = chart
        .visible_rows()
        .iter()
        .map(|r| chart.tasks()[r.index].id.as_str())
        .collect();
    assert_eq!(ids, vec!["p", "o"]);
}

#[test]
fn rows_carry_depth_from_parent_chain() {
    let root = Task::new("Root", date(2024, 4, 1), date(2024, 4, 9)).with_id("1");
    let mid = Task::new("Mid", date(2024, 4, 1), date(2024, 4, 5))
        .with_id("1.a")
        .with_parent("1");
    let leaf = Task::new("Leaf", date(2024, 4, 2), date(2024, 4, 3))
        .with_id("x")
        .with_parent("1.a");
    let chart = chart_with(vec![root, mid, leaf]);

    let depths: Vec<(usize, bool)> = chart
        .visible_rows()
        .iter()
        .map(|r| (r.depth, r.has_children))
        .collect();
    assert_eq!(depths, vec![(0, true), (1, true), (2, false)]);
}
