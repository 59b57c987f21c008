use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;

use chrono::{Duration, NaiveDate};

use gantt_timeline::io::analysis::{
    self, AnalysisReport, AnalysisResult, CommandAnalyzer, ScheduleAnalyzer,
};
use gantt_timeline::model::{
    BaselineEdit, DragKind, DragTarget, GanttChart, NewTask, Project, Task, TaskEdit, TaskType,
};
use gantt_timeline::{AnalysisError, GanttConfig};

use crate::ui;

/// Draft values behind the "Add Task" dialog.
pub struct NewTaskDraft {
    pub text: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub task_type: TaskType,
}

impl NewTaskDraft {
    fn starting(today: NaiveDate) -> Self {
        Self {
            text: String::new(),
            start: today,
            end: today + Duration::days(5),
            task_type: TaskType::Task,
        }
    }

    fn to_form(&self) -> NewTask {
        NewTask {
            text: self.text.clone(),
            start: self.start.format("%Y-%m-%d").to_string(),
            end: self.end.format("%Y-%m-%d").to_string(),
            task_type: self.task_type,
        }
    }
}

/// Main application state.
pub struct GanttApp {
    pub chart: GanttChart,
    pub selected_task: Option<String>,

    // Dialog state
    pub show_add_task: bool,
    pub show_about: bool,
    pub new_task: NewTaskDraft,
    pub task_form: Option<(String, TaskEdit)>,
    pub baseline_form: Option<(String, BaselineEdit)>,

    pub status_message: String,

    /// Vertical scroll shared by the task grid and the timeline.
    pub scroll_y: f32,

    // Schedule analysis
    analyzer: Option<Arc<dyn ScheduleAnalyzer>>,
    analysis_rx: Option<Receiver<AnalysisResult>>,
    pub analysis_report: Option<AnalysisReport>,
}

impl GanttApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: GanttConfig) -> Self {
        // Register Phosphor icon font as a fallback so icons render inline with text
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let today = chrono::Local::now().date_naive();
        let analyzer = CommandAnalyzer::from_config(&config)
            .map(|a| Arc::new(a) as Arc<dyn ScheduleAnalyzer>);

        Self {
            chart: GanttChart::new(Self::sample_project(today), config, today),
            selected_task: None,
            show_add_task: false,
            show_about: false,
            new_task: NewTaskDraft::starting(today),
            task_form: None,
            baseline_form: None,
            status_message: "Ready".to_string(),
            scroll_y: 0.0,
            analyzer,
            analysis_rx: None,
            analysis_report: None,
        }
    }

    /// Generate a sample project for demonstration.
    fn sample_project(today: NaiveDate) -> Project {
        let day = |n: i64| today + Duration::days(n);

        let mut app = Task::new("Mobile app release", day(-10), day(19)).with_id("1");
        app.task_type = TaskType::Project;
        app.progress = 0.35;
        app.planned_end = Some(day(17));

        let mut spec = Task::new("Requirements & spec", day(-9), day(-3))
            .with_id("2")
            .with_parent("1");
        spec.progress = 1.0;
        spec.planned_start = Some(day(-10));
        spec.planned_end = Some(day(-4));

        let mut design = Task::new("UI/UX design", day(-2), day(7))
            .with_id("3")
            .with_parent("1");
        design.task_type = TaskType::Project;
        design.progress = 0.6;
        design.planned_start = Some(day(-3));
        design.planned_end = Some(day(5));

        let mut wireframes = Task::new("Wireframes", day(-2), day(1))
            .with_id("3.1")
            .with_parent("3");
        wireframes.progress = 1.0;
        wireframes.planned_end = Some(day(0));

        let mut visuals = Task::new("Visual design", day(2), day(7))
            .with_id("3.2")
            .with_parent("3");
        visuals.progress = 0.2;
        visuals.planned_start = Some(day(1));
        visuals.planned_end = Some(day(5));

        let mut frontend = Task::new("Frontend build", day(8), day(17))
            .with_id("4")
            .with_parent("1");
        frontend.progress = 0.1;
        frontend.planned_start = Some(day(7));
        frontend.planned_end = Some(day(15));

        let mut beta = Task::new_milestone("Beta launch", day(18))
            .with_id("5")
            .with_parent("1");
        beta.planned_start = Some(day(17));
        beta.planned_end = Some(day(17));

        Project::new("Sample Project")
            .with_tasks(vec![app, spec, design, wireframes, visuals, frontend, beta])
    }

    // --- Drag plumbing ---

    /// Pointer-down on a handle.
    pub fn begin_drag(&mut self, kind: DragKind, target: DragTarget, x: f32) {
        if let DragTarget::Task(ref id) = target {
            self.selected_task = Some(id.clone());
        }
        self.chart.begin_drag(kind, target, x);
    }

    /// Track the pointer globally while a drag is active, wherever it is.
    fn track_pointer(&mut self, ctx: &egui::Context) {
        if !self.chart.is_dragging() {
            return;
        }
        let (pos, released) = ctx.input(|i| {
            (
                i.pointer.latest_pos(),
                i.pointer.any_released() || !i.pointer.any_down(),
            )
        });
        if let Some(pos) = pos {
            if self.chart.update_drag(pos.x) {
                self.report_drag_change();
            }
        }
        if released {
            self.chart.end_drag();
        }
    }

    fn report_drag_change(&mut self) {
        let Some(id) = self.chart.drag_state().task_id() else {
            return;
        };
        if let Some(task) = self.chart.project.find(id) {
            self.status_message = format!(
                "Updated '{}' ({} → {}, {}%)",
                task.text,
                task.start_date.format("%Y-%m-%d"),
                task.end_date.format("%Y-%m-%d"),
                task.progress_percent()
            );
        }
    }

    // --- Forms ---

    pub fn create_task_from_dialog(&mut self) -> bool {
        match self.chart.add_task(&self.new_task.to_form()) {
            Ok(id) => {
                self.selected_task = Some(id);
                self.new_task = NewTaskDraft::starting(chrono::Local::now().date_naive());
                self.status_message = "Task added".to_string();
                true
            }
            Err(e) => {
                self.status_message = e.to_string();
                false
            }
        }
    }

    pub fn open_task_form(&mut self, id: &str) {
        if let Some(task) = self.chart.project.find(id) {
            self.task_form = Some((id.to_string(), TaskEdit::from_task(task)));
        }
    }

    pub fn open_baseline_form(&mut self, id: &str) {
        if let Some(task) = self.chart.project.find(id) {
            self.baseline_form = Some((id.to_string(), BaselineEdit::from_task(task)));
        }
    }

    pub fn save_task_form(&mut self) -> bool {
        let Some((id, form)) = self.task_form.as_ref() else {
            return false;
        };
        match self.chart.edit_task(id, form) {
            Ok(()) => {
                self.status_message = "Task updated".to_string();
                true
            }
            Err(e) => {
                self.status_message = e.to_string();
                false
            }
        }
    }

    pub fn save_baseline_form(&mut self) -> bool {
        let Some((id, form)) = self.baseline_form.as_ref() else {
            return false;
        };
        match self.chart.edit_baseline(id, form) {
            Ok(()) => {
                self.status_message = "Baseline updated".to_string();
                true
            }
            Err(e) => {
                self.status_message = e.to_string();
                false
            }
        }
    }

    // --- Analysis ---

    pub fn can_analyze(&self) -> bool {
        self.analyzer.is_some() && self.analysis_rx.is_none()
    }

    pub fn is_analyzing(&self) -> bool {
        self.analysis_rx.is_some()
    }

    /// Send the schedule to the analyzer on a worker thread.
    pub fn start_analysis(&mut self, ctx: &egui::Context) {
        let Some(analyzer) = self.analyzer.clone() else {
            self.status_message = AnalysisError::NotConfigured.to_string();
            return;
        };
        let request = analysis::build_request(self.chart.tasks());
        let (tx, rx) = mpsc::channel();
        let ctx = ctx.clone();
        std::thread::spawn(move || {
            let _ = tx.send(analyzer.analyze(&request));
            ctx.request_repaint();
        });
        self.analysis_rx = Some(rx);
        self.status_message = "Analyzing schedule…".to_string();
    }

    fn poll_analysis(&mut self) {
        let Some(rx) = self.analysis_rx.as_ref() else {
            return;
        };
        let Some(result) = analysis::try_recv_report(rx) else {
            return;
        };
        self.analysis_rx = None;
        match result {
            Ok(report) => {
                self.status_message = format!("Schedule health: {:.0}/100", report.score);
                self.analysis_report = Some(report);
            }
            Err(e) => {
                log::warn!("schedule analysis failed: {e}");
                self.status_message = format!("Analysis failed: {e}");
            }
        }
    }
}

impl eframe::App for GanttApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::theme::apply_theme(ctx);
        self.chart.set_today(chrono::Local::now().date_naive());
        self.poll_analysis();
        self.track_pointer(ctx);

        // Top panel: toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui::toolbar::show_toolbar(self, ui);
        });

        // Bottom panel: status bar
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(
                        egui::RichText::new(&self.status_message)
                            .size(11.0)
                            .color(ui::theme::TEXT_SECONDARY),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            egui::RichText::new(format!(
                                "Tasks: {}  ·  Visible: {}  ·  {}",
                                self.chart.tasks().len(),
                                self.chart.visible_rows().len(),
                                self.chart.granularity().label()
                            ))
                            .size(10.5)
                            .color(ui::theme::TEXT_DIM),
                        );
                    });
                });
            });

        // Left panel: task grid, sized by its columns
        let mut table_action = ui::task_table::TaskTableAction::None;
        egui::SidePanel::left("task_grid")
            .exact_width(self.chart.grid_width())
            .resizable(false)
            .frame(egui::Frame::default().fill(ui::theme::BG_PANEL))
            .show(ctx, |ui| {
                table_action = ui::task_table::show_task_table(
                    &self.chart,
                    self.selected_task.as_deref(),
                    self.scroll_y,
                    ui,
                );
            });

        match table_action {
            ui::task_table::TaskTableAction::Select(id) => self.selected_task = Some(id),
            ui::task_table::TaskTableAction::ToggleOpen(id) => {
                self.chart.toggle_open(&id);
            }
            ui::task_table::TaskTableAction::Edit(id) => self.open_task_form(&id),
            ui::task_table::TaskTableAction::BeginDrag(kind, target, x) => {
                self.begin_drag(kind, target, x)
            }
            ui::task_table::TaskTableAction::None => {}
        }

        // Central panel: timeline
        let chart_frame = egui::Frame::default()
            .fill(ui::theme::BG_DARK)
            .inner_margin(egui::Margin::ZERO);
        egui::CentralPanel::default().frame(chart_frame).show(ctx, |ui| {
            let output = ui::gantt_chart::show_gantt_chart(
                &self.chart,
                self.selected_task.as_deref(),
                ui,
            );
            self.scroll_y = output.scroll_y;
            match output.action {
                ui::gantt_chart::ChartAction::BeginDrag(kind, target, x) => {
                    self.begin_drag(kind, target, x)
                }
                ui::gantt_chart::ChartAction::Select(id) => self.selected_task = Some(id),
                ui::gantt_chart::ChartAction::ClearSelection => self.selected_task = None,
                ui::gantt_chart::ChartAction::EditTask(id) => self.open_task_form(&id),
                ui::gantt_chart::ChartAction::EditBaseline(id) => self.open_baseline_form(&id),
                ui::gantt_chart::ChartAction::None => {}
            }
        });

        // Dialogs
        if self.show_add_task {
            ui::dialogs::show_add_task_dialog(self, ctx);
        }
        if self.task_form.is_some() {
            ui::dialogs::show_task_edit_dialog(self, ctx);
        }
        if self.baseline_form.is_some() {
            ui::dialogs::show_baseline_dialog(self, ctx);
        }
        if self.analysis_report.is_some() {
            ui::dialogs::show_analysis_dialog(self, ctx);
        }
        if self.show_about {
            ui::dialogs::show_about_dialog(self, ctx);
        }

        if self.chart.is_dragging() {
            ctx.request_repaint();
        }
    }
}
