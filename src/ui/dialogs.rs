use crate::app::GanttApp;
use crate::ui::theme;
use egui::{Color32, Context, RichText, Ui, Window};
use gantt_timeline::model::TaskType;

const DIALOG_WIDTH: f32 = 320.0;

fn primary_button(ui: &mut Ui, label: &str) -> bool {
    let button = egui::Button::new(RichText::new(label).color(Color32::WHITE))
        .fill(theme::ACCENT)
        .rounding(egui::Rounding::same(4.0));
    ui.add_sized([80.0, 28.0], button).clicked()
}

fn type_picker(ui: &mut Ui, task_type: &mut TaskType) {
    ui.horizontal(|ui| {
        for kind in TaskType::all() {
            ui.selectable_value(task_type, *kind, kind.label());
        }
    });
}

fn date_field(ui: &mut Ui, value: &mut String) {
    ui.add_sized(
        [140.0, 24.0],
        egui::TextEdit::singleline(value)
            .hint_text("YYYY-MM-DD")
            .font(theme::font_mono()),
    );
}

fn escape_pressed(ctx: &Context) -> bool {
    ctx.input(|i| i.key_pressed(egui::Key::Escape))
}

/// Render the "Add Task" dialog.
pub fn show_add_task_dialog(app: &mut GanttApp, ctx: &Context) {
    let mut should_close = false;
    Window::new(RichText::new("Add Task").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([DIALOG_WIDTH, 0.0])
        .show(ctx, |ui| {
            ui.add_space(4.0);

            egui::Grid::new("add_task_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Name").color(theme::TEXT_SECONDARY));
                    ui.add_sized(
                        [220.0, 24.0],
                        egui::TextEdit::singleline(&mut app.new_task.text).hint_text("Task name..."),
                    );
                    ui.end_row();

                    ui.label(RichText::new("Start").color(theme::TEXT_SECONDARY));
                    ui.add(
                        egui_extras::DatePickerButton::new(&mut app.new_task.start)
                            .id_salt("dlg_dp_start"),
                    );
                    ui.end_row();

                    ui.label(RichText::new("End").color(theme::TEXT_SECONDARY));
                    ui.add(
                        egui_extras::DatePickerButton::new(&mut app.new_task.end)
                            .id_salt("dlg_dp_end"),
                    );
                    ui.end_row();

                    ui.label(RichText::new("Type").color(theme::TEXT_SECONDARY));
                    type_picker(ui, &mut app.new_task.task_type);
                    ui.end_row();
                });

            ui.add_space(6.0);
            ui.separator();
            ui.add_space(4.0);

            ui.horizontal(|ui| {
                if primary_button(ui, "Create") && app.create_task_from_dialog() {
                    should_close = true;
                }
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    should_close = true;
                }
            });
        });

    if should_close || escape_pressed(ctx) {
        app.show_add_task = false;
    }
}

/// Render the task edit form opened from a bar or grid row.
pub fn show_task_edit_dialog(app: &mut GanttApp, ctx: &Context) {
    let mut save = false;
    let mut should_close = false;
    let Some((_, form)) = app.task_form.as_mut() else {
        return;
    };

    Window::new(RichText::new("Edit Task").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([DIALOG_WIDTH, 0.0])
        .show(ctx, |ui| {
            egui::Grid::new("edit_task_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Name").color(theme::TEXT_SECONDARY));
                    ui.add_sized([220.0, 24.0], egui::TextEdit::singleline(&mut form.text));
                    ui.end_row();

                    ui.label(RichText::new("Start").color(theme::TEXT_SECONDARY));
                    date_field(ui, &mut form.start);
                    ui.end_row();

                    ui.label(RichText::new("End").color(theme::TEXT_SECONDARY));
                    date_field(ui, &mut form.end);
                    ui.end_row();

                    ui.label(RichText::new("Type").color(theme::TEXT_SECONDARY));
                    type_picker(ui, &mut form.task_type);
                    ui.end_row();
                });

            ui.add_space(6.0);
            ui.separator();
            ui.horizontal(|ui| {
                save = primary_button(ui, "Save");
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    should_close = true;
                }
            });
        });

    // A failed save keeps the form open; the status bar shows why.
    if save && app.save_task_form() {
        should_close = true;
    }
    if should_close || escape_pressed(ctx) {
        app.task_form = None;
    }
}

/// Render the planned-window form opened from a baseline bar.
pub fn show_baseline_dialog(app: &mut GanttApp, ctx: &Context) {
    let mut save = false;
    let mut should_close = false;
    let Some((_, form)) = app.baseline_form.as_mut() else {
        return;
    };

    Window::new(RichText::new("Edit Baseline").strong().size(14.0))
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([DIALOG_WIDTH, 0.0])
        .show(ctx, |ui| {
            egui::Grid::new("edit_baseline_grid")
                .num_columns(2)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    ui.label(RichText::new("Planned start").color(theme::TEXT_SECONDARY));
                    date_field(ui, &mut form.start);
                    ui.end_row();

                    ui.label(RichText::new("Planned end").color(theme::TEXT_SECONDARY));
                    date_field(ui, &mut form.end);
                    ui.end_row();
                });

            ui.add_space(6.0);
            ui.separator();
            ui.horizontal(|ui| {
                save = primary_button(ui, "Save");
                if ui.add_sized([80.0, 28.0], egui::Button::new("Cancel")).clicked() {
                    should_close = true;
                }
            });
        });

    if save && app.save_baseline_form() {
        should_close = true;
    }
    if should_close || escape_pressed(ctx) {
        app.baseline_form = None;
    }
}

/// Render the report returned by the schedule analyzer.
pub fn show_analysis_dialog(app: &mut GanttApp, ctx: &Context) {
    let mut should_close = false;
    let Some(report) = app.analysis_report.as_ref() else {
        return;
    };

    Window::new(RichText::new("Schedule Analysis").strong().size(14.0))
        .resizable(true)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .default_size([420.0, 320.0])
        .show(ctx, |ui| {
            let score_color = if report.score >= 75.0 {
                theme::TASK_BAR
            } else if report.score >= 50.0 {
                theme::ACCENT
            } else {
                theme::TODAY_LINE
            };
            ui.horizontal(|ui| {
                ui.label(RichText::new("Health score").color(theme::TEXT_SECONDARY));
                ui.label(
                    RichText::new(format!("{:.0} / 100", report.score))
                        .strong()
                        .size(16.0)
                        .color(score_color),
                );
            });
            ui.add_space(6.0);
            ui.label(&report.summary);

            if !report.warnings.is_empty() {
                ui.add_space(8.0);
                ui.label(RichText::new("Warnings").strong());
                egui::ScrollArea::vertical().max_height(160.0).show(ui, |ui| {
                    for warning in &report.warnings {
                        ui.label(
                            RichText::new(format!("{} {warning}", egui_phosphor::regular::WARNING))
                                .color(theme::TEXT_WEEKEND),
                        );
                    }
                });
            }

            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });

    if should_close || escape_pressed(ctx) {
        app.analysis_report = None;
    }
}

/// Render the "About" dialog.
pub fn show_about_dialog(app: &mut GanttApp, ctx: &Context) {
    let mut should_close = false;
    Window::new("About")
        .resizable(false)
        .collapsible(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .fixed_size([300.0, 190.0])
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(12.0);
                ui.heading(RichText::new("Gantt Timeline").strong());
                ui.add_space(2.0);
                ui.label(
                    RichText::new(format!("Version {}", env!("CARGO_PKG_VERSION")))
                        .color(theme::TEXT_SECONDARY),
                );
                ui.add_space(10.0);
                ui.label("Drag bars to move or resize tasks,");
                ui.label("the lower bar to shift the baseline.");
                ui.add_space(14.0);
                if ui.add_sized([100.0, 28.0], egui::Button::new("Close")).clicked() {
                    should_close = true;
                }
            });
        });
    if should_close || escape_pressed(ctx) {
        app.show_about = false;
    }
}
