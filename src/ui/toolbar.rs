use crate::app::GanttApp;
use crate::ui::theme;
use egui::{menu, Color32, RichText, Ui};
use gantt_timeline::model::Granularity;

/// Render the top toolbar / menu bar.
pub fn show_toolbar(app: &mut GanttApp, ui: &mut Ui) {
    menu::bar(ui, |ui| {
        ui.menu_button(RichText::new("  View  ").font(theme::font_header()), |ui| {
            ui.label(RichText::new("Timeline Scale").small().weak());
            let mut granularity = app.chart.granularity();
            for g in Granularity::all() {
                if ui.radio_value(&mut granularity, *g, g.label()).clicked() {
                    ui.close_menu();
                }
            }
            if granularity != app.chart.granularity() {
                app.chart.set_granularity(granularity);
            }
        });

        ui.menu_button(RichText::new("  Help  ").font(theme::font_header()), |ui| {
            if ui.button("About").clicked() {
                app.show_about = true;
                ui.close_menu();
            }
        });

        ui.separator();

        let add = egui::Button::new(
            RichText::new(format!("{} Add Task", egui_phosphor::regular::PLUS)).color(Color32::WHITE),
        )
        .fill(theme::ADD_BUTTON);
        if ui.add(add).clicked() {
            app.show_add_task = true;
        }

        // Segmented scale switch
        let mut granularity = app.chart.granularity();
        for g in Granularity::all() {
            ui.selectable_value(&mut granularity, *g, g.label());
        }
        if granularity != app.chart.granularity() {
            app.chart.set_granularity(granularity);
        }

        let analyze_label = if app.is_analyzing() {
            format!("{} Analyzing…", egui_phosphor::regular::HOURGLASS)
        } else {
            format!("{} Analyze", egui_phosphor::regular::CHART_LINE)
        };
        let analyze = ui
            .add_enabled(app.can_analyze(), egui::Button::new(analyze_label))
            .on_disabled_hover_text("Set analysis_command in settings.json to enable");
        if analyze.clicked() {
            app.start_analysis(ui.ctx());
        }

        // Right-aligned project name
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(RichText::new(&app.chart.project.name).size(11.0).weak());
        });
    });
}
