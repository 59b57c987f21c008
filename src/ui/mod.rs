pub mod dialogs;
pub mod gantt_chart;
pub mod task_table;
pub mod theme;
pub mod toolbar;

/// Pointer x where the current press began, so a drag measures its delta
/// from the original pointer-down rather than from where egui recognised it.
pub fn press_x(ui: &egui::Ui, response: &egui::Response) -> Option<f32> {
    ui.input(|i| i.pointer.press_origin())
        .or_else(|| response.interact_pointer_pos())
        .map(|p| p.x)
}
