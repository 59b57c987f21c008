use egui::{pos2, vec2, Align2, Color32, CursorIcon, Id, Rect, Sense, Stroke, Ui};
use gantt_timeline::model::{DragKind, DragTarget, GanttChart, TaskType};

use crate::ui::{press_x, theme};

const COLUMN_LABELS: [&str; 4] = ["TASK", "START", "END", "PROGRESS"];

/// Actions that the task grid can request.
pub enum TaskTableAction {
    None,
    Select(String),
    ToggleOpen(String),
    Edit(String),
    BeginDrag(DragKind, DragTarget, f32),
}

/// Render the left-side task grid: resizable column headers and one row per
/// visible task, scrolled in step with the timeline.
pub fn show_task_table(
    chart: &GanttChart,
    selected_task: Option<&str>,
    scroll_y: f32,
    ui: &mut Ui,
) -> TaskTableAction {
    let mut action = TaskTableAction::None;
    let config = chart.config();
    let widths = chart.column_widths();
    let grid_width = chart.grid_width();
    let row_height = config.row_height;

    // Column headers
    let (header_rect, _) =
        ui.allocate_exact_size(vec2(grid_width, config.header_height), Sense::hover());
    let painter = ui.painter_at(header_rect);
    painter.rect_filled(header_rect, 0.0, theme::BG_HEADER);

    let mut x = header_rect.left();
    for (i, width) in widths.iter().enumerate() {
        let cell = Rect::from_min_size(pos2(x, header_rect.top()), vec2(*width, header_rect.height()));
        let label = COLUMN_LABELS.get(i).copied().unwrap_or("");
        painter.text(
            cell.center(),
            Align2::CENTER_CENTER,
            label,
            theme::font_small(),
            theme::TEXT_DIM,
        );
        painter.line_segment(
            [cell.right_top(), cell.right_bottom()],
            Stroke::new(1.0, theme::BORDER_SUBTLE),
        );

        let handle = Rect::from_min_max(
            pos2(cell.right() - 3.0, cell.top()),
            pos2(cell.right() + 3.0, cell.bottom()),
        );
        let response = ui.interact(handle, Id::new(("column-resize", i)), Sense::drag());
        if response.hovered() || response.dragged() {
            ui.ctx().set_cursor_icon(CursorIcon::ResizeHorizontal);
        }
        if response.drag_started() {
            if let Some(px) = press_x(ui, &response) {
                action = TaskTableAction::BeginDrag(DragKind::ColumnResize, DragTarget::Column(i), px);
            }
        }
        x += width;
    }
    painter.line_segment(
        [header_rect.left_bottom(), header_rect.right_bottom()],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );

    // Task rows
    let rows = chart.visible_rows();
    let tasks = chart.tasks();
    egui::ScrollArea::vertical()
        .id_salt("task_grid_rows")
        .auto_shrink([false, false])
        .vertical_scroll_offset(scroll_y)
        .scroll_bar_visibility(egui::scroll_area::ScrollBarVisibility::AlwaysHidden)
        .show(ui, |ui| {
            let (body, _) = ui.allocate_exact_size(
                vec2(grid_width, rows.len() as f32 * row_height),
                Sense::hover(),
            );
            let painter = ui.painter_at(body);

            for (i, row) in rows.iter().enumerate() {
                let task = &tasks[row.index];
                let is_selected = selected_task == Some(task.id.as_str());
                let row_rect = Rect::from_min_size(
                    pos2(body.left(), body.top() + i as f32 * row_height),
                    vec2(grid_width, row_height),
                );

                let row_bg = if is_selected {
                    theme::BG_SELECTED
                } else if i % 2 == 0 {
                    theme::BG_PANEL
                } else {
                    theme::BG_DARK
                };
                painter.rect_filled(row_rect, 0.0, row_bg);
                painter.line_segment(
                    [row_rect.left_bottom(), row_rect.right_bottom()],
                    Stroke::new(0.5, theme::BORDER_SUBTLE),
                );

                let row_response = ui.interact(row_rect, Id::new(("task-row", &task.id)), Sense::click());
                if row_response.double_clicked() {
                    action = TaskTableAction::Edit(task.id.clone());
                } else if row_response.clicked() {
                    action = TaskTableAction::Select(task.id.clone());
                }

                let cy = row_rect.center().y;
                let mut cells = widths.iter().scan(row_rect.left(), |left, w| {
                    let cell = Rect::from_min_size(pos2(*left, row_rect.top()), vec2(*w, row_height));
                    *left += w;
                    Some(cell)
                });

                // Name cell: indent, expand toggle, type marker, label
                if let Some(cell) = cells.next() {
                    let clipped = painter.with_clip_rect(cell.intersect(body));
                    let mut cx = cell.left() + 8.0 + row.depth as f32 * theme::INDENT;

                    if row.has_children {
                        let caret_rect = Rect::from_center_size(pos2(cx + 8.0, cy), vec2(18.0, 18.0));
                        let icon = if task.open {
                            egui_phosphor::regular::CARET_DOWN
                        } else {
                            egui_phosphor::regular::CARET_RIGHT
                        };
                        clipped.text(
                            caret_rect.center(),
                            Align2::CENTER_CENTER,
                            icon,
                            theme::font_sub(),
                            theme::TEXT_SECONDARY,
                        );
                        let caret = ui.interact(caret_rect, Id::new(("row-toggle", &task.id)), Sense::click());
                        if caret.clicked() {
                            action = TaskTableAction::ToggleOpen(task.id.clone());
                        }
                    }
                    cx += 20.0;

                    let color = theme::bar_color(task.task_type);
                    if task.task_type == TaskType::Milestone {
                        clipped.text(
                            pos2(cx + 4.0, cy),
                            Align2::CENTER_CENTER,
                            egui_phosphor::regular::DIAMOND,
                            theme::font_sub(),
                            color,
                        );
                    } else {
                        clipped.rect_filled(
                            Rect::from_center_size(pos2(cx + 4.0, cy), vec2(5.0, row_height * 0.45)),
                            2.0,
                            color,
                        );
                    }

                    let text_color = if task.task_type == TaskType::Project {
                        theme::TEXT_PRIMARY
                    } else if is_selected {
                        Color32::WHITE
                    } else {
                        theme::TEXT_SECONDARY
                    };
                    clipped.text(
                        pos2(cx + 14.0, cy),
                        Align2::LEFT_CENTER,
                        &task.text,
                        theme::font_bar(),
                        text_color,
                    );
                }

                let values = [
                    task.start_date.format("%Y-%m-%d").to_string(),
                    task.end_date.format("%Y-%m-%d").to_string(),
                    format!("{}%", task.progress_percent()),
                ];
                for (cell, value) in cells.zip(values) {
                    let clipped = painter.with_clip_rect(cell.intersect(body));
                    clipped.text(
                        cell.center(),
                        Align2::CENTER_CENTER,
                        value,
                        theme::font_mono(),
                        theme::TEXT_DIM,
                    );
                }
            }
        });

    action
}
