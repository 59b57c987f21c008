use egui::{pos2, vec2, Align2, Color32, CursorIcon, Id, Painter, Pos2, Rect, Response, Rounding, Sense, Stroke, Ui, Vec2};
use gantt_timeline::model::{BarGeometry, DragKind, DragTarget, GanttChart, Task};

use crate::ui::{press_x, theme};

/// What the timeline asks the app to do after this frame.
pub enum ChartAction {
    None,
    BeginDrag(DragKind, DragTarget, f32),
    Select(String),
    ClearSelection,
    EditTask(String),
    EditBaseline(String),
}

pub struct ChartOutput {
    pub action: ChartAction,
    /// Vertical scroll offset, mirrored by the task grid.
    pub scroll_y: f32,
}

/// Render the timeline area (right panel).
pub fn show_gantt_chart(chart: &GanttChart, selected_task: Option<&str>, ui: &mut Ui) -> ChartOutput {
    let mut action = ChartAction::None;
    let config = chart.config();
    let header_height = config.header_height;
    let row_height = config.row_height;
    let rows = chart.visible_rows();
    let tasks = chart.tasks();
    let available = ui.available_size();
    let chart_width = chart.timeline_width().max(available.x);
    let chart_height = (header_height + rows.len() as f32 * row_height).max(available.y);

    let output = egui::ScrollArea::both()
        .id_salt("timeline")
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let (response, painter) =
                ui.allocate_painter(Vec2::new(chart_width, chart_height), Sense::click());
            let origin = response.rect.min;
            let mut consumed_click = false;

            painter.rect_filled(response.rect, 0.0, theme::BG_DARK);
            draw_grid(&painter, chart, origin, chart_height);

            for (i, row) in rows.iter().enumerate() {
                let task = &tasks[row.index];
                let y = origin.y + header_height + i as f32 * row_height;
                let row_rect = Rect::from_min_size(pos2(origin.x, y), vec2(chart_width, row_height));
                if i % 2 == 1 {
                    painter.rect_filled(row_rect, 0.0, Color32::from_white_alpha(4));
                }
                painter.line_segment(
                    [row_rect.left_bottom(), row_rect.right_bottom()],
                    Stroke::new(0.5, theme::BORDER_SUBTLE),
                );

                let is_selected = selected_task == Some(task.id.as_str());
                let dragging = chart
                    .drag_state()
                    .active()
                    .filter(|_| chart.drag_state().task_id() == Some(task.id.as_str()))
                    .map(|d| d.kind);

                if let Some(baseline) = chart.baseline_bar(task) {
                    let active = dragging.is_some_and(|k| k.is_baseline());
                    if let Some(a) = baseline_interactions(ui, &painter, task, origin, y, row_height, baseline, active) {
                        consumed_click = true;
                        action = a;
                    }
                }

                let bar = chart.actual_bar(task);
                let active = dragging.is_some_and(|k| !k.is_baseline());
                let bar_action = if task.is_milestone() {
                    milestone_interactions(ui, &painter, task, origin, y, row_height, bar, is_selected)
                } else {
                    bar_interactions(ui, &painter, task, origin, y, row_height, bar, is_selected || active)
                };
                if let Some(a) = bar_action {
                    consumed_click = true;
                    action = a;
                }
            }

            draw_today_line(&painter, chart, origin, header_height, chart_height);
            draw_header(&painter, chart, origin, ui.clip_rect().top().max(origin.y), chart_width);

            if response.clicked() && !consumed_click {
                action = ChartAction::ClearSelection;
            }
        });

    ChartOutput {
        action,
        scroll_y: output.state.offset.y,
    }
}

/// Start a drag when `response` just began one.
fn drag_start(ui: &Ui, response: &Response, kind: DragKind, task: &Task) -> Option<ChartAction> {
    if !response.drag_started() {
        return None;
    }
    let x = press_x(ui, response)?;
    Some(ChartAction::BeginDrag(kind, DragTarget::Task(task.id.clone()), x))
}

fn edge_handles(bar_rect: Rect) -> (Rect, Rect) {
    let left = Rect::from_min_max(
        pos2(bar_rect.left() - theme::HANDLE_WIDTH * 0.5, bar_rect.top()),
        pos2(bar_rect.left() + theme::HANDLE_WIDTH * 0.5, bar_rect.bottom()),
    );
    let right = Rect::from_min_max(
        pos2(bar_rect.right() - theme::HANDLE_WIDTH * 0.5, bar_rect.top()),
        pos2(bar_rect.right() + theme::HANDLE_WIDTH * 0.5, bar_rect.bottom()),
    );
    (left, right)
}

#[allow(clippy::too_many_arguments)]
fn baseline_interactions(
    ui: &Ui,
    painter: &Painter,
    task: &Task,
    origin: Pos2,
    y: f32,
    row_height: f32,
    bar: BarGeometry,
    active: bool,
) -> Option<ChartAction> {
    let rect = Rect::from_min_size(
        pos2(origin.x + bar.x, y + row_height - 12.0),
        vec2(bar.width, 6.0),
    );
    let fill = if active { theme::BASELINE_ACTIVE } else { theme::BASELINE_BAR };
    painter.rect_filled(rect, Rounding::same(3.0), fill);

    let body = ui.interact(
        rect.expand2(vec2(0.0, 3.0)),
        Id::new(("baseline", &task.id)),
        Sense::click_and_drag(),
    );
    let (left, right) = edge_handles(rect.expand2(vec2(0.0, 3.0)));
    let left = ui.interact(left, Id::new(("baseline-left", &task.id)), Sense::drag());
    let right = ui.interact(right, Id::new(("baseline-right", &task.id)), Sense::drag());

    if left.hovered() || right.hovered() {
        ui.ctx().set_cursor_icon(CursorIcon::ResizeHorizontal);
    } else if body.hovered() {
        ui.ctx().set_cursor_icon(CursorIcon::Grab);
        body.clone().on_hover_text(format!(
            "Planned: {} → {}",
            task.planned_start.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
            task.planned_end.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
        ));
    }

    if body.double_clicked() {
        return Some(ChartAction::EditBaseline(task.id.clone()));
    }
    drag_start(ui, &left, DragKind::BaselineResizeStart, task)
        .or_else(|| drag_start(ui, &right, DragKind::BaselineResizeEnd, task))
        .or_else(|| drag_start(ui, &body, DragKind::BaselineMove, task))
}

#[allow(clippy::too_many_arguments)]
fn bar_interactions(
    ui: &Ui,
    painter: &Painter,
    task: &Task,
    origin: Pos2,
    y: f32,
    row_height: f32,
    bar: BarGeometry,
    highlighted: bool,
) -> Option<ChartAction> {
    let bar_rect = Rect::from_min_size(
        pos2(origin.x + bar.x, y + 6.0),
        vec2(bar.width, row_height - 22.0),
    );
    draw_task_bar(painter, task, bar_rect, highlighted);

    let body = ui.interact(bar_rect, Id::new(("task-bar", &task.id)), Sense::click_and_drag());
    let (left, right) = edge_handles(bar_rect);
    let left = ui.interact(left.expand(2.0), Id::new(("task-resize-left", &task.id)), Sense::drag());
    let right = ui.interact(right.expand(2.0), Id::new(("task-resize-right", &task.id)), Sense::drag());

    let progress_x = bar_rect.left() + bar_rect.width() * task.progress.clamp(0.0, 1.0);
    let progress_rect = Rect::from_center_size(
        pos2(progress_x, bar_rect.bottom() - 3.0),
        vec2(theme::PROGRESS_HANDLE_WIDTH, 8.0),
    );
    let progress = ui.interact(progress_rect, Id::new(("task-progress", &task.id)), Sense::drag());

    if left.hovered() || right.hovered() || progress.hovered() {
        ui.ctx().set_cursor_icon(CursorIcon::ResizeHorizontal);
    } else if body.hovered() {
        ui.ctx().set_cursor_icon(CursorIcon::Grab);
    }

    if highlighted || body.hovered() || progress.hovered() {
        // Progress handle: a small tab under the fill edge
        painter.rect_filled(progress_rect, Rounding::same(2.0), theme::HANDLE_COLOR);
        // Edge pills
        let handle_h = bar_rect.height() * 0.55;
        let handle_y = bar_rect.center().y - handle_h / 2.0;
        for hx in [bar_rect.left() - 1.5, bar_rect.right() - 2.5] {
            painter.rect_filled(
                Rect::from_min_size(pos2(hx, handle_y), vec2(4.0, handle_h)),
                Rounding::same(2.0),
                theme::HANDLE_COLOR,
            );
        }
    }

    if body.hovered() {
        body.clone().on_hover_text(format!(
            "{}\n{} → {} ({} d)\nProgress: {}%",
            task.text,
            task.start_date.format("%Y-%m-%d"),
            task.end_date.format("%Y-%m-%d"),
            task.duration,
            task.progress_percent()
        ));
    }

    if body.double_clicked() {
        return Some(ChartAction::EditTask(task.id.clone()));
    }
    if body.clicked() {
        return Some(ChartAction::Select(task.id.clone()));
    }
    drag_start(ui, &progress, DragKind::ProgressResize, task)
        .or_else(|| drag_start(ui, &left, DragKind::ResizeStart, task))
        .or_else(|| drag_start(ui, &right, DragKind::ResizeEnd, task))
        .or_else(|| drag_start(ui, &body, DragKind::Move, task))
}

#[allow(clippy::too_many_arguments)]
fn milestone_interactions(
    ui: &Ui,
    painter: &Painter,
    task: &Task,
    origin: Pos2,
    y: f32,
    row_height: f32,
    bar: BarGeometry,
    is_selected: bool,
) -> Option<ChartAction> {
    let center = pos2(origin.x + bar.x, y + (row_height - 10.0) / 2.0);
    let size = theme::MILESTONE_SIZE;
    let points = vec![
        pos2(center.x, center.y - size),
        pos2(center.x + size, center.y),
        pos2(center.x, center.y + size),
        pos2(center.x - size, center.y),
    ];
    painter.add(egui::Shape::convex_polygon(
        points.clone(),
        theme::bar_color(task.task_type),
        Stroke::new(1.5, Color32::WHITE),
    ));
    if is_selected {
        painter.add(egui::Shape::convex_polygon(
            points,
            Color32::TRANSPARENT,
            Stroke::new(2.0, theme::BORDER_ACCENT),
        ));
    }
    painter.text(
        pos2(center.x + size + 6.0, center.y),
        Align2::LEFT_CENTER,
        &task.text,
        theme::font_bar(),
        theme::TEXT_SECONDARY,
    );

    let rect = Rect::from_center_size(center, Vec2::splat(size * 2.0 + 4.0));
    let response = ui.interact(rect, Id::new(("milestone", &task.id)), Sense::click_and_drag());
    if response.hovered() {
        ui.ctx().set_cursor_icon(CursorIcon::Grab);
    }
    if response.double_clicked() {
        return Some(ChartAction::EditTask(task.id.clone()));
    }
    if response.clicked() {
        return Some(ChartAction::Select(task.id.clone()));
    }
    drag_start(ui, &response, DragKind::Move, task)
}

fn draw_task_bar(painter: &Painter, task: &Task, bar_rect: Rect, highlighted: bool) {
    let rounding = Rounding::same(theme::BAR_ROUNDING);

    // Soft shadow
    painter.rect_filled(
        bar_rect.translate(Vec2::new(1.0, 2.0)),
        rounding,
        Color32::from_black_alpha(35),
    );
    painter.rect_filled(bar_rect, rounding, theme::bar_color(task.task_type));

    // Progress fill (darkened overlay)
    if task.progress > 0.0 {
        let progress_rect = Rect::from_min_size(
            bar_rect.min,
            Vec2::new(bar_rect.width() * task.progress.clamp(0.0, 1.0), bar_rect.height()),
        );
        painter.rect_filled(progress_rect, rounding, theme::PROGRESS_OVERLAY);
    }

    if highlighted {
        painter.rect_stroke(
            bar_rect.expand(1.5),
            Rounding::same(theme::BAR_ROUNDING + 1.5),
            Stroke::new(2.0, theme::BORDER_ACCENT),
        );
    }

    // Label, clipped to the bar
    if bar_rect.width() > 30.0 {
        let clipped = painter.with_clip_rect(bar_rect.intersect(painter.clip_rect()));
        clipped.text(
            pos2(bar_rect.left() + 6.0, bar_rect.center().y),
            Align2::LEFT_CENTER,
            &task.text,
            theme::font_bar(),
            theme::TEXT_ON_BAR,
        );
    }
}

/// Column shading and vertical grid lines for every tick.
fn draw_grid(painter: &Painter, chart: &GanttChart, origin: Pos2, height: f32) {
    let header_height = chart.config().header_height;
    for tick in chart.ticks() {
        let x = origin.x + tick.x;
        if tick.weekend {
            painter.rect_filled(
                Rect::from_min_size(pos2(x, origin.y + header_height), vec2(tick.width, height)),
                0.0,
                theme::BG_WEEKEND,
            );
        }
        painter.line_segment(
            [pos2(x + tick.width, origin.y + header_height), pos2(x + tick.width, origin.y + height)],
            Stroke::new(0.5, theme::GRID_LINE),
        );
    }
}

/// Month groups over tick labels, pinned to the top of the visible area.
fn draw_header(painter: &Painter, chart: &GanttChart, origin: Pos2, top: f32, width: f32) {
    let header_height = chart.config().header_height;
    let half = header_height / 2.0;

    painter.rect_filled(
        Rect::from_min_size(pos2(origin.x, top), vec2(width, header_height)),
        0.0,
        theme::BG_HEADER,
    );

    for group in chart.month_groups() {
        let rect = Rect::from_min_size(pos2(origin.x + group.x, top), vec2(group.width, half));
        painter.line_segment(
            [rect.right_top(), rect.right_bottom()],
            Stroke::new(1.0, theme::BORDER_SUBTLE),
        );
        // Keep the label on screen while the group is scrolled partly out.
        let label_x = (rect.left() + 8.0).max(painter.clip_rect().left() + 8.0);
        painter.with_clip_rect(rect.intersect(painter.clip_rect())).text(
            pos2(label_x, rect.center().y),
            Align2::LEFT_CENTER,
            group.label(),
            theme::font_header(),
            theme::ACCENT,
        );
    }

    for tick in chart.ticks() {
        let rect = Rect::from_min_size(pos2(origin.x + tick.x, top + half), vec2(tick.width, half));
        let color = if tick.weekend { theme::TEXT_WEEKEND } else { theme::TEXT_SECONDARY };
        painter.text(rect.center(), Align2::CENTER_CENTER, &tick.label, theme::font_sub(), color);
        painter.line_segment(
            [rect.right_top(), rect.right_bottom()],
            Stroke::new(0.5, theme::GRID_LINE),
        );
    }

    painter.line_segment(
        [pos2(origin.x, top + half), pos2(origin.x + width, top + half)],
        Stroke::new(0.5, theme::BORDER_SUBTLE),
    );
    painter.line_segment(
        [pos2(origin.x, top + header_height), pos2(origin.x + width, top + header_height)],
        Stroke::new(1.0, theme::BORDER_SUBTLE),
    );
}

fn draw_today_line(painter: &Painter, chart: &GanttChart, origin: Pos2, header_height: f32, height: f32) {
    let today = chrono::Local::now().date_naive();
    let x = origin.x + chart.calendar().date_to_x(today);
    painter.line_segment(
        [pos2(x, origin.y + header_height), pos2(x, origin.y + height)],
        Stroke::new(1.5, theme::TODAY_LINE),
    );
}
