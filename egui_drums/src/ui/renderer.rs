use crate::structure::{Measure, STEPS_PER_BEAT, STEPS_PER_MEASURE};
use egui::*;

const MEASURE_LINE_COLOR: Color32 = Color32::from_rgb(210, 210, 210);
const BEAT_LINE_COLOR: Color32 = Color32::from_rgb(90, 90, 90);
const PLAYHEAD_COLOR: Color32 = Color32::from_rgba_premultiplied(100, 200, 255, 200);

/// 绘制虚线垂直线的工具函数
pub fn draw_dashed_vertical_line(
    painter: &Painter,
    x: f32,
    top: f32,
    bottom: f32,
    stroke: Stroke,
) {
    let dash_len = 2.0;
    let gap_len = 2.0;
    let mut y = top;
    while y < bottom {
        let next = (y + dash_len).min(bottom);
        painter.line_segment([Pos2::new(x, y), Pos2::new(x, next)], stroke);
        y += dash_len + gap_len;
    }
}

/// 单个步进格
pub struct StepCellStyle {
    pub accented: bool,
    pub active: bool,
    pub under_playhead: bool,
    pub hovered: bool,
    pub row_selected: bool,
    pub color: Color32,
}

pub fn draw_step_cell(painter: &Painter, rect: Rect, style: &StepCellStyle) {
    let mut background = if style.accented {
        Color32::from_gray(44)
    } else {
        Color32::from_gray(34)
    };
    if style.row_selected {
        background = background.lerp_to_gamma(Color32::from_gray(70), 0.3);
    }
    if style.under_playhead {
        background = background.lerp_to_gamma(PLAYHEAD_COLOR, 0.25);
    }
    if style.hovered {
        background = background.lerp_to_gamma(Color32::WHITE, 0.1);
    }

    let cell = rect.shrink(1.0);
    painter.rect_filled(cell, 2.0, background);

    if style.active {
        let radius = (cell.width().min(cell.height()) * 0.3).max(2.0);
        painter.circle_filled(cell.center(), radius, style.color);
        if style.under_playhead {
            painter.circle_stroke(cell.center(), radius + 1.5, Stroke::new(1.5, Color32::WHITE));
        }
    }
}

/// 绘制小节标尺，小节编号显示在每小节起点
pub fn draw_ruler(painter: &Painter, rect: Rect, measures: &[Measure], step_width: f32, hovered_measure: Option<usize>) {
    painter.rect_filled(rect, 0.0, Color32::from_gray(40));
    let measure_width = step_width * STEPS_PER_MEASURE as f32;

    for (i, measure) in measures.iter().enumerate() {
        let x = rect.min.x + i as f32 * measure_width;
        let cell = Rect::from_min_size(Pos2::new(x, rect.min.y), Vec2::new(measure_width, rect.height()));
        if hovered_measure == Some(i) {
            painter.rect_filled(cell, 0.0, Color32::from_gray(55));
        }
        painter.line_segment(
            [Pos2::new(x, rect.min.y), Pos2::new(x, rect.max.y)],
            Stroke::new(1.0, MEASURE_LINE_COLOR),
        );
        painter.text(
            Pos2::new(x + 4.0, rect.center().y),
            Align2::LEFT_CENTER,
            measure.number.to_string(),
            FontId::proportional(11.0),
            Color32::from_gray(200),
        );
    }
}

/// 小节线为实线，拍线为虚线
pub fn draw_grid_lines(painter: &Painter, rect: Rect, total_steps: u32, step_width: f32) {
    for step in (0..=total_steps).step_by(STEPS_PER_BEAT as usize) {
        let x = rect.min.x + step as f32 * step_width;
        if step % STEPS_PER_MEASURE == 0 {
            painter.line_segment(
                [Pos2::new(x, rect.min.y), Pos2::new(x, rect.max.y)],
                Stroke::new(1.0, MEASURE_LINE_COLOR),
            );
        } else {
            draw_dashed_vertical_line(painter, x, rect.min.y, rect.max.y, Stroke::new(1.0, BEAT_LINE_COLOR));
        }
    }
}

pub fn draw_playhead(painter: &Painter, x: f32, top: f32, bottom: f32) {
    painter.line_segment(
        [Pos2::new(x, top), Pos2::new(x, bottom)],
        Stroke::new(2.0, PLAYHEAD_COLOR),
    );
    let head = vec![
        Pos2::new(x - 5.0, top),
        Pos2::new(x + 5.0, top),
        Pos2::new(x, top + 6.0),
    ];
    painter.add(Shape::convex_polygon(head, PLAYHEAD_COLOR, Stroke::NONE));
}
