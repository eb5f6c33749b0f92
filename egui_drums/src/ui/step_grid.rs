//! 步进网格：顶部为小节标尺，每条轨道一行步进格，播放头覆盖在最上层。

use super::renderer::{self, StepCellStyle};
use crate::layout::GridLayout;
use crate::structure::{is_accented, step_index, track_color, DrumTrack, Measure, STEPS_PER_MEASURE};
use egui::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GridAction {
    Seek { time: f64 },
    ToggleStep { track_index: usize, step: u32 },
}

/// 指针位置在网格中命中的区域
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridHit {
    Ruler { measure_index: usize },
    Cell { track_index: usize, step: u32 },
}

pub struct StepGrid<'a> {
    layout: &'a GridLayout,
    measures: &'a [Measure],
    tracks: &'a [DrumTrack],
    selected: Option<usize>,
    row_height: f32,
    ruler_height: f32,
}

impl<'a> StepGrid<'a> {
    pub fn new(
        layout: &'a GridLayout,
        measures: &'a [Measure],
        tracks: &'a [DrumTrack],
        selected: Option<usize>,
        row_height: f32,
        ruler_height: f32,
    ) -> Self {
        Self {
            layout,
            measures,
            tracks,
            selected,
            row_height,
            ruler_height,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(
            self.layout.total_width,
            self.ruler_height + self.tracks.len() as f32 * self.row_height,
        )
    }

    /// 将相对网格左上角的位置映射到标尺小节或步进格
    pub fn hit_test(&self, local: Vec2) -> Option<GridHit> {
        let step_width = self.layout.step_width;
        if local.x < 0.0 || local.y < 0.0 || local.x >= self.layout.total_width || step_width <= 0.0 {
            return None;
        }
        let step = (local.x / step_width).floor() as u32;
        if step >= self.layout.total_steps {
            return None;
        }

        if local.y < self.ruler_height {
            return Some(GridHit::Ruler {
                measure_index: (step / STEPS_PER_MEASURE) as usize,
            });
        }

        let track_index = ((local.y - self.ruler_height) / self.row_height).floor() as usize;
        (track_index < self.tracks.len()).then_some(GridHit::Cell { track_index, step })
    }

    /// 绘制网格，返回本帧的点击动作以及播放头矩形（屏幕坐标）
    pub fn ui(&self, ui: &mut Ui) -> (Vec<GridAction>, Rect) {
        let (rect, response) = ui.allocate_exact_size(self.size(), Sense::click());
        let painter = ui.painter_at(rect);
        let step_width = self.layout.step_width;

        let hovered = response
            .hover_pos()
            .and_then(|pos| self.hit_test(pos - rect.min));

        // Ruler
        let ruler_rect = Rect::from_min_size(rect.min, Vec2::new(rect.width(), self.ruler_height));
        let hovered_measure = match hovered {
            Some(GridHit::Ruler { measure_index }) => Some(measure_index),
            _ => None,
        };
        renderer::draw_ruler(&painter, ruler_rect, self.measures, step_width, hovered_measure);

        // Rows
        for (track_index, track) in self.tracks.iter().enumerate() {
            let row_top = ruler_rect.max.y + track_index as f32 * self.row_height;
            let color = track_color(track_index);
            for measure_index in 0..self.measures.len() {
                for position in 0..STEPS_PER_MEASURE {
                    let step = step_index(measure_index, position);
                    let cell = Rect::from_min_size(
                        Pos2::new(rect.min.x + step as f32 * step_width, row_top),
                        Vec2::new(step_width, self.row_height),
                    );
                    let style = StepCellStyle {
                        accented: is_accented(position),
                        active: track.is_active(step),
                        under_playhead: self.layout.current_step == Some(step),
                        hovered: hovered == Some(GridHit::Cell { track_index, step }),
                        row_selected: self.selected == Some(track_index),
                        color,
                    };
                    renderer::draw_step_cell(&painter, cell, &style);
                }
            }
        }

        let rows_rect = Rect::from_min_max(Pos2::new(rect.min.x, ruler_rect.max.y), rect.max);
        renderer::draw_grid_lines(&painter, rows_rect, self.layout.total_steps, step_width);

        let playhead_x = rect.min.x + self.layout.playhead_x;
        if playhead_x >= rect.min.x && playhead_x <= rect.max.x {
            renderer::draw_playhead(&painter, playhead_x, rect.min.y, rect.max.y);
        }
        let playhead_rect = Rect::from_x_y_ranges(playhead_x - 1.0..=playhead_x + 1.0, rect.y_range());

        if hovered.is_some() {
            ui.output_mut(|o| o.cursor_icon = CursorIcon::PointingHand);
        }

        let mut actions = Vec::new();
        if response.clicked_by(PointerButton::Primary) {
            let hit = response
                .interact_pointer_pos()
                .and_then(|pos| self.hit_test(pos - rect.min));
            match hit {
                Some(GridHit::Ruler { measure_index }) => {
                    if let Some(measure) = self.measures.get(measure_index) {
                        actions.push(GridAction::Seek {
                            time: measure.start_time,
                        });
                    }
                }
                Some(GridHit::Cell { track_index, step }) => {
                    actions.push(GridAction::ToggleStep { track_index, step });
                }
                None => {}
            }
        }

        (actions, playhead_rect)
    }
}
