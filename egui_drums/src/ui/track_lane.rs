use egui::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackLaneAction {
    Select,
    Delete,
}

/// 轨道头：色块、音色名和删除按钮，点击整行切换选中
pub struct TrackLaneHeader<'a> {
    sound: &'a str,
    color: Color32,
    selected: bool,
    width: f32,
    height: f32,
}

impl<'a> TrackLaneHeader<'a> {
    pub fn new(sound: &'a str, color: Color32, selected: bool, width: f32, height: f32) -> Self {
        Self {
            sound,
            color,
            selected,
            width,
            height,
        }
    }

    pub fn ui(&self, ui: &mut Ui) -> Option<TrackLaneAction> {
        let (rect, response) = ui.allocate_exact_size(Vec2::new(self.width, self.height), Sense::click());
        let painter = ui.painter_at(rect);

        let background = if self.selected {
            Color32::from_gray(62)
        } else if response.hovered() {
            Color32::from_gray(48)
        } else {
            Color32::from_gray(36)
        };
        painter.rect_filled(rect.shrink(1.0), 2.0, background);

        let swatch = Rect::from_min_size(rect.min + Vec2::new(4.0, 4.0), Vec2::new(4.0, rect.height() - 8.0));
        painter.rect_filled(swatch, 1.0, self.color);

        painter.text(
            Pos2::new(swatch.max.x + 8.0, rect.center().y),
            Align2::LEFT_CENTER,
            self.sound,
            FontId::proportional(13.0),
            if self.selected { Color32::WHITE } else { Color32::from_gray(210) },
        );

        // Button is added after the row so it wins the hit test
        let button_size = Vec2::splat((self.height - 8.0).max(12.0));
        let button_rect = Rect::from_center_size(
            Pos2::new(rect.max.x - button_size.x / 2.0 - 4.0, rect.center().y),
            button_size,
        );
        let delete = ui
            .put(button_rect, Button::new("🗑").frame(false))
            .on_hover_text("Delete track");

        if delete.clicked() {
            Some(TrackLaneAction::Delete)
        } else if response.clicked() {
            Some(TrackLaneAction::Select)
        } else {
            None
        }
    }
}
