//! 工具栏模块
//!
//! 显示播放时间、节拍位置、轨道数量，以及打开音色库对话框的按钮。

use crate::editor::DrumsTimelineCommand;
use crate::utils::{format_beat, format_time};
use egui::*;

pub struct Toolbar {
    current_time: f64,
    current_beat: f64,
    is_playing: bool,
    track_count: usize,
}

impl Toolbar {
    pub fn new(current_time: f64, current_beat: f64, is_playing: bool, track_count: usize) -> Self {
        Self {
            current_time,
            current_beat,
            is_playing,
            track_count,
        }
    }

    pub fn ui(&self, ui: &mut Ui, command_callback: &mut dyn FnMut(DrumsTimelineCommand)) {
        ui.horizontal(|ui| {
            ui.label(RichText::new("🥁 Drums").strong());
            ui.separator();

            let state = if self.is_playing { "▶" } else { "⏸" };
            ui.label(format!("{} {}", state, format_time(self.current_time)));
            ui.separator();

            ui.label(format!("Beat: {}", format_beat(self.current_beat)));
            ui.separator();

            ui.label(format!("Tracks: {}", self.track_count));

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button("➕ Add track").clicked() {
                    command_callback(DrumsTimelineCommand::OpenBankDialog);
                }
            });
        });
    }
}
