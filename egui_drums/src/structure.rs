//! 数据结构模块
//!
//! 定义了鼓轨编辑器使用的核心数据结构：鼓轨、歌曲文档和小节，
//! 以及对轨道列表的纯函数变换（每次变换都返回新的列表）。

use crate::error::DrumsError;
use egui::Color32;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 每个小节的步进数
pub const STEPS_PER_MEASURE: u32 = 8;

/// 每拍的步进数（8 步 / 4 拍小节）
pub const STEPS_PER_BEAT: u32 = 2;

/// 轨道配色，按轨道索引循环取色
pub const TRACK_PALETTE: [Color32; 8] = [
    Color32::from_rgb(239, 83, 80),
    Color32::from_rgb(255, 167, 38),
    Color32::from_rgb(255, 238, 88),
    Color32::from_rgb(102, 187, 106),
    Color32::from_rgb(38, 198, 218),
    Color32::from_rgb(66, 165, 245),
    Color32::from_rgb(171, 71, 188),
    Color32::from_rgb(236, 64, 122),
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrumTrack {
    pub sound: String,            // MIDI 音色库名称
    pub events: BTreeSet<u32>,    // 触发的步进索引（升序、无重复）
}

impl DrumTrack {
    pub fn new(sound: impl Into<String>) -> Self {
        Self {
            sound: sound.into(),
            events: BTreeSet::new(),
        }
    }

    pub fn is_active(&self, step: u32) -> bool {
        self.events.contains(&step)
    }

    /// 切换步进触发，返回切换后是否处于激活状态
    pub fn toggle(&mut self, step: u32) -> bool {
        if self.events.remove(&step) {
            false
        } else {
            self.events.insert(step);
            true
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub name: String,
    pub drums: Vec<DrumTrack>,
}

impl Song {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            drums: Vec::new(),
        }
    }

    pub fn has_sound(&self, sound: &str) -> bool {
        self.drums.iter().any(|t| t.sound == sound)
    }
}

/// 外部布局提供的小节
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub number: u32,
    pub start_time: f64, // 小节开始时间（秒）
}

impl Measure {
    pub fn new(number: u32, start_time: f64) -> Self {
        Self { number, start_time }
    }
}

/// 小节索引 + 小节内位置 -> 全局步进索引
pub fn step_index(measure_index: usize, position: u32) -> u32 {
    measure_index as u32 * STEPS_PER_MEASURE + position
}

/// 重拍位置（每拍第一步），用于步进格底色
pub fn is_accented(position: u32) -> bool {
    position % 2 == 0
}

pub fn total_steps(measure_count: usize) -> u32 {
    measure_count as u32 * STEPS_PER_MEASURE
}

pub fn track_color(track_index: usize) -> Color32 {
    TRACK_PALETTE[track_index % TRACK_PALETTE.len()]
}

/// 追加新轨道；若音色已存在则拒绝
pub fn with_track_added(tracks: &[DrumTrack], sound: &str) -> Result<Vec<DrumTrack>, DrumsError> {
    if tracks.iter().any(|t| t.sound == sound) {
        return Err(DrumsError::DuplicateTrack(sound.to_string()));
    }
    let mut next = tracks.to_vec();
    next.push(DrumTrack::new(sound));
    Ok(next)
}

/// 移除指定索引的轨道；索引越界时返回 None
pub fn without_track(tracks: &[DrumTrack], index: usize) -> Option<Vec<DrumTrack>> {
    if index >= tracks.len() {
        return None;
    }
    let mut next = tracks.to_vec();
    next.remove(index);
    Some(next)
}

/// 切换某条轨道上的步进；轨道索引越界时返回 None
pub fn with_step_toggled(tracks: &[DrumTrack], track_index: usize, step: u32) -> Option<Vec<DrumTrack>> {
    if track_index >= tracks.len() {
        return None;
    }
    let mut next = tracks.to_vec();
    next[track_index].toggle(step);
    Some(next)
}

/// 删除轨道后修正选中索引，保证仍指向同一条逻辑轨道
pub fn repair_selection(selection: Option<usize>, deleted: usize) -> Option<usize> {
    match selection {
        Some(selected) if selected == deleted => None,
        Some(selected) if deleted < selected => Some(selected - 1),
        other => other,
    }
}
