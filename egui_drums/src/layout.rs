//! 布局模块
//!
//! 外部时间轴控制器提供的属性，以及由这些属性派生、按需重新计算的网格布局。

use crate::structure::{total_steps, Measure, STEPS_PER_BEAT};

/// 由外部时间轴根组件提供的坐标换算
pub trait TimelineLayout {
    /// 时间（秒）-> 时间轴像素位置（每拍 `pixels_per_beat` 像素）
    fn cursor_position(&self, time: f64) -> f32;

    /// 时间（秒）-> 节拍
    fn beat_from_time(&self, time: f64) -> f64;
}

/// 固定速度的布局，供没有自己时间轴根组件的宿主使用
#[derive(Clone, Copy, Debug)]
pub struct ConstantTempoLayout {
    pub bpm: f64,
    pub pixels_per_beat: f32,
}

impl TimelineLayout for ConstantTempoLayout {
    fn cursor_position(&self, time: f64) -> f32 {
        (self.beat_from_time(time) * self.pixels_per_beat as f64) as f32
    }

    fn beat_from_time(&self, time: f64) -> f64 {
        time * self.bpm.max(1.0) / 60.0
    }
}

pub struct TimelineProps<'a> {
    pub current_time: f64,
    pub is_playing: bool,
    pub autoscroll: bool,
    pub pixels_per_beat: f32,
    pub track_header_width: f32,
    pub measures: &'a [Measure],
    pub layout: &'a dyn TimelineLayout,
}

impl TimelineProps<'_> {
    pub fn current_beat(&self) -> f64 {
        self.layout.beat_from_time(self.current_time)
    }
}

/// 决定派生布局是否需要重新计算的输入集合
///
/// `drums_revision` 来自存储，轨道数据的任何修改都会使缓存失效。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderKey {
    time_bits: u64,
    is_playing: bool,
    autoscroll: bool,
    measure_count: usize,
    drums_revision: u64,
    scale_bits: (u32, u32),
}

impl RenderKey {
    pub fn new(props: &TimelineProps<'_>, drums_revision: u64, step_width: f32) -> Self {
        Self {
            time_bits: props.current_time.to_bits(),
            is_playing: props.is_playing,
            autoscroll: props.autoscroll,
            measure_count: props.measures.len(),
            drums_revision,
            scale_bits: (props.pixels_per_beat.to_bits(), step_width.to_bits()),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GridLayout {
    pub step_width: f32,
    pub total_steps: u32,
    pub total_width: f32,
    pub playhead_x: f32,          // 相对网格左边缘
    pub current_step: Option<u32>, // 播放中且播放头位于网格内时有效
}

impl GridLayout {
    pub fn compute(props: &TimelineProps<'_>, step_width: f32) -> Self {
        let total_steps = total_steps(props.measures.len());
        let total_width = total_steps as f32 * step_width;

        let playhead_x = if props.pixels_per_beat > 0.0 {
            let beats = props.layout.cursor_position(props.current_time) / props.pixels_per_beat;
            beats * step_width * STEPS_PER_BEAT as f32
        } else {
            0.0
        };

        let current_step = if props.is_playing && playhead_x >= 0.0 && step_width > 0.0 {
            let step = (playhead_x / step_width).floor() as u32;
            (step < total_steps).then_some(step)
        } else {
            None
        };

        Self {
            step_width,
            total_steps,
            total_width,
            playhead_x,
            current_step,
        }
    }
}

/// 以 `RenderKey` 为键的单条目缓存
#[derive(Default)]
pub struct LayoutCache {
    key: Option<RenderKey>,
    layout: GridLayout,
    recomputations: u64,
}

impl LayoutCache {
    pub fn get(&mut self, props: &TimelineProps<'_>, drums_revision: u64, step_width: f32) -> &GridLayout {
        let key = RenderKey::new(props, drums_revision, step_width);
        if self.key != Some(key) {
            self.layout = GridLayout::compute(props, step_width);
            self.key = Some(key);
            self.recomputations += 1;
        }
        &self.layout
    }

    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    pub fn invalidate(&mut self) {
        self.key = None;
    }
}
