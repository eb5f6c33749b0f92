//! 工具函数模块
//!
//! 包含通用的工具函数，如时间格式化等。

/// 将时间（秒）格式化为 "MM:SS.mmm" 格式
///
/// # 示例
///
/// ```
/// use egui_drums::utils::format_time;
///
/// let formatted = format_time(125.5);
/// assert_eq!(formatted, "02:05.500");
/// ```
pub fn format_time(time_seconds: f64) -> String {
    let time_seconds = time_seconds.max(0.0);
    let minutes = (time_seconds / 60.0) as u32;
    let seconds = (time_seconds % 60.0) as u32;
    let milliseconds = ((time_seconds % 1.0) * 1000.0) as u32;
    format!("{:02}:{:02}.{:03}", minutes, seconds, milliseconds)
}

/// 节拍显示为 "小节.拍"（均从 1 开始，4 拍小节）
pub fn format_beat(beat: f64) -> String {
    let beat = beat.max(0.0);
    let measure = (beat / 4.0).floor() as u32 + 1;
    let beat_in_measure = beat % 4.0 + 1.0;
    format!("{}.{:.2}", measure, beat_in_measure)
}
