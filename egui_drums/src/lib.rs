//! # egui_drums
//!
//! 一个用于音序器的鼓轨步进编辑器组件库。
//!
//! ## 功能特性
//!
//! - **鼓轨管理**：从 MIDI 音色库添加鼓轨（同名音色拒绝），删除鼓轨
//! - **步进编辑**：每小节 8 步，点击切换触发
//! - **播放头**：由外部时间轴提供坐标换算，播放时可自动滚动
//! - **提示消息**：添加/删除/错误均以事件形式通知宿主
//!
//! ## 基本使用
//!
//! ```rust,ignore
//! use egui_drums::{DrumsTimeline, DrumsTimelineOptions, SongDocument, Song, TimelineProps};
//!
//! let mut timeline = DrumsTimeline::new(DrumsTimelineOptions::default());
//! let mut store = SongDocument::with_song(Song::new("Demo"));
//!
//! // 在 egui UI 中使用
//! timeline.ui(ui, &mut store, &props, &banks);
//!
//! // 处理事件
//! for event in timeline.take_events() {
//!     match event {
//!         DrumsTimelineEvent::Notify(notification) => show_toast(notification),
//!         DrumsTimelineEvent::SeekRequested { time } => transport.seek(time),
//!         _ => {}
//!     }
//! }
//! ```

pub mod editor;
pub mod error;
pub mod layout;
pub mod project;
pub mod store;
pub mod structure;
pub mod ui;
pub mod utils;

pub use editor::{DrumsTimelineCommand, DrumsTimelineEvent, Notification, NotificationKind};
pub use error::DrumsError;
pub use layout::{ConstantTempoLayout, GridLayout, TimelineLayout, TimelineProps};
pub use project::SongFile;
pub use store::{SongDocument, SongStore};
pub use structure::{DrumTrack, Measure, Song, STEPS_PER_BEAT, STEPS_PER_MEASURE};
pub use ui::{BankBrowser, DrumsTimeline, DrumsTimelineOptions, TimelineView};
