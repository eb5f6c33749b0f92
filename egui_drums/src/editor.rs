//! 编辑命令和事件模块
//!
//! 定义了鼓轨编辑器的命令系统和事件系统，用于与宿主应用交互。

#[derive(Clone, Debug)]
pub enum DrumsTimelineCommand {
    AddTrackFromBank {
        name: String,
    },
    DeleteTrack {
        index: usize,
    },
    ToggleStep {
        track_index: usize,
        step: u32,
    },
    SelectTrack {
        index: usize,
    },
    OpenBankDialog,
    CloseBankDialog,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

/// 提示消息，由宿主以 toast 形式显示
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Info,
            title: title.into(),
            description: description.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrumsTimelineEvent {
    Notify(Notification),
    TrackAdded {
        index: usize,
        sound: String,
    },
    TrackDeleted {
        index: usize,
        sound: String,
    },
    StepToggled {
        track_index: usize,
        step: u32,
        active: bool,
    },
    SelectionChanged {
        index: Option<usize>,
    },
    SeekRequested {
        time: f64,
    },
}
