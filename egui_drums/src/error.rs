//! 错误类型

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DrumsError {
    #[error("轨道 \"{0}\" 已存在")]
    DuplicateTrack(String),

    #[error("歌曲尚未加载")]
    SongNotLoaded,

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON解析错误: {0}")]
    Json(#[from] serde_json::Error),
}
