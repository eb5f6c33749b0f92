//! 歌曲文件模块
//!
//! 处理歌曲的保存和加载。

use crate::error::DrumsError;
use crate::structure::Song;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SongFile {
    pub version: String,
    pub song: Song,
}

impl SongFile {
    pub fn new(song: Song) -> Self {
        Self {
            version: "1.0".to_string(),
            song,
        }
    }

    /// 保存歌曲到指定路径，父目录不存在时自动创建
    pub fn save_to_path(&self, path: &Path) -> Result<(), DrumsError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json_content = serde_json::to_string_pretty(self)?;
        fs::write(path, json_content)?;
        Ok(())
    }

    /// 从指定路径加载歌曲
    pub fn load_from_path(path: &Path) -> Result<Self, DrumsError> {
        let json_content = fs::read_to_string(path)?;
        let file: SongFile = serde_json::from_str(&json_content)?;
        Ok(file)
    }
}
