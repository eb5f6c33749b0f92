//! 歌曲存储模块
//!
//! 编辑器只读取歌曲快照，并通过 `update_drums` 提交完整的轨道列表。

use crate::structure::{DrumTrack, Song};

pub trait SongStore {
    /// 当前歌曲，加载中时为 `None`
    fn song(&self) -> Option<&Song>;

    /// 整体替换鼓轨列表
    fn update_drums(&mut self, tracks: Vec<DrumTrack>);

    /// 每次 `update_drums` 后递增，用于使布局缓存失效
    fn drums_revision(&self) -> u64;

    fn drums(&self) -> &[DrumTrack] {
        self.song().map(|s| s.drums.as_slice()).unwrap_or(&[])
    }
}

/// 内存中的歌曲文档
#[derive(Clone, Debug, Default)]
pub struct SongDocument {
    song: Option<Song>,
    revision: u64,
}

impl SongDocument {
    /// 尚未加载的文档
    pub fn loading() -> Self {
        Self::default()
    }

    pub fn with_song(song: Song) -> Self {
        Self {
            song: Some(song),
            revision: 0,
        }
    }

    pub fn set_song(&mut self, song: Song) {
        self.song = Some(song);
        self.revision += 1;
    }

    pub fn take_song(&mut self) -> Option<Song> {
        self.revision += 1;
        self.song.take()
    }
}

impl SongStore for SongDocument {
    fn song(&self) -> Option<&Song> {
        self.song.as_ref()
    }

    fn update_drums(&mut self, tracks: Vec<DrumTrack>) {
        match self.song.as_mut() {
            Some(song) => {
                song.drums = tracks;
                self.revision += 1;
            }
            None => log::warn!("update_drums ignored: song not loaded"),
        }
    }

    fn drums_revision(&self) -> u64 {
        self.revision
    }
}
