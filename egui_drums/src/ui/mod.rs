//! UI 模块
//!
//! 鼓轨编辑器的主组件：工具栏、空状态、轨道列表 + 步进网格 + 播放头，以及添加轨道的音色库对话框。

mod bank_dialog;
mod renderer;
mod step_grid;
mod toolbar;
mod track_lane;

pub use bank_dialog::{filter_banks, BankBrowser, BankDialogAction};
pub use step_grid::{GridAction, GridHit};

use crate::editor::{DrumsTimelineCommand, DrumsTimelineEvent, Notification};
use crate::error::DrumsError;
use crate::layout::{LayoutCache, TimelineProps};
use crate::store::SongStore;
use crate::structure::{repair_selection, track_color, with_step_toggled, with_track_added, without_track, DrumTrack};
use egui::*;

#[derive(Clone)]
pub struct DrumsTimelineOptions {
    pub step_width: f32,
    pub row_height: f32,
    pub ruler_height: f32,
    pub show_toolbar: bool,
    pub id_salt: &'static str,
}

impl Default for DrumsTimelineOptions {
    fn default() -> Self {
        Self {
            step_width: 24.0,
            row_height: 32.0,
            ruler_height: 22.0,
            show_toolbar: true,
            id_salt: "drums_timeline",
        }
    }
}

/// 本帧绘制的内容
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimelineView {
    Loading,
    Empty,
    Grid { rows: usize },
}

pub struct DrumsTimeline {
    selected_track: Option<usize>,
    bank_dialog_open: bool,
    bank_filter: String,
    options: DrumsTimelineOptions,
    layout_cache: LayoutCache,
    known_revision: Option<u64>,

    // Events
    pending_events: Vec<DrumsTimelineEvent>,
    event_listener: Option<Box<dyn FnMut(&DrumsTimelineEvent)>>,
}

impl DrumsTimeline {
    pub fn new(options: DrumsTimelineOptions) -> Self {
        Self {
            selected_track: None,
            bank_dialog_open: false,
            bank_filter: String::new(),
            options,
            layout_cache: LayoutCache::default(),
            known_revision: None,
            pending_events: Vec::new(),
            event_listener: None,
        }
    }

    pub fn set_event_listener(&mut self, listener: Box<dyn FnMut(&DrumsTimelineEvent)>) {
        self.event_listener = Some(listener);
    }

    pub fn take_events(&mut self) -> Vec<DrumsTimelineEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn execute_command(&mut self, store: &mut dyn SongStore, command: DrumsTimelineCommand) {
        match command {
            DrumsTimelineCommand::AddTrackFromBank { name } => {
                if let Err(err) = self.add_track_from_bank(store, &name) {
                    log::debug!("add track command failed: {}", err);
                }
            }
            DrumsTimelineCommand::DeleteTrack { index } => {
                self.delete_track(store, index);
            }
            DrumsTimelineCommand::ToggleStep { track_index, step } => {
                self.toggle_step(store, track_index, step);
            }
            DrumsTimelineCommand::SelectTrack { index } => {
                self.toggle_selection(index);
            }
            DrumsTimelineCommand::OpenBankDialog => {
                self.bank_dialog_open = true;
                self.bank_filter.clear();
            }
            DrumsTimelineCommand::CloseBankDialog => {
                self.bank_dialog_open = false;
            }
        }
    }

    pub fn ui(
        &mut self,
        ui: &mut Ui,
        store: &mut dyn SongStore,
        props: &TimelineProps<'_>,
        banks: &dyn BankBrowser,
    ) -> TimelineView {
        self.sync_with_store(&*store);

        if store.song().is_none() {
            if self.bank_dialog_open {
                log::debug!("bank dialog closed: song not loaded");
                self.bank_dialog_open = false;
            }
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label("Loading song…");
            });
            return TimelineView::Loading;
        }

        let mut commands: Vec<DrumsTimelineCommand> = Vec::new();

        let view = ui
            .vertical(|ui| {
                let rows = store.drums().len();
                if self.options.show_toolbar {
                    let toolbar = toolbar::Toolbar::new(props.current_time, props.current_beat(), props.is_playing, rows);
                    toolbar.ui(ui, &mut |cmd| commands.push(cmd));
                    ui.separator();
                }

                if rows == 0 {
                    self.ui_empty_state(ui, &mut commands);
                    return TimelineView::Empty;
                }

                self.ui_grid(ui, &*store, props, &mut commands);
                TimelineView::Grid { rows }
            })
            .inner;

        if self.bank_dialog_open {
            let used = |name: &str| store.song().is_some_and(|s| s.has_sound(name));
            let dialog = bank_dialog::BankDialog::new(&mut self.bank_filter, banks.bank_names(), &used);
            match dialog.show(ui.ctx()) {
                Some(BankDialogAction::Pick(name)) => {
                    commands.push(DrumsTimelineCommand::AddTrackFromBank { name });
                }
                Some(BankDialogAction::Cancel) => {
                    commands.push(DrumsTimelineCommand::CloseBankDialog);
                }
                None => {}
            }
        }

        for command in commands {
            self.execute_command(store, command);
        }

        view
    }

    fn ui_empty_state(&self, ui: &mut Ui, commands: &mut Vec<DrumsTimelineCommand>) {
        ui.vertical_centered(|ui| {
            ui.add_space(24.0);
            ui.label(RichText::new("No drum tracks yet").heading());
            ui.label("Add a track from a MIDI bank to start programming beats.");
            ui.add_space(8.0);
            if ui.button("➕ Add track").clicked() {
                commands.push(DrumsTimelineCommand::OpenBankDialog);
            }
            ui.add_space(24.0);
        });
    }

    fn ui_grid(
        &mut self,
        ui: &mut Ui,
        store: &dyn SongStore,
        props: &TimelineProps<'_>,
        commands: &mut Vec<DrumsTimelineCommand>,
    ) {
        let tracks = store.drums();
        let options = self.options.clone();
        let selected = self.selected_track;
        let layout = self
            .layout_cache
            .get(props, store.drums_revision(), options.step_width)
            .clone();

        ScrollArea::vertical()
            .id_salt((options.id_salt, "rows"))
            .auto_shrink([false, true])
            .show(ui, |ui| {
                ui.horizontal_top(|ui| {
                    ui.spacing_mut().item_spacing = Vec2::ZERO;

                    // Track headers
                    ui.vertical(|ui| {
                        ui.allocate_ui_with_layout(
                            Vec2::new(props.track_header_width, options.ruler_height),
                            Layout::left_to_right(Align::Center),
                            |ui| {
                                ui.set_min_size(Vec2::new(props.track_header_width, options.ruler_height));
                                ui.add_space(6.0);
                                ui.weak("Tracks");
                            },
                        );
                        for (index, track) in tracks.iter().enumerate() {
                            let header = track_lane::TrackLaneHeader::new(
                                &track.sound,
                                track_color(index),
                                selected == Some(index),
                                props.track_header_width,
                                options.row_height,
                            );
                            match header.ui(ui) {
                                Some(track_lane::TrackLaneAction::Select) => {
                                    commands.push(DrumsTimelineCommand::SelectTrack { index });
                                }
                                Some(track_lane::TrackLaneAction::Delete) => {
                                    commands.push(DrumsTimelineCommand::DeleteTrack { index });
                                }
                                None => {}
                            }
                        }
                    });

                    // Step grid
                    ScrollArea::horizontal()
                        .id_salt((options.id_salt, "steps"))
                        .auto_shrink([false, true])
                        .show(ui, |ui| {
                            let grid = step_grid::StepGrid::new(
                                &layout,
                                props.measures,
                                tracks,
                                selected,
                                options.row_height,
                                options.ruler_height,
                            );
                            let (actions, playhead_rect) = grid.ui(ui);

                            if props.is_playing
                                && props.autoscroll
                                && !ui.clip_rect().x_range().contains(playhead_rect.center().x)
                            {
                                ui.scroll_to_rect(playhead_rect, Some(Align::Min));
                            }

                            for action in actions {
                                match action {
                                    GridAction::Seek { time } => {
                                        log::debug!("seek requested: {:.3}s", time);
                                        self.emit_event(DrumsTimelineEvent::SeekRequested { time });
                                    }
                                    GridAction::ToggleStep { track_index, step } => {
                                        commands.push(DrumsTimelineCommand::ToggleStep { track_index, step });
                                    }
                                }
                            }
                        });
                });
            });
    }

    /// 从音色库添加轨道；同名轨道已存在时拒绝并发出错误通知
    pub fn add_track_from_bank(&mut self, store: &mut dyn SongStore, name: &str) -> Result<usize, DrumsError> {
        let Some(song) = store.song() else {
            log::warn!("cannot add track \"{}\": song not loaded", name);
            return Err(DrumsError::SongNotLoaded);
        };

        let tracks = match with_track_added(&song.drums, name) {
            Ok(tracks) => tracks,
            Err(err) => {
                log::warn!("add track rejected: {}", err);
                self.emit_event(DrumsTimelineEvent::Notify(Notification::error(
                    "Track already exists",
                    format!("A track using \"{}\" is already in this song.", name),
                )));
                return Err(err);
            }
        };

        let index = tracks.len() - 1;
        self.commit_drums(store, tracks);
        self.set_selection(Some(index));
        self.bank_dialog_open = false;

        log::info!("drum track added: {} (index {})", name, index);
        self.emit_event(DrumsTimelineEvent::TrackAdded {
            index,
            sound: name.to_string(),
        });
        self.emit_event(DrumsTimelineEvent::Notify(Notification::success(
            "Track added",
            format!("\"{}\" was added to the drums.", name),
        )));
        Ok(index)
    }

    pub fn delete_track(&mut self, store: &mut dyn SongStore, index: usize) {
        let drums = store.drums();
        let Some(tracks) = without_track(drums, index) else {
            log::warn!("delete ignored: no track at index {} ({} tracks)", index, drums.len());
            return;
        };
        let sound = drums[index].sound.clone();

        self.commit_drums(store, tracks);
        self.set_selection(repair_selection(self.selected_track, index));

        log::info!("drum track deleted: {} (index {})", sound, index);
        self.emit_event(DrumsTimelineEvent::TrackDeleted {
            index,
            sound: sound.clone(),
        });
        self.emit_event(DrumsTimelineEvent::Notify(Notification::success(
            "Track deleted",
            format!("\"{}\" was removed from the drums.", sound),
        )));
    }

    /// 切换步进；返回切换后的状态，轨道不存在时返回 None
    pub fn toggle_step(&mut self, store: &mut dyn SongStore, track_index: usize, step: u32) -> Option<bool> {
        let Some(tracks) = with_step_toggled(store.drums(), track_index, step) else {
            log::warn!("toggle ignored: no track at index {}", track_index);
            return None;
        };
        let active = tracks[track_index].is_active(step);
        self.commit_drums(store, tracks);

        log::debug!("step {} on track {} -> {}", step, track_index, active);
        self.emit_event(DrumsTimelineEvent::StepToggled {
            track_index,
            step,
            active,
        });
        Some(active)
    }

    /// 点击同一行再次点击则取消选中
    pub fn toggle_selection(&mut self, index: usize) {
        let next = if self.selected_track == Some(index) {
            None
        } else {
            Some(index)
        };
        self.set_selection(next);
    }

    /// 清除选中并关闭音色库对话框，宿主整体替换歌曲时调用
    pub fn reset(&mut self) {
        self.set_selection(None);
        self.bank_dialog_open = false;
        self.bank_filter.clear();
    }

    fn commit_drums(&mut self, store: &mut dyn SongStore, tracks: Vec<DrumTrack>) {
        store.update_drums(tracks);
        self.known_revision = Some(store.drums_revision());
    }

    /// 修订号不是由本组件的修改推进时（新建、打开、关闭歌曲），旧的选中已无意义
    fn sync_with_store(&mut self, store: &dyn SongStore) {
        let revision = store.drums_revision();
        if self.known_revision.is_some_and(|known| known != revision) {
            log::debug!("drums replaced outside the editor (revision {}), resetting", revision);
            self.reset();
        }
        self.known_revision = Some(revision);
    }

    fn set_selection(&mut self, selection: Option<usize>) {
        if self.selected_track != selection {
            self.selected_track = selection;
            self.emit_event(DrumsTimelineEvent::SelectionChanged { index: selection });
        }
    }

    fn emit_event(&mut self, event: DrumsTimelineEvent) {
        if let Some(ref mut listener) = self.event_listener {
            listener(&event);
        }
        self.pending_events.push(event);
    }

    // Public getters
    pub fn selected_track(&self) -> Option<usize> {
        self.selected_track
    }

    pub fn is_bank_dialog_open(&self) -> bool {
        self.bank_dialog_open
    }

    pub fn options(&self) -> &DrumsTimelineOptions {
        &self.options
    }

    pub fn layout_recomputations(&self) -> u64 {
        self.layout_cache.recomputations()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::NotificationKind;
    use crate::layout::ConstantTempoLayout;
    use crate::store::SongDocument;
    use crate::structure::{Measure, Song};

    const LAYOUT: ConstantTempoLayout = ConstantTempoLayout {
        bpm: 120.0,
        pixels_per_beat: 40.0,
    };

    fn song_with(names: &[&str]) -> SongDocument {
        let mut song = Song::new("Test");
        for name in names {
            song.drums.push(crate::structure::DrumTrack::new(*name));
        }
        SongDocument::with_song(song)
    }

    fn notifications(timeline: &mut DrumsTimeline) -> Vec<Notification> {
        timeline
            .take_events()
            .into_iter()
            .filter_map(|e| match e {
                DrumsTimelineEvent::Notify(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    const STEP_WIDTH: f32 = 24.0;
    const ROW_HEIGHT: f32 = 32.0;

    /// 在同一个 egui 上下文中连续运行多帧，点击需要跨帧的命中信息
    struct Harness {
        ctx: Context,
        measures: Vec<Measure>,
        banks: Vec<String>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                ctx: Context::default(),
                measures: (0..4).map(|i| Measure::new(i + 1, i as f64 * 2.0)).collect(),
                banks: vec!["Kick".to_string(), "Snare".to_string()],
            }
        }

        fn frame(
            &self,
            timeline: &mut DrumsTimeline,
            store: &mut SongDocument,
            time: f64,
            events: Vec<Event>,
        ) -> (TimelineView, FullOutput) {
            let props = TimelineProps {
                current_time: time,
                is_playing: false,
                autoscroll: false,
                pixels_per_beat: 40.0,
                track_header_width: 160.0,
                measures: &self.measures,
                layout: &LAYOUT,
            };
            let input = RawInput {
                screen_rect: Some(Rect::from_min_size(Pos2::ZERO, Vec2::new(1280.0, 800.0))),
                events,
                ..Default::default()
            };
            let mut view = None;
            let output = self.ctx.run(input, |ctx| {
                CentralPanel::default().show(ctx, |ui| {
                    view = Some(timeline.ui(ui, &mut *store, &props, &self.banks));
                });
            });
            (view.unwrap(), output)
        }

        /// 悬停、按下、松开各一帧，返回松开那一帧的输出
        fn click(&self, timeline: &mut DrumsTimeline, store: &mut SongDocument, pos: Pos2) -> FullOutput {
            let button = |pressed| Event::PointerButton {
                pos,
                button: PointerButton::Primary,
                pressed,
                modifiers: Modifiers::NONE,
            };
            self.frame(timeline, store, 0.0, vec![Event::PointerMoved(pos)]);
            self.frame(timeline, store, 0.0, vec![button(true)]);
            self.frame(timeline, store, 0.0, vec![button(false)]).1
        }
    }

    fn run_frame(timeline: &mut DrumsTimeline, store: &mut SongDocument, time: f64) -> TimelineView {
        Harness::new().frame(timeline, store, time, Vec::new()).0
    }

    fn painted_texts(output: &FullOutput) -> Vec<String> {
        output
            .shapes
            .iter()
            .filter_map(|clipped| match &clipped.shape {
                Shape::Text(text) => Some(text.galley.text().to_string()),
                _ => None,
            })
            .collect()
    }

    fn text_rect(output: &FullOutput, wanted: &str) -> Option<Rect> {
        output.shapes.iter().find_map(|clipped| match &clipped.shape {
            Shape::Text(text) if text.galley.text() == wanted => {
                Some(text.galley.rect.translate(text.pos.to_vec2()))
            }
            _ => None,
        })
    }

    /// 第一条轨道第 0 步的格子（步进格按 1 像素内缩绘制）
    fn first_cell(output: &FullOutput) -> Rect {
        let cell_size = Vec2::new(STEP_WIDTH - 2.0, ROW_HEIGHT - 2.0);
        output
            .shapes
            .iter()
            .filter_map(|clipped| match &clipped.shape {
                Shape::Rect(rect) if (rect.rect.size() - cell_size).length() < 0.01 => Some(rect.rect),
                _ => None,
            })
            .min_by(|a, b| (a.min.y, a.min.x).partial_cmp(&(b.min.y, b.min.x)).unwrap())
            .expect("no step cells painted")
    }

    fn cell_center(origin: Rect, track_index: usize, step: u32) -> Pos2 {
        origin.center() + Vec2::new(step as f32 * STEP_WIDTH, track_index as f32 * ROW_HEIGHT)
    }

    #[test]
    fn test_add_track_selects_and_notifies() {
        let mut store = song_with(&[]);
        let mut timeline = DrumsTimeline::new(DrumsTimelineOptions::default());
        timeline.execute_command(&mut store, DrumsTimelineCommand::OpenBankDialog);
        assert!(timeline.is_bank_dialog_open());

        let index = timeline.add_track_from_bank(&mut store, "Kick").unwrap();
        assert_eq!(index, 0);
        assert_eq!(timeline.selected_track(), Some(0));
        assert!(!timeline.is_bank_dialog_open());

        let index = timeline.add_track_from_bank(&mut store, "Snare").unwrap();
        assert_eq!(index, 1);
        assert_eq!(timeline.selected_track(), Some(1));
        let sounds: Vec<_> = store.drums().iter().map(|t| t.sound.as_str()).collect();
        assert_eq!(sounds, vec!["Kick", "Snare"]);

        let notes = notifications(&mut timeline);
        assert_eq!(notes.len(), 2);
        assert!(notes.iter().all(|n| n.kind == NotificationKind::Success));
    }

    #[test]
    fn test_add_duplicate_track_is_rejected() {
        let mut store = song_with(&[]);
        let mut timeline = DrumsTimeline::new(DrumsTimelineOptions::default());
        timeline.add_track_from_bank(&mut store, "Kick").unwrap();
        timeline.take_events();
        timeline.execute_command(&mut store, DrumsTimelineCommand::OpenBankDialog);
        let revision = store.drums_revision();

        let err = timeline.add_track_from_bank(&mut store, "Kick").unwrap_err();
        assert!(matches!(err, DrumsError::DuplicateTrack(_)));
        assert_eq!(store.drums().len(), 1);
        assert_eq!(store.drums_revision(), revision);
        assert!(timeline.is_bank_dialog_open());

        let notes = notifications(&mut timeline);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NotificationKind::Error);
        assert_eq!(notes[0].title, "Track already exists");
    }

    #[test]
    fn test_add_track_without_song() {
        let mut store = SongDocument::loading();
        let mut timeline = DrumsTimeline::new(DrumsTimelineOptions::default());
        let err = timeline.add_track_from_bank(&mut store, "Kick").unwrap_err();
        assert!(matches!(err, DrumsError::SongNotLoaded));
        assert!(timeline.take_events().is_empty());
    }

    #[test]
    fn test_add_command_failures_keep_state() {
        let mut store = song_with(&["Kick"]);
        let mut timeline = DrumsTimeline::new(DrumsTimelineOptions::default());
        timeline.execute_command(&mut store, DrumsTimelineCommand::OpenBankDialog);
        timeline.execute_command(&mut store, DrumsTimelineCommand::AddTrackFromBank { name: "Kick".to_string() });
        assert_eq!(store.drums().len(), 1);
        assert!(timeline.is_bank_dialog_open());
        let notes = notifications(&mut timeline);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NotificationKind::Error);

        let mut loading = SongDocument::loading();
        timeline.execute_command(&mut loading, DrumsTimelineCommand::AddTrackFromBank { name: "Snare".to_string() });
        assert!(loading.song().is_none());
        assert!(timeline.take_events().is_empty());
    }

    #[test]
    fn test_delete_repairs_selection() {
        // selection == deleted
        let mut store = song_with(&["A", "B", "C"]);
        let mut timeline = DrumsTimeline::new(DrumsTimelineOptions::default());
        timeline.toggle_selection(1);
        timeline.delete_track(&mut store, 1);
        assert_eq!(timeline.selected_track(), None);
        assert_eq!(store.drums().len(), 2);

        // deleted < selection
        let mut store = song_with(&["A", "B", "C"]);
        timeline.toggle_selection(2);
        timeline.delete_track(&mut store, 0);
        assert_eq!(timeline.selected_track(), Some(1));
        assert_eq!(store.drums()[1].sound, "C");

        // deleted > selection
        let mut store = song_with(&["A", "B", "C"]);
        timeline.toggle_selection(0);
        assert_eq!(timeline.selected_track(), Some(0));
        timeline.delete_track(&mut store, 2);
        assert_eq!(timeline.selected_track(), Some(0));
    }

    #[test]
    fn test_delete_first_of_two_keeps_second_selected() {
        let mut store = song_with(&["Kick", "Snare"]);
        let mut timeline = DrumsTimeline::new(DrumsTimelineOptions::default());
        timeline.toggle_selection(1);
        timeline.execute_command(&mut store, DrumsTimelineCommand::DeleteTrack { index: 0 });
        assert_eq!(timeline.selected_track(), Some(0));
        assert_eq!(store.drums()[0].sound, "Snare");

        let events = timeline.take_events();
        assert!(events.contains(&DrumsTimelineEvent::TrackDeleted {
            index: 0,
            sound: "Kick".to_string()
        }));
    }

    #[test]
    fn test_delete_out_of_range_is_ignored() {
        let mut store = song_with(&["Kick"]);
        let mut timeline = DrumsTimeline::new(DrumsTimelineOptions::default());
        timeline.delete_track(&mut store, 5);
        assert_eq!(store.drums().len(), 1);
        assert_eq!(store.drums_revision(), 0);
        assert!(timeline.take_events().is_empty());
    }

    #[test]
    fn test_toggle_step_round_trip() {
        let mut store = song_with(&["Kick", "Snare"]);
        let mut timeline = DrumsTimeline::new(DrumsTimelineOptions::default());

        assert_eq!(timeline.toggle_step(&mut store, 1, 12), Some(true));
        assert_eq!(timeline.toggle_step(&mut store, 1, 4), Some(true));
        let events: Vec<u32> = store.drums()[1].events.iter().copied().collect();
        assert_eq!(events, vec![4, 12]);
        assert!(store.drums()[0].events.is_empty());

        assert_eq!(timeline.toggle_step(&mut store, 1, 12), Some(false));
        assert_eq!(timeline.toggle_step(&mut store, 1, 4), Some(false));
        assert!(store.drums()[1].events.is_empty());
        assert_eq!(timeline.toggle_step(&mut store, 7, 0), None);

        // toggles never notify
        assert!(notifications(&mut timeline).is_empty());
    }

    #[test]
    fn test_selection_toggle() {
        let mut timeline = DrumsTimeline::new(DrumsTimelineOptions::default());
        timeline.toggle_selection(2);
        assert_eq!(timeline.selected_track(), Some(2));
        timeline.toggle_selection(0);
        assert_eq!(timeline.selected_track(), Some(0));
        timeline.toggle_selection(0);
        assert_eq!(timeline.selected_track(), None);
        assert_eq!(timeline.take_events().len(), 3);
    }

    #[test]
    fn test_event_listener_receives_events() {
        use std::cell::RefCell;
        use std::rc::Rc;

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut timeline = DrumsTimeline::new(DrumsTimelineOptions::default());
        timeline.set_event_listener(Box::new(move |e: &DrumsTimelineEvent| sink.borrow_mut().push(e.clone())));

        timeline.toggle_selection(3);
        assert_eq!(
            seen.borrow().as_slice(),
            &[DrumsTimelineEvent::SelectionChanged { index: Some(3) }]
        );
    }

    #[test]
    fn test_view_loading() {
        let mut store = SongDocument::loading();
        let mut timeline = DrumsTimeline::new(DrumsTimelineOptions::default());
        assert_eq!(run_frame(&mut timeline, &mut store, 0.0), TimelineView::Loading);
        assert_eq!(timeline.layout_recomputations(), 0);
    }

    #[test]
    fn test_view_empty() {
        let mut store = song_with(&[]);
        let mut timeline = DrumsTimeline::new(DrumsTimelineOptions::default());
        assert_eq!(run_frame(&mut timeline, &mut store, 0.0), TimelineView::Empty);
    }

    #[test]
    fn test_view_grid_and_layout_refresh() {
        let mut store = song_with(&["Kick", "Snare"]);
        let mut timeline = DrumsTimeline::new(DrumsTimelineOptions::default());
        assert_eq!(run_frame(&mut timeline, &mut store, 0.0), TimelineView::Grid { rows: 2 });
        let after_first = timeline.layout_recomputations();
        assert!(after_first >= 1);

        run_frame(&mut timeline, &mut store, 0.0);
        assert_eq!(timeline.layout_recomputations(), after_first);

        timeline.toggle_step(&mut store, 0, 3);
        run_frame(&mut timeline, &mut store, 0.0);
        assert_eq!(timeline.layout_recomputations(), after_first + 1);
    }

    #[test]
    fn test_view_with_bank_dialog_open() {
        let mut store = song_with(&["Kick"]);
        let mut timeline = DrumsTimeline::new(DrumsTimelineOptions::default());
        timeline.execute_command(&mut store, DrumsTimelineCommand::OpenBankDialog);
        assert_eq!(run_frame(&mut timeline, &mut store, 1.0), TimelineView::Grid { rows: 1 });
        assert!(timeline.is_bank_dialog_open());
    }

    #[test]
    fn test_loading_draws_only_placeholder_and_closes_dialog() {
        let mut store = SongDocument::loading();
        let mut timeline = DrumsTimeline::new(DrumsTimelineOptions::default());
        timeline.execute_command(&mut store, DrumsTimelineCommand::OpenBankDialog);

        let harness = Harness::new();
        harness.frame(&mut timeline, &mut store, 0.0, Vec::new());
        let (view, output) = harness.frame(&mut timeline, &mut store, 0.0, Vec::new());

        assert_eq!(view, TimelineView::Loading);
        assert_eq!(painted_texts(&output), vec!["Loading song…".to_string()]);
        assert!(!timeline.is_bank_dialog_open());
        assert!(timeline.take_events().is_empty());
    }

    #[test]
    fn test_clicking_cell_toggles_step() {
        let mut store = song_with(&["Kick", "Snare"]);
        let mut timeline = DrumsTimeline::new(DrumsTimelineOptions::default());
        let harness = Harness::new();
        let (_, output) = harness.frame(&mut timeline, &mut store, 0.0, Vec::new());
        let origin = first_cell(&output);

        let step = crate::structure::step_index(2, 5);
        let target = cell_center(origin, 1, step);
        harness.click(&mut timeline, &mut store, target);

        let events: Vec<u32> = store.drums()[1].events.iter().copied().collect();
        assert_eq!(events, vec![step]);
        assert!(store.drums()[0].events.is_empty());
        assert!(timeline.take_events().contains(&DrumsTimelineEvent::StepToggled {
            track_index: 1,
            step,
            active: true,
        }));

        // 激活的步进以实心圆显示在被点击的格子上
        let (_, output) = harness.frame(&mut timeline, &mut store, 0.0, Vec::new());
        let circles: Vec<Pos2> = output
            .shapes
            .iter()
            .filter_map(|clipped| match &clipped.shape {
                Shape::Circle(circle) if circle.fill != Color32::TRANSPARENT => Some(circle.center),
                _ => None,
            })
            .collect();
        assert_eq!(circles.len(), 1);
        assert!((circles[0] - target).length() < 0.5);

        // 再次点击取消
        harness.click(&mut timeline, &mut store, target);
        assert!(store.drums()[1].events.is_empty());
    }

    #[test]
    fn test_empty_state_add_button_opens_bank_dialog() {
        let mut store = song_with(&[]);
        let options = DrumsTimelineOptions {
            show_toolbar: false,
            ..Default::default()
        };
        let mut timeline = DrumsTimeline::new(options);
        let harness = Harness::new();
        let (view, output) = harness.frame(&mut timeline, &mut store, 0.0, Vec::new());
        assert_eq!(view, TimelineView::Empty);

        let button = text_rect(&output, "➕ Add track").expect("add button not painted");
        harness.click(&mut timeline, &mut store, button.center());
        assert!(timeline.is_bank_dialog_open());

        let (_, output) = harness.frame(&mut timeline, &mut store, 0.0, Vec::new());
        let texts = painted_texts(&output);
        assert!(texts.iter().any(|t| t == "Pick a MIDI bank:"));
    }

    #[test]
    fn test_bank_dialog_blocks_grid_clicks() {
        let mut store = song_with(&["Kick"]);
        let mut timeline = DrumsTimeline::new(DrumsTimelineOptions::default());
        let harness = Harness::new();
        let (_, output) = harness.frame(&mut timeline, &mut store, 0.0, Vec::new());
        let origin = first_cell(&output);

        timeline.execute_command(&mut store, DrumsTimelineCommand::OpenBankDialog);
        harness.frame(&mut timeline, &mut store, 0.0, Vec::new());
        harness.click(&mut timeline, &mut store, cell_center(origin, 0, 3));

        assert!(store.drums()[0].events.is_empty());
        assert!(!timeline
            .take_events()
            .iter()
            .any(|e| matches!(e, DrumsTimelineEvent::StepToggled { .. })));
    }

    #[test]
    fn test_song_swap_clears_selection() {
        let mut store = song_with(&["Kick", "Snare", "Hat"]);
        let mut timeline = DrumsTimeline::new(DrumsTimelineOptions::default());
        let harness = Harness::new();
        harness.frame(&mut timeline, &mut store, 0.0, Vec::new());

        // 本组件自己的修改不会清除选中
        timeline.add_track_from_bank(&mut store, "Clap").unwrap();
        assert_eq!(timeline.selected_track(), Some(3));
        harness.frame(&mut timeline, &mut store, 0.0, Vec::new());
        assert_eq!(timeline.selected_track(), Some(3));
        timeline.take_events();

        let mut other = Song::new("Other");
        other.drums.push(crate::structure::DrumTrack::new("Rimshot"));
        store.set_song(other);
        let (view, _) = harness.frame(&mut timeline, &mut store, 0.0, Vec::new());

        assert_eq!(view, TimelineView::Grid { rows: 1 });
        assert_eq!(timeline.selected_track(), None);
        assert_eq!(
            timeline.take_events(),
            vec![DrumsTimelineEvent::SelectionChanged { index: None }]
        );
    }

    #[test]
    fn test_reset_closes_dialog_and_clears_selection() {
        let mut store = song_with(&["Kick"]);
        let mut timeline = DrumsTimeline::new(DrumsTimelineOptions::default());
        timeline.toggle_selection(0);
        timeline.execute_command(&mut store, DrumsTimelineCommand::OpenBankDialog);

        timeline.reset();
        assert_eq!(timeline.selected_track(), None);
        assert!(!timeline.is_bank_dialog_open());
    }
}
