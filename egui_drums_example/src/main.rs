use eframe::egui::{self, TopBottomPanel};
use egui_drums::{
    ConstantTempoLayout, DrumTrack, DrumsTimeline, DrumsTimelineEvent, DrumsTimelineOptions, Measure,
    Notification, NotificationKind, Song, SongDocument, SongFile, SongStore, TimelineProps,
};
use rfd::FileDialog;
use std::path::PathBuf;

const BPM: f64 = 120.0;
const PIXELS_PER_BEAT: f32 = 40.0;
const MEASURE_COUNT: u32 = 8;
const TOAST_SECONDS: f64 = 3.0;

const BANKS: [&str; 10] = [
    "Kick 808",
    "Kick 909",
    "Snare",
    "Rimshot",
    "Clap",
    "Closed Hat",
    "Open Hat",
    "Low Tom",
    "High Tom",
    "Crash",
];

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "egui_drums Example",
        native_options,
        Box::new(|_cc| Ok(Box::new(DrumsApp::new()))),
    )
}

struct Toast {
    notification: Notification,
    expires_at: f64,
}

struct DrumsApp {
    timeline: DrumsTimeline,
    store: SongDocument,
    layout: ConstantTempoLayout,
    measures: Vec<Measure>,
    banks: Vec<String>,
    current_path: Option<PathBuf>,

    // Transport
    current_time: f64,
    is_playing: bool,
    autoscroll: bool,
    last_update: f64,

    toasts: Vec<Toast>,
    status_line: String,
}

impl DrumsApp {
    fn new() -> Self {
        let layout = ConstantTempoLayout {
            bpm: BPM,
            pixels_per_beat: PIXELS_PER_BEAT,
        };
        let seconds_per_measure = 4.0 * 60.0 / BPM;
        let measures = (0..MEASURE_COUNT)
            .map(|i| Measure::new(i + 1, i as f64 * seconds_per_measure))
            .collect();

        Self {
            timeline: DrumsTimeline::new(DrumsTimelineOptions::default()),
            store: SongDocument::with_song(demo_song()),
            layout,
            measures,
            banks: BANKS.iter().map(|s| s.to_string()).collect(),
            current_path: None,
            current_time: 0.0,
            is_playing: false,
            autoscroll: true,
            last_update: 0.0,
            toasts: Vec::new(),
            status_line: "Ready".to_owned(),
        }
    }

    fn song_length(&self) -> f64 {
        self.measures.len() as f64 * 4.0 * 60.0 / BPM
    }

    fn advance_transport(&mut self, ctx: &egui::Context) {
        let now = ctx.input(|i| i.time);
        if self.is_playing {
            ctx.request_repaint();
            let dt = now - self.last_update;
            // 避免大跳跃（例如窗口失去焦点后恢复）
            if dt > 0.0 && dt < 1.0 {
                self.current_time += dt;
                if self.current_time >= self.song_length() {
                    self.current_time = 0.0;
                }
            }
        }
        self.last_update = now;
    }

    fn menu_bar(&mut self, ui: &mut egui::Ui) {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("New").clicked() {
                    self.new_song();
                    ui.close_menu();
                }
                if ui.button("Open...").clicked() {
                    self.open_song_dialog();
                    ui.close_menu();
                }
                if ui.button("Save").clicked() {
                    self.save_song();
                    ui.close_menu();
                }
                if ui.button("Save As...").clicked() {
                    self.save_song_as_dialog();
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("Close").clicked() {
                    self.store.take_song();
                    self.current_path = None;
                    self.set_status("Song closed");
                    ui.close_menu();
                }
            });

            ui.separator();
            if ui.button(if self.is_playing { "⏸ Pause" } else { "▶ Play" }).clicked() {
                self.is_playing = !self.is_playing;
            }
            if ui.button("⏹ Stop").clicked() {
                self.is_playing = false;
                self.current_time = 0.0;
            }
            ui.checkbox(&mut self.autoscroll, "Autoscroll");

            ui.separator();
            if let Some(path) = &self.current_path {
                ui.label(format!("Song: {}", path.display()));
            } else {
                ui.label("Song: (unsaved)");
            }
        });
    }

    fn new_song(&mut self) {
        self.store.set_song(Song::new("Untitled"));
        self.current_path = None;
        self.set_status("Created new song");
    }

    fn open_song_dialog(&mut self) {
        if let Some(path) = FileDialog::new()
            .add_filter("Drum song", &["json"])
            .pick_file()
        {
            match SongFile::load_from_path(&path) {
                Ok(file) => {
                    log::info!("Track count: {}", file.song.drums.len());
                    self.store.set_song(file.song);
                    self.current_path = Some(path.clone());
                    self.set_status(format!("Opened {}", path.display()));
                }
                Err(err) => self.set_error(err.to_string()),
            }
        }
    }

    fn save_song(&mut self) {
        if let Some(path) = self.current_path.clone() {
            self.write_song(path);
        } else {
            self.save_song_as_dialog();
        }
    }

    fn save_song_as_dialog(&mut self) {
        if let Some(path) = FileDialog::new()
            .add_filter("Drum song", &["json"])
            .set_file_name(self.default_file_name())
            .save_file()
        {
            self.write_song(path);
        }
    }

    fn write_song(&mut self, path: PathBuf) {
        let Some(song) = self.store.song().cloned() else {
            self.set_error("No song loaded");
            return;
        };
        match SongFile::new(song).save_to_path(&path) {
            Ok(()) => {
                self.set_status(format!("Saved {}", path.display()));
                self.current_path = Some(path);
            }
            Err(err) => self.set_error(err.to_string()),
        }
    }

    fn default_file_name(&self) -> String {
        self.current_path
            .as_ref()
            .and_then(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .map(|name| format!("{name}.json"))
            .unwrap_or_else(|| "song.json".to_owned())
    }

    fn handle_events(&mut self, now: f64) {
        for event in self.timeline.take_events() {
            log::info!("[DrumsTimelineEvent] {:?}", event);
            match event {
                DrumsTimelineEvent::Notify(notification) => {
                    self.toasts.push(Toast {
                        notification,
                        expires_at: now + TOAST_SECONDS,
                    });
                }
                DrumsTimelineEvent::SeekRequested { time } => {
                    self.current_time = time;
                }
                _ => {}
            }
        }
        self.toasts.retain(|t| t.expires_at > now);
    }

    fn show_toasts(&self, ctx: &egui::Context) {
        if self.toasts.is_empty() {
            return;
        }
        ctx.request_repaint();
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, egui::Vec2::new(-12.0, -36.0))
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                for toast in &self.toasts {
                    let accent = match toast.notification.kind {
                        NotificationKind::Success => egui::Color32::from_rgb(102, 187, 106),
                        NotificationKind::Error => egui::Color32::from_rgb(239, 83, 80),
                        NotificationKind::Info => egui::Color32::from_rgb(66, 165, 245),
                    };
                    egui::Frame::popup(ui.style())
                        .stroke(egui::Stroke::new(1.0, accent))
                        .show(ui, |ui| {
                            ui.set_max_width(280.0);
                            ui.label(egui::RichText::new(&toast.notification.title).strong().color(accent));
                            ui.label(&toast.notification.description);
                        });
                    ui.add_space(6.0);
                }
            });
    }

    fn set_status<S: Into<String>>(&mut self, msg: S) {
        self.status_line = msg.into();
        log::info!("{}", self.status_line);
    }

    fn set_error<E: Into<String>>(&mut self, err: E) {
        let msg = err.into();
        self.status_line = format!("Error: {msg}");
        log::error!("{msg}");
    }
}

impl eframe::App for DrumsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.advance_transport(ctx);

        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            self.menu_bar(ui);
        });

        TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.label(self.status_line.clone());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let props = TimelineProps {
                current_time: self.current_time,
                is_playing: self.is_playing,
                autoscroll: self.autoscroll,
                pixels_per_beat: PIXELS_PER_BEAT,
                track_header_width: 180.0,
                measures: &self.measures,
                layout: &self.layout,
            };
            self.timeline.ui(ui, &mut self.store, &props, &self.banks);
        });

        let now = ctx.input(|i| i.time);
        self.handle_events(now);
        self.show_toasts(ctx);
    }
}

fn demo_song() -> Song {
    let mut song = Song::new("Demo beat");

    let mut kick = DrumTrack::new("Kick 808");
    let mut snare = DrumTrack::new("Snare");
    let mut hat = DrumTrack::new("Closed Hat");
    for measure in 0..MEASURE_COUNT {
        let base = measure * egui_drums::STEPS_PER_MEASURE;
        kick.events.extend([base, base + 4]);
        snare.events.extend([base + 2, base + 6]);
        hat.events.extend((0..egui_drums::STEPS_PER_MEASURE).map(|p| base + p));
    }
    song.drums.extend([kick, snare, hat]);
    song
}
