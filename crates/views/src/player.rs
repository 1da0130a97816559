use serde::Serialize;

pub const PLAYBACK_RATES: [f64; 8] = [0.25, 0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0];

pub const QUALITIES: [&str; 5] = ["2160p", "1440p", "1080p", "720p", "480p"];

pub const DEFAULT_QUALITY: &str = "1080p";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingsMenu {
    Closed,
    Root,
    Quality,
    Speed,
}

/// Local transport state of the video element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackControls {
    pub playing: bool,
    pub current_time: f64,
    pub duration: f64,
    pub volume: f64,
    pub muted: bool,
    pub playback_rate: f64,
    pub quality: &'static str,
    pub menu: SettingsMenu,
    pub fullscreen: bool,
}

impl PlaybackControls {
    pub fn new() -> Self {
        Self {
            playing: false,
            current_time: 0.0,
            duration: 0.0,
            volume: 1.0,
            muted: false,
            playback_rate: 1.0,
            quality: DEFAULT_QUALITY,
            menu: SettingsMenu::Closed,
            fullscreen: false,
        }
    }

    pub fn toggle_play(&mut self) {
        self.playing = !self.playing;
    }

    /// Metadata became available
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
        self.current_time = self.current_time.min(self.duration);
    }

    pub fn seek(&mut self, time: f64) {
        if time.is_nan() {
            return;
        }
        self.current_time = time.clamp(0.0, self.duration);
    }

    pub fn set_volume(&mut self, volume: f64) {
        if volume.is_nan() {
            return;
        }
        self.volume = volume.clamp(0.0, 1.0);
        self.muted = self.volume == 0.0;
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Returns false when `rate` is not one of [`PLAYBACK_RATES`]
    pub fn set_playback_rate(&mut self, rate: f64) -> bool {
        if !PLAYBACK_RATES.contains(&rate) {
            return false;
        }
        self.playback_rate = rate;
        self.menu = SettingsMenu::Closed;
        true
    }

    /// Returns false when `quality` is not one of [`QUALITIES`]
    pub fn set_quality(&mut self, quality: &str) -> bool {
        match QUALITIES.iter().find(|q| **q == quality) {
            Some(q) => {
                self.quality = *q;
                self.menu = SettingsMenu::Closed;
                true
            }
            None => false,
        }
    }

    pub fn toggle_settings(&mut self) {
        self.menu = match self.menu {
            SettingsMenu::Closed => SettingsMenu::Root,
            _ => SettingsMenu::Closed,
        };
    }

    /// Opens a sub-menu from the root settings menu
    pub fn open_menu(&mut self, menu: SettingsMenu) {
        if self.menu != SettingsMenu::Closed {
            self.menu = menu;
        }
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
    }

    pub fn progress(&self) -> f64 {
        if self.duration > 0.0 {
            self.current_time / self.duration
        } else {
            0.0
        }
    }
}

impl Default for PlaybackControls {
    fn default() -> Self {
        Self::new()
    }
}
