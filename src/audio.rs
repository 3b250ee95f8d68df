//! Audio cue mapping
//!
//! The simulation never plays sound itself. Gameplay events are turned into
//! named cues with an effective volume, queued for whatever frontend owns the
//! real audio device.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Hop to the next track
    Move,
    /// Obstacle contact
    Fail,
    /// Target reached
    LevelUp,
    /// Power-up collected
    PowerUp,
    /// Round over
    LevelCompleted,
    /// Looping scene music
    BackgroundMusic,
}

impl SoundCue {
    /// Asset file for the cue
    pub fn file_name(self) -> &'static str {
        match self {
            SoundCue::Move => "move.wav",
            SoundCue::Fail => "fail.wav",
            SoundCue::LevelUp => "levelUp.wav",
            SoundCue::PowerUp => "powerup.wav",
            SoundCue::LevelCompleted => "levelCompleted.wav",
            SoundCue::BackgroundMusic => "background.wav",
        }
    }

    pub fn is_music(self) -> bool {
        matches!(self, SoundCue::BackgroundMusic)
    }

    /// Cue triggered by a gameplay event, if any
    ///
    /// Out-of-bounds and post-score resets are silent.
    pub fn for_event(event: &GameEvent) -> Option<Self> {
        match event {
            GameEvent::RoundStarted => Some(SoundCue::BackgroundMusic),
            GameEvent::HopStarted { .. } => Some(SoundCue::Move),
            GameEvent::Failed => Some(SoundCue::Fail),
            GameEvent::Scored { .. } => Some(SoundCue::LevelUp),
            GameEvent::PowerUpCollected { .. } => Some(SoundCue::PowerUp),
            GameEvent::RoundOver { .. } => Some(SoundCue::LevelCompleted),
            _ => None,
        }
    }
}

/// A cue ready to be played
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playback {
    pub cue: SoundCue,
    pub volume: f32,
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    settings: Settings,
    music_playing: bool,
    queue: Vec<Playback>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl AudioManager {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            settings: settings.clone(),
            music_playing: false,
            queue: Vec::new(),
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.settings.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.settings.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
    }

    pub fn is_music_playing(&self) -> bool {
        self.music_playing
    }

    /// Get effective volume for a cue
    fn effective_volume(&self, cue: SoundCue) -> f32 {
        if cue.is_music() {
            self.settings.music_gain()
        } else {
            self.settings.sfx_gain()
        }
    }

    /// Queue a cue; silent cues are dropped
    pub fn play(&mut self, cue: SoundCue) {
        if cue.is_music() {
            if self.music_playing {
                return;
            }
            self.music_playing = true;
        }
        let volume = self.effective_volume(cue);
        if volume <= 0.0 {
            return;
        }
        log::debug!("Cue {} at {:.2}", cue.file_name(), volume);
        self.queue.push(Playback { cue, volume });
    }

    /// Queue the cues for a batch of events
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for event in events {
            if let GameEvent::RoundOver { .. } = event {
                self.music_playing = false;
            }
            if let Some(cue) = SoundCue::for_event(event) {
                self.play(cue);
            }
        }
    }

    /// Take everything queued since the last drain
    pub fn drain(&mut self) -> Vec<Playback> {
        std::mem::take(&mut self.queue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ResetCause;

    #[test]
    fn test_event_cues() {
        assert_eq!(
            SoundCue::for_event(&GameEvent::HopStarted { to_track: 1 }),
            Some(SoundCue::Move)
        );
        assert_eq!(SoundCue::for_event(&GameEvent::Failed), Some(SoundCue::Fail));
        assert_eq!(
            SoundCue::for_event(&GameEvent::Scored { score: 1 }),
            Some(SoundCue::LevelUp)
        );
        assert_eq!(
            SoundCue::for_event(&GameEvent::PowerUpCollected {
                track: 2,
                remaining: 10.0
            }),
            Some(SoundCue::PowerUp)
        );
        assert_eq!(
            SoundCue::for_event(&GameEvent::RoundOver { score: 0 }),
            Some(SoundCue::LevelCompleted)
        );
        assert_eq!(
            SoundCue::for_event(&GameEvent::PlayerReset {
                cause: ResetCause::OutOfBounds
            }),
            None
        );
    }

    #[test]
    fn test_file_names() {
        assert_eq!(SoundCue::Move.file_name(), "move.wav");
        assert_eq!(SoundCue::LevelUp.file_name(), "levelUp.wav");
        assert_eq!(SoundCue::BackgroundMusic.file_name(), "background.wav");
    }

    #[test]
    fn test_volumes_follow_settings() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 1.0,
            music_volume: 0.5,
            ..Default::default()
        };
        let mut audio = AudioManager::from_settings(&settings);
        audio.handle_events(&[GameEvent::RoundStarted, GameEvent::Failed]);
        let played = audio.drain();
        assert_eq!(
            played,
            vec![
                Playback {
                    cue: SoundCue::BackgroundMusic,
                    volume: 0.25
                },
                Playback {
                    cue: SoundCue::Fail,
                    volume: 0.5
                },
            ]
        );
        assert!(audio.drain().is_empty());
    }

    #[test]
    fn test_setters_change_gain() {
        let mut audio = AudioManager::default();
        audio.set_master_volume(2.0);
        audio.set_sfx_volume(0.5);
        audio.handle_events(&[GameEvent::Failed]);
        assert_eq!(audio.drain()[0].volume, 0.5);
    }

    #[test]
    fn test_muted_queues_nothing() {
        let mut audio = AudioManager::default();
        audio.set_muted(true);
        audio.handle_events(&[GameEvent::Failed, GameEvent::Scored { score: 1 }]);
        assert!(audio.drain().is_empty());
    }

    #[test]
    fn test_music_starts_once_and_stops_at_round_over() {
        let mut audio = AudioManager::default();
        audio.handle_events(&[GameEvent::RoundStarted, GameEvent::RoundStarted]);
        assert_eq!(audio.drain().len(), 1);
        assert!(audio.is_music_playing());

        audio.handle_events(&[GameEvent::RoundOver { score: 2 }]);
        assert!(!audio.is_music_playing());
        audio.handle_events(&[GameEvent::RoundStarted]);
        let played = audio.drain();
        assert_eq!(played.len(), 2);
        assert_eq!(played[1].cue, SoundCue::BackgroundMusic);
    }
}
