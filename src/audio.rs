//! Synthesized 8-bit style sound effects and background arpeggio
//!
//! Every sound is a short sine tone built on the fly, so no assets are needed.
//! The game itself only emits [`Cue`]s; this module decides what they sound like.

use arcade::Cue;
use rodio::source::{self, SineWave};
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
use std::time::Duration;

/// Arpeggio pattern: C5 E5 G5 E5 C5 D5 F5 D5
const MUSIC_PATTERN: [f32; 8] = [523.0, 659.0, 784.0, 659.0, 523.0, 587.0, 698.0, 587.0];
const MUSIC_NOTE: Duration = Duration::from_millis(140);
const MUSIC_STEP: Duration = Duration::from_millis(180);
const MUSIC_NOTE_GAIN: f32 = 0.08;
/// Music sits below the effects
const MUSIC_BUS_GAIN: f32 = 0.25;

/// One tone of an effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq: f32,
    pub duration: Duration,
    pub gain: f32,
    /// Offset from the start of the effect
    pub start: Duration,
}

const fn tone(freq: f32, ms: u64, gain: f32, start_ms: u64) -> Tone {
    Tone {
        freq,
        duration: Duration::from_millis(ms),
        gain,
        start: Duration::from_millis(start_ms),
    }
}

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sfx {
    Rotate,
    SoftDrop,
    HardDrop,
    LineClear,
    GameOver,
}

impl From<Cue> for Sfx {
    fn from(cue: Cue) -> Self {
        match cue {
            Cue::Rotate => Sfx::Rotate,
            Cue::SoftDrop => Sfx::SoftDrop,
            Cue::HardDrop => Sfx::HardDrop,
            Cue::LineClear => Sfx::LineClear,
        }
    }
}

impl Sfx {
    pub fn tones(self) -> &'static [Tone] {
        match self {
            Sfx::Rotate => const { &[tone(620.0, 60, 0.12, 0)] },
            Sfx::SoftDrop => const { &[tone(300.0, 60, 0.14, 0)] },
            Sfx::HardDrop => const { &[tone(180.0, 80, 0.16, 0)] },
            Sfx::LineClear => const { &[tone(880.0, 80, 0.14, 0), tone(990.0, 90, 0.12, 60)] },
            Sfx::GameOver => const { &[tone(400.0, 150, 0.15, 0), tone(260.0, 300, 0.12, 120)] },
        }
    }
}

/// Audio manager handles all sound playback
pub struct AudioManager {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    music_sink: Option<Sink>,
    /// Master gain (0.0 when muted)
    gain: f32,
}

impl AudioManager {
    /// Open the default output device; None when there is no audio
    pub fn new(gain: f32) -> Option<Self> {
        let (stream, stream_handle) = match OutputStream::try_default() {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!("audio unavailable: {}", e);
                return None;
            }
        };

        Some(Self {
            _stream: stream,
            stream_handle,
            music_sink: None,
            gain: gain.clamp(0.0, 1.0),
        })
    }

    /// Set master gain (0.0 to 1.0)
    pub fn set_gain(&mut self, gain: f32) {
        self.gain = gain.clamp(0.0, 1.0);
        if let Some(sink) = &self.music_sink {
            sink.set_volume(self.gain * MUSIC_BUS_GAIN);
        }
    }

    pub fn play_cue(&self, cue: Cue) {
        self.play_sfx(Sfx::from(cue));
    }

    /// Play a sound effect
    pub fn play_sfx(&self, sfx: Sfx) {
        if self.gain <= 0.0 {
            return;
        }

        for tone in sfx.tones() {
            let Ok(sink) = Sink::try_new(&self.stream_handle) else {
                return;
            };
            sink.set_volume(self.gain);
            sink.append(
                SineWave::new(tone.freq)
                    .take_duration(tone.duration)
                    .amplify(tone.gain)
                    .delay(tone.start),
            );
            sink.detach(); // Let it play and clean up automatically
        }
    }

    /// Start the looping arpeggio (no-op if already playing)
    pub fn start_music(&mut self) {
        if self.music_sink.is_some() {
            return;
        }
        let Ok(sink) = Sink::try_new(&self.stream_handle) else {
            return;
        };

        let gap = MUSIC_STEP - MUSIC_NOTE;
        let notes = MUSIC_PATTERN.iter().cycle().map(move |&freq| {
            SineWave::new(freq)
                .take_duration(MUSIC_NOTE)
                .amplify(MUSIC_NOTE_GAIN)
                .delay(gap)
        });
        sink.set_volume(self.gain * MUSIC_BUS_GAIN);
        sink.append(source::from_iter(notes));
        self.music_sink = Some(sink);
    }

    /// Stop background music
    pub fn stop_music(&mut self) {
        if let Some(sink) = self.music_sink.take() {
            sink.stop();
        }
    }

    pub fn pause_music(&self) {
        if let Some(sink) = &self.music_sink {
            sink.pause();
        }
    }

    pub fn resume_music(&self) {
        if let Some(sink) = &self.music_sink {
            sink.play();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cues_map_to_effects() {
        assert_eq!(Sfx::from(Cue::Rotate).tones()[0].freq, 620.0);
        assert_eq!(Sfx::from(Cue::SoftDrop).tones()[0].freq, 300.0);
        assert_eq!(Sfx::from(Cue::HardDrop).tones()[0].duration, Duration::from_millis(80));
    }

    #[test]
    fn test_two_step_effects_overlap() {
        for sfx in [Sfx::LineClear, Sfx::GameOver] {
            let [first, second] = sfx.tones() else {
                panic!("{sfx:?} should have two tones");
            };
            assert!(second.start < first.start + first.duration);
            assert!(second.freq != first.freq);
        }
    }

    #[test]
    fn test_music_timing() {
        assert!(MUSIC_NOTE < MUSIC_STEP);
        assert_eq!(MUSIC_PATTERN.len(), 8);
    }
}
