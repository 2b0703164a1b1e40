/// Sound engine: three cues (eat, collision, game over) played via rodio.
///
/// Each cue comes from the WAV file named in config.toml, or from a small
/// procedural 8-bit generator when no file is configured. A configured file
/// that can't be read or decoded leaves that cue silent (logged once).
///
/// Cues are restartable: playing a cue again cuts off the previous instance
/// of the same cue instead of layering on top of it.
///
/// Compile with `--no-default-features` or without "sound" feature
/// to disable audio entirely (the stub SoundEngine does nothing).

use crate::sim::event::GameEvent;

/// Sound cue identifiers.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sfx {
    Eat,
    Collision,
    GameOver,
}

/// Which cues a tick's events call for, in order, each at most once.
pub fn cues_for(events: &[GameEvent]) -> Vec<Sfx> {
    let mut cues = vec![];
    for ev in events {
        let cue = match ev {
            GameEvent::FoodEaten { .. } => Sfx::Eat,
            GameEvent::PlayerHit { .. } => Sfx::Collision,
            GameEvent::GameOver => Sfx::GameOver,
            _ => continue,
        };
        if !cues.contains(&cue) {
            cues.push(cue);
        }
    }
    cues
}

#[cfg(feature = "sound")]
mod inner {
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::path::Path;
    use std::sync::Arc;

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
    use tracing::{debug, info, warn};

    use super::Sfx;
    use crate::config::SoundConfig;
    use crate::error::SoundError;

    const SAMPLE_RATE: u32 = 22050;

    /// One playable cue: encoded WAV bytes plus the sink currently playing it.
    struct Cue {
        wav: Option<Arc<Vec<u8>>>,
        sink: RefCell<Option<Sink>>,
    }

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        eat: Cue,
        collision: Cue,
        game_over: Cue,
    }

    impl SoundEngine {
        /// Open the default output device and prepare all cues.
        /// `None` when sound is disabled or no device is available.
        pub fn new(cfg: &SoundConfig) -> Option<Self> {
            if !cfg.enabled {
                info!("sound disabled in config");
                return None;
            }
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("no audio output, continuing silently: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                eat: load_cue("eat", cfg.eat.as_deref(), gen_eat),
                collision: load_cue("collision", cfg.collision.as_deref(), gen_collision),
                game_over: load_cue("game_over", cfg.game_over.as_deref(), gen_game_over),
            })
        }

        pub fn play(&self, sfx: Sfx) {
            let cue = match sfx {
                Sfx::Eat => &self.eat,
                Sfx::Collision => &self.collision,
                Sfx::GameOver => &self.game_over,
            };
            let Some(wav) = &cue.wav else { return };

            let mut current = cue.sink.borrow_mut();
            if let Some(old) = current.take() {
                old.stop();
            }
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(wav.as_ref().clone());
                if let Ok(src) = Decoder::new(cursor) {
                    sink.append(src);
                    *current = Some(sink);
                }
            }
        }
    }

    /// Configured file if there is one, else the synthesized fallback.
    fn load_cue(name: &str, path: Option<&Path>, synth: fn() -> Vec<f32>) -> Cue {
        let wav = match path {
            None => {
                debug!(cue = name, "using synthesized cue");
                Some(Arc::new(make_wav(&synth())))
            }
            Some(path) => match read_wav(path) {
                Ok(bytes) => {
                    debug!(cue = name, path = %path.display(), "loaded cue");
                    Some(Arc::new(bytes))
                }
                Err(e) => {
                    warn!(cue = name, path = %path.display(), "cue disabled: {e}");
                    None
                }
            },
        };
        Cue { wav, sink: RefCell::new(None) }
    }

    /// Read a sound file and make sure rodio can decode it.
    fn read_wav(path: &Path) -> Result<Vec<u8>, SoundError> {
        let bytes = std::fs::read(path)?;
        Decoder::new(Cursor::new(bytes.clone()))?;
        Ok(bytes)
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators: all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    /// Square-ish tone (sine + 3rd harmonic) for retro feel.
    fn tone(freq: f32, duration: f32, volume: f32, out: &mut Vec<f32>) {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32) * 0.4;
            let wave = (t * freq * 2.0 * std::f32::consts::PI).sin() * 0.7
                + (t * freq * 3.0 * 2.0 * std::f32::consts::PI).sin() * 0.3;
            out.push(wave * env * volume);
        }
    }

    /// Eat: quick "waka" sweep down then up.
    fn gen_eat() -> Vec<f32> {
        let duration = 0.09;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                // V-shaped pitch: 700Hz → 300Hz → 700Hz
                let freq = 300.0 + (t - 0.5).abs() * 800.0;
                phase += freq / SAMPLE_RATE as f32;
                let env = 1.0 - t * 0.5;
                (phase * 2.0 * std::f32::consts::PI).sin() * env * 0.2
            })
            .collect()
    }

    /// Collision: falling whistle with a buzzy edge.
    fn gen_collision() -> Vec<f32> {
        let duration = 0.35;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut phase = 0.0_f32;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 900.0 - t * 700.0;
                phase += freq / SAMPLE_RATE as f32;
                let s = (phase * 2.0 * std::f32::consts::PI).sin();
                let square = if s >= 0.0 { 1.0 } else { -1.0 };
                let env = (1.0 - t).powf(0.7);
                (s * 0.6 + square * 0.4) * env * 0.25
            })
            .collect()
    }

    /// Game over: slow descending phrase with a long final note.
    fn gen_game_over() -> Vec<f32> {
        let notes = [(523.0_f32, 0.18), (466.0, 0.18), (392.0, 0.18), (311.0, 0.18), (262.0, 0.6)];
        let mut samples = Vec::new();
        for &(freq, dur) in &notes {
            tone(freq, dur, 0.3, &mut samples);
        }
        // Final fade
        let fade_len = samples.len() / 4;
        let total = samples.len();
        for (i, s) in samples.iter_mut().enumerate().skip(total - fade_len) {
            *s *= (total - i) as f32 / fade_len as f32;
        }
        samples
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2; // 16-bit = 2 bytes per sample
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        buf.extend_from_slice(&1u16.to_le_bytes());  // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn wav_header_matches_sample_count() {
            let samples = gen_eat();
            let wav = make_wav(&samples);
            assert_eq!(&wav[0..4], b"RIFF");
            assert_eq!(&wav[8..12], b"WAVE");
            assert_eq!(wav.len(), 44 + samples.len() * 2);
            let data_size = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]);
            assert_eq!(data_size as usize, samples.len() * 2);
        }

        #[test]
        fn synthesized_cues_decode() {
            for synth in [gen_eat as fn() -> Vec<f32>, gen_collision, gen_game_over] {
                let wav = make_wav(&synth());
                assert!(Decoder::new(Cursor::new(wav)).is_ok());
            }
        }

        #[test]
        fn read_errors_are_typed() {
            let missing = read_wav(Path::new("/nonexistent/eat.wav"));
            assert!(matches!(missing, Err(SoundError::Read(_))));

            let junk = std::env::temp_dir().join("maze-chase-not-a-wav.wav");
            std::fs::write(&junk, b"definitely not audio").unwrap();
            let bad = read_wav(&junk);
            let _ = std::fs::remove_file(&junk);
            assert!(matches!(bad, Err(SoundError::Decode(_))));
        }

        #[test]
        fn unreadable_file_silences_cue() {
            let cue = load_cue("eat", Some(Path::new("/nonexistent/eat.wav")), gen_eat);
            assert!(cue.wav.is_none());
            let cue = load_cue("eat", None, gen_eat);
            assert!(cue.wav.is_some());
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new(_cfg: &crate::config::SoundConfig) -> Option<Self> { Some(SoundEngine) }
    pub fn play(&self, _sfx: Sfx) {}
}
