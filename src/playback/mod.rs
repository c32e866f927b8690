/*
Reference Tone Playback
=======================

During a demonstration round, the app plays a reference tone whose pitch
glides along the same contour the animated graph traces. The audible part
is split from the transport:

  ToneVoice    - pure sample renderer. Follows a contour with a phase
                 accumulator, converting graph height into an equal-
                 tempered frequency lane by lane. Deterministic and
                 testable without any audio device.
  TonePlayer   - cpal output stream plus a shared transport (atomics +
                 a mutex around the voice, locked only by the callback).
                 Exposes play/pause/rewind and read-only position
                 queries for the UI.

Transport rules: pausing freezes the position, playback past the end
latches `finished` and stops, rewind resets the voice on the audio
thread at the next callback.
*/

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use thiserror::Error;

use crate::classify::{NOTE_POSITIONS, TOLERANCE};
use crate::contour::Contour;
use crate::music::{Note, PitchClass};
use crate::CONTOUR_WIDTH;

/// Seconds of linear fade applied at both ends of the tone.
const EDGE_FADE: f32 = 0.01;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no audio output device available")]
    NoDevice,
    #[error("audio output is not supported on this device")]
    Unsupported,
    #[error("output stream failed: {0}")]
    Stream(String),
}

/// Graph height to frequency. The note lanes are evenly spaced, so the
/// vertical axis is linear in semitones above the bottom lane.
pub fn frequency_for_y(y: f32) -> f32 {
    let top = NOTE_POSITIONS[NOTE_POSITIONS.len() - 1];
    let bottom = NOTE_POSITIONS[0];
    let lane_height = (bottom - top) / (NOTE_POSITIONS.len() - 1) as f32;
    let clamped = y.clamp(top - TOLERANCE, bottom + TOLERANCE);
    let semitones = (bottom - clamped) / lane_height;
    Note::new(PitchClass::C, 4).frequency() * 2f32.powf(semitones / 12.0)
}

/// Pure contour-following sine renderer.
pub struct ToneVoice {
    contour: Contour,
    sample_rate: f32,
    total_samples: u64,
    position: u64,
    phase: f32,
}

impl ToneVoice {
    pub fn new(contour: Contour, duration: Duration, sample_rate: f32) -> Self {
        Self {
            contour,
            sample_rate,
            total_samples: (duration.as_secs_f64() * sample_rate as f64) as u64,
            position: 0,
            phase: 0.0,
        }
    }

    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.total_samples
    }

    pub fn rewind(&mut self) {
        self.position = 0;
        self.phase = 0.0;
    }

    /// Render mono samples into `out`; past the end the output is
    /// silence. Returns how many samples carried tone.
    pub fn render(&mut self, out: &mut [f32]) -> usize {
        let fade_samples = (EDGE_FADE * self.sample_rate).max(1.0);
        let mut voiced = 0;
        for sample in out.iter_mut() {
            if self.position >= self.total_samples {
                *sample = 0.0;
                continue;
            }
            let progress = self.position as f32 / self.total_samples as f32;
            let y = self.contour.y_at(progress * CONTOUR_WIDTH);
            let freq = frequency_for_y(y);
            self.phase += std::f32::consts::TAU * freq / self.sample_rate;
            if self.phase > std::f32::consts::TAU {
                self.phase -= std::f32::consts::TAU;
            }

            let from_start = self.position as f32;
            let from_end = (self.total_samples - self.position) as f32;
            let gain = (from_start / fade_samples)
                .min(from_end / fade_samples)
                .clamp(0.0, 1.0);

            *sample = self.phase.sin() * gain * 0.5;
            self.position += 1;
            voiced += 1;
        }
        voiced
    }
}

/// Shared between the UI thread and the audio callback.
struct Transport {
    playing: AtomicBool,
    finished: AtomicBool,
    rewind_requested: AtomicBool,
    position: AtomicU64,
}

/// Plays one contour tone through the default output device.
pub struct TonePlayer {
    _stream: cpal::Stream,
    transport: Arc<Transport>,
    duration: Duration,
    sample_rate: f32,
}

impl TonePlayer {
    pub fn new(contour: Contour, duration: Duration) -> Result<Self, PlaybackError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(PlaybackError::NoDevice)?;
        let config = device
            .default_output_config()
            .map_err(|_| PlaybackError::Unsupported)?;
        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let transport = Arc::new(Transport {
            playing: AtomicBool::new(false),
            finished: AtomicBool::new(false),
            rewind_requested: AtomicBool::new(false),
            position: AtomicU64::new(0),
        });

        let voice = Mutex::new(ToneVoice::new(contour, duration, sample_rate));
        let shared = transport.clone();
        let mut mono = vec![0.0f32; 1024];

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    let mut voice = match voice.lock() {
                        Ok(voice) => voice,
                        Err(_) => {
                            data.fill(0.0);
                            return;
                        }
                    };
                    if shared.rewind_requested.swap(false, Ordering::AcqRel) {
                        voice.rewind();
                        shared.finished.store(false, Ordering::Release);
                    }
                    let frames = data.len() / channels;
                    if !shared.playing.load(Ordering::Acquire) || voice.is_finished() {
                        data.fill(0.0);
                        if voice.is_finished() {
                            shared.finished.store(true, Ordering::Release);
                            shared.playing.store(false, Ordering::Release);
                        }
                        return;
                    }
                    if mono.len() < frames {
                        mono.resize(frames, 0.0);
                    }
                    let block = &mut mono[..frames];
                    voice.render(block);
                    for (i, &s) in block.iter().enumerate() {
                        for ch in 0..channels {
                            data[i * channels + ch] = s;
                        }
                    }
                    shared.position.store(voice.position(), Ordering::Release);
                },
                |err| log::warn!("output stream error: {err}"),
                None,
            )
            .map_err(|err| PlaybackError::Stream(err.to_string()))?;

        stream
            .play()
            .map_err(|err| PlaybackError::Stream(err.to_string()))?;

        Ok(Self {
            _stream: stream,
            transport,
            duration,
            sample_rate,
        })
    }

    pub fn play(&self) {
        self.transport.playing.store(true, Ordering::Release);
    }

    pub fn pause(&self) {
        self.transport.playing.store(false, Ordering::Release);
    }

    /// Rewind to the start; takes effect at the next audio callback.
    pub fn rewind(&self) {
        self.transport.rewind_requested.store(true, Ordering::Release);
        self.transport.position.store(0, Ordering::Release);
    }

    pub fn is_playing(&self) -> bool {
        self.transport.playing.load(Ordering::Acquire)
    }

    pub fn finished(&self) -> bool {
        self.transport.finished.load(Ordering::Acquire)
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn current_time(&self) -> Duration {
        let samples = self.transport.position.load(Ordering::Acquire);
        Duration::from_secs_f64(samples as f64 / self.sample_rate as f64)
    }
}
