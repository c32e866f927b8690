//! Microphone capture plumbing.
//!
//! The cpal input callback downmixes to mono and pushes samples into an
//! rtrb ring, non-blocking (drop on overflow). The game thread drains the
//! ring on its own schedule through [`VoiceDetector::poll`], which slices
//! the stream into analysis frames and runs them through the meter and
//! gate. No decisions are made on the audio thread.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::{Consumer, PushError, RingBuffer};

use super::{
    LevelMeter, MicError, VoiceEdge, VoiceEvent, VoiceGate, VoiceSession, ANALYSIS_FRAME,
};

/// How many analysis frames the ring can hold before samples are dropped.
const RING_FRAMES: usize = 64;

/// Live microphone session: cpal stream, ring, meter, and gate.
pub struct VoiceDetector {
    stream: cpal::Stream,
    rx: Consumer<f32>,
    pending: Vec<f32>,
    meter: LevelMeter,
    gate: VoiceGate,
    session: VoiceSession,
}

impl VoiceDetector {
    /// Open the default input device and start capturing.
    pub fn start() -> Result<Self, MicError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(MicError::DeviceNotFound)?;
        let config = device
            .default_input_config()
            .map_err(|_| MicError::Unsupported)?;
        let channels = config.channels() as usize;

        let (mut tx, rx) = RingBuffer::<f32>::new(ANALYSIS_FRAME * RING_FRAMES);

        let stream = device
            .build_input_stream(
                &config.into(),
                move |data: &[f32], _| {
                    for frame in data.chunks(channels) {
                        let mono = frame.iter().sum::<f32>() / channels as f32;
                        if let Err(PushError::Full(_)) = tx.push(mono) {
                            break; // drop remainder if full
                        }
                    }
                },
                |err| log::warn!("input stream error: {err}"),
                None,
            )
            .map_err(|err| match err {
                cpal::BuildStreamError::DeviceNotAvailable => MicError::DeviceNotFound,
                cpal::BuildStreamError::StreamConfigNotSupported => MicError::Unsupported,
                // Backends report a denied capture permission this way.
                cpal::BuildStreamError::BackendSpecific { .. } => MicError::PermissionDenied,
                other => MicError::Stream(other.to_string()),
            })?;

        stream
            .play()
            .map_err(|err| MicError::Stream(err.to_string()))?;

        Ok(Self {
            stream,
            rx,
            pending: Vec::with_capacity(ANALYSIS_FRAME * 2),
            meter: LevelMeter::default(),
            gate: VoiceGate::default(),
            session: VoiceSession::new(),
        })
    }

    pub fn attempts(&self) -> u32 {
        self.session.attempts()
    }

    /// Restart the attempt counter (the warmup page's Retry button).
    pub fn reset_attempts(&mut self) {
        self.session.reset();
    }

    pub fn is_voice_active(&self) -> bool {
        self.gate.is_active()
    }

    /// Latest analysis frame's 0-255 loudness, for the live level bars.
    pub fn level(&self) -> f32 {
        self.gate.level()
    }

    /// Drain captured samples and report any edges that completed frames
    /// produced. Call once per UI tick.
    pub fn poll(&mut self) -> Vec<VoiceEvent> {
        while let Ok(sample) = self.rx.pop() {
            self.pending.push(sample);
        }

        let mut events = Vec::new();
        while self.pending.len() >= ANALYSIS_FRAME {
            let frame: Vec<f32> = self.pending.drain(..ANALYSIS_FRAME).collect();
            let level = self.meter.level(&frame);
            match self.gate.update(level) {
                Some(VoiceEdge::Rose) => {
                    let requested_notes = self.session.record_detection();
                    events.push(VoiceEvent::Started { requested_notes });
                }
                Some(VoiceEdge::Fell) => events.push(VoiceEvent::Stopped),
                None => {}
            }
        }
        events
    }

    /// Stop capturing. Dropping the detector has the same effect; the
    /// caller may simply let it fall out of scope.
    pub fn stop(self) {
        drop(self.stream);
    }
}
