// SPDX-License-Identifier: MPL-2.0
//! Audio output using cpal for low-latency playback.
//!
//! The decoder thread pushes interleaved f32 samples into a bounded buffer
//! and the cpal callback drains it. The buffer holds at most the configured
//! forward buffer duration; [`AudioOutput::queue`] accepts only what fits and
//! the caller waits before offering the rest.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::config::defaults::{MAX_VOLUME, MIN_VOLUME};
use crate::error::{Error, Result};

/// Shared state between the audio callback and the decoder thread.
struct SharedState {
    /// Current volume (stored as u32 bits of f32 for atomic access).
    volume_bits: AtomicU32,
    muted: AtomicBool,
    paused: AtomicBool,
}

impl SharedState {
    fn new(initial_volume: f32, muted: bool) -> Self {
        Self {
            volume_bits: AtomicU32::new(initial_volume.to_bits()),
            muted: AtomicBool::new(muted),
            paused: AtomicBool::new(true),
        }
    }

    fn volume(&self) -> f32 {
        f32::from_bits(self.volume_bits.load(Ordering::Relaxed))
    }

    fn is_muted(&self) -> bool {
        self.muted.load(Ordering::Relaxed)
    }

    fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Relaxed)
    }

    fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Relaxed);
    }
}

/// Bounded FIFO of interleaved samples.
#[derive(Debug)]
pub(crate) struct SampleBuffer {
    samples: VecDeque<f32>,
    capacity: usize,
}

impl SampleBuffer {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends as many samples as fit and returns how many were accepted.
    pub(crate) fn push(&mut self, samples: &[f32]) -> usize {
        let room = self.capacity.saturating_sub(self.samples.len());
        let accepted = room.min(samples.len());
        self.samples.extend(&samples[..accepted]);
        accepted
    }

    /// Fills `out` with buffered samples scaled by `gain`, padding with silence.
    pub(crate) fn drain_into<T: cpal::Sample + cpal::FromSample<f32>>(
        &mut self,
        out: &mut [T],
        gain: f32,
    ) {
        for slot in out.iter_mut() {
            let value = match self.samples.pop_front() {
                // Clamping just below 1.0 avoids i16 overflow in from_sample.
                Some(sample) => (sample * gain).clamp(-1.0, 0.999_999_9),
                None => 0.0,
            };
            *slot = T::from_sample(value);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.samples.clear();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.samples.len()
    }
}

/// Perceptual volume curve: a slider at 50% yields 25% amplitude.
fn perceptual_gain(volume: f32) -> f32 {
    volume * volume
}

/// Audio output stream bound to the default device.
///
/// `cpal::Stream` is not `Send` on every platform, so an `AudioOutput` lives
/// on the thread that created it.
pub struct AudioOutput {
    shared_state: Arc<SharedState>,
    buffer: Arc<Mutex<SampleBuffer>>,
    sample_rate: u32,
    channels: u16,
    _stream: cpal::Stream,
}

impl AudioOutput {
    /// Opens the default output device, paused.
    ///
    /// `forward_buffer` bounds how much decoded audio may be queued ahead of
    /// the device.
    ///
    /// # Errors
    ///
    /// Returns an error if no output device is found, its configuration
    /// cannot be read, or the stream fails to start.
    pub fn new(initial_volume: f32, muted: bool, forward_buffer: Duration) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Io("No audio output device found".to_string()))?;

        let supported_config = device
            .default_output_config()
            .map_err(|e| Error::Io(format!("Failed to get audio config: {e}")))?;

        let sample_rate = supported_config.sample_rate();
        let channels = supported_config.channels();

        let volume = initial_volume.clamp(MIN_VOLUME, MAX_VOLUME);
        let shared_state = Arc::new(SharedState::new(volume, muted));

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let capacity = (forward_buffer.as_secs_f64()
            * f64::from(sample_rate)
            * f64::from(channels))
        .ceil() as usize;
        let buffer = Arc::new(Mutex::new(SampleBuffer::new(capacity)));

        let config: cpal::StreamConfig = supported_config.config();
        let stream = match supported_config.sample_format() {
            cpal::SampleFormat::F32 => Self::build_stream::<f32>(
                &device,
                &config,
                Arc::clone(&buffer),
                Arc::clone(&shared_state),
            )?,
            cpal::SampleFormat::I16 => Self::build_stream::<i16>(
                &device,
                &config,
                Arc::clone(&buffer),
                Arc::clone(&shared_state),
            )?,
            cpal::SampleFormat::U16 => Self::build_stream::<u16>(
                &device,
                &config,
                Arc::clone(&buffer),
                Arc::clone(&shared_state),
            )?,
            other => {
                return Err(Error::Io(format!(
                    "Unsupported audio sample format: {other:?}"
                )))
            }
        };

        stream
            .play()
            .map_err(|e| Error::Io(format!("Failed to start audio stream: {e}")))?;

        log::debug!(
            "Audio output opened: {} Hz, {} channel(s), {} queued samples max",
            sample_rate,
            channels,
            capacity
        );

        Ok(Self {
            shared_state,
            buffer,
            sample_rate,
            channels,
            _stream: stream,
        })
    }

    fn build_stream<T: cpal::SizedSample + cpal::FromSample<f32>>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        buffer: Arc<Mutex<SampleBuffer>>,
        shared_state: Arc<SharedState>,
    ) -> Result<cpal::Stream> {
        device
            .build_output_stream(
                config,
                move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                    if shared_state.is_paused() {
                        for sample in data.iter_mut() {
                            *sample = T::from_sample(0.0f32);
                        }
                        return;
                    }

                    // Muted output still consumes samples so audio stays in step with video.
                    let gain = if shared_state.is_muted() {
                        0.0
                    } else {
                        perceptual_gain(shared_state.volume())
                    };
                    buffer
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .drain_into(data, gain);
                },
                |err| {
                    log::warn!("Audio output error: {err}");
                },
                None,
            )
            .map_err(|e| Error::Io(format!("Failed to build audio stream: {e}")))
    }

    /// Queues samples for playback and returns how many were accepted.
    pub fn queue(&self, samples: &[f32]) -> usize {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(samples)
    }

    pub fn pause(&self) {
        self.shared_state.set_paused(true);
    }

    pub fn resume(&self) {
        self.shared_state.set_paused(false);
    }

    /// Pauses and discards queued audio.
    pub fn stop(&self) {
        self.shared_state.set_paused(true);
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[must_use]
    pub fn channels(&self) -> u16 {
        self.channels
    }
}
