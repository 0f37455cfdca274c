// SPDX-License-Identifier: MPL-2.0
//! The blocking worker behind an [`FfmpegHandle`](super::FfmpegHandle).
//!
//! Lifecycle: open (interruptible) → publish `Ready` or `Failed` → wait for
//! play → demux/decode paced against the wall clock until end of stream,
//! failure, or teardown.
//!
//! A stream needs a video or an audio track. Video frames are paced by the
//! clock; audio-only streams are paced by the bounded audio buffer.

use super::clock::PlaybackClock;
use super::{error_info, init_ffmpeg, Command, PipelineSettings, Shared};
use crate::player::audio_output::AudioOutput;
use crate::player::backend::{PlayerErrorInfo, PlayerStatus, StreamInfo, FFMPEG_DOMAIN};
use crate::player::error_hint::AVERROR_STREAM_NOT_FOUND;
use ffmpeg_next::format::Pixel;
use ffmpeg_next::software::{resampling, scaling};
use ffmpeg_next::codec::{self, decoder};
use ffmpeg_next::{frame, media, ChannelLayout, Packet};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, error::TryRecvError};

/// FFmpeg's internal time base (`AV_TIME_BASE`), in ticks per second.
const AV_TIME_BASE: f64 = 1_000_000.0;

/// Wait between attempts to queue audio into a full buffer.
const AUDIO_BACKOFF: Duration = Duration::from_millis(10);

pub(super) fn run(
    url: &str,
    settings: PipelineSettings,
    shared: &Arc<Shared>,
    mut commands: mpsc::UnboundedReceiver<Command>,
) {
    if let Err(e) = init_ffmpeg() {
        shared.fail(error_info(e));
        return;
    }

    let interrupt_state = Arc::clone(shared);
    let opened = ffmpeg_next::format::input_with_interrupt(url, move || {
        interrupt_state.is_cancelled()
    });
    let mut ictx = match opened {
        Ok(ictx) => ictx,
        Err(_) if shared.is_cancelled() => {
            log::debug!("Open of {} cancelled", url);
            return;
        }
        Err(e) => {
            shared.fail(error_info(e));
            return;
        }
    };

    let mut tracks = match Tracks::open(&ictx, settings) {
        Ok(tracks) => tracks,
        Err(info) => {
            shared.fail(info);
            return;
        }
    };

    let info = stream_info(tracks.video_size(), tracks.audio.is_some(), ictx.duration());
    log::info!(
        "Stream ready: {}x{}, audio: {}, duration: {:?}",
        info.width,
        info.height,
        info.has_audio,
        info.duration_secs
    );
    shared.set_status(PlayerStatus::Ready(info));

    let mut playing = false;
    let mut clock = PlaybackClock::default();

    loop {
        if shared.is_cancelled() {
            break;
        }

        if !playing {
            match commands.blocking_recv() {
                Some(Command::Play) if !shared.is_finished() => {
                    playing = true;
                    clock.reset();
                    tracks.resume_audio();
                }
                Some(_) => {}
                None => break,
            }
            continue;
        }

        match commands.try_recv() {
            Ok(Command::Pause) => {
                playing = false;
                tracks.pause_audio();
                continue;
            }
            Ok(Command::Play) | Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => break,
        }

        let mut packet = Packet::empty();
        match packet.read(&mut ictx) {
            Ok(()) => {}
            Err(ffmpeg_next::Error::Eof) => {
                tracks.flush(shared, &mut clock);
                log::info!("End of stream reached");
                shared.mark_finished();
                tracks.pause_audio();
                playing = false;
                continue;
            }
            Err(_) if shared.is_cancelled() => break,
            Err(e) => {
                shared.fail(error_info(e));
                break;
            }
        }

        if let Err(e) = tracks.decode(&packet, shared, &mut clock) {
            shared.fail(error_info(e));
            break;
        }
    }

    tracks.stop_audio();
    log::debug!("Playback worker for {} exited", url);
}

struct VideoTrack {
    index: usize,
    decoder: decoder::Video,
    /// Rebuilt when the decoded geometry or pixel format changes.
    scaler: Option<(scaling::Context, Pixel, u32, u32)>,
    time_base: f64,
}

struct AudioTrack {
    index: usize,
    decoder: decoder::Audio,
    /// Built from the first decoded frame, whose layout is authoritative.
    resampler: Option<resampling::Context>,
    output: AudioOutput,
}

struct Tracks {
    video: Option<VideoTrack>,
    audio: Option<AudioTrack>,
}

/// Describes an opened stream; `video_size` is `None` for audio-only streams.
fn stream_info(video_size: Option<(u32, u32)>, has_audio: bool, duration: i64) -> StreamInfo {
    let (width, height) = video_size.unwrap_or((0, 0));
    #[allow(clippy::cast_precision_loss)]
    let duration_secs = (duration > 0).then(|| duration as f64 / AV_TIME_BASE);
    StreamInfo {
        width,
        height,
        has_audio,
        duration_secs,
    }
}

/// A stream is playable when it has at least one usable track.
fn require_playable(has_video: bool, has_audio: bool) -> Result<(), PlayerErrorInfo> {
    if has_video || has_audio {
        Ok(())
    } else {
        Err(PlayerErrorInfo::new(
            FFMPEG_DOMAIN,
            AVERROR_STREAM_NOT_FOUND,
            "No playable video or audio stream found",
        ))
    }
}

impl Tracks {
    fn open(
        ictx: &ffmpeg_next::format::context::Input,
        settings: PipelineSettings,
    ) -> Result<Self, PlayerErrorInfo> {
        let video = match ictx.streams().best(media::Type::Video) {
            Some(stream) => Some(open_video(&stream).map_err(error_info)?),
            None => {
                log::info!("Stream has no video track");
                None
            }
        };

        let audio = ictx
            .streams()
            .best(media::Type::Audio)
            .and_then(|stream| open_audio(&stream, settings));

        require_playable(video.is_some(), audio.is_some())?;
        Ok(Self { video, audio })
    }

    fn video_size(&self) -> Option<(u32, u32)> {
        self.video
            .as_ref()
            .map(|video| (video.decoder.width(), video.decoder.height()))
    }

    fn decode(
        &mut self,
        packet: &Packet,
        shared: &Shared,
        clock: &mut PlaybackClock,
    ) -> Result<(), ffmpeg_next::Error> {
        let stream = packet.stream();
        if let Some(video) = self.video.as_mut().filter(|video| video.index == stream) {
            if let Err(e) = video.decoder.send_packet(packet) {
                log::debug!("Dropping video packet: {}", e);
                return Ok(());
            }
            video.drain(shared, clock)?;
        } else if let Some(audio) = self.audio.as_mut().filter(|audio| audio.index == stream) {
            if let Err(e) = audio.decoder.send_packet(packet) {
                log::debug!("Dropping audio packet: {}", e);
                return Ok(());
            }
            audio.drain(shared);
        }
        Ok(())
    }

    fn flush(&mut self, shared: &Shared, clock: &mut PlaybackClock) {
        if let Some(video) = self.video.as_mut() {
            if video.decoder.send_eof().is_ok() {
                if let Err(e) = video.drain(shared, clock) {
                    log::debug!("Flushing video decoder failed: {}", e);
                }
            }
        }
        if let Some(audio) = self.audio.as_mut() {
            if audio.decoder.send_eof().is_ok() {
                audio.drain(shared);
            }
        }
    }

    fn resume_audio(&self) {
        if let Some(audio) = &self.audio {
            audio.output.resume();
        }
    }

    fn pause_audio(&self) {
        if let Some(audio) = &self.audio {
            audio.output.pause();
        }
    }

    fn stop_audio(&self) {
        if let Some(audio) = &self.audio {
            audio.output.stop();
        }
    }
}

impl VideoTrack {
    /// Converts every pending decoded frame to RGBA and presents it on time.
    fn drain(
        &mut self,
        shared: &Shared,
        clock: &mut PlaybackClock,
    ) -> Result<(), ffmpeg_next::Error> {
        let mut decoded = frame::Video::empty();
        while self.decoder.receive_frame(&mut decoded).is_ok() {
            let (format, width, height) = (decoded.format(), decoded.width(), decoded.height());
            let stale = !matches!(
                &self.scaler,
                Some((_, f, w, h)) if *f == format && *w == width && *h == height
            );
            if stale {
                let context = scaling::Context::get(
                    format,
                    width,
                    height,
                    Pixel::RGBA,
                    width,
                    height,
                    scaling::Flags::BILINEAR,
                )?;
                self.scaler = Some((context, format, width, height));
            }
            let Some((scaler, ..)) = self.scaler.as_mut() else {
                continue;
            };

            let mut rgba = frame::Video::empty();
            scaler.run(&decoded, &mut rgba)?;

            #[allow(clippy::cast_precision_loss)]
            let pts_secs = decoded
                .timestamp()
                .map_or(0.0, |pts| pts as f64 * self.time_base);

            let wait = clock.delay_for(pts_secs, Instant::now());
            if !wait.is_zero() {
                std::thread::sleep(wait);
            }
            if shared.is_cancelled() {
                return Ok(());
            }
            shared.publish_frame(extract_rgba_data(&rgba), width, height, pts_secs);
        }
        Ok(())
    }
}

impl AudioTrack {
    fn drain(&mut self, shared: &Shared) {
        let mut decoded = frame::Audio::empty();
        while self.decoder.receive_frame(&mut decoded).is_ok() {
            if self.resampler.is_none() {
                let layout = match self.output.channels() {
                    1 => ChannelLayout::MONO,
                    _ => ChannelLayout::STEREO,
                };
                match resampling::Context::get(
                    decoded.format(),
                    decoded.channel_layout(),
                    decoded.rate(),
                    ffmpeg_next::format::Sample::F32(ffmpeg_next::format::sample::Type::Packed),
                    layout,
                    self.output.sample_rate(),
                ) {
                    Ok(resampler) => self.resampler = Some(resampler),
                    Err(e) => {
                        log::warn!("Audio resampler unavailable, continuing muted: {}", e);
                        return;
                    }
                }
            }
            let Some(resampler) = self.resampler.as_mut() else {
                return;
            };

            let mut resampled = frame::Audio::empty();
            if let Err(e) = resampler.run(&decoded, &mut resampled) {
                log::debug!("Resampling failed: {}", e);
                continue;
            }
            let channels = if self.output.channels() == 1 { 1 } else { 2 };
            if !self.queue_all(&extract_samples(&resampled, channels), shared) {
                return;
            }
        }
    }

    /// Queues every sample, waiting while the buffer is full.
    ///
    /// Returns false when the handle was torn down while waiting.
    fn queue_all(&self, samples: &[f32], shared: &Shared) -> bool {
        let mut offset = self.output.queue(samples);
        while offset < samples.len() {
            if shared.is_cancelled() {
                return false;
            }
            std::thread::sleep(AUDIO_BACKOFF);
            offset += self.output.queue(&samples[offset..]);
        }
        true
    }
}

fn open_video(
    stream: &ffmpeg_next::format::stream::Stream<'_>,
) -> Result<VideoTrack, ffmpeg_next::Error> {
    let rational = stream.time_base();
    let time_base = f64::from(rational.numerator()) / f64::from(rational.denominator());
    let decoder = codec::context::Context::from_parameters(stream.parameters())
        .and_then(|context| context.decoder().video())?;

    Ok(VideoTrack {
        index: stream.index(),
        decoder,
        scaler: None,
        time_base,
    })
}

fn open_audio(
    stream: &ffmpeg_next::format::stream::Stream<'_>,
    settings: PipelineSettings,
) -> Option<AudioTrack> {
    let decoder = match codec::context::Context::from_parameters(stream.parameters())
        .and_then(|context| context.decoder().audio())
    {
        Ok(decoder) => decoder,
        Err(e) => {
            log::warn!("Audio track ignored, decoder unavailable: {}", e);
            return None;
        }
    };

    let output = match AudioOutput::new(settings.volume, settings.muted, settings.forward_buffer) {
        Ok(output) => output,
        Err(e) => {
            log::warn!("Audio track ignored: {}", e);
            return None;
        }
    };

    Some(AudioTrack {
        index: stream.index(),
        decoder,
        resampler: None,
        output,
    })
}

/// Copies RGBA rows out of a frame, dropping any stride padding.
fn extract_rgba_data(frame: &frame::Video) -> Vec<u8> {
    let row_len = frame.width() as usize * 4;
    let stride = frame.stride(0).max(1);
    let data = frame.data(0);

    let mut rgba = Vec::with_capacity(row_len * frame.height() as usize);
    for row in data.chunks(stride).take(frame.height() as usize) {
        rgba.extend_from_slice(&row[..row_len.min(row.len())]);
    }
    rgba
}

/// Reads interleaved f32 samples from a packed resampled frame.
fn extract_samples(frame: &frame::Audio, channels: usize) -> Vec<f32> {
    let count = frame.samples() * channels;
    frame
        .data(0)
        .chunks_exact(4)
        .take(count)
        .map(|bytes| f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_only_stream_is_playable() {
        assert!(require_playable(false, true).is_ok());
        assert!(require_playable(true, false).is_ok());
    }

    #[test]
    fn stream_without_tracks_is_rejected() {
        let err = require_playable(false, false).unwrap_err();
        assert_eq!(err.domain, FFMPEG_DOMAIN);
        assert_eq!(err.code, AVERROR_STREAM_NOT_FOUND);
    }

    #[test]
    fn audio_only_info_has_no_picture() {
        let info = stream_info(None, true, 0);
        assert_eq!((info.width, info.height), (0, 0));
        assert!(info.has_audio);
        assert!(info.duration_secs.is_none());
    }

    #[test]
    fn stream_info_converts_duration() {
        let info = stream_info(Some((1280, 720)), false, 90_000_000);
        assert_eq!((info.width, info.height), (1280, 720));
        assert_eq!(info.duration_secs, Some(90.0));
    }
}
