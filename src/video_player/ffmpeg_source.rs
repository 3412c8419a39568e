// SPDX-License-Identifier: MPL-2.0
//! FFmpeg-backed [`FrameSource`].
//!
//! Decoding is synchronous: every read decodes exactly the packets needed for
//! one frame, converted to RGBA with the software scaler. Frame seeking jumps
//! to the keyframe at or before the target timestamp and decodes forward until
//! the first frame whose presentation time maps to the requested index (or a
//! later one, if the stream has gaps).

use super::decoder::{DecodedFrame, FrameSource, ReadOutcome, SourceMetadata, SourceOpener};
use super::time_units;
use crate::error::{Error, Result, VideoError};
use ffmpeg_next as ffmpeg;
use std::path::Path;
use std::sync::{Arc, Once};

/// Static flag to ensure FFmpeg is initialized only once.
static FFMPEG_INIT: Once = Once::new();

/// Initialize FFmpeg with appropriate log level.
///
/// Safe to call multiple times; initialization only happens once. The FFmpeg
/// log level is set to ERROR so container warnings do not flood stderr.
pub fn init_ffmpeg() -> Result<()> {
    let mut init_result: Result<()> = Ok(());

    FFMPEG_INIT.call_once(|| {
        if let Err(e) = ffmpeg::init() {
            init_result = Err(Error::Io(format!("FFmpeg initialization failed: {e}")));
            return;
        }

        // SAFETY: av_log_set_level is thread-safe and only affects logging
        unsafe {
            ffmpeg::ffi::av_log_set_level(ffmpeg::ffi::AV_LOG_ERROR);
        }
    });

    init_result
}

/// Maps an FFmpeg error code onto a [`VideoError`] category.
///
/// Codes without a dedicated category become `DecodingFailed` with `context`.
fn video_error(context: &str, err: ffmpeg::Error) -> Error {
    let category = match err {
        ffmpeg::Error::DecoderNotFound => VideoError::UnsupportedCodec(context.to_string()),
        ffmpeg::Error::StreamNotFound => VideoError::NoVideoStream,
        ffmpeg::Error::InvalidData => VideoError::CorruptedFile,
        ffmpeg::Error::Other { errno } => {
            let io = std::io::Error::from_raw_os_error(errno);
            match io.kind() {
                std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                    VideoError::IoError(format!("{context}: {io}"))
                }
                _ => VideoError::DecodingFailed(format!("{context}: {err}")),
            }
        }
        other => VideoError::DecodingFailed(format!("{context}: {other}")),
    };
    Error::Video(category)
}

/// Opens files with FFmpeg.
#[derive(Debug, Default, Clone, Copy)]
pub struct FfmpegOpener;

impl SourceOpener for FfmpegOpener {
    fn open(&self, path: &Path) -> Result<Box<dyn FrameSource>> {
        init_ffmpeg()?;
        Ok(Box::new(FfmpegSource::open(path)?))
    }
}

/// Decoder state for one opened file.
pub struct FfmpegSource {
    input: Option<ffmpeg::format::context::Input>,
    decoder: Option<ffmpeg::decoder::Video>,
    scaler: Option<ffmpeg::software::scaling::Context>,
    stream_index: usize,
    /// Seconds per stream timestamp unit.
    time_base: f64,
    /// Stream start timestamp, subtracted before mapping PTS to indices.
    start_pts: i64,
    metadata: SourceMetadata,
    cursor: u64,
    /// Frame decoded while seeking, returned by the next read.
    pending: Option<ffmpeg::frame::Video>,
    eof_sent: bool,
}

impl FfmpegSource {
    /// Opens `path` and prepares the best video stream for decoding.
    pub fn open(path: &Path) -> Result<Self> {
        let input = ffmpeg::format::input(&path).map_err(|e| video_error("Failed to open video", e))?;

        let stream = input
            .streams()
            .best(ffmpeg::media::Type::Video)
            .ok_or(Error::Video(VideoError::NoVideoStream))?;
        let stream_index = stream.index();

        let context = ffmpeg::codec::context::Context::from_parameters(stream.parameters())
            .map_err(|e| video_error("Failed to create codec context", e))?;
        let codec_id = stream.parameters().id();
        let decoder = context
            .decoder()
            .video()
            .map_err(|e| video_error(&format!("{codec_id:?}"), e))?;

        let width = decoder.width();
        let height = decoder.height();
        if width == 0 || height == 0 {
            return Err(Error::Video(VideoError::DecodingFailed(format!(
                "Invalid video dimensions: {width}x{height}"
            ))));
        }

        let scaler = ffmpeg::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg::format::Pixel::RGBA,
            width,
            height,
            ffmpeg::software::scaling::Flags::BILINEAR,
        )
        .map_err(|e| video_error("Failed to create scaler", e))?;

        let time_base = f64::from(stream.time_base());
        let frame_rate = {
            let avg = stream.avg_frame_rate();
            if avg.numerator() > 0 && avg.denominator() > 0 {
                f64::from(avg)
            } else {
                f64::from(stream.rate())
            }
        };
        if !time_units::is_valid_frame_rate(frame_rate) {
            return Err(Error::Video(VideoError::InvalidFrameRate(frame_rate)));
        }

        let frame_count = if stream.frames() > 0 {
            stream.frames() as u64
        } else if stream.duration() > 0 {
            (stream.duration() as f64 * time_base * frame_rate).round() as u64
        } else {
            let container_secs = input.duration().max(0) as f64 / f64::from(ffmpeg::ffi::AV_TIME_BASE);
            (container_secs * frame_rate).round() as u64
        };

        let start_pts = match stream.start_time() {
            ffmpeg::ffi::AV_NOPTS_VALUE => 0,
            pts => pts,
        };

        let metadata = SourceMetadata {
            frame_rate,
            frame_count,
            width,
            height,
        };

        tracing::debug!(
            path = %path.display(),
            frame_rate,
            frame_count,
            width,
            height,
            "opened video source"
        );

        Ok(Self {
            input: Some(input),
            decoder: Some(decoder),
            scaler: Some(scaler),
            stream_index,
            time_base,
            start_pts,
            metadata,
            cursor: 0,
            pending: None,
            eof_sent: false,
        })
    }

    /// Maps a decoded frame's timestamp to a frame index.
    fn frame_index_of(&self, frame: &ffmpeg::frame::Video) -> Option<u64> {
        let pts = frame.timestamp().or_else(|| frame.pts())?;
        let secs = (pts - self.start_pts) as f64 * self.time_base;
        Some((secs * self.metadata.frame_rate).round().max(0.0) as u64)
    }

    /// Decodes the next frame in stream order, or `None` once drained.
    fn decode_next(&mut self) -> Result<Option<ffmpeg::frame::Video>> {
        let (Some(input), Some(decoder)) = (self.input.as_mut(), self.decoder.as_mut()) else {
            return Ok(None);
        };

        loop {
            let mut decoded = ffmpeg::frame::Video::empty();
            if decoder.receive_frame(&mut decoded).is_ok() {
                return Ok(Some(decoded));
            }
            if self.eof_sent {
                return Ok(None);
            }

            match input.packets().next() {
                Some((stream, packet)) => {
                    if stream.index() == self.stream_index {
                        decoder
                            .send_packet(&packet)
                            .map_err(|e| video_error("Packet send failed", e))?;
                    }
                }
                None => {
                    decoder
                        .send_eof()
                        .map_err(|e| video_error("Failed to flush decoder", e))?;
                    self.eof_sent = true;
                }
            }
        }
    }

    fn to_rgba(&mut self, frame: &ffmpeg::frame::Video) -> Result<DecodedFrame> {
        let scaler = self
            .scaler
            .as_mut()
            .ok_or_else(|| Error::Video(VideoError::DecodingFailed("source released".into())))?;

        let mut rgba_frame = ffmpeg::frame::Video::empty();
        scaler
            .run(frame, &mut rgba_frame)
            .map_err(|e| video_error("Failed to scale frame", e))?;

        let width = rgba_frame.width();
        let height = rgba_frame.height();
        let data = rgba_frame.data(0);
        let stride = rgba_frame.stride(0);

        // Copy row by row, the scaler may pad lines
        let row_bytes = width as usize * 4;
        let mut rgba_bytes = Vec::with_capacity(row_bytes * height as usize);
        for y in 0..height as usize {
            let row_start = y * stride;
            rgba_bytes.extend_from_slice(&data[row_start..row_start + row_bytes]);
        }

        Ok(DecodedFrame {
            rgba_data: Arc::new(rgba_bytes),
            width,
            height,
        })
    }
}

impl FrameSource for FfmpegSource {
    fn metadata(&self) -> SourceMetadata {
        self.metadata
    }

    fn seek_to_frame(&mut self, frame_index: u64) -> Result<()> {
        let Some(target_secs) = time_units::frames_to_secs(frame_index, self.metadata.frame_rate)
        else {
            return Ok(());
        };

        let timestamp = (target_secs * f64::from(ffmpeg::ffi::AV_TIME_BASE)) as i64;
        {
            let (Some(input), Some(decoder)) = (self.input.as_mut(), self.decoder.as_mut()) else {
                return Ok(());
            };
            // RangeTo lets FFmpeg land on the preceding keyframe
            input
                .seek(timestamp, ..timestamp)
                .map_err(|e| video_error("Seek failed", e))?;
            decoder.flush();
        }
        self.pending = None;
        self.eof_sent = false;

        // Decode forward to the requested frame
        loop {
            match self.decode_next()? {
                Some(frame) => {
                    let index = self.frame_index_of(&frame).unwrap_or(frame_index);
                    if index >= frame_index {
                        self.cursor = index;
                        self.pending = Some(frame);
                        return Ok(());
                    }
                }
                None => {
                    self.cursor = self.metadata.frame_count;
                    return Ok(());
                }
            }
        }
    }

    fn position(&self) -> u64 {
        self.cursor
    }

    fn read_next_frame(&mut self) -> Result<ReadOutcome> {
        let frame = match self.pending.take() {
            Some(frame) => frame,
            None => match self.decode_next()? {
                Some(frame) => {
                    if let Some(index) = self.frame_index_of(&frame) {
                        self.cursor = index;
                    }
                    frame
                }
                None => return Ok(ReadOutcome::EndOfStream),
            },
        };

        let decoded = self.to_rgba(&frame)?;
        self.cursor += 1;
        Ok(ReadOutcome::Frame(decoded))
    }

    fn release(&mut self) {
        self.pending = None;
        self.scaler = None;
        self.decoder = None;
        self.input = None;
    }
}

impl Drop for FfmpegSource {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_ffmpeg_is_idempotent() {
        assert!(init_ffmpeg().is_ok());
        assert!(init_ffmpeg().is_ok());
    }

    #[test]
    fn missing_decoder_is_unsupported_codec() {
        assert_eq!(
            video_error("HEVC", ffmpeg::Error::DecoderNotFound),
            Error::Video(VideoError::UnsupportedCodec("HEVC".into()))
        );
    }

    #[test]
    fn container_errors_map_to_categories() {
        assert_eq!(
            video_error("open", ffmpeg::Error::StreamNotFound),
            Error::Video(VideoError::NoVideoStream)
        );
        assert_eq!(
            video_error("open", ffmpeg::Error::InvalidData),
            Error::Video(VideoError::CorruptedFile)
        );
    }

    #[test]
    fn os_errors_map_to_io() {
        // ENOENT
        let err = video_error("open", ffmpeg::Error::Other { errno: 2 });
        assert!(matches!(err, Error::Video(VideoError::IoError(_))));
    }

    #[test]
    fn other_codes_are_decoding_failures() {
        let err = video_error("Packet send failed", ffmpeg::Error::Eof);
        assert!(matches!(
            err,
            Error::Video(VideoError::DecodingFailed(msg)) if msg.starts_with("Packet send failed")
        ));
    }

    #[test]
    fn opening_missing_file_fails_without_panicking() {
        let result = FfmpegOpener.open(Path::new("/definitely/not/here.avi"));
        assert!(matches!(result, Err(Error::Video(_))));
    }
}
