//! Audio duration probing
//!
//! Uses symphonia for format-agnostic parsing (MP3, FLAC, WAV, AAC, OGG,
//! etc.). Duration is measured by decoding, not read from container
//! headers, so a truncated or lying header cannot inflate the result.

use std::io::Cursor;

use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use super::types::FileErrorKind;

/// Capability that turns raw audio bytes into a playback length in seconds.
///
/// Fails with `UnsupportedFormat` when the bytes match no known
/// container/codec, and `CorruptAudio` when parsing starts but no duration
/// can be determined. Zero-length input never reaches a probe; the decoder
/// rejects it first as `EmptyPayload`.
pub trait DurationProbe: Send + Sync {
    fn extract_duration(&self, raw: &[u8]) -> Result<f64, FileErrorKind>;
}

/// symphonia-backed probe.
///
/// Demuxes the first decodable track and decodes every packet, reporting
/// `frames / sample_rate`. Sub-second precision is preserved; rounding is
/// the caller's business.
#[derive(Debug, Default)]
pub struct SymphoniaProbe;

impl DurationProbe for SymphoniaProbe {
    fn extract_duration(&self, raw: &[u8]) -> Result<f64, FileErrorKind> {
        let mss = MediaSourceStream::new(Box::new(Cursor::new(raw.to_vec())), Default::default());

        // Payloads arrive nameless, so there is no extension hint to give;
        // content probing alone decides the format.
        let probed = symphonia::default::get_probe()
            .format(
                &Hint::new(),
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|_| FileErrorKind::UnsupportedFormat)?;

        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or(FileErrorKind::UnsupportedFormat)?;

        let track_id = track.id;
        let sample_rate = track
            .codec_params
            .sample_rate
            .ok_or(FileErrorKind::CorruptAudio)?;

        let mut decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|_| FileErrorKind::UnsupportedFormat)?;

        let mut total_frames: u64 = 0;

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    // End of stream
                    break;
                }
                Err(_) => return Err(FileErrorKind::CorruptAudio),
            };

            if packet.track_id() != track_id {
                continue;
            }

            match decoder.decode(&packet) {
                Ok(decoded) => total_frames += decoded.frames() as u64,
                Err(_) => return Err(FileErrorKind::CorruptAudio),
            }
        }

        if total_frames == 0 {
            // Container parsed but carried no decodable audio
            return Err(FileErrorKind::CorruptAudio);
        }

        Ok(total_frames as f64 / sample_rate as f64)
    }
}
