//! Shared integration-test fixtures

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io::Cursor;

/// Build an in-memory mono 16-bit WAV lasting `seconds` at `sample_rate` Hz.
///
/// The duration is exact (`frames / sample_rate`), so probe results can be
/// asserted against it without tolerance games.
pub fn wav_bytes(sample_rate: u32, seconds: f64) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        let total_frames = (sample_rate as f64 * seconds).round() as u32;
        for n in 0..total_frames {
            // 440 Hz tone at half amplitude
            let t = n as f32 / sample_rate as f32;
            let sample = (t * 440.0 * 2.0 * std::f32::consts::PI).sin();
            writer
                .write_sample((sample * i16::MAX as f32 * 0.5) as i16)
                .unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// Base64 of a WAV fixture, ready for a request payload
pub fn wav_base64(sample_rate: u32, seconds: f64) -> String {
    STANDARD.encode(wav_bytes(sample_rate, seconds))
}

/// Base64 of bytes that are not audio in any format
pub fn junk_base64() -> String {
    STANDARD.encode(b"these bytes are not any audio container")
}
