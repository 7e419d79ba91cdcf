use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::TranslateError;

/// Sample rate the speech endpoint renders at
pub const SPEECH_SAMPLE_RATE: u32 = 24_000;

/// Decoded 16-bit PCM speech
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechAudio {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<i16>,
}

impl SpeechAudio {
    /// Interpret raw little-endian 16-bit mono PCM
    pub fn from_pcm16_le(bytes: &[u8], sample_rate: u32) -> Self {
        let samples = bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        Self {
            sample_rate,
            channels: 1,
            samples,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0;
        }
        let frames = self.samples.len() as u64 / self.channels as u64;
        frames * 1000 / self.sample_rate as u64
    }

    /// Encode as a RIFF/WAVE file
    pub fn to_wav(&self) -> Result<Vec<u8>, TranslateError> {
        if self.channels == 0 {
            return Err(TranslateError::InvalidAudio("no channels".to_string()));
        }

        let spec = WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };

        let mut buffer = Cursor::new(Vec::with_capacity(44 + self.samples.len() * 2));
        let mut writer = WavWriter::new(&mut buffer, spec).map_err(invalid_audio)?;
        for sample in &self.samples {
            writer.write_sample(*sample).map_err(invalid_audio)?;
        }
        writer.finalize().map_err(invalid_audio)?;

        Ok(buffer.into_inner())
    }
}

fn invalid_audio(err: hound::Error) -> TranslateError {
    TranslateError::InvalidAudio(err.to_string())
}
