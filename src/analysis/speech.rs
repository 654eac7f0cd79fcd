//! Turning synthesized speech into a playable `audio/wav` data URI.
//!
//! Gemini answers with headerless 16-bit PCM (`audio/L16;codec=pcm;rate=24000`),
//! which browsers and players will not open on their own. It is wrapped in a
//! RIFF/WAVE header here. Anything else passes through untouched.

use base64::Engine;

use super::error::AnalysisError;
use crate::llm::MediaPart;
use crate::models::DataUri;

const DEFAULT_SAMPLE_RATE: u32 = 24_000;
const DEFAULT_CHANNELS: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;

/// Raw PCM layout declared by the MIME parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PcmFormat {
    sample_rate: u32,
    channels: u16,
}

/// Parse `audio/L16;codec=pcm;rate=24000` style MIME types. `None` when the
/// audio already has a container.
fn pcm_format(mime_type: &str) -> Option<PcmFormat> {
    let mut params = mime_type.split(';').map(str::trim);
    let essence = params.next()?.to_ascii_lowercase();
    if essence != "audio/l16" && essence != "audio/pcm" {
        return None;
    }

    let mut format = PcmFormat {
        sample_rate: DEFAULT_SAMPLE_RATE,
        channels: DEFAULT_CHANNELS,
    };
    for param in params {
        let Some((key, value)) = param.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "rate" => {
                if let Ok(rate) = value.trim().parse() {
                    format.sample_rate = rate;
                }
            }
            "channels" => {
                if let Ok(channels) = value.trim().parse() {
                    format.channels = channels;
                }
            }
            _ => {}
        }
    }
    Some(format)
}

/// Prefix little-endian PCM samples with a 44-byte WAVE header.
fn wav_bytes(pcm: &[u8], format: PcmFormat) -> Vec<u8> {
    let block_align = format.channels * (BITS_PER_SAMPLE / 8);
    let byte_rate = format.sample_rate * u32::from(block_align);
    let data_len = pcm.len() as u32;

    let mut wav = Vec::with_capacity(44 + pcm.len());
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(36 + data_len).to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&format.channels.to_le_bytes());
    wav.extend_from_slice(&format.sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_len.to_le_bytes());
    wav.extend_from_slice(pcm);
    wav
}

/// Convert synthesized audio into something a player can open directly.
pub(crate) fn playable(audio: MediaPart) -> Result<DataUri, AnalysisError> {
    let Some(format) = pcm_format(&audio.mime_type) else {
        return Ok(DataUri {
            mime_type: audio.mime_type,
            data: audio.data,
        });
    };

    let pcm = base64::engine::general_purpose::STANDARD
        .decode(audio.data.trim())
        .map_err(|e| AnalysisError::Audio(e.to_string()))?;
    if pcm.is_empty() {
        return Err(AnalysisError::Audio("no samples".to_string()));
    }
    Ok(DataUri::from_bytes(&wav_bytes(&pcm, format), "audio/wav"))
}
