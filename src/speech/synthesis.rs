//! Speech synthesis: TTS round trip, PCM decode, and playback
//!
//! The generative API returns base64-encoded 16-bit little-endian PCM at
//! 24 kHz mono. Decoded samples go to a freshly created [`AudioSink`] per
//! call; concurrent calls may overlap audibly and are not serialized.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use base64::Engine as _;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, StreamConfig};

use crate::generate::{GenerateContentRequest, GenerationClient, GenerationConfig};
use crate::{Error, Result};

/// Sample rate of the TTS payload (mono)
pub const TTS_SAMPLE_RATE: u32 = 24_000;

/// Delivery instruction prepended to every spoken text
const SPEAK_PREFIX: &str = "Say this with a clear, calm voice: ";

/// Narrow capability interface over the platform audio output
pub trait AudioSink: Send {
    /// Play the samples immediately
    ///
    /// # Errors
    ///
    /// Returns error if the output device rejects the stream.
    fn play(&self, samples: &[f32], sample_rate: u32) -> Result<()>;
}

/// Builds a fresh sink for each playback
pub type SinkFactory = Box<dyn Fn() -> Result<Box<dyn AudioSink>> + Send + Sync>;

/// Synthesizes speech and plays it through an audio sink
pub struct Speaker {
    client: GenerationClient,
    sink_factory: SinkFactory,
}

impl Speaker {
    /// Create a speaker playing through the default output device
    #[must_use]
    pub fn new(client: GenerationClient) -> Self {
        Self::with_sink_factory(
            client,
            Box::new(|| Ok(Box::new(CpalSink::new()?) as Box<dyn AudioSink>)),
        )
    }

    /// Create a speaker with a custom sink factory
    ///
    /// A fresh sink is created per `speak` call, so overlapping calls get
    /// independent outputs.
    #[must_use]
    pub fn with_sink_factory(client: GenerationClient, sink_factory: SinkFactory) -> Self {
        Self {
            client,
            sink_factory,
        }
    }

    /// Speak the text, swallowing any failure
    ///
    /// Fire-and-forget from the caller's perspective: failures are logged
    /// and produce no audible fallback.
    pub async fn speak(&self, text: &str) {
        if let Err(e) = self.try_speak(text).await {
            tracing::error!(error = %e, "text-to-speech failed");
        }
    }

    async fn try_speak(&self, text: &str) -> Result<()> {
        let samples = self.synthesize(text).await?;
        let sink = (self.sink_factory)()?;
        sink.play(&samples, TTS_SAMPLE_RATE)
    }

    /// Request audio for the text and decode it to f32 samples
    ///
    /// # Errors
    ///
    /// Returns error on transport failure or an empty/undecodable payload.
    pub async fn synthesize(&self, text: &str) -> Result<Vec<f32>> {
        let tts = &self.client.config().tts;

        let mut request = GenerateContentRequest::prompt(&format!("{SPEAK_PREFIX}{text}"));
        request.generation_config = Some(GenerationConfig {
            response_modalities: Some(vec!["AUDIO".to_string()]),
            speech_config: Some(serde_json::json!({
                "voiceConfig": { "prebuiltVoiceConfig": { "voiceName": tts.voice } }
            })),
            ..GenerationConfig::default()
        });

        let inline = self
            .client
            .post_generate(&tts.model, &request)
            .await?
            .into_inline_data()?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(inline.data)
            .map_err(|e| Error::Tts(format!("invalid base64 audio payload: {e}")))?;

        let samples = decode_pcm16(&bytes);
        if samples.is_empty() {
            return Err(Error::Tts("empty audio payload".to_string()));
        }

        tracing::debug!(
            samples = samples.len(),
            mime = inline.mime_type.as_deref().unwrap_or("unknown"),
            "audio decoded"
        );
        Ok(samples)
    }
}

/// Decode 16-bit little-endian PCM to normalized f32 samples in [-1, 1]
///
/// A trailing odd byte is ignored.
#[must_use]
pub fn decode_pcm16(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(2)
        .map(|pair| f32::from(i16::from_le_bytes([pair[0], pair[1]])) / 32768.0)
        .collect()
}

/// Encode f32 samples as mono 16-bit WAV bytes
///
/// # Errors
///
/// Returns error if WAV encoding fails.
pub fn samples_to_wav(samples: &[f32], sample_rate: u32) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = std::io::Cursor::new(Vec::new());
    {
        let mut writer =
            hound::WavWriter::new(&mut cursor, spec).map_err(|e| Error::Audio(e.to_string()))?;

        for &sample in samples {
            #[allow(clippy::cast_possible_truncation)]
            let sample_i16 = (sample * 32767.0).clamp(-32768.0, 32767.0) as i16;
            writer
                .write_sample(sample_i16)
                .map_err(|e| Error::Audio(e.to_string()))?;
        }

        writer.finalize().map_err(|e| Error::Audio(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}

/// Plays through the default cpal output device
pub struct CpalSink {
    config: StreamConfig,
}

impl CpalSink {
    /// Open the default output device at the TTS sample rate
    ///
    /// # Errors
    ///
    /// Returns error if no suitable output device or config exists.
    pub fn new() -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Audio("no output device available".to_string()))?;

        let supported = device
            .supported_output_configs()
            .map_err(|e| Error::Audio(e.to_string()))?
            .find(|c| {
                (c.channels() == 1 || c.channels() == 2)
                    && c.min_sample_rate() <= SampleRate(TTS_SAMPLE_RATE)
                    && c.max_sample_rate() >= SampleRate(TTS_SAMPLE_RATE)
            })
            .ok_or_else(|| Error::Audio("no suitable output config found".to_string()))?;

        let config = supported.with_sample_rate(SampleRate(TTS_SAMPLE_RATE)).config();

        tracing::debug!(
            device = device.name().unwrap_or_default(),
            channels = config.channels,
            "audio sink opened"
        );

        Ok(Self { config })
    }
}

impl AudioSink for CpalSink {
    fn play(&self, samples: &[f32], sample_rate: u32) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| Error::Audio("no output device".to_string()))?;

        let config = self.config.clone();
        let channels = config.channels as usize;

        let buffer: Arc<[f32]> = Arc::from(samples);
        let position = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicBool::new(false));

        let cb_buffer = Arc::clone(&buffer);
        let cb_position = Arc::clone(&position);
        let cb_finished = Arc::clone(&finished);

        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let mut pos = cb_position.load(Ordering::Relaxed);
                    for frame in data.chunks_mut(channels) {
                        let sample = if pos < cb_buffer.len() {
                            let s = cb_buffer[pos];
                            pos += 1;
                            s
                        } else {
                            cb_finished.store(true, Ordering::Relaxed);
                            0.0
                        };
                        for out in frame.iter_mut() {
                            *out = sample;
                        }
                    }
                    cb_position.store(pos, Ordering::Relaxed);
                },
                |err| {
                    tracing::error!(error = %err, "audio playback error");
                },
                None,
            )
            .map_err(|e| Error::Audio(e.to_string()))?;

        stream.play().map_err(|e| Error::Audio(e.to_string()))?;

        let duration_ms = (samples.len() as u64 * 1000) / u64::from(sample_rate);
        let deadline = std::time::Instant::now() + std::time::Duration::from_millis(duration_ms + 500);

        while !finished.load(Ordering::Relaxed) {
            if std::time::Instant::now() > deadline {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(50));
        }

        drop(stream);
        tracing::debug!(samples = samples.len(), "playback complete");
        Ok(())
    }
}
