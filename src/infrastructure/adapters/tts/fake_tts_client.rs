//! Fake TTS Client - 本地调试用的 TTS 客户端
//!
//! 不调用任何外部服务，为每句对白生成一段正弦波 WAV，
//! 时长随文本长度变化，音高随音色变化

use async_trait::async_trait;

use crate::application::ports::{SynthesisRequest, SynthesisResponse, TtsEnginePort, TtsError};
use crate::domain::podcast::AudioFormat;
use crate::infrastructure::adapters::assembler::encode_wav;

/// Fake TTS Client 配置
#[derive(Debug, Clone)]
pub struct FakeTtsClientConfig {
    /// 采样率
    pub sample_rate: u32,
    /// 每个字符对应的时长（毫秒）
    pub ms_per_char: u64,
    /// 单句最短时长（毫秒）
    pub min_duration_ms: u64,
    /// 单句最长时长（毫秒）
    pub max_duration_ms: u64,
}

impl Default for FakeTtsClientConfig {
    fn default() -> Self {
        Self {
            sample_rate: 24000,
            ms_per_char: 60,
            min_duration_ms: 300,
            max_duration_ms: 10_000,
        }
    }
}

/// Fake TTS Client
pub struct FakeTtsClient {
    config: FakeTtsClientConfig,
}

impl FakeTtsClient {
    pub fn new(config: FakeTtsClientConfig) -> Self {
        tracing::info!(sample_rate = config.sample_rate, "FakeTtsClient initialized");
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeTtsClientConfig::default())
    }

    fn duration_ms(&self, text: &str) -> u64 {
        (text.chars().count() as u64 * self.config.ms_per_char)
            .clamp(self.config.min_duration_ms, self.config.max_duration_ms)
    }

    /// 每个音色对应一个固定音高（180-300 Hz）
    fn frequency(voice_name: &str) -> f32 {
        let sum: u32 = voice_name.bytes().map(u32::from).sum();
        180.0 + (sum % 121) as f32
    }
}

#[async_trait]
impl TtsEnginePort for FakeTtsClient {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsError> {
        let duration_ms = self.duration_ms(&request.text);
        let frequency = Self::frequency(&request.voice_name);
        let rate = self.config.sample_rate;
        let frames = (rate as u64 * duration_ms / 1000) as usize;

        tracing::debug!(
            text_len = request.text.len(),
            voice = %request.voice_name,
            duration_ms = duration_ms,
            "FakeTtsClient: returning generated tone"
        );

        let samples: Vec<f32> = (0..frames)
            .map(|i| {
                let t = i as f32 / rate as f32;
                0.2 * (2.0 * std::f32::consts::PI * frequency * t).sin()
            })
            .collect();

        Ok(SynthesisResponse {
            audio_data: encode_wav(&samples, rate, 1),
            format: AudioFormat::Wav,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(text: &str, voice: &str) -> SynthesisRequest {
        SynthesisRequest {
            text: text.to_string(),
            voice_name: voice.to_string(),
            language_code: "fr-FR".to_string(),
        }
    }

    #[tokio::test]
    async fn test_returns_wav_sized_by_text() {
        let client = FakeTtsClient::with_defaults();

        let short = client.synthesize(request("Oui", "fr-FR-Wavenet-C")).await.unwrap();
        let long = client
            .synthesize(request(&"mot ".repeat(20), "fr-FR-Wavenet-C"))
            .await
            .unwrap();

        assert_eq!(short.format, AudioFormat::Wav);
        assert_eq!(&short.audio_data[0..4], b"RIFF");
        // 300 ms @ 24 kHz 单声道 16 位
        assert_eq!(short.audio_data.len(), 44 + 7200 * 2);
        assert!(long.audio_data.len() > short.audio_data.len());
    }

    #[test]
    fn test_voices_get_distinct_pitch() {
        assert_ne!(
            FakeTtsClient::frequency("fr-FR-Wavenet-C"),
            FakeTtsClient::frequency("fr-FR-Wavenet-B")
        );
    }
}
