//! WAV Assembler - 基于 symphonia 的片段拼接器
//!
//! 支持：
//! - MP3 / WAV 片段解码为 PCM
//! - 采样率与声道数对齐（以第一个成功解码的片段为准）
//! - 16 位 PCM WAV 输出

use async_trait::async_trait;
use std::io::Cursor;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{AssembleError, AssembledAudio, AudioAssemblerPort};
use crate::domain::podcast::{AudioSegment, MergedArtifact};

/// 没有任何片段时输出文件使用的采样率
pub const DEFAULT_SAMPLE_RATE: u32 = 24000;

/// WAV 拼接器
pub struct WavAssembler {
    /// 空输出时的采样率
    fallback_sample_rate: u32,
}

impl WavAssembler {
    pub fn new(fallback_sample_rate: u32) -> Self {
        Self {
            fallback_sample_rate,
        }
    }
}

impl Default for WavAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

/// 解码后的 PCM（交错 f32）
#[derive(Debug)]
struct DecodedAudio {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u8,
}

/// 拼接缓冲区
#[derive(Debug)]
struct PcmBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u8,
}

impl PcmBuffer {
    fn duration_ms(&self) -> u64 {
        if self.sample_rate == 0 || self.channels == 0 {
            return 0;
        }
        (self.samples.len() as u64 * 1000) / (self.sample_rate as u64 * self.channels as u64)
    }

    /// 追加一个片段，必要时先转换声道和采样率
    fn append(&mut self, decoded: DecodedAudio) {
        let remixed = remix_channels(&decoded.samples, decoded.channels, self.channels);
        let resampled = resample(&remixed, decoded.sample_rate, self.sample_rate, self.channels);
        self.samples.extend(resampled);
    }
}

/// 使用 symphonia 解码音频数据获取 PCM
fn decode_to_pcm(data: Vec<u8>, extension: Option<&str>) -> Result<DecodedAudio, String> {
    let cursor = Cursor::new(data);
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let opened = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| format!("Probe failed: {}", e))?;

    let mut format = opened.format;

    let track = format
        .default_track()
        .ok_or_else(|| "No audio track found".to_string())?;

    let mut sample_rate = track.codec_params.sample_rate;
    let mut channels = track.codec_params.channels.map(|c| c.count() as u8);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| format!("Decoder creation failed: {}", e))?;

    let mut samples: Vec<f32> = Vec::new();
    let track_id = track.id;

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => return Err(format!("Packet read error: {}", e)),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(e)) => {
                tracing::warn!("Decode error (skipping packet): {}", e);
                continue;
            }
            Err(e) => return Err(format!("Decode failed: {}", e)),
        };

        let spec = *decoded.spec();
        // MP3 的采样率和声道数可能要到第一帧才能确定
        sample_rate.get_or_insert(spec.rate);
        channels.get_or_insert(spec.channels.count() as u8);

        let num_frames = decoded.frames();
        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        let actual_samples = num_frames * spec.channels.count();
        samples.extend(&sample_buf.samples()[..actual_samples]);
    }

    let sample_rate = sample_rate.ok_or_else(|| "Unknown sample rate".to_string())?;
    let channels = channels
        .filter(|c| *c > 0)
        .ok_or_else(|| "Unknown channel count".to_string())?;

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

/// 声道转换：多声道→单声道取平均，单声道→多声道复制
fn remix_channels(samples: &[f32], from: u8, to: u8) -> Vec<f32> {
    if from == to {
        return samples.to_vec();
    }

    let from = from as usize;
    let to = to as usize;
    let mut out = Vec::with_capacity(samples.len() / from * to);

    for frame in samples.chunks_exact(from) {
        if to == 1 {
            out.push(frame.iter().sum::<f32>() / from as f32);
        } else if from == 1 {
            out.extend(std::iter::repeat(frame[0]).take(to));
        } else {
            for ch in 0..to {
                out.push(frame.get(ch).copied().unwrap_or(0.0));
            }
        }
    }

    out
}

/// 简单线性重采样
fn resample(samples: &[f32], from_rate: u32, to_rate: u32, channels: u8) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let channel_count = channels as usize;
    let frame_count = samples.len() / channel_count;
    let new_frame_count = (frame_count as f64 * ratio) as usize;
    let mut resampled = Vec::with_capacity(new_frame_count * channel_count);

    for i in 0..new_frame_count {
        let src_pos = i as f64 / ratio;
        let src_idx = src_pos as usize;
        let frac = src_pos - src_idx as f64;

        for ch in 0..channel_count {
            let idx0 = src_idx * channel_count + ch;
            let idx1 = ((src_idx + 1).min(frame_count - 1)) * channel_count + ch;

            let s0 = samples.get(idx0).copied().unwrap_or(0.0);
            let s1 = samples.get(idx1).copied().unwrap_or(s0);

            // 线性插值
            resampled.push(s0 + (s1 - s0) * frac as f32);
        }
    }

    resampled
}

/// WAV data 块长度（字节）
///
/// RIFF 头只有 32 位长度字段，超出时返回 EncodingError
fn wav_data_size(sample_count: usize) -> Result<u32, AssembleError> {
    sample_count
        .checked_mul(2)
        .and_then(|n| u32::try_from(n).ok())
        .filter(|n| *n <= u32::MAX - 36)
        .ok_or_else(|| {
            AssembleError::EncodingError(format!(
                "{} samples exceed the 4 GiB WAV limit",
                sample_count
            ))
        })
}

/// 将交错的 f32 样本编码为 16 位 PCM WAV
///
/// 调用方需保证样本数没有超过 WAV 的长度上限
pub fn encode_wav(samples: &[f32], sample_rate: u32, channels: u8) -> Vec<u8> {
    let bits_per_sample: u16 = 16;
    let num_channels = channels as u16;
    let byte_rate = sample_rate * num_channels as u32 * (bits_per_sample / 8) as u32;
    let block_align = num_channels * (bits_per_sample / 8);

    let data_size = samples.len() * 2;
    let file_size = 36 + data_size;

    let mut wav = Vec::with_capacity(44 + data_size);

    // RIFF header
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&(file_size as u32).to_le_bytes());
    wav.extend_from_slice(b"WAVE");

    // fmt chunk
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes()); // chunk size
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM format
    wav.extend_from_slice(&num_channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&(data_size as u32).to_le_bytes());

    for &s in samples {
        let sample = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
        wav.extend_from_slice(&sample.to_le_bytes());
    }

    wav
}

#[async_trait]
impl AudioAssemblerPort for WavAssembler {
    async fn assemble(
        &self,
        segments: &[AudioSegment],
        output_path: &Path,
    ) -> Result<AssembledAudio, AssembleError> {
        let mut buffer: Option<PcmBuffer> = None;
        let mut merged_ordinals = Vec::with_capacity(segments.len());
        let mut skipped_ordinals = Vec::new();

        for segment in segments {
            let path = segment.artifact_path();

            let data = match tokio::fs::read(path).await {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!(
                        ordinal = segment.ordinal(),
                        path = %path.display(),
                        error = %e,
                        "Failed to read segment, skipping"
                    );
                    skipped_ordinals.push(segment.ordinal());
                    continue;
                }
            };

            let extension = segment.format().map(|f| f.extension());
            let decoded = match decode_to_pcm(data, extension) {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!(
                        ordinal = segment.ordinal(),
                        path = %path.display(),
                        error = %e,
                        "Failed to decode segment, skipping"
                    );
                    skipped_ordinals.push(segment.ordinal());
                    continue;
                }
            };

            match buffer.as_mut() {
                Some(buf) => buf.append(decoded),
                None => {
                    buffer = Some(PcmBuffer {
                        samples: decoded.samples,
                        sample_rate: decoded.sample_rate,
                        channels: decoded.channels,
                    })
                }
            }
            merged_ordinals.push(segment.ordinal());
        }

        let buffer = buffer.unwrap_or_else(|| PcmBuffer {
            samples: Vec::new(),
            sample_rate: self.fallback_sample_rate,
            channels: 1,
        });

        wav_data_size(buffer.samples.len())?;
        let wav = encode_wav(&buffer.samples, buffer.sample_rate, buffer.channels);
        tokio::fs::write(output_path, &wav)
            .await
            .map_err(|e| AssembleError::IoError(format!("{}: {}", output_path.display(), e)))?;

        tracing::info!(
            path = %output_path.display(),
            merged = merged_ordinals.len(),
            skipped = skipped_ordinals.len(),
            duration_ms = buffer.duration_ms(),
            size = wav.len(),
            "Merged audio exported"
        );

        Ok(AssembledAudio {
            artifact: MergedArtifact::from_path(output_path.to_path_buf()),
            merged_ordinals,
            skipped_ordinals,
            duration_ms: buffer.duration_ms(),
            sample_rate: buffer.sample_rate,
            channels: buffer.channels,
        })
    }
}
