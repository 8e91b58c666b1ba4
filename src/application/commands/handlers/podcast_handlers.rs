//! Podcast Command Handlers
//!
//! 流水线编排：提取 → 生成 → 解析 → 逐句合成 → 合并 → 清理。
//! 所有外部调用严格顺序执行，任一步失败即终止本次任务，
//! 但已经生成的中间片段总会被清理。

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Local;

use crate::application::commands::{GeneratePodcast, PodcastOutcome};
use crate::application::error::PipelineError;
use crate::application::ports::{
    AssembledAudio, AudioAssemblerPort, DialogueGeneratorPort, SegmentStoragePort,
    SynthesisRequest, TextExtractorPort, TtsEnginePort,
};
use crate::domain::dialogue::{build_dialogue_prompt, parse_dialogue, SpeakerRoster, Utterance};
use crate::domain::podcast::{podcast_file_name, segment_file_name, AudioSegment, RunToken};

/// 编排器的静态配置（进程启动时确定）
#[derive(Debug, Clone)]
pub struct PodcastSettings {
    pub roster: SpeakerRoster,
    pub language_code: String,
    /// 合并产物输出目录
    pub podcast_dir: PathBuf,
}

/// GeneratePodcast Handler - 播客生成流水线
pub struct GeneratePodcastHandler {
    extractor: Arc<dyn TextExtractorPort>,
    generator: Arc<dyn DialogueGeneratorPort>,
    tts_engine: Arc<dyn TtsEnginePort>,
    segment_storage: Arc<dyn SegmentStoragePort>,
    assembler: Arc<dyn AudioAssemblerPort>,
    settings: PodcastSettings,
}

impl GeneratePodcastHandler {
    pub fn new(
        extractor: Arc<dyn TextExtractorPort>,
        generator: Arc<dyn DialogueGeneratorPort>,
        tts_engine: Arc<dyn TtsEnginePort>,
        segment_storage: Arc<dyn SegmentStoragePort>,
        assembler: Arc<dyn AudioAssemblerPort>,
        settings: PodcastSettings,
    ) -> Self {
        Self {
            extractor,
            generator,
            tts_engine,
            segment_storage,
            assembler,
            settings,
        }
    }

    pub fn settings(&self) -> &PodcastSettings {
        &self.settings
    }

    pub async fn handle(&self, cmd: GeneratePodcast) -> Result<PodcastOutcome, PipelineError> {
        let run = RunToken::new();
        tracing::info!(
            run_id = %run,
            document = %cmd.document_path.display(),
            "Podcast generation started"
        );

        // 1. 提取文本，失败则不调用生成模型
        let extracted = self.extract_text(&run, &cmd.document_path).await?;

        // 2. 生成对白
        let prompt = build_dialogue_prompt(&extracted, &self.settings.roster);
        let dialogue_text = self.generator.generate(&prompt).await.map_err(|e| {
            tracing::error!(run_id = %run, error = %e, "Dialogue generation failed");
            PipelineError::from(e)
        })?;

        // 3. 解析
        let parsed = parse_dialogue(&dialogue_text, &self.settings.roster);
        tracing::info!(
            run_id = %run,
            utterances = parsed.len(),
            skipped_lines = parsed.skipped_lines(),
            "Dialogue parsed"
        );
        if parsed.is_empty() {
            tracing::warn!(
                run_id = %run,
                dialogue_len = dialogue_text.len(),
                "Generated dialogue contains no recognized speaker lines"
            );
        }

        // 4. 逐句合成；5. 合成全部成功才合并
        let mut segments = Vec::with_capacity(parsed.len());
        let assembled = match self
            .synthesize_all(&run, parsed.utterances(), &mut segments)
            .await
        {
            Ok(()) => self.assemble(&run, &segments).await,
            Err(e) => Err(e),
        };

        // 6. 无条件清理中间片段
        self.cleanup(&run, &segments).await;

        let assembled = assembled?;

        tracing::info!(
            run_id = %run,
            podcast = %assembled.artifact.filename(),
            duration_ms = assembled.duration_ms,
            "Podcast generation completed"
        );

        Ok(PodcastOutcome {
            dialogue_text,
            podcast_filename: assembled.artifact.filename().to_string(),
            utterance_count: parsed.len(),
            duration_ms: assembled.duration_ms,
        })
    }

    async fn extract_text(&self, run: &RunToken, path: &Path) -> Result<String, PipelineError> {
        match self.extractor.extract(path).await {
            Ok(text) if !text.trim().is_empty() => {
                tracing::debug!(run_id = %run, chars = text.chars().count(), "Text extracted");
                Ok(text)
            }
            Ok(_) => {
                tracing::warn!(run_id = %run, "Extractor returned no text");
                Err(PipelineError::extraction("no text found in document"))
            }
            Err(e) => {
                tracing::error!(run_id = %run, error = %e, "Text extraction failed");
                Err(PipelineError::extraction(e.to_string()))
            }
        }
    }

    /// 按序号顺序逐句合成，遇到第一个失败立即返回
    ///
    /// 已写入的片段保留在 `segments` 中供调用方清理
    async fn synthesize_all(
        &self,
        run: &RunToken,
        utterances: &[Utterance],
        segments: &mut Vec<AudioSegment>,
    ) -> Result<(), PipelineError> {
        for utterance in utterances {
            let speaker = self.settings.roster.get(utterance.speaker());
            if utterance.text().is_empty() {
                tracing::error!(
                    run_id = %run,
                    ordinal = utterance.ordinal(),
                    speaker = %speaker.label(),
                    "Utterance has no text to synthesize"
                );
                return Err(PipelineError::synthesis(
                    utterance.ordinal(),
                    format!("{} has an empty reply", speaker.label()),
                ));
            }

            let request = SynthesisRequest {
                text: utterance.text().to_string(),
                voice_name: speaker.voice_name().to_string(),
                language_code: self.settings.language_code.clone(),
            };

            let response = self.tts_engine.synthesize(request).await.map_err(|e| {
                tracing::error!(
                    run_id = %run,
                    ordinal = utterance.ordinal(),
                    speaker = %speaker.label(),
                    error = %e,
                    "Speech synthesis failed"
                );
                PipelineError::synthesis(utterance.ordinal(), e.to_string())
            })?;

            let file_name = segment_file_name(
                run,
                &speaker.file_stem(),
                utterance.ordinal(),
                response.format,
            );
            let path = self
                .segment_storage
                .save_segment(&file_name, &response.audio_data)
                .await?;

            tracing::debug!(
                run_id = %run,
                ordinal = utterance.ordinal(),
                speaker = %speaker.label(),
                path = %path.display(),
                size = response.audio_data.len(),
                "Segment synthesized"
            );

            segments.push(AudioSegment::new(utterance.ordinal(), utterance.speaker(), path));
        }

        Ok(())
    }

    async fn assemble(
        &self,
        run: &RunToken,
        segments: &[AudioSegment],
    ) -> Result<AssembledAudio, PipelineError> {
        let filename = podcast_file_name(&Local::now(), run);
        let output_path = self.settings.podcast_dir.join(filename);

        let assembled = self
            .assembler
            .assemble(segments, &output_path)
            .await
            .map_err(|e| {
                tracing::error!(run_id = %run, error = %e, "Audio assembly failed");
                PipelineError::from(e)
            })?;

        if !assembled.skipped_ordinals.is_empty() {
            tracing::warn!(
                run_id = %run,
                skipped = ?assembled.skipped_ordinals,
                "Some segments could not be decoded and were left out"
            );
        }

        Ok(assembled)
    }

    /// 尽力删除中间片段，失败只记录日志
    async fn cleanup(&self, run: &RunToken, segments: &[AudioSegment]) {
        for segment in segments {
            match self.segment_storage.delete_segment(segment.artifact_path()).await {
                Ok(()) => tracing::debug!(
                    run_id = %run,
                    path = %segment.artifact_path().display(),
                    "Deleted segment"
                ),
                Err(e) => tracing::warn!(
                    run_id = %run,
                    path = %segment.artifact_path().display(),
                    error = %e,
                    "Failed to delete segment"
                ),
            }
        }
    }
}
