//! Synthesize Handler - 多音色、多候选合成编排
//!
//! 单一控制流：音色组严格串行，组内片段严格串行。
//! 每个音色组在处理下一组之前完成持久化，失败只影响当前组。

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::commands::synthesize_commands::*;
use crate::application::error::SynthesisError;
use crate::application::ports::{
    ArtifactStorePort, ConditioningLoaderPort, EngineError, InferRequest, InferenceEnginePort,
    TextSegmenterPort,
};
use crate::domain::synthesis::{
    assemble, ArtifactName, AssembledCandidate, CandidateMatrix, CandidateRow, EngineOutput,
    ReproducibilityLog, ReproducibilityRecorder, RunManifest, SynthesisRequest, TextSegment,
};
use crate::domain::voice::{VoiceGroup, VoiceSelection};

/// Synthesize Handler - 合成编排器
pub struct SynthesizeHandler {
    segmenter: Arc<dyn TextSegmenterPort>,
    conditioning_loader: Arc<dyn ConditioningLoaderPort>,
    engine: Arc<dyn InferenceEnginePort>,
    artifact_store: Arc<dyn ArtifactStorePort>,
}

impl SynthesizeHandler {
    pub fn new(
        segmenter: Arc<dyn TextSegmenterPort>,
        conditioning_loader: Arc<dyn ConditioningLoaderPort>,
        engine: Arc<dyn InferenceEnginePort>,
        artifact_store: Arc<dyn ArtifactStorePort>,
    ) -> Self {
        Self {
            segmenter,
            conditioning_loader,
            engine,
            artifact_store,
        }
    }

    /// 执行一次合成运行
    ///
    /// 运行级错误（表达式格式、分段、清单写入）直接返回 Err；
    /// 音色组级错误记录在报告的 failures 中。
    pub async fn handle(&self, cmd: SynthesizeCommand) -> Result<SynthesisReport, SynthesisError> {
        let request = &cmd.request;

        // 1. 解析音色选择（格式错误在任何合成开始前终止运行）
        let selection = VoiceSelection::parse(request.voice_expression())?;

        // 2. 分段
        let segments = self.segmenter.segment(request.text());
        if segments.is_empty() {
            return Err(SynthesisError::SegmentationFailure {
                text_chars: request.text().chars().count(),
            });
        }

        tracing::info!(
            voice_groups = selection.len(),
            segments = segments.len(),
            candidates = request.candidates(),
            preset = %request.preset(),
            seed = ?request.seed(),
            "Starting synthesis run"
        );

        // 3. 输出目录与运行清单
        let manifest = RunManifest::new(request, &segments);
        self.artifact_store
            .prepare(request.output_dir())
            .await
            .map_err(|e| SynthesisError::persistence("output directory", e))?;
        let manifest_path = self
            .artifact_store
            .write_manifest(request.output_dir(), &manifest)
            .await
            .map_err(|e| SynthesisError::persistence("run manifest", e))?;

        let mut report = SynthesisReport {
            manifest: Some(manifest_path),
            segments: segments.len(),
            ..Default::default()
        };

        // 4. 逐个音色组处理
        let groups = selection.groups();
        for (index, group) in groups.iter().enumerate() {
            match self.synthesize_group(index, group, &segments, request).await {
                Ok(group_report) => {
                    tracing::info!(
                        voice_group = %group.label(),
                        group_index = index,
                        artifacts = group_report.artifacts.len(),
                        "Voice group completed"
                    );
                    report.completed.push(group_report);
                }
                Err(error) => {
                    tracing::error!(
                        voice_group = %group.label(),
                        group_index = index,
                        error = %error,
                        "Voice group failed"
                    );
                    report.failures.push(GroupFailure {
                        index,
                        label: group.label().to_string(),
                        error,
                    });
                    if !cmd.keep_going {
                        report.skipped = groups[index + 1..]
                            .iter()
                            .map(|g| g.label().to_string())
                            .collect();
                        break;
                    }
                }
            }
        }

        tracing::info!(
            completed = report.completed.len(),
            failed = report.failures.len(),
            skipped = report.skipped.len(),
            "Synthesis run finished"
        );

        Ok(report)
    }

    /// 合成一个音色组：全部片段成功后才拼接并持久化
    async fn synthesize_group(
        &self,
        index: usize,
        group: &VoiceGroup,
        segments: &[TextSegment],
        request: &SynthesisRequest,
    ) -> Result<GroupReport, SynthesisError> {
        let label = group.label();
        let candidates = request.candidates();

        // 加载条件输入（多音色合并由加载器负责）
        let conditioning = self
            .conditioning_loader
            .load(group)
            .await
            .map_err(|e| SynthesisError::conditioning(label, e))?;

        tracing::debug!(
            voice_group = %label,
            clips = conditioning.clips.len(),
            has_latents = conditioning.latents.is_some(),
            "Conditioning loaded"
        );

        // 矩阵与记录在本组完成前由编排器独占
        let mut matrix = CandidateMatrix::new(candidates);
        let mut recorder = ReproducibilityRecorder::new(label);

        for segment in segments {
            let segment_index = segment.index();
            let infer_request = InferRequest {
                segment,
                conditioning: &conditioning,
                candidates,
                preset: request.preset(),
                seed: request.seed(),
                cvvp_amount: request.cvvp_amount(),
            };

            let response = self
                .engine
                .infer(infer_request)
                .await
                .map_err(|e| SynthesisError::synthesis_failed(label, segment_index, e))?;

            if candidates > 1 && matches!(response.output, EngineOutput::SingleWaveform(_)) {
                tracing::warn!(
                    voice_group = %label,
                    segment_index = segment_index,
                    candidates = candidates,
                    "Engine returned a single waveform, only candidate 0 is filled"
                );
            }

            let returned = response.output.waveform_count();
            let row = CandidateRow::normalize(response.output, candidates).map_err(|count| {
                SynthesisError::synthesis_failed(
                    label,
                    segment_index,
                    EngineError::InvalidResponse(format!(
                        "engine returned {} waveforms for {} candidates",
                        count, candidates
                    )),
                )
            })?;

            recorder.record(response.debug_record);
            matrix.push_row(row).map_err(|row| {
                SynthesisError::synthesis_failed(
                    label,
                    segment_index,
                    EngineError::InvalidResponse(format!(
                        "candidate row has width {}, expected {}",
                        row.width(),
                        candidates
                    )),
                )
            })?;

            tracing::debug!(
                voice_group = %label,
                segment_index = segment_index,
                returned = returned,
                "Segment synthesized"
            );
        }

        // 全部片段完成后才移交给拼接器与记录器
        let assembled = assemble(matrix).map_err(|e| SynthesisError::assembly(label, e))?;
        let log = recorder.finish();

        self.persist_group(index, group, assembled, log, request).await
    }

    /// 持久化一个音色组的产物
    ///
    /// 任一写入失败时删除本组已写出的文件，本组不留下部分产物
    async fn persist_group(
        &self,
        index: usize,
        group: &VoiceGroup,
        assembled: Vec<AssembledCandidate>,
        log: ReproducibilityLog,
        request: &SynthesisRequest,
    ) -> Result<GroupReport, SynthesisError> {
        let label = group.label();
        let mut written: Vec<PathBuf> = Vec::with_capacity(assembled.len());

        for candidate in &assembled {
            let name = ArtifactName::candidate(label, index, candidate.candidate, request.candidates());
            match self
                .artifact_store
                .write_audio(request.output_dir(), &name, &candidate.waveform)
                .await
            {
                Ok(path) => {
                    tracing::info!(
                        voice_group = %label,
                        candidate = candidate.candidate,
                        duration_ms = candidate.waveform.duration_ms(),
                        path = %path.display(),
                        "Candidate written"
                    );
                    written.push(path);
                }
                Err(e) => {
                    self.discard(&written).await;
                    return Err(SynthesisError::persistence(label, e));
                }
            }
        }

        let debug_records = log.records().len();
        let debug_artifact = if request.produce_debug_state() {
            match self.artifact_store.write_debug_log(&log).await {
                Ok(path) => Some(path),
                Err(e) => {
                    self.discard(&written).await;
                    return Err(SynthesisError::persistence(label, e));
                }
            }
        } else {
            None
        };

        Ok(GroupReport {
            index,
            label: label.to_string(),
            artifacts: written,
            debug_artifact,
            debug_records,
        })
    }

    /// 尽力删除已写出的产物
    async fn discard(&self, paths: &[PathBuf]) {
        for path in paths {
            if let Err(e) = self.artifact_store.remove(path).await {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove partial artifact");
            }
        }
    }
}
