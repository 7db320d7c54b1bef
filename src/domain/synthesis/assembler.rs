//! Synthesis Context - 候选拼接
//!
//! 对每个候选序号 j，按片段顺序把 matrix[0][j] .. matrix[N-1][j]
//! 沿时间轴直接拼接（无淡入淡出、无静音插入）。
//! 任一片段缺失该候选时整个候选被省略，不做填充。

use thiserror::Error;

use super::{CandidateMatrix, Waveform};

/// 拼接错误
#[derive(Debug, Error, PartialEq)]
pub enum AssemblyError {
    #[error("Candidate {candidate}: segment {segment} has sample rate {found}, expected {expected}")]
    SampleRateMismatch {
        candidate: usize,
        segment: usize,
        expected: u32,
        found: u32,
    },
}

/// 拼接完成的候选
#[derive(Debug, Clone, PartialEq)]
pub struct AssembledCandidate {
    /// 候选序号（矩阵列号）
    pub candidate: usize,
    pub waveform: Waveform,
}

/// 拼接候选矩阵
///
/// 获取矩阵所有权：矩阵在最后一个片段完成后不再被修改
pub fn assemble(matrix: CandidateMatrix) -> Result<Vec<AssembledCandidate>, AssemblyError> {
    let mut assembled = Vec::with_capacity(matrix.candidates());

    for candidate in 0..matrix.candidates() {
        if !matrix.is_complete_column(candidate) {
            tracing::debug!(
                candidate = candidate,
                segments = matrix.segments(),
                "Candidate missing in at least one segment, omitted"
            );
            continue;
        }

        let mut combined: Option<Waveform> = None;
        for (segment, row) in matrix.rows().iter().enumerate() {
            let Some(chunk) = row.get(candidate) else {
                continue;
            };
            match combined.as_mut() {
                None => combined = Some(chunk.clone()),
                Some(acc) => {
                    if acc.sample_rate() != chunk.sample_rate() {
                        return Err(AssemblyError::SampleRateMismatch {
                            candidate,
                            segment,
                            expected: acc.sample_rate(),
                            found: chunk.sample_rate(),
                        });
                    }
                    acc.append(chunk);
                }
            }
        }

        if let Some(waveform) = combined {
            assembled.push(AssembledCandidate {
                candidate,
                waveform,
            });
        }
    }

    Ok(assembled)
}
