//! Synthesis Context - 候选矩阵
//!
//! 以 (segment_index, candidate_index) 为索引保存每次推理的波形片段。
//! 列数 K 在创建时固定，行随片段逐个追加；候选身份只由列号决定。

use super::Waveform;

/// 引擎单次调用返回的波形
///
/// K == 1 时引擎可能把列表折叠为单个波形
#[derive(Debug, Clone, PartialEq)]
pub enum EngineOutput {
    /// 单个波形（视为候选 0）
    SingleWaveform(Waveform),
    /// 按候选序号排列的波形列表
    CandidateList(Vec<Waveform>),
}

impl EngineOutput {
    /// 返回的波形个数
    pub fn waveform_count(&self) -> usize {
        match self {
            EngineOutput::SingleWaveform(_) => 1,
            EngineOutput::CandidateList(list) => list.len(),
        }
    }
}

/// 候选行：固定 K 个单元，缺失的候选为 None
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateRow {
    cells: Vec<Option<Waveform>>,
}

impl CandidateRow {
    /// 将引擎输出规范化为 K 个单元
    ///
    /// - 单个波形写入候选 0，其余候选缺失
    /// - 列表按位置写入，位置 j 即候选 j；不足 K 个时尾部候选缺失
    /// - 列表超过 K 个返回 Err（返回的个数）
    pub fn normalize(output: EngineOutput, candidates: usize) -> Result<Self, usize> {
        let mut cells: Vec<Option<Waveform>> = vec![None; candidates];

        match output {
            EngineOutput::SingleWaveform(waveform) => {
                if let Some(first) = cells.first_mut() {
                    *first = Some(waveform);
                }
            }
            EngineOutput::CandidateList(list) => {
                if list.len() > candidates {
                    return Err(list.len());
                }
                for (j, waveform) in list.into_iter().enumerate() {
                    cells[j] = Some(waveform);
                }
            }
        }

        Ok(Self { cells })
    }

    pub fn width(&self) -> usize {
        self.cells.len()
    }

    pub fn get(&self, candidate: usize) -> Option<&Waveform> {
        self.cells.get(candidate).and_then(Option::as_ref)
    }

    /// 存在的候选个数
    pub fn present(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }
}

/// 候选矩阵
///
/// 不变量: 每一行恰好 K 个单元
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateMatrix {
    candidates: usize,
    rows: Vec<CandidateRow>,
}

impl CandidateMatrix {
    pub fn new(candidates: usize) -> Self {
        Self {
            candidates,
            rows: Vec::new(),
        }
    }

    /// 追加下一片段的行
    ///
    /// 行宽必须等于 K，否则返回 Err 并保持矩阵不变
    pub fn push_row(&mut self, row: CandidateRow) -> Result<(), CandidateRow> {
        if row.width() != self.candidates {
            return Err(row);
        }
        self.rows.push(row);
        Ok(())
    }

    /// 列数 K
    pub fn candidates(&self) -> usize {
        self.candidates
    }

    /// 已处理的片段数
    pub fn segments(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[CandidateRow] {
        &self.rows
    }

    pub fn get(&self, segment: usize, candidate: usize) -> Option<&Waveform> {
        self.rows.get(segment).and_then(|row| row.get(candidate))
    }

    /// 候选 j 是否在所有行中都存在
    pub fn is_complete_column(&self, candidate: usize) -> bool {
        !self.rows.is_empty() && self.rows.iter().all(|row| row.get(candidate).is_some())
    }
}
