//! Synthesis Commands - 合成运行命令

use std::path::PathBuf;

use crate::application::error::SynthesisError;
use crate::domain::synthesis::SynthesisRequest;

/// 执行一次合成运行
#[derive(Debug, Clone)]
pub struct SynthesizeCommand {
    pub request: SynthesisRequest,
    /// 某个音色组失败后是否继续处理后续音色组
    pub keep_going: bool,
}

impl SynthesizeCommand {
    pub fn new(request: SynthesisRequest) -> Self {
        Self {
            request,
            keep_going: false,
        }
    }

    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }
}

/// 已完成音色组的产物
#[derive(Debug, Clone)]
pub struct GroupReport {
    /// 音色组序号（解析顺序）
    pub index: usize,
    pub label: String,
    /// 按候选序号排列的音频文件
    pub artifacts: Vec<PathBuf>,
    /// 可复现记录文件（未启用时为 None）
    pub debug_artifact: Option<PathBuf>,
    /// 记录条数（= 片段数）
    pub debug_records: usize,
}

/// 失败的音色组
#[derive(Debug)]
pub struct GroupFailure {
    pub index: usize,
    pub label: String,
    pub error: SynthesisError,
}

/// 合成运行结果
#[derive(Debug, Default)]
pub struct SynthesisReport {
    /// 运行清单文件
    pub manifest: Option<PathBuf>,
    /// 片段数
    pub segments: usize,
    /// 已完成并持久化的音色组
    pub completed: Vec<GroupReport>,
    /// 失败的音色组
    pub failures: Vec<GroupFailure>,
    /// 因前序失败而未处理的音色组
    pub skipped: Vec<String>,
}

impl SynthesisReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty() && self.skipped.is_empty()
    }

    /// 所有已写出的音频文件
    pub fn artifacts(&self) -> impl Iterator<Item = &PathBuf> {
        self.completed.iter().flat_map(|g| g.artifacts.iter())
    }

    /// 转为 Result：存在失败时返回第一个错误
    pub fn into_result(mut self) -> Result<Self, SynthesisError> {
        if self.failures.is_empty() {
            return Ok(self);
        }
        Err(self.failures.remove(0).error)
    }
}
