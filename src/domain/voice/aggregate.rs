//! Voice Context - Voice Group

use serde::{Deserialize, Serialize};

use super::VoiceName;

/// 音色组
///
/// 一个或多个子音色合并为一个条件输入源。
///
/// 不变量:
/// - 至少包含一个子音色
/// - 子音色保持表达式中的顺序，不去重
/// - label 由子音色名称以 `&` 连接而成，用于输出命名
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceGroup {
    voices: Vec<VoiceName>,
    label: String,
}

impl VoiceGroup {
    /// 由子音色列表创建音色组
    pub fn new(voices: Vec<VoiceName>) -> Result<Self, &'static str> {
        if voices.is_empty() {
            return Err("voice group must contain at least one voice");
        }
        let label = voices
            .iter()
            .map(VoiceName::as_str)
            .collect::<Vec<_>>()
            .join("&");
        Ok(Self { voices, label })
    }

    /// 单音色组
    pub fn single(voice: VoiceName) -> Self {
        let label = voice.as_str().to_string();
        Self {
            voices: vec![voice],
            label,
        }
    }

    pub fn voices(&self) -> &[VoiceName] {
        &self.voices
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// 是否需要合并多个子音色
    pub fn is_merged(&self) -> bool {
        self.voices.len() > 1
    }
}

impl std::fmt::Display for VoiceGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> VoiceName {
        VoiceName::new(s).unwrap()
    }

    #[test]
    fn test_label_joins_voices() {
        let group = VoiceGroup::new(vec![name("bob"), name("carol")]).unwrap();
        assert_eq!(group.label(), "bob&carol");
        assert!(group.is_merged());
    }

    #[test]
    fn test_empty_group_rejected() {
        assert!(VoiceGroup::new(Vec::new()).is_err());
    }

    #[test]
    fn test_single_group() {
        let group = VoiceGroup::single(name("alice"));
        assert_eq!(group.label(), "alice");
        assert_eq!(group.voices().len(), 1);
        assert!(!group.is_merged());
    }
}
