//! Synthesis Context - 输出命名
//!
//! 音色组序号 k（按解析顺序，从 0 开始）与候选序号 j：
//! - K > 1: `{label}_{k}_{j}`
//! - K == 1: `{label}_{k}`

/// 音频产物名称（不含扩展名）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactName(String);

impl ArtifactName {
    /// 候选音频名称
    pub fn candidate(label: &str, group_index: usize, candidate: usize, candidates: usize) -> Self {
        if candidates > 1 {
            Self(format!("{}_{}_{}", label, group_index, candidate))
        } else {
            Self(format!("{}_{}", label, group_index))
        }
    }

    /// 音色组调试记录名称
    pub fn debug_state(label: &str) -> Self {
        Self(format!("do_tts_debug_{}", label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 追加扩展名得到文件名
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.0, extension)
    }
}

impl std::fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_single_candidate_has_no_suffix() {
        assert_eq!(ArtifactName::candidate("alice", 0, 0, 1).as_str(), "alice_0");
        assert_eq!(ArtifactName::candidate("bob&carol", 1, 0, 1).as_str(), "bob&carol_1");
    }

    #[test]
    fn test_multiple_candidates_are_distinct() {
        let names: HashSet<_> = (0..4)
            .map(|j| ArtifactName::candidate("alice", 2, j, 4))
            .collect();
        assert_eq!(names.len(), 4);
        assert!(names.contains(&ArtifactName::candidate("alice", 2, 3, 4)));
        assert_eq!(ArtifactName::candidate("alice", 2, 3, 4).as_str(), "alice_2_3");
    }

    #[test]
    fn test_debug_state_name() {
        let name = ArtifactName::debug_state("bob&carol");
        assert_eq!(name.file_name("json"), "do_tts_debug_bob&carol.json");
    }
}
