//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};

/// 引擎内置的随机音色名称（不需要参考音频）
pub const RANDOM_VOICE: &str = "random";

/// 子音色名称
///
/// 不变量: 非空，且不包含分组语法字符 `,` 与 `&`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoiceName(String);

impl VoiceName {
    pub fn new(name: impl Into<String>) -> Result<Self, &'static str> {
        let name = name.into();
        if name.is_empty() {
            return Err("voice name cannot be empty");
        }
        if name.contains([',', '&']) {
            return Err("voice name cannot contain ',' or '&'");
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 是否为引擎的随机音色
    pub fn is_random(&self) -> bool {
        self.0 == RANDOM_VOICE
    }
}

impl std::fmt::Display for VoiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_name_rejects_empty() {
        assert!(VoiceName::new("").is_err());
    }

    #[test]
    fn test_voice_name_rejects_separators() {
        assert!(VoiceName::new("a&b").is_err());
        assert!(VoiceName::new("a,b").is_err());
    }

    #[test]
    fn test_random_voice() {
        assert!(VoiceName::new("random").unwrap().is_random());
        assert!(!VoiceName::new("tom").unwrap().is_random());
    }
}
