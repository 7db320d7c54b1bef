//! Voice Context - 音色选择表达式解析
//!
//! 语法: `,` 分隔相互独立的音色组，组内 `&` 连接需要合并的子音色。
//! 例如 `alice,bob&carol` 解析为 `[{alice}, {bob, carol}]`。

use super::{VoiceError, VoiceGroup, VoiceName};

/// 组分隔符
pub const GROUP_SEPARATOR: char = ',';

/// 组内合并符
pub const MERGE_SEPARATOR: char = '&';

/// 解析后的音色选择
///
/// 不变量: 至少一个音色组，顺序与表达式一致
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceSelection {
    expression: String,
    groups: Vec<VoiceGroup>,
}

impl VoiceSelection {
    /// 解析音色选择表达式
    ///
    /// 纯语法拆分，不去重。子音色名称两侧空白会被去除，
    /// 去除后为空即视为表达式格式错误。
    pub fn parse(expression: &str) -> Result<Self, VoiceError> {
        let mut groups = Vec::new();

        for (group_index, raw_group) in expression.split(GROUP_SEPARATOR).enumerate() {
            let mut voices = Vec::new();
            for raw_voice in raw_group.split(MERGE_SEPARATOR) {
                let trimmed = raw_voice.trim();
                if trimmed.is_empty() {
                    return Err(VoiceError::malformed(
                        expression,
                        format!("empty voice name in group {}", group_index),
                    ));
                }
                let name = VoiceName::new(trimmed)
                    .map_err(|e| VoiceError::InvalidName(format!("{}: {}", trimmed, e)))?;
                voices.push(name);
            }

            let group = VoiceGroup::new(voices)
                .map_err(|e| VoiceError::malformed(expression, e))?;
            groups.push(group);
        }

        Ok(Self {
            expression: expression.to_string(),
            groups,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn groups(&self) -> &[VoiceGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl std::str::FromStr for VoiceSelection {
    type Err = VoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
