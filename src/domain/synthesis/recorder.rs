//! Synthesis Context - 可复现记录
//!
//! 每个 (音色组, 片段) 调用对应引擎返回的一条不透明调试记录，
//! 按片段顺序累积，原样转发，不做任何变换。

use serde::{Deserialize, Serialize};

/// 引擎返回的不透明可复现记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DebugRecord(serde_json::Value);

impl DebugRecord {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// 单个音色组的记录累积器
#[derive(Debug, Clone)]
pub struct ReproducibilityRecorder {
    voice_group: String,
    records: Vec<DebugRecord>,
}

impl ReproducibilityRecorder {
    pub fn new(voice_group: impl Into<String>) -> Self {
        Self {
            voice_group: voice_group.into(),
            records: Vec::new(),
        }
    }

    /// 追加下一片段的记录
    pub fn record(&mut self, record: DebugRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 结束累积，交出完整记录
    pub fn finish(self) -> ReproducibilityLog {
        ReproducibilityLog {
            voice_group: self.voice_group,
            records: self.records,
        }
    }
}

/// 一个音色组的完整记录（持久化单元）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReproducibilityLog {
    voice_group: String,
    records: Vec<DebugRecord>,
}

impl ReproducibilityLog {
    pub fn voice_group(&self) -> &str {
        &self.voice_group
    }

    pub fn records(&self) -> &[DebugRecord] {
        &self.records
    }

    /// 序列化为持久化内容：记录数组原样输出
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec_pretty(&self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_keep_order() {
        let mut recorder = ReproducibilityRecorder::new("alice");
        recorder.record(DebugRecord::new(json!({"seed": 1})));
        recorder.record(DebugRecord::new(json!("opaque")));
        assert_eq!(recorder.len(), 2);

        let log = recorder.finish();
        assert_eq!(log.voice_group(), "alice");
        assert_eq!(log.records()[0].as_value(), &json!({"seed": 1}));
        assert_eq!(log.records()[1].as_value(), &json!("opaque"));
    }

    #[test]
    fn test_json_is_verbatim_array() {
        let mut recorder = ReproducibilityRecorder::new("bob&carol");
        recorder.record(DebugRecord::new(json!({"a": [1, 2]})));
        let bytes = recorder.finish().to_json().unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(parsed, json!([{"a": [1, 2]}]));
    }
}
