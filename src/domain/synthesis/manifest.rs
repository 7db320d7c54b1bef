//! Synthesis Context - 运行清单
//!
//! 在合成开始前记录请求与分段结果，用于复现整次运行

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{SynthesisRequest, TextSegment};

/// 运行清单
#[derive(Debug, Clone, Serialize)]
pub struct RunManifest {
    pub run_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub segments: Vec<String>,
    pub request: SynthesisRequest,
}

impl RunManifest {
    pub fn new(request: &SynthesisRequest, segments: &[TextSegment]) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            created_at: Utc::now(),
            segments: segments.iter().map(|s| s.content().to_string()).collect(),
            request: request.clone(),
        }
    }

    /// 清单文件名（不含扩展名）
    pub fn name(&self) -> String {
        format!("run_{}", self.run_id)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::synthesis::{index_segments, MAX_SEED};

    #[test]
    fn test_manifest_toml() {
        let request = SynthesisRequest::builder("A.| B.", "alice")
            .candidates(2)
            .seed(Some(42))
            .build()
            .unwrap();
        let segments = index_segments(vec!["A.", " B."]);
        let manifest = RunManifest::new(&request, &segments);

        let text = manifest.to_toml().unwrap();
        assert!(text.contains("voice_expression = \"alice\""));
        assert!(text.contains("seed = 42"));
        assert!(text.contains("preset = \"fast\""));
        assert!(manifest.name().starts_with("run_"));
    }

    #[test]
    fn test_manifest_accepts_largest_seed() {
        let request = SynthesisRequest::builder("Hello.", "alice")
            .seed(Some(MAX_SEED))
            .build()
            .unwrap();
        let manifest = RunManifest::new(&request, &index_segments(vec!["Hello."]));

        let text = manifest.to_toml().unwrap();
        assert!(text.contains(&format!("seed = {}", MAX_SEED)));
    }

    #[test]
    fn test_manifest_without_seed() {
        let request = SynthesisRequest::builder("Hello.", "random").build().unwrap();
        let manifest = RunManifest::new(&request, &index_segments(vec!["Hello."]));
        let text = manifest.to_toml().unwrap();
        assert!(!text.contains("seed"));
    }
}
