//! 文本分割器
//!
//! 把长文本切成适合模型单次推理的片段：
//! - 原文含显式分隔符时，只按分隔符切分，不做合并
//! - 否则按句子切分，并贪心合并相邻短句，直到接近期望长度；
//!   超过最大长度时在最后一个可断点处强制切分

/// 默认显式分隔符
pub const DEFAULT_DELIMITER: char = '|';

/// 默认期望片段长度（字符）
pub const DEFAULT_DESIRED_LENGTH: usize = 200;

/// 默认最大片段长度（字符）
pub const DEFAULT_MAX_LENGTH: usize = 300;

/// 文本分割配置
#[derive(Debug, Clone)]
pub struct SegmentConfig {
    /// 显式分隔符，None 表示禁用
    pub delimiter: Option<char>,
    /// 合并短句的目标长度
    pub desired_length: usize,
    /// 片段最大长度（模型限制）
    pub max_length: usize,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            delimiter: Some(DEFAULT_DELIMITER),
            desired_length: DEFAULT_DESIRED_LENGTH,
            max_length: DEFAULT_MAX_LENGTH,
        }
    }
}

impl SegmentConfig {
    /// 原文是否使用了显式分隔符
    pub fn uses_delimiter(&self, text: &str) -> bool {
        self.delimiter.map_or(false, |d| text.contains(d))
    }
}

/// 检查是否为句末标点
#[inline]
fn is_sentence_end(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?' | '。' | '！' | '？')
}

/// 检查是否为分句标点（超长时的次选断点）
#[inline]
fn is_clause_delimiter(ch: char) -> bool {
    matches!(ch, ',' | ';' | ':' | '，' | '；' | '：')
}

/// 检查片段是否只包含标点或空白（应被丢弃）
#[inline]
fn is_trivial_segment(s: &str) -> bool {
    s.chars()
        .all(|c| c.is_whitespace() || is_sentence_end(c) || is_clause_delimiter(c))
}

/// 规范化空白与引号
///
/// 换行、制表符折叠为单个空格，弯引号替换为直引号
fn normalize_text(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    let mut last_was_space = false;

    for ch in text.chars() {
        let ch = match ch {
            '\u{201C}' | '\u{201D}' => '"',
            c if c.is_whitespace() => ' ',
            c => c,
        };
        if ch == ' ' {
            if last_was_space {
                continue;
            }
            last_was_space = true;
        } else {
            last_was_space = false;
        }
        normalized.push(ch);
    }

    normalized.trim().to_string()
}

/// 按显式分隔符切分（纯语法，不合并、不修剪）
fn split_on_delimiter(text: &str, delimiter: char) -> Vec<String> {
    text.split(delimiter)
        .filter(|piece| !piece.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// 在最后一个可断点处切开过长的缓冲区
///
/// 断点优先级: 句末标点 > 分句标点 > 空白；都没有时整体作为一段
fn split_at_last_break(buffer: &str) -> (String, String) {
    let mut last_sentence = None;
    let mut last_clause = None;
    let mut last_space = None;

    for (pos, ch) in buffer.char_indices() {
        let after = pos + ch.len_utf8();
        if is_sentence_end(ch) {
            last_sentence = Some(after);
        } else if is_clause_delimiter(ch) {
            last_clause = Some(after);
        } else if ch.is_whitespace() {
            last_space = Some(pos);
        }
    }

    let cut = last_sentence
        .or(last_clause)
        .or(last_space)
        .filter(|&cut| cut > 0 && cut < buffer.len());

    match cut {
        Some(cut) => (
            buffer[..cut].trim().to_string(),
            buffer[cut..].trim_start().to_string(),
        ),
        None => (buffer.trim().to_string(), String::new()),
    }
}

/// 提交缓冲区为一个片段
fn commit(segment: &mut String, count: &mut usize, out: &mut Vec<String>) {
    let trimmed = segment.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
    segment.clear();
    *count = 0;
}

/// 句子感知切分 + 贪心合并
fn split_and_recombine(text: &str, config: &SegmentConfig) -> Vec<String> {
    let text = normalize_text(text);
    let chars: Vec<char> = text.chars().collect();

    let mut segments: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut char_count = 0;
    let mut in_quote = false;

    for (i, &ch) in chars.iter().enumerate() {
        current.push(ch);
        char_count += 1;

        if ch == '"' {
            in_quote = !in_quote;
        }

        // 超长：回退到最后一个断点
        if char_count >= config.max_length {
            let (head, tail) = split_at_last_break(&current);
            if !head.is_empty() {
                segments.push(head);
            }
            char_count = tail.chars().count();
            current = tail;
            continue;
        }

        let next = chars.get(i + 1).copied();
        let at_boundary = next.map_or(true, |c| c.is_whitespace());

        // 句末（引号内的句末不切分；连续句末标点因后随非空白而留在同一片段）
        if is_sentence_end(ch) && at_boundary && !in_quote && char_count >= config.desired_length {
            commit(&mut current, &mut char_count, &mut segments);
        }
    }

    commit(&mut current, &mut char_count, &mut segments);

    segments
}

/// 对文本进行分段
///
/// 返回的片段非空、顺序与原文一致，并过滤只含标点的片段
pub fn segment_text(text: &str, config: &SegmentConfig) -> Vec<String> {
    if let Some(delimiter) = config.delimiter {
        if text.contains(delimiter) {
            return split_on_delimiter(text, delimiter);
        }
    }

    split_and_recombine(text, config)
        .into_iter()
        .filter(|s| !is_trivial_segment(s))
        .collect()
}
