//! 词典打分器
//!
//! 把一条标题文本转成有界情绪分数：加权关键词计数，
//! 支持否定词反转、程度词加强和发布时间的时近衰减。

use crate::types::ScoredHeadline;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::collections::HashMap;

/// 看多关键词及强度权重（1-3）
const BULLISH_WEIGHTS: &[(&str, f64)] = &[
    ("surge", 2.0),
    ("rally", 2.0),
    ("gain", 1.0),
    ("rise", 1.0),
    ("soar", 2.0),
    ("bull", 2.0),
    ("bullish", 2.0),
    ("up", 1.0),
    ("high", 1.0),
    ("positive", 1.0),
    ("growth", 1.0),
    ("profit", 1.0),
    ("record", 2.0),
    ("breakout", 2.0),
    ("moon", 3.0),
    ("buy", 1.0),
    ("accumulation", 1.0),
    ("support", 1.0),
    ("recovery", 1.0),
    ("optimistic", 1.0),
    ("strong", 1.0),
    ("boost", 1.0),
    ("climb", 1.0),
    ("jump", 2.0),
    ("rocket", 3.0),
];

/// 看空关键词及强度权重（1-3）
const BEARISH_WEIGHTS: &[(&str, f64)] = &[
    ("crash", 3.0),
    ("drop", 2.0),
    ("fall", 2.0),
    ("bear", 2.0),
    ("bearish", 2.0),
    ("down", 1.0),
    ("low", 1.0),
    ("negative", 1.0),
    ("loss", 1.0),
    ("sell", 1.0),
    ("dump", 2.0),
    ("decline", 1.0),
    ("fear", 2.0),
    ("panic", 3.0),
    ("weak", 1.0),
    ("plunge", 3.0),
    ("sink", 2.0),
    ("recession", 2.0),
    ("risk", 1.0),
    ("warning", 1.0),
    ("concern", 1.0),
    ("red", 1.0),
    ("collapse", 3.0),
    ("selloff", 2.0),
];

/// 否定词：出现在关键词前 3 个词内时反转其极性
const NEGATION_WORDS: &[&str] = &["not", "no", "never", "none", "without", "hardly"];

/// 程度词：出现在关键词前 2 个词内时权重 ×1.5
const INTENSIFIER_WORDS: &[&str] = &[
    "very",
    "extremely",
    "highly",
    "massively",
    "significantly",
    "sharply",
    "super",
    "hugely",
];

/// 发布时间的时近权重，缺失时间按 0.7 处理
pub fn recency_weight(published_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(ts) = published_at else {
        return 0.7;
    };

    let age_hours = (now - ts).num_minutes() as f64 / 60.0;
    match age_hours {
        h if h < 1.0 => 1.0,
        h if h < 6.0 => 0.9,
        h if h < 12.0 => 0.8,
        h if h < 24.0 => 0.7,
        h if h < 48.0 => 0.5,
        _ => 0.3,
    }
}

/// 词典打分器
pub struct LexiconScorer {
    bullish_words: HashMap<&'static str, f64>,
    bearish_words: HashMap<&'static str, f64>,
    markup_pattern: Regex,
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            bullish_words: BULLISH_WEIGHTS.iter().copied().collect(),
            bearish_words: BEARISH_WEIGHTS.iter().copied().collect(),
            markup_pattern: Regex::new(r"<[^>]*>").unwrap(),
        }
    }

    /// 归一化并切分为纯字母小写词元
    fn tokenize(&self, text: &str) -> Vec<String> {
        let unescaped = unescape_entities(text);
        let stripped = self.markup_pattern.replace_all(&unescaped, " ");

        stripped
            .to_lowercase()
            .split(|c: char| !c.is_ascii_alphabetic())
            .filter(|w| !w.is_empty())
            .map(|w| w.to_string())
            .collect()
    }

    /// 对一条文本打分
    pub fn score(&self, text: &str, published_at: Option<DateTime<Utc>>) -> ScoredHeadline {
        self.score_at(text, published_at, Utc::now())
    }

    /// 对一条文本打分，时近衰减以 `now` 为基准
    ///
    /// 相同的 (text, published_at, now) 输入总是产出相同结果。
    pub fn score_at(
        &self,
        text: &str,
        published_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> ScoredHeadline {
        if text.trim().is_empty() {
            return ScoredHeadline::neutral(0.5);
        }

        let tokens = self.tokenize(text);

        let mut bullish_score = 0.0;
        let mut bearish_score = 0.0;
        let mut matched_keywords = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            let (base_weight, is_bullish) = match self.bullish_words.get(token.as_str()) {
                Some(&w) => (w, true),
                None => match self.bearish_words.get(token.as_str()) {
                    Some(&w) => (w, false),
                    None => continue,
                },
            };

            let mut weight = base_weight;
            if tokens[i.saturating_sub(2)..i]
                .iter()
                .any(|t| INTENSIFIER_WORDS.contains(&t.as_str()))
            {
                weight *= 1.5;
            }

            let negated = tokens[i.saturating_sub(3)..i]
                .iter()
                .any(|t| NEGATION_WORDS.contains(&t.as_str()));

            // 否定词反转极性贡献
            if is_bullish != negated {
                bullish_score += weight;
            } else {
                bearish_score += weight;
            }

            if negated {
                matched_keywords.push(format!("not_{}", token));
            } else {
                matched_keywords.push(token.clone());
            }
        }

        let total = bullish_score + bearish_score;
        if total == 0.0 {
            return ScoredHeadline::neutral(0.3);
        }

        let net = bullish_score - bearish_score;
        let raw = 50.0 + (net / total) * 40.0;

        // 旧闻向中性回拉
        let decay = recency_weight(published_at, now);
        let decayed = 50.0 + (raw - 50.0) * decay;

        let confidence = (0.5 + (total / 20.0) * 0.4).min(0.9);

        matched_keywords.truncate(10);

        ScoredHeadline {
            score: (decayed.round() as i32).clamp(10, 90),
            confidence: (confidence * 100.0).round() / 100.0,
            bullish_score,
            bearish_score,
            matched_keywords,
        }
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// 还原常见 HTML 实体，&amp; 最后替换避免二次解码
fn unescape_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn fixed_now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-08-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_score_stays_in_range() {
        let scorer = LexiconScorer::new();
        let samples = [
            "moon moon moon rocket rocket surge rally breakout",
            "crash panic collapse plunge dump selloff fear",
            "quarterly report published on schedule",
            "",
            "<b>surge &amp; rally</b>",
        ];

        for text in samples {
            let result = scorer.score_at(text, None, fixed_now());
            assert!(
                (10..=90).contains(&result.score),
                "score {} out of range for {:?}",
                result.score,
                text
            );
            assert!((0.0..=1.0).contains(&result.confidence));
        }
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let scorer = LexiconScorer::new();
        let now = fixed_now();
        let published = Some(now - Duration::hours(3));

        let a = scorer.score_at("Bitcoin rally gains momentum", published, now);
        let b = scorer.score_at("Bitcoin rally gains momentum", published, now);

        assert_eq!(a.score, b.score);
        assert_eq!(a.confidence, b.confidence);
        assert_eq!(a.matched_keywords, b.matched_keywords);
    }

    #[test]
    fn test_empty_text_is_neutral() {
        let scorer = LexiconScorer::new();
        let result = scorer.score_at("   ", None, fixed_now());

        assert_eq!(result.score, 50);
        assert_eq!(result.confidence, 0.5);
        assert!(result.matched_keywords.is_empty());
    }

    #[test]
    fn test_no_keywords_is_neutral_low_confidence() {
        let scorer = LexiconScorer::new();
        let result = scorer.score_at("quarterly report published on schedule", None, fixed_now());

        assert_eq!(result.score, 50);
        assert_eq!(result.confidence, 0.3);
        assert!(result.matched_keywords.is_empty());
    }

    #[test]
    fn test_negation_inverts_polarity() {
        let scorer = LexiconScorer::new();
        let now = fixed_now();

        let plain = scorer.score_at("stocks surge", None, now);
        let negated = scorer.score_at("stocks do not surge", None, now);

        assert!(plain.score > 50);
        assert!(negated.score < 50, "negated headline should lean bearish");
        assert!(plain.score > negated.score);
        assert_eq!(negated.matched_keywords, vec!["not_surge".to_string()]);
    }

    #[test]
    fn test_intensifier_amplifies() {
        let scorer = LexiconScorer::new();
        let now = fixed_now();

        // 混合极性下程度词推高看多占比
        let plain = scorer.score_at("bullish rally after selloff", None, now);
        let boosted = scorer.score_at("extremely bullish rally after selloff", None, now);
        assert!(
            (boosted.score - 50).abs() > (plain.score - 50).abs(),
            "intensified headline should be more extreme: {} vs {}",
            boosted.score,
            plain.score
        );

        // 单边文本下程度词抬高置信度
        let plain_conf = scorer.score_at("bullish rally", None, now);
        let boosted_conf = scorer.score_at("extremely bullish rally", None, now);
        assert!(boosted_conf.confidence > plain_conf.confidence);
    }

    #[test]
    fn test_recency_decay_is_monotonic() {
        let scorer = LexiconScorer::new();
        let now = fixed_now();
        let ages_hours = [0i64, 3, 10, 20, 30, 72];

        let mut last_distance = i32::MAX;
        for hours in ages_hours {
            let published = Some(now - Duration::hours(hours));
            let result = scorer.score_at("bitcoin rally continues", published, now);
            let distance = (result.score - 50).abs();
            assert!(
                distance <= last_distance,
                "older headline must not be farther from neutral"
            );
            last_distance = distance;
        }
    }

    #[test]
    fn test_recency_weight_buckets() {
        let now = fixed_now();
        assert_eq!(recency_weight(Some(now - Duration::minutes(30)), now), 1.0);
        assert_eq!(recency_weight(Some(now - Duration::hours(3)), now), 0.9);
        assert_eq!(recency_weight(Some(now - Duration::hours(11)), now), 0.8);
        assert_eq!(recency_weight(Some(now - Duration::hours(20)), now), 0.7);
        assert_eq!(recency_weight(Some(now - Duration::hours(40)), now), 0.5);
        assert_eq!(recency_weight(Some(now - Duration::hours(80)), now), 0.3);
        assert_eq!(recency_weight(None, now), 0.7);
    }

    #[test]
    fn test_markup_and_entities_are_stripped() {
        let scorer = LexiconScorer::new();
        let result = scorer.score_at(
            "<p>Stocks <b>surge</b> &amp; rally on earnings</p>",
            None,
            fixed_now(),
        );

        assert!(result.score > 50);
        assert!(result
            .matched_keywords
            .contains(&"surge".to_string()));
        assert!(result.matched_keywords.contains(&"rally".to_string()));
    }

    #[test]
    fn test_matched_keywords_capped_at_ten() {
        let scorer = LexiconScorer::new();
        let text = "surge rally gain rise soar bull moon rocket jump climb boost recovery";
        let result = scorer.score_at(text, None, fixed_now());

        assert!(result.matched_keywords.len() <= 10);
    }
}
