use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One occurrence of a configured keyword or marker inside a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordHit {
    /// Keyword as it appears in the configuration
    pub keyword: String,
    pub message_index: usize,
    /// Offset in characters (not bytes) from the start of the message text
    pub offset: usize,
    /// Matched text with its original casing
    pub matched: String,
}

/// When a conversation was last active, if anything says so
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "at", rename_all = "lowercase")]
pub enum Recency {
    Known(DateTime<Utc>),
    Unknown,
}

impl Recency {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            Recency::Known(ts) => Some(*ts),
            Recency::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Recency::Unknown)
    }
}

impl From<Option<DateTime<Utc>>> for Recency {
    fn from(value: Option<DateTime<Utc>>) -> Self {
        value.map_or(Recency::Unknown, Recency::Known)
    }
}

/// Evidence extracted from a single conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSet {
    pub keyword_hits: Vec<KeywordHit>,
    pub marker_hits: Vec<KeywordHit>,
    pub message_count: usize,
    /// Combined length of all message bodies, in characters
    pub text_length: usize,
    /// Last message is an assistant proposal nobody answered
    pub ends_unresolved: bool,
    pub recency: Recency,
}

impl SignalSet {
    pub fn empty(recency: Recency) -> Self {
        Self {
            keyword_hits: Vec::new(),
            marker_hits: Vec::new(),
            message_count: 0,
            text_length: 0,
            ends_unresolved: false,
            recency,
        }
    }

    pub fn has_marker(&self) -> bool {
        !self.marker_hits.is_empty()
    }

    /// True when neither a keyword nor a marker matched
    pub fn is_silent(&self) -> bool {
        self.keyword_hits.is_empty() && self.marker_hits.is_empty()
    }

    /// Distinct keywords in first-seen order
    pub fn distinct_keywords(&self) -> Vec<String> {
        distinct(&self.keyword_hits)
    }

    /// Distinct markers in first-seen order
    pub fn distinct_markers(&self) -> Vec<String> {
        distinct(&self.marker_hits)
    }

    /// Earliest hit across keywords and markers
    pub fn first_hit(&self) -> Option<&KeywordHit> {
        self.keyword_hits
            .iter()
            .chain(self.marker_hits.iter())
            .min_by_key(|hit| (hit.message_index, hit.offset))
    }
}

fn distinct(hits: &[KeywordHit]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for hit in hits {
        if !seen.iter().any(|k| k == &hit.keyword) {
            seen.push(hit.keyword.clone());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(keyword: &str, message_index: usize, offset: usize) -> KeywordHit {
        KeywordHit {
            keyword: keyword.to_string(),
            message_index,
            offset,
            matched: keyword.to_string(),
        }
    }

    #[test]
    fn test_empty_signal_set_is_silent() {
        let signals = SignalSet::empty(Recency::Unknown);
        assert!(signals.is_silent());
        assert!(!signals.has_marker());
        assert_eq!(signals.message_count, 0);
        assert!(signals.first_hit().is_none());
    }

    #[test]
    fn test_distinct_keywords_keep_first_seen_order() {
        let mut signals = SignalSet::empty(Recency::Unknown);
        signals.keyword_hits = vec![hit("need to", 0, 4), hit("TODO", 1, 0), hit("need to", 2, 9)];
        assert_eq!(signals.distinct_keywords(), vec!["need to", "TODO"]);
    }

    #[test]
    fn test_first_hit_spans_markers_and_keywords() {
        let mut signals = SignalSet::empty(Recency::Unknown);
        signals.keyword_hits = vec![hit("need to", 1, 0)];
        signals.marker_hits = vec![hit("unfinished", 0, 12)];
        assert_eq!(signals.first_hit().map(|h| h.keyword.as_str()), Some("unfinished"));
    }

    #[test]
    fn test_recency_from_option() {
        assert!(Recency::from(None).is_unknown());
        let now = Utc::now();
        assert_eq!(Recency::from(Some(now)).timestamp(), Some(now));
    }
}
