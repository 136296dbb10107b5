use dashmap::DashMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::errors::{SearchError, SearchResult};
use crate::metrics::ScanMetrics;
use crate::results::MatchSpan;

static REGEX_CACHE: Lazy<DashMap<String, Arc<Regex>>> = Lazy::new(DashMap::new);

/// Per-line match detection: an optional literal substring and an
/// optional regular expression.
///
/// Immutable once constructed and shared read-only across every chunk
/// scan of a run. A line matches when either component matches; when
/// both do, the literal's span wins.
#[derive(Debug, Clone)]
pub struct LineMatcher {
    literal: Option<String>,
    regex: Option<Arc<Regex>>,
}

impl LineMatcher {
    /// Creates a matcher, compiling the regex if one is given. A
    /// malformed pattern fails here, before any chunk is launched.
    pub fn new(literal: Option<String>, pattern: Option<&str>) -> SearchResult<Self> {
        Self::with_metrics(literal, pattern, &ScanMetrics::new())
    }

    /// Creates a matcher, recording pattern-cache traffic on `metrics`.
    /// Compiled regexes are shared process-wide so repeated runs over
    /// the same pattern (multi-file fan-out in particular) compile once.
    pub fn with_metrics(
        literal: Option<String>,
        pattern: Option<&str>,
        metrics: &ScanMetrics,
    ) -> SearchResult<Self> {
        // An empty string is treated as unset: it would otherwise match
        // every line with a zero-width span.
        let literal = literal.filter(|l| !l.is_empty());
        let pattern = pattern.filter(|p| !p.is_empty());

        let regex = match pattern {
            Some(pattern) => {
                if let Some(entry) = REGEX_CACHE.get(pattern) {
                    metrics.record_cache_operation(true);
                    Some(Arc::clone(entry.value()))
                } else {
                    let compiled = Arc::new(Regex::new(pattern).map_err(|e| {
                        SearchError::invalid_pattern(format!("{pattern}: {e}"))
                    })?);
                    metrics.record_cache_operation(false);
                    REGEX_CACHE.insert(pattern.to_string(), Arc::clone(&compiled));
                    Some(compiled)
                }
            }
            None => None,
        };

        Ok(Self { literal, regex })
    }

    /// True when neither a literal nor a regex was supplied. Every line
    /// is still scanned in that case; nothing can match.
    pub fn is_empty(&self) -> bool {
        self.literal.is_none() && self.regex.is_none()
    }

    /// Finds the first match in `line`. The literal is evaluated first
    /// and its span is reported even when the regex would also match;
    /// the regex span is the fallback.
    pub fn find(&self, line: &str) -> Option<MatchSpan> {
        if let Some(literal) = &self.literal {
            if let Some(start) = line.find(literal.as_str()) {
                return Some(MatchSpan {
                    start,
                    end: start + literal.len(),
                });
            }
        }
        self.regex.as_ref()?.find(line).map(|m| MatchSpan {
            start: m.start(),
            end: m.end(),
        })
    }
}
