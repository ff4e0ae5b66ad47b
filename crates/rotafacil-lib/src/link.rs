//! Best-effort coordinate extraction from pasted map links.
//!
//! Map-link formats are heterogeneous and undocumented, so instead of a single
//! grammar the extractor runs an ordered cascade of independent rules. The
//! first rule that matches wins; later rules are never consulted, even if they
//! would have produced a different pair.
//!
//! ```
//! use rotafacil_lib::link::{extract, LinkMatch, LinkRule};
//! use rotafacil_lib::Point;
//!
//! let found = extract("https://maps.google.com/@-2.53,-44.28,15z");
//! assert_eq!(found, LinkMatch::Matched { rule: LinkRule::AtSegment, point: Point::new(-2.53, -44.28) });
//! assert_eq!(extract("hello world"), LinkMatch::NoMatch);
//! ```

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::geo::Point;

/// Known link shapes, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkRule {
    /// `.../@-2.53,-44.28,15z`
    AtSegment,
    /// `...?q=-2.53,-44.28` or `&query=...`
    QueryParam,
    /// `.../place/-2.53,-44.28`
    PlacePath,
    /// `...ll=-2.53,-44.28`
    LlParam,
    /// `...!3d-2.53!4d-44.28`
    DataPair,
    /// `.../dir/<anything>-2.53,-44.28`
    DirPath,
    /// `-2.53, -44.28`
    BarePair,
}

impl fmt::Display for LinkRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            LinkRule::AtSegment => "at_segment",
            LinkRule::QueryParam => "query_param",
            LinkRule::PlacePath => "place_path",
            LinkRule::LlParam => "ll_param",
            LinkRule::DataPair => "data_pair",
            LinkRule::DirPath => "dir_path",
            LinkRule::BarePair => "bare_pair",
        };
        f.write_str(value)
    }
}

/// Outcome of [`extract`]. `NoMatch` is an expected result, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum LinkMatch {
    Matched { rule: LinkRule, point: Point },
    NoMatch,
}

impl LinkMatch {
    pub fn point(&self) -> Option<Point> {
        match self {
            LinkMatch::Matched { point, .. } => Some(*point),
            LinkMatch::NoMatch => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, LinkMatch::Matched { .. })
    }
}

/// ASCII digits only.
const NUM: &str = r"(-?[0-9]+\.?[0-9]*)";

static RULES: Lazy<Vec<(LinkRule, Regex)>> = Lazy::new(|| {
    [
        (LinkRule::AtSegment, format!("@{NUM},{NUM}")),
        (LinkRule::QueryParam, format!("[?&](?:q|query)={NUM},{NUM}")),
        (LinkRule::PlacePath, format!("/place/{NUM},{NUM}")),
        (LinkRule::LlParam, format!("ll={NUM},{NUM}")),
        (LinkRule::DataPair, format!("!3d{NUM}!4d{NUM}")),
        (LinkRule::DirPath, format!("/dir/.*?{NUM},{NUM}")),
        (LinkRule::BarePair, format!(r"^{NUM}\s*,\s*{NUM}$")),
    ]
    .into_iter()
    .map(|(rule, pattern)| {
        let regex = Regex::new(&pattern).expect("link rule patterns are valid");
        (rule, regex)
    })
    .collect()
});

/// Pull a `(lat, lng)` pair out of free-form text.
///
/// Deterministic and total: every input yields either a match or `NoMatch`.
/// No range validation is performed here.
pub fn extract(text: &str) -> LinkMatch {
    let text = text.trim();
    if text.is_empty() {
        return LinkMatch::NoMatch;
    }

    for (rule, regex) in RULES.iter() {
        let Some(captures) = regex.captures(text) else {
            continue;
        };
        let lat = captures[1].parse::<f64>();
        let lng = captures[2].parse::<f64>();
        if let (Ok(lat), Ok(lng)) = (lat, lng) {
            debug!(rule = %rule, lat, lng, "extracted coordinates from link");
            return LinkMatch::Matched {
                rule: *rule,
                point: Point::new(lat, lng),
            };
        }
    }

    debug!("no link rule matched");
    LinkMatch::NoMatch
}
