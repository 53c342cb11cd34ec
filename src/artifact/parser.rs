//! Section parser - raw generator text to structured [`Artifact`]
//!
//! Pure transformation, no side effects. Split mode scans for section
//! markers in a strict delimiter form; fused mode takes the whole trimmed
//! response as the page document.
//!
//! Text before the first recognized marker is discarded, and an end marker
//! terminates its section even when stray prose follows. Preamble and
//! trailing chatter from the generator are never meaningful content.

use std::collections::HashMap;

use tracing::{debug, warn};

use super::{Artifact, MarkerGrammar, ParseError, ParseMode, SectionKind};

/// A recognized marker occurrence in the raw text
#[derive(Debug, Clone, Copy)]
struct Marker {
    token: Token,
    start: usize,
    end: usize,
}

#[derive(Debug, Clone, Copy)]
enum Token {
    Open(SectionKind),
    Close(SectionKind),
}

/// Bracketed marker vocabulary, matched case-insensitively
const BRACKETED: [(&str, Token); 6] = [
    ("[HTML_START]", Token::Open(SectionKind::Markup)),
    ("[HTML_END]", Token::Close(SectionKind::Markup)),
    ("[CSS_START]", Token::Open(SectionKind::Style)),
    ("[CSS_END]", Token::Close(SectionKind::Style)),
    ("[JS_START]", Token::Open(SectionKind::Behavior)),
    ("[JS_END]", Token::Close(SectionKind::Behavior)),
];

/// Line-prefix marker vocabulary: the whole line, nothing but the label
const LINE_LABELS: [(&str, SectionKind); 3] = [
    ("HTML:", SectionKind::Markup),
    ("CSS:", SectionKind::Style),
    ("JS:", SectionKind::Behavior),
];

/// Parse one raw generator response into an [`Artifact`]
pub fn parse(raw: &str, mode: ParseMode, grammar: MarkerGrammar) -> Result<Artifact, ParseError> {
    debug!(?mode, ?grammar, raw_len = raw.len(), "parse: called");
    match mode {
        ParseMode::Fused => parse_fused(raw),
        ParseMode::Split => parse_split(raw, grammar),
    }
}

fn parse_fused(raw: &str) -> Result<Artifact, ParseError> {
    let document = raw.trim();
    if document.is_empty() {
        debug!("parse_fused: empty after trimming");
        return Err(ParseError::EmptyDocument);
    }

    // Advisory only: a fused response should look like a whole page
    if !document.to_ascii_lowercase().contains("<html") {
        warn!("fused response has no <html> tag, serving it anyway");
    }

    Ok(Artifact::Fused {
        document: document.to_string(),
    })
}

fn parse_split(raw: &str, grammar: MarkerGrammar) -> Result<Artifact, ParseError> {
    let markers = match grammar {
        MarkerGrammar::Bracketed => scan_bracketed(raw),
        MarkerGrammar::LinePrefix => scan_line_prefix(raw),
    };
    debug!(marker_count = markers.len(), "parse_split: markers scanned");

    let mut sections: HashMap<SectionKind, String> = HashMap::new();
    let mut current: Option<SectionKind> = None;
    let mut cursor = 0;

    for marker in &markers {
        if let Some(kind) = current {
            append_chunk(&mut sections, kind, &raw[cursor..marker.start]);
        }
        // Any recognized marker terminates the active section; text outside
        // an open section (preamble, trailing prose) is discarded.
        current = match marker.token {
            Token::Open(kind) => Some(kind),
            Token::Close(_) => None,
        };
        cursor = marker.end;
    }

    if let Some(kind) = current {
        append_chunk(&mut sections, kind, &raw[cursor..]);
    }

    let mut resolved: HashMap<SectionKind, String> = HashMap::new();
    let mut missing = Vec::new();
    for kind in SectionKind::ALL {
        let text = sections.get(&kind).map(|s| s.trim()).unwrap_or("");
        if text.is_empty() {
            missing.push(kind);
        } else {
            resolved.insert(kind, text.to_string());
        }
    }

    if !missing.is_empty() {
        debug!(?missing, "parse_split: sections missing or empty");
        return Err(ParseError::MissingSections(missing));
    }

    Ok(Artifact::Split {
        markup: resolved.remove(&SectionKind::Markup).unwrap_or_default(),
        style: resolved.remove(&SectionKind::Style).unwrap_or_default(),
        behavior: resolved.remove(&SectionKind::Behavior).unwrap_or_default(),
    })
}

fn append_chunk(sections: &mut HashMap<SectionKind, String>, kind: SectionKind, chunk: &str) {
    let acc = sections.entry(kind).or_default();
    if !acc.is_empty() {
        acc.push('\n');
    }
    acc.push_str(chunk);
}

/// Scan for exact bracketed tokens like `[CSS_START]`, case-insensitive
///
/// The opening bracket anchors the match, so a marker word mentioned in
/// prose without brackets never registers.
fn scan_bracketed(raw: &str) -> Vec<Marker> {
    let mut markers = Vec::new();
    let bytes = raw.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'[' {
            i += 1;
            continue;
        }
        let mut matched = None;
        for (tag, token) in BRACKETED {
            let end = i + tag.len();
            if raw.get(i..end).is_some_and(|s| s.eq_ignore_ascii_case(tag)) {
                matched = Some(Marker {
                    token,
                    start: i,
                    end,
                });
                break;
            }
        }
        match matched {
            Some(marker) => {
                i = marker.end;
                markers.push(marker);
            }
            None => i += 1,
        }
    }

    markers
}

/// Scan for label lines: a line that is solely `HTML:`, `CSS:` or `JS:`
///
/// The label must be the entire line (surrounding whitespace allowed), so a
/// mid-line `js:` inside generated code never opens a section.
fn scan_line_prefix(raw: &str) -> Vec<Marker> {
    let mut markers = Vec::new();
    let mut offset = 0;

    for line in raw.split_inclusive('\n') {
        let trimmed = line.trim();
        for (label, kind) in LINE_LABELS {
            if trimmed.eq_ignore_ascii_case(label) {
                markers.push(Marker {
                    token: Token::Open(kind),
                    start: offset,
                    end: offset + line.len(),
                });
                break;
            }
        }
        offset += line.len();
    }

    markers
}
