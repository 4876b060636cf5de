//! Line wrapping for free text and left-to-right flow for skill tokens.
//!
//! Both are greedy: a line (or row) takes items until the next one would cross
//! the limit. Nothing is hyphenated.

use crate::layout::font_metrics::{get_metrics, FontStyle};

// ────────────────────────────────────────────────────────────────────────────
// Free-text wrapping
// ────────────────────────────────────────────────────────────────────────────

/// Splits `text` into lines no wider than `max_width_mm` at the given face and size.
///
/// Explicit newlines always start a new line. A word wider than the whole line is
/// broken between characters. Always returns at least one line, so empty text
/// occupies one (empty) line.
pub fn split_text_to_size(text: &str, max_width_mm: f32, style: FontStyle, size_pt: f32) -> Vec<String> {
    let metrics = get_metrics(&style);
    let width = |s: &str| metrics.width_mm(s, size_pt);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            if width(word) > max_width_mm {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let mut chunks = break_word(word, max_width_mm, &width);
                current = chunks.pop().unwrap_or_default();
                lines.extend(chunks);
                continue;
            }

            if current.is_empty() {
                current.push_str(word);
            } else if width(&current) + width(" ") + width(word) <= max_width_mm {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        lines.push(current);
    }

    lines
}

/// Breaks an over-long word into chunks that each fit `max_width_mm`.
/// A chunk always holds at least one character.
fn break_word(word: &str, max_width_mm: f32, width: &dyn Fn(&str) -> f32) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    for c in word.chars() {
        let mut candidate = current.clone();
        candidate.push(c);
        if !current.is_empty() && width(&candidate) > max_width_mm {
            chunks.push(std::mem::take(&mut current));
            current.push(c);
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

// ────────────────────────────────────────────────────────────────────────────
// Skill token flow
// ────────────────────────────────────────────────────────────────────────────

/// Splits a comma-separated skill list into trimmed, non-empty tokens, in order.
pub fn parse_skill_tokens(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Horizontal limits and spacing of a token flow, in millimetres.
#[derive(Debug, Clone, Copy)]
pub struct TokenFlow {
    pub left: f32,
    /// A token may not end past this x.
    pub right: f32,
    /// Horizontal space after each token.
    pub gap: f32,
    pub row_height: f32,
    pub style: FontStyle,
    pub size_pt: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedToken {
    pub text: String,
    pub x: f32,
    /// Vertical offset from the row the flow started on.
    pub y_offset: f32,
}

/// Places tokens left to right, moving to a new row whenever a token would
/// cross `flow.right`. The check also applies to the first token, and a token
/// wider than the whole row is placed anyway (it overflows).
pub fn flow_tokens(tokens: &[String], flow: &TokenFlow) -> Vec<PlacedToken> {
    let metrics = get_metrics(&flow.style);
    let mut x = flow.left;
    let mut y_offset = 0.0_f32;

    tokens
        .iter()
        .map(|token| {
            let w = metrics.width_mm(token, flow.size_pt);
            if x + w > flow.right {
                x = flow.left;
                y_offset += flow.row_height;
            }
            let placed = PlacedToken {
                text: token.clone(),
                x,
                y_offset,
            };
            x += w + flow.gap;
            placed
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn skill_flow() -> TokenFlow {
        TokenFlow {
            left: 25.0,
            right: 185.0,
            gap: 8.0,
            row_height: 8.0,
            style: FontStyle::Normal,
            size_pt: 10.0,
        }
    }

    // ── parse_skill_tokens ──────────────────────────────────────────────────

    #[test]
    fn test_parse_drops_empty_tokens_keeps_order() {
        assert_eq!(parse_skill_tokens("a, , b,c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_whitespace_only_input() {
        assert!(parse_skill_tokens("  ,  ,").is_empty());
        assert!(parse_skill_tokens("").is_empty());
    }

    // ── flow_tokens ─────────────────────────────────────────────────────────

    #[test]
    fn test_short_tokens_share_one_row() {
        let tokens = parse_skill_tokens("Rust, Go, SQL");
        let placed = flow_tokens(&tokens, &skill_flow());
        assert_eq!(placed.len(), 3);
        assert!(placed.iter().all(|t| t.y_offset == 0.0));
        assert_eq!(placed[0].x, 25.0);
        assert!(placed[1].x > placed[0].x && placed[2].x > placed[1].x);
    }

    #[test]
    fn test_tokens_wrap_to_next_row_at_left_margin() {
        let tokens: Vec<String> = (0..12).map(|i| format!("Communication{i}")).collect();
        let placed = flow_tokens(&tokens, &skill_flow());
        let wrapped: Vec<&PlacedToken> = placed.iter().filter(|t| t.y_offset > 0.0).collect();
        assert!(!wrapped.is_empty(), "12 long tokens must not fit on one row");
        assert_eq!(wrapped[0].x, 25.0);
        assert_eq!(wrapped[0].y_offset, 8.0);

        let metrics = get_metrics(&FontStyle::Normal);
        for token in &placed {
            assert!(token.x + metrics.width_mm(&token.text, 10.0) <= 185.0 + 1e-3);
        }
    }

    #[test]
    fn test_oversized_token_is_placed_not_dropped() {
        let giant = "x".repeat(200);
        let placed = flow_tokens(&[giant.clone()], &skill_flow());
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].text, giant);
        assert_eq!(placed[0].x, 25.0);
    }

    // ── split_text_to_size ──────────────────────────────────────────────────

    #[test]
    fn test_short_text_is_one_line() {
        let lines = split_text_to_size("Built the billing service", 160.0, FontStyle::Normal, 10.0);
        assert_eq!(lines, vec!["Built the billing service"]);
    }

    #[test]
    fn test_empty_text_is_one_empty_line() {
        let lines = split_text_to_size("", 160.0, FontStyle::Normal, 10.0);
        assert_eq!(lines, vec![String::new()]);
    }

    #[test]
    fn test_long_text_wraps_within_width() {
        let text = "Designed and operated a fleet of ingestion workers that normalised partner \
                    feeds, deduplicated records and published change events for downstream teams \
                    across three regions with strict latency objectives";
        let lines = split_text_to_size(text, 160.0, FontStyle::Normal, 10.0);
        assert!(lines.len() >= 2, "got {lines:?}");

        let metrics = get_metrics(&FontStyle::Normal);
        for line in &lines {
            assert!(metrics.width_mm(line, 10.0) <= 160.0 + 1e-3, "line too wide: {line}");
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_newlines_force_breaks() {
        let lines = split_text_to_size("first\nsecond\n\nfourth", 160.0, FontStyle::Normal, 10.0);
        assert_eq!(lines, vec!["first", "second", "", "fourth"]);
    }

    #[test]
    fn test_overlong_word_is_broken() {
        let word = "a".repeat(120);
        let lines = split_text_to_size(&word, 50.0, FontStyle::Normal, 10.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }
}
