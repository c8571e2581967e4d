use common::models::{Direction, Signal, Strength, UNKNOWN_ASSET};

/// Upper bound on lines considered per page, so a huge scrollback cannot
/// make the scan arbitrarily slow.
pub(crate) const MAX_SCAN_LINES: usize = 300;

pub(crate) const UP_PATTERNS: &[&str] = &["up", "call", "buy", "↑"];
pub(crate) const DOWN_PATTERNS: &[&str] = &["down", "put", "sell", "↓"];

/// Parses raw chat text into trade signals, most recent line first, at most
/// `limit` entries. Lines matching no direction vocabulary are skipped
/// without counting toward the limit.
pub fn extract_signals(page_text: &str, limit: usize) -> Vec<Signal> {
    let mut signals = Vec::new();
    if limit == 0 {
        return signals;
    }

    let lines: Vec<&str> = page_text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let start = lines.len().saturating_sub(MAX_SCAN_LINES);

    for line in lines[start..].iter().rev() {
        if signals.len() >= limit {
            break;
        }

        let lower = line.to_lowercase();

        // DOWN is evaluated second and overwrites UP on purpose: a line
        // matching both vocabularies classifies as DOWN.
        let mut decision = None;
        if UP_PATTERNS.iter().any(|p| lower.contains(p)) {
            decision = Some(Direction::Up);
        }
        if DOWN_PATTERNS.iter().any(|p| lower.contains(p)) {
            decision = Some(Direction::Down);
        }

        let decision = match decision {
            Some(d) => d,
            None => continue,
        };

        let strength = if lower.contains("strong") {
            Strength::Strong
        } else {
            Strength::Normal
        };

        signals.push(Signal {
            asset: UNKNOWN_ASSET.to_string(),
            decision,
            strength,
            raw: (*line).to_string(),
        });
    }

    signals
}
