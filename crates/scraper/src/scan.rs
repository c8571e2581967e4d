use common::models::{MarketDatum, TradeSide};

use crate::extract::{DOWN_PATTERNS, UP_PATTERNS};

/// Scans dashboard text for asset rows, in document order. One datum per
/// asset: the first line mentioning it wins, later mentions are ignored.
pub fn scan_market(page_text: &str) -> Vec<MarketDatum> {
    let mut data: Vec<MarketDatum> = Vec::new();

    for line in page_text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let asset = match detect_asset(line) {
            Some(asset) => asset,
            None => continue,
        };
        if data.iter().any(|d| d.asset == asset) {
            continue;
        }

        let lower = line.to_lowercase();

        // Same tie-break as the chat extractor: a line carrying both
        // vocabularies reads as SELL.
        let mut side = None;
        if UP_PATTERNS.iter().any(|p| lower.contains(p)) {
            side = Some(TradeSide::Buy);
        }
        if DOWN_PATTERNS.iter().any(|p| lower.contains(p)) {
            side = Some(TradeSide::Sell);
        }

        if let Some(decision) = side {
            data.push(MarketDatum { asset, decision });
        }
    }

    data
}

/// Accepts `EURUSD` and `EUR/USD` shapes; the slash form is normalized by
/// dropping the separator.
fn detect_asset(line: &str) -> Option<String> {
    for token in line.split_whitespace() {
        let token = token.trim_matches(|c: char| !c.is_ascii_alphanumeric() && c != '/');

        if token.len() == 6 && token.chars().all(|c| c.is_ascii_uppercase()) {
            return Some(token.to_string());
        }

        if let Some((base, quote)) = token.split_once('/') {
            if base.len() == 3
                && quote.len() == 3
                && base.chars().all(|c| c.is_ascii_uppercase())
                && quote.chars().all(|c| c.is_ascii_uppercase())
            {
                return Some(format!("{}{}", base, quote));
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_letter_pair_with_cue_is_detected() {
        let data = scan_market("EURUSD 62% buy pressure");

        assert_eq!(data.len(), 1);
        assert_eq!(data[0].asset, "EURUSD");
        assert_eq!(data[0].decision, TradeSide::Buy);
    }

    #[test]
    fn test_slash_pair_is_normalized() {
        let data = scan_market("GBP/JPY trending down");

        assert_eq!(data.len(), 1);
        assert_eq!(data[0].asset, "GBPJPY");
        assert_eq!(data[0].decision, TradeSide::Sell);
    }

    #[test]
    fn test_results_keep_document_order() {
        let data = scan_market("AUDUSD sell\nEURUSD buy");

        assert_eq!(data.len(), 2);
        assert_eq!(data[0].asset, "AUDUSD");
        assert_eq!(data[1].asset, "EURUSD");
    }

    #[test]
    fn test_first_mention_of_an_asset_wins() {
        let data = scan_market("EURUSD buy\nchatter\nEURUSD sell");

        assert_eq!(data.len(), 1);
        assert_eq!(data[0].decision, TradeSide::Buy);
    }

    #[test]
    fn test_asset_line_without_cue_is_skipped() {
        assert!(scan_market("EURUSD quiet for hours").is_empty());
    }

    #[test]
    fn test_cue_line_without_asset_is_skipped() {
        assert!(scan_market("big buy volume overall").is_empty());
    }

    #[test]
    fn test_lowercase_tokens_are_not_assets() {
        assert!(scan_market("eurusd buy").is_empty());
    }

    #[test]
    fn test_tie_break_matches_the_chat_extractor() {
        let data = scan_market("EURUSD call turned put");
        assert_eq!(data[0].decision, TradeSide::Sell);
    }

    #[test]
    fn test_punctuation_around_tokens_is_tolerated() {
        let data = scan_market("(EUR/USD): strong up move");

        assert_eq!(data.len(), 1);
        assert_eq!(data[0].asset, "EURUSD");
        assert_eq!(data[0].decision, TradeSide::Buy);
    }
}
