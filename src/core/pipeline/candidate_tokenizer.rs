use crate::core::models::{CandidateToken, ExtractionResult, TokenizationMode};

/// Best-effort drug-name candidates from recognized label text.
///
/// Tokens are trimmed but never case-folded; fuzzy matching is left to
/// whoever consumes them.
pub fn tokenize(result: &ExtractionResult, mode: TokenizationMode) -> Vec<CandidateToken> {
    if !result.success {
        return Vec::new();
    }

    match mode {
        TokenizationMode::FirstWord => first_word_of_first_line(result).into_iter().collect(),
        TokenizationMode::ShortLines { max_length } => short_lines(result, max_length),
    }
}

fn first_word_of_first_line(result: &ExtractionResult) -> Option<CandidateToken> {
    result
        .raw_text
        .iter()
        .map(|line| line.trim())
        .find(|line| !line.is_empty())
        .and_then(|line| line.split_whitespace().next())
        .map(|word| CandidateToken::new(word, result.source_index))
}

fn short_lines(result: &ExtractionResult, max_length: usize) -> Vec<CandidateToken> {
    result
        .raw_text
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && line.chars().count() < max_length)
        .map(|line| CandidateToken::new(line, result.source_index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(tokens: &[CandidateToken]) -> Vec<&str> {
        tokens.iter().map(|token| token.value.as_str()).collect()
    }

    #[test]
    fn test_first_word_mode_takes_first_word_of_first_non_empty_line() {
        let result = ExtractionResult::from_recognized_text(2, "Tylenol 500mg\nTake twice daily");

        let tokens = tokenize(&result, TokenizationMode::FirstWord);

        assert_eq!(tokens, vec![CandidateToken::new("Tylenol", 2)]);
    }

    #[test]
    fn test_first_word_mode_skips_blank_leading_lines() {
        let result = ExtractionResult {
            source_index: 0,
            raw_text: vec!["".to_string(), "   ".to_string(), "  타이레놀정 500mg".to_string()],
            success: true,
            failure_reason: None,
        };

        let tokens = tokenize(&result, TokenizationMode::FirstWord);

        assert_eq!(values(&tokens), vec!["타이레놀정"]);
    }

    #[test]
    fn test_first_word_mode_preserves_case() {
        let result = ExtractionResult::from_recognized_text(0, "ASPIRIN protect");

        let tokens = tokenize(&result, TokenizationMode::FirstWord);

        assert_eq!(values(&tokens), vec!["ASPIRIN"]);
    }

    #[test]
    fn test_short_lines_mode_keeps_every_line_under_limit() {
        let result = ExtractionResult::from_recognized_text(
            0,
            "Tylenol 500mg\nTake twice daily\nDo not exceed 4g per day",
        );

        let tokens = tokenize(&result, TokenizationMode::ShortLines { max_length: 40 });

        assert_eq!(
            values(&tokens),
            vec!["Tylenol 500mg", "Take twice daily", "Do not exceed 4g per day"]
        );
    }

    #[test]
    fn test_short_lines_mode_drops_lines_at_or_over_limit() {
        let exactly_ten = "abcdefghij";
        let result = ExtractionResult::from_recognized_text(
            1,
            &format!("short\n{}\nthis line is far too long\n\n  pad  ", exactly_ten),
        );

        let tokens = tokenize(&result, TokenizationMode::ShortLines { max_length: 10 });

        assert_eq!(values(&tokens), vec!["short", "pad"]);
        assert!(tokens.iter().all(|token| token.source_index == 1));
    }

    #[test]
    fn test_short_lines_mode_counts_characters_not_bytes() {
        let result = ExtractionResult::from_recognized_text(0, "아세트아미노펜");

        let tokens = tokenize(&result, TokenizationMode::ShortLines { max_length: 8 });

        assert_eq!(values(&tokens), vec!["아세트아미노펜"]);
    }

    #[test]
    fn test_failed_result_yields_no_tokens_in_either_mode() {
        let mut result = ExtractionResult::failed(0, "engine unavailable");
        result.raw_text = vec!["Leftover text".to_string()];

        assert!(tokenize(&result, TokenizationMode::FirstWord).is_empty());
        assert!(tokenize(&result, TokenizationMode::ShortLines { max_length: 40 }).is_empty());
    }

    #[test]
    fn test_no_text_detected_yields_no_tokens() {
        let result = ExtractionResult::from_recognized_text(0, "   ");

        assert!(tokenize(&result, TokenizationMode::FirstWord).is_empty());
    }
}
