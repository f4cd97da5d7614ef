//! Tests for the collision table.

use super::*;
use squash_ir::TokenKind;

/// A representative spelling for every kind the lexer produces.
fn sample(kind: TokenKind) -> Option<&'static str> {
    let text = match kind {
        TokenKind::Ident => "a",
        TokenKind::Keyword => "int",
        TokenKind::Int => "1",
        TokenKind::Real => "1.5",
        TokenKind::Char => "'c'",
        TokenKind::String => "\"s\"",
        TokenKind::VerbatimString => "@\"v\"",
        TokenKind::InterpolatedString => "$\"i\"",
        TokenKind::Unknown | TokenKind::Eof => return None,
        _ => return kind.lexeme(),
    };
    Some(text)
}

mod table_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unknown_has_no_entries() {
        let table = global_collision_table();
        for kind in TokenKind::ALL {
            assert_eq!(table.lookup(TokenKind::Unknown, kind), None);
            assert_eq!(table.lookup(kind, TokenKind::Unknown), None);
        }
    }

    #[test]
    fn every_other_pair_has_an_entry() {
        let known = TokenKind::COUNT - 1;
        assert_eq!(global_collision_table().len(), known * known);
    }

    #[test]
    fn repeated_plus_needs_space() {
        assert_eq!(
            lookup_separator(TokenKind::Plus, TokenKind::Plus),
            Some(Separator::Space)
        );
        assert_eq!(
            lookup_separator(TokenKind::Plus, TokenKind::PlusEq),
            Some(Separator::Space)
        );
    }

    #[test]
    fn words_and_numbers_need_space() {
        for (left, right) in [
            (TokenKind::Keyword, TokenKind::Ident),
            (TokenKind::Ident, TokenKind::Ident),
            (TokenKind::Ident, TokenKind::Int),
            (TokenKind::Int, TokenKind::Ident),
            (TokenKind::Real, TokenKind::Keyword),
            (TokenKind::Int, TokenKind::Dot),
            (TokenKind::Dot, TokenKind::Real),
        ] {
            assert_eq!(
                lookup_separator(left, right),
                Some(Separator::Space),
                "{left:?} {right:?}"
            );
        }
    }

    #[test]
    fn comment_markers_need_space() {
        assert_eq!(
            lookup_separator(TokenKind::Slash, TokenKind::Slash),
            Some(Separator::Space)
        );
        assert_eq!(
            lookup_separator(TokenKind::Slash, TokenKind::StarEq),
            Some(Separator::Space)
        );
        assert_eq!(
            lookup_separator(TokenKind::Slash, TokenKind::SlashEq),
            Some(Separator::Space)
        );
    }

    #[test]
    fn multi_character_operators() {
        for (left, right) in [
            (TokenKind::Lt, TokenKind::LtEq),
            (TokenKind::Shl, TokenKind::Eq),
            (TokenKind::Minus, TokenKind::Gt),
            (TokenKind::Eq, TokenKind::Gt),
            (TokenKind::Question, TokenKind::QuestionQuestion),
            (TokenKind::QuestionQuestion, TokenKind::Eq),
            (TokenKind::Colon, TokenKind::Colon),
            (TokenKind::Dot, TokenKind::DotDot),
            (TokenKind::Amp, TokenKind::AmpEq),
        ] {
            assert_eq!(
                lookup_separator(left, right),
                Some(Separator::Space),
                "{left:?} {right:?}"
            );
        }
    }

    #[test]
    fn unrelated_pairs_join() {
        for (left, right) in [
            (TokenKind::Ident, TokenKind::LParen),
            (TokenKind::RParen, TokenKind::Ident),
            (TokenKind::Gt, TokenKind::Gt),
            (TokenKind::Gt, TokenKind::GtEq),
            (TokenKind::Star, TokenKind::Star),
            (TokenKind::DotDot, TokenKind::Dot),
            (TokenKind::Ident, TokenKind::String),
            (TokenKind::Semicolon, TokenKind::Eof),
        ] {
            assert_eq!(
                lookup_separator(left, right),
                Some(Separator::Join),
                "{left:?} {right:?}"
            );
        }
    }

    #[test]
    fn verbatim_literals_guard_quote_escapes() {
        assert_eq!(
            lookup_separator(TokenKind::VerbatimString, TokenKind::String),
            Some(Separator::Space)
        );
        assert_eq!(
            lookup_separator(TokenKind::Ident, TokenKind::VerbatimString),
            Some(Separator::Space)
        );
    }
}

mod lexer_agreement_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Every joined pair must re-lex into exactly the two tokens, and every
    /// spaced pair must do so with one space.
    #[test]
    fn table_agrees_with_lexer() {
        for left in TokenKind::ALL {
            let Some(left_text) = sample(left) else {
                continue;
            };
            for right in TokenKind::ALL {
                let Some(right_text) = sample(right) else {
                    continue;
                };
                let separator = lookup_separator(left, right).unwrap_or_default();
                let glue = if separator.needs_space() { " " } else { "" };
                let text = format!("{left_text}{glue}{right_text}");
                let relexed: Vec<_> = squash_lexer::relex(&text)
                    .into_iter()
                    .map(|(kind, text)| (kind, text.to_string()))
                    .collect();
                assert_eq!(
                    relexed,
                    vec![
                        (left, left_text.to_owned()),
                        (right, right_text.to_owned())
                    ],
                    "{text:?}"
                );
            }
        }
    }
}

mod rule_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn priorities_put_fallback_last() {
        let max = COLLISION_RULES.iter().map(|r| r.priority).max();
        let fallback = COLLISION_RULES.iter().find(|r| r.name == "Fallback");
        assert_eq!(fallback.map(|r| r.priority), max);
    }

    #[test]
    fn empty_rule_set_joins_nothing() {
        let table = CollisionTable::from_rules(&[]);
        assert!(table.is_empty());
        assert_eq!(table.lookup(TokenKind::Plus, TokenKind::Plus), None);
    }

    #[test]
    fn matchers_accept_their_kinds() {
        assert!(TokenMatcher::Any.matches(TokenKind::Eof));
        assert!(TokenMatcher::Exact(TokenKind::Dot).matches(TokenKind::Dot));
        assert!(!TokenMatcher::Exact(TokenKind::Dot).matches(TokenKind::DotDot));
        let strings = TokenMatcher::OneOf(&[TokenKind::String, TokenKind::Char]);
        assert!(strings.matches(TokenKind::Char));
        assert!(!strings.matches(TokenKind::Ident));
        assert!(TokenMatcher::PUNCT.matches(TokenKind::Comma));
        assert!(!TokenMatcher::PUNCT.matches(TokenKind::Ident));
    }
}
