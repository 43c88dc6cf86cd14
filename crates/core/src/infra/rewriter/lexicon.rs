//! スタイル別の単語置換テーブル（ローカル用）

use rand::Rng;

use crate::domain::style::Style;

const ALTERNATIVES: &[(&str, &[&str])] = &[
    ("good", &["excellent", "fantastic", "great", "wonderful"]),
    ("bad", &["terrible", "awful", "poor", "subpar"]),
    ("big", &["large", "enormous", "massive", "substantial"]),
    ("small", &["tiny", "minute", "compact", "little"]),
    (
        "important",
        &["crucial", "vital", "essential", "significant"],
    ),
];

const FORMAL: &[(&str, &str)] = &[
    ("got", "obtained"),
    ("get", "acquire"),
    ("lots", "numerous"),
    ("thing", "item"),
    ("stuff", "materials"),
    ("okay", "acceptable"),
    ("ok", "acceptable"),
];

const SIMPLE: &[(&str, &str)] = &[
    ("additional", "more"),
    ("approximately", "about"),
    ("commence", "begin"),
    ("concerning", "about"),
    ("endeavor", "try"),
    ("frequently", "often"),
    ("fundamental", "basic"),
    ("consequently", "so"),
    ("sufficient", "enough"),
    ("subsequently", "later"),
];

/// 元の単語の大文字/小文字パターンを置換語に写す
fn match_case(source: &str, replacement: &str) -> String {
    if source == source.to_uppercase() {
        return replacement.to_uppercase();
    }
    if source.chars().next().is_some_and(char::is_uppercase) {
        let mut chars = replacement.chars();
        return match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
    }
    replacement.to_string()
}

fn lookup<'a>(table: &'a [(&str, &'a str)], word: &str) -> Option<&'a str> {
    let lower = word.to_lowercase();
    table
        .iter()
        .find(|(key, _)| *key == lower)
        .map(|(_, alt)| *alt)
}

/// 同義語からランダムに一つ選ぶ。該当なしならそのまま返す。
pub fn alternative_word<R: Rng + ?Sized>(word: &str, rng: &mut R) -> String {
    let lower = word.to_lowercase();
    match ALTERNATIVES.iter().find(|(key, _)| *key == lower) {
        Some((_, alts)) => match_case(word, alts[rng.gen_range(0..alts.len())]),
        None => word.to_string(),
    }
}

pub fn formal_word(word: &str) -> String {
    lookup(FORMAL, word)
        .map(|alt| match_case(word, alt))
        .unwrap_or_else(|| word.to_string())
}

pub fn simple_word(word: &str) -> String {
    lookup(SIMPLE, word)
        .map(|alt| match_case(word, alt))
        .unwrap_or_else(|| word.to_string())
}

/// 英字トークンごとにスタイルのテーブルを適用する。記号・空白はそのまま保持。
pub fn substitute_words<R: Rng + ?Sized>(text: &str, style: Style, rng: &mut R) -> String {
    if style == Style::Fluent {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut word = String::new();

    let flush = |word: &mut String, out: &mut String, rng: &mut R| {
        if word.is_empty() {
            return;
        }
        let replaced = match style {
            Style::Formal => formal_word(word),
            Style::Simple => simple_word(word),
            Style::Creative => alternative_word(word, rng),
            Style::Fluent => word.clone(),
        };
        out.push_str(&replaced);
        word.clear();
    };

    for ch in text.chars() {
        if ch.is_alphabetic() {
            word.push(ch);
        } else {
            flush(&mut word, &mut out, rng);
            out.push(ch);
        }
    }
    flush(&mut word, &mut out, rng);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn formal_preserves_case() {
        assert_eq!(formal_word("got"), "obtained");
        assert_eq!(formal_word("Got"), "Obtained");
        assert_eq!(formal_word("OK"), "ACCEPTABLE");
        assert_eq!(formal_word("oK"), "acceptable");
    }

    #[test]
    fn simple_lookup_is_case_insensitive() {
        assert_eq!(simple_word("Frequently"), "Often");
        assert_eq!(simple_word("COMMENCE"), "BEGIN");
        assert_eq!(simple_word("endeavor"), "try");
    }

    #[test]
    fn unknown_words_are_identity() {
        assert_eq!(formal_word("banana"), "banana");
        assert_eq!(simple_word("Banana"), "Banana");
        let mut rng = StdRng::seed_from_u64(7);
        assert_eq!(alternative_word("banana", &mut rng), "banana");
    }

    #[test]
    fn alternative_picks_from_table() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let alt = alternative_word("Good", &mut rng);
            assert!(
                ["Excellent", "Fantastic", "Great", "Wonderful"].contains(&alt.as_str()),
                "unexpected alternative {alt}"
            );
        }
    }

    #[test]
    fn substitute_keeps_punctuation() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            substitute_words("I got lots of stuff, OK?", Style::Formal, &mut rng),
            "I obtained numerous of materials, ACCEPTABLE?"
        );
        assert_eq!(
            substitute_words("Commence  the additional work.", Style::Simple, &mut rng),
            "Begin  the more work."
        );
    }

    #[test]
    fn fluent_is_untouched() {
        let mut rng = StdRng::seed_from_u64(1);
        let text = "Got a good thing.";
        assert_eq!(substitute_words(text, Style::Fluent, &mut rng), text);
    }
}
