use serde::{Deserialize, Serialize};

// ─── Style ───────────────────────────────────────────────────────

/// リライトスタイル。未知のタグは `Fluent` に解決される。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    #[default]
    Fluent,
    Creative,
    Formal,
    Simple,
}

impl Style {
    pub const ALL: [Style; 4] = [Style::Fluent, Style::Creative, Style::Formal, Style::Simple];

    /// タグ文字列から Style を得る（完全一致、大文字小文字を区別）。
    pub fn parse(tag: &str) -> Option<Style> {
        match tag {
            "fluent" => Some(Style::Fluent),
            "creative" => Some(Style::Creative),
            "formal" => Some(Style::Formal),
            "simple" => Some(Style::Simple),
            _ => None,
        }
    }

    /// 未知のタグはデフォルトスタイルにフォールバックする。
    pub fn from_tag_or_default(tag: &str) -> Style {
        Self::parse(tag).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Style::Fluent => "fluent",
            Style::Creative => "creative",
            Style::Formal => "formal",
            Style::Simple => "simple",
        }
    }

    /// このスタイルに対応する外部 API パラメータ。
    pub fn mapping(&self) -> &'static StyleMapping {
        match self {
            Style::Fluent => &FLUENT,
            Style::Creative => &CREATIVE,
            Style::Formal => &FORMAL,
            Style::Simple => &SIMPLE,
        }
    }
}

impl std::fmt::Display for Style {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── StyleMapping ────────────────────────────────────────────────

/// humanizer API に渡すパラメータ三つ組。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StyleMapping {
    pub readability: &'static str,
    pub purpose: &'static str,
    pub strength: &'static str,
}

const FLUENT: StyleMapping = StyleMapping {
    readability: "University",
    purpose: "General Writing",
    strength: "Balanced",
};

const CREATIVE: StyleMapping = StyleMapping {
    readability: "Journalist",
    purpose: "Story",
    strength: "More Human",
};

const FORMAL: StyleMapping = StyleMapping {
    readability: "Doctorate",
    purpose: "Business Material",
    strength: "Quality",
};

const SIMPLE: StyleMapping = StyleMapping {
    readability: "High School",
    purpose: "General Writing",
    strength: "More Human",
};

/// スタイルタグを API パラメータに写像する。全入力に対して定義された全域関数。
pub fn map_style(tag: &str) -> StyleMapping {
    *Style::from_tag_or_default(tag).mapping()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_styles_map_to_documented_triples() {
        let cases = [
            ("fluent", "University", "General Writing", "Balanced"),
            ("creative", "Journalist", "Story", "More Human"),
            ("formal", "Doctorate", "Business Material", "Quality"),
            ("simple", "High School", "General Writing", "More Human"),
        ];
        for (tag, readability, purpose, strength) in cases {
            let m = map_style(tag);
            assert_eq!(m.readability, readability, "readability for {tag}");
            assert_eq!(m.purpose, purpose, "purpose for {tag}");
            assert_eq!(m.strength, strength, "strength for {tag}");
        }
    }

    #[test]
    fn unknown_style_falls_back_to_fluent() {
        assert_eq!(map_style("poetic"), map_style("fluent"));
        assert_eq!(map_style(""), map_style("fluent"));
        // 大文字は別タグ扱い
        assert_eq!(map_style("Formal"), map_style("fluent"));
    }

    #[test]
    fn parse_roundtrips_as_str() {
        for style in Style::ALL {
            assert_eq!(Style::parse(style.as_str()), Some(style));
        }
        assert_eq!(Style::parse("unknown"), None);
        assert_eq!(Style::default(), Style::Fluent);
    }
}
