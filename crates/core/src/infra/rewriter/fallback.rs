use rand::Rng;

use super::lexicon;
use crate::domain::rewrite::{RewriteRequest, RewriteResult, RewriteSource};

/// ローカルフォールバック。ネットワークを使わず、必ず成功する。
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackRewriter {
    /// 文の正規化後にスタイル別の単語置換を行うか
    substitute_words: bool,
}

impl FallbackRewriter {
    pub fn new(substitute_words: bool) -> Self {
        Self { substitute_words }
    }

    pub fn rewrite(&self, request: &RewriteRequest) -> RewriteResult {
        self.rewrite_with_rng(request, &mut rand::thread_rng())
    }

    pub fn rewrite_with_rng<R: Rng + ?Sized>(
        &self,
        request: &RewriteRequest,
        rng: &mut R,
    ) -> RewriteResult {
        let normalized = normalize_sentences(request.text());
        let text = if self.substitute_words {
            lexicon::substitute_words(&normalized, request.style(), rng)
        } else {
            normalized
        };
        RewriteResult::new(text, RewriteSource::Fallback)
    }
}

fn is_terminator(ch: char) -> bool {
    matches!(ch, '.' | '!' | '?')
}

/// 文を抽出する: 非終端文字の連続 + 一つ以上の終端記号。
/// 先頭の孤立した終端記号と、最後の終端記号以降の断片は文に含まれない。
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start: Option<usize> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        if !is_terminator(ch) {
            start.get_or_insert(i);
            continue;
        }
        let Some(s) = start.take() else {
            continue;
        };
        let mut end = i + ch.len_utf8();
        while let Some(&(j, next)) = chars.peek() {
            if !is_terminator(next) {
                break;
            }
            end = j + next.len_utf8();
            chars.next();
        }
        sentences.push(&text[s..end]);
    }

    sentences
}

/// 文ごとにトリム + 空白圧縮し、単一スペースで連結する。
/// 文が見つからなければ入力全体を一文として扱う。冪等。
pub fn normalize_sentences(text: &str) -> String {
    let mut sentences = split_sentences(text);
    if sentences.is_empty() {
        sentences.push(text);
    }

    sentences
        .into_iter()
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join(" ")
}
