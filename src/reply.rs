//! The scripted reply and its chunking.
//!
//! The responder streams one predetermined assistant reply. Paragraph
//! boundaries inside it use the literal `\n\n` escape sequence so the text
//! stays single-line once JSON-encoded.

/// Canned assistant reply emitted for every valid request.
pub const REPLY_TEXT: &str = concat!(
    "LLM(Large Language Model)은 방대한 양의 텍스트 데이터를 학습하여 언어를 이해하고 생성할 수 있는 인공지능 모델을 말합니다.\\n\\n \
     이 모델들은 수십억 개 이상의 매개변수로 구성되어, 사람의 언어 패턴을 학습하고 예측하는 데 탁월한 성능을 보입니다.\\n\\n \
     LLM은 일반적으로 Transformer 구조를 기반으로 하며, 그중 GPT(Generative Pre-trained Transformer)와 BERT(Bidirectional Encoder Representations from Transformers) 같은 모델들이 대표적입니다.\\n\\n",
    "LLM(Large Language Model)은 방대한 양의 텍스트 데이터를 학습하여 언어를 이해하고 생성할 수 있는 인공지능 모델을 말합니다.\\n\\n \
     이 모델들은 수십억 개 이상의 매개변수로 구성되어, 사람의 언어 패턴을 학습하고 예측하는 데 탁월한 성능을 보입니다.\\n\\n \
     LLM은 일반적으로 Transformer 구조를 기반으로 하며, 그중 GPT(Generative Pre-trained Transformer)와 BERT(Bidirectional Encoder Representations from Transformers) 같은 모델들이 대표적입니다.\\n\\n",
);

/// Split `text` into consecutive slices of at most `max_chars` characters.
///
/// Slicing is char-based so every slice stays on a UTF-8 boundary, and
/// concatenating the slices in emission order reconstructs `text` exactly.
#[must_use]
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let split = rest
            .char_indices()
            .nth(max_chars)
            .map_or(rest.len(), |(idx, _)| idx);
        let (head, tail) = rest.split_at(split);
        chunks.push(head);
        rest = tail;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PARAGRAPH_DELIMITER;

    #[test]
    fn chunks_reconstruct_the_reply_exactly() {
        let chunks = chunk_text(REPLY_TEXT, 10);
        assert_eq!(chunks.concat(), REPLY_TEXT);
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
        assert!(chunks.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn chunking_respects_multibyte_boundaries() {
        let chunks = chunk_text("가나다라마바사", 3);
        assert_eq!(chunks, vec!["가나다", "라마바", "사"]);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("", 10).is_empty());
    }

    #[test]
    fn reply_contains_escaped_paragraph_breaks_only() {
        assert!(REPLY_TEXT.contains(PARAGRAPH_DELIMITER));
        assert!(!REPLY_TEXT.contains('\n'));
        assert!(REPLY_TEXT.ends_with(PARAGRAPH_DELIMITER));
    }
}
