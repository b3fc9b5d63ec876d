//! Stream consumer: sends one chat turn and reassembles the streamed reply.
//!
//! [`ChatClient::send`] issues the request and returns a stream of
//! [`TurnUpdate`]s: one `Delta` per decoded event while the reply grows,
//! then a single `Committed` when the terminal event arrives. Each call
//! owns its own [`Turn`] accumulator and frame decoder, so turns started
//! concurrently can never observe each other's fragments.

use std::pin::Pin;

use futures::{Stream, StreamExt};
use tracing::debug;

use crate::framing::FrameDecoder;
use crate::protocol::{ChatRequest, StreamEvent, split_paragraphs};

/// Progress of one turn, published after every decoded event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnUpdate {
    /// The in-progress, uncommitted reply for live display.
    Delta {
        /// Accumulated reply so far, split into paragraph units.
        paragraphs: Vec<String>,
    },
    /// The finalized reply; no further updates follow.
    Committed {
        /// The frozen reply, split into paragraph units.
        paragraphs: Vec<String>,
    },
}

/// Accumulates content fragments for a single turn.
///
/// A turn moves from streaming to committed when the terminal event is
/// observed; the buffer is frozen at that point.
#[derive(Debug, Default)]
pub struct Turn {
    buffer: String,
    committed: bool,
}

impl Turn {
    /// Create an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the accumulation buffer.
    ///
    /// Returns `None` once the turn is committed: the responder never
    /// sends a second terminal event, so anything after it is dropped.
    pub fn apply(&mut self, event: &StreamEvent) -> Option<TurnUpdate> {
        if self.committed {
            return None;
        }
        self.buffer.push_str(event.content_fragment());
        let paragraphs = split_paragraphs(&self.buffer);
        if event.is_terminal() {
            self.committed = true;
            Some(TurnUpdate::Committed { paragraphs })
        } else {
            Some(TurnUpdate::Delta { paragraphs })
        }
    }

    /// Whether the terminal event has been observed.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.committed
    }
}

/// HTTP client for the mock chat server.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    base_url: String,
}

impl ChatClient {
    /// Create a client against the given server base URL.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Send one user message and stream the reassembled reply.
    ///
    /// An invalid response status surfaces before any update is yielded;
    /// network and decode failures mid-stream surface as `Err` items. The
    /// connection is dropped as soon as the turn commits.
    pub async fn send(
        &self,
        content: impl Into<String>,
    ) -> anyhow::Result<Pin<Box<dyn Stream<Item = anyhow::Result<TurnUpdate>> + Send>>> {
        let url = format!("{}/chat", self.base_url.trim_end_matches('/'));
        let body = ChatRequest::user_turn(content);

        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let byte_stream = resp.bytes_stream();

        let out = async_stream::try_stream! {
            let mut decoder = FrameDecoder::new();
            let mut turn = Turn::new();

            futures::pin_mut!(byte_stream);
            while let Some(chunk) = byte_stream.next().await {
                let chunk = chunk?;
                for event in decoder.feed(&chunk)? {
                    if let Some(update) = turn.apply(&event) {
                        let done = matches!(update, TurnUpdate::Committed { .. });
                        yield update;
                        if done {
                            debug!("Turn committed, dropping stream");
                            return;
                        }
                    }
                }
            }
        };

        Ok(Box::pin(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{PARAGRAPH_DELIMITER, split_paragraphs};
    use crate::reply::{REPLY_TEXT, chunk_text};

    fn scripted_events() -> Vec<StreamEvent> {
        let mut events: Vec<StreamEvent> = chunk_text(REPLY_TEXT, 10)
            .into_iter()
            .map(|chunk| StreamEvent::content("turn-1", chunk))
            .collect();
        events.push(StreamEvent::terminal("turn-1"));
        events
    }

    fn drive(turn: &mut Turn, events: &[StreamEvent]) -> Option<Vec<String>> {
        let mut committed = None;
        for event in events {
            if let Some(TurnUpdate::Committed { paragraphs }) = turn.apply(event) {
                committed = Some(paragraphs);
            }
        }
        committed
    }

    #[test]
    fn exhaustive_sequence_commits_the_reply_paragraphs() {
        let mut turn = Turn::new();
        let committed = drive(&mut turn, &scripted_events()).expect("terminal event commits");

        assert_eq!(committed, split_paragraphs(REPLY_TEXT));
        assert!(turn.is_committed());
    }

    #[test]
    fn replaying_the_same_sequence_is_idempotent() {
        let events = scripted_events();
        let first = drive(&mut Turn::new(), &events);
        let second = drive(&mut Turn::new(), &events);
        assert_eq!(first, second);
    }

    #[test]
    fn deltas_expose_the_growing_uncommitted_reply() {
        let mut turn = Turn::new();

        let update = turn.apply(&StreamEvent::content("turn-1", "one"));
        assert_eq!(
            update,
            Some(TurnUpdate::Delta {
                paragraphs: vec!["one".to_string()]
            })
        );

        let body = format!("{PARAGRAPH_DELIMITER}two");
        let update = turn.apply(&StreamEvent::content("turn-1", &body));
        assert_eq!(
            update,
            Some(TurnUpdate::Delta {
                paragraphs: vec!["one".to_string(), "two".to_string()]
            })
        );
        assert!(!turn.is_committed());
    }

    #[test]
    fn events_after_the_terminal_are_dropped() {
        let mut turn = Turn::new();
        turn.apply(&StreamEvent::content("turn-1", "text"));
        turn.apply(&StreamEvent::terminal("turn-1"));

        assert_eq!(turn.apply(&StreamEvent::content("turn-1", "late")), None);
        assert_eq!(turn.apply(&StreamEvent::terminal("turn-1")), None);
    }

    #[test]
    fn terminal_fragment_is_appended_before_the_commit() {
        // The terminal event's content is empty by contract, but the
        // accumulator folds it in before checking the finish reason, the
        // same way fragments are handled.
        let mut turn = Turn::new();
        turn.apply(&StreamEvent::content("turn-1", "hello"));
        let update = turn.apply(&StreamEvent::terminal("turn-1"));
        assert_eq!(
            update,
            Some(TurnUpdate::Committed {
                paragraphs: vec!["hello".to_string()]
            })
        );
    }

    #[test]
    fn concurrent_turns_accumulate_independently() {
        let mut first = Turn::new();
        let mut second = Turn::new();

        first.apply(&StreamEvent::content("turn-1", "alpha"));
        second.apply(&StreamEvent::content("turn-2", "beta"));

        let first_done = first.apply(&StreamEvent::terminal("turn-1"));
        let second_done = second.apply(&StreamEvent::terminal("turn-2"));

        assert_eq!(
            first_done,
            Some(TurnUpdate::Committed {
                paragraphs: vec!["alpha".to_string()]
            })
        );
        assert_eq!(
            second_done,
            Some(TurnUpdate::Committed {
                paragraphs: vec!["beta".to_string()]
            })
        );
    }
}
