use crate::core::evaluate::{evaluate, extract_expression, Number};
use crate::utils::error::{Result, ThoughtError};

/// Per-connection state: bytes not yet answered and the latest result.
#[derive(Debug)]
pub struct Session {
    buffer: Vec<u8>,
    result: Number,
    terminator: Vec<u8>,
    max_pending_bytes: usize,
}

impl Session {
    pub fn new(terminator: &str, max_pending_bytes: usize) -> Self {
        Self {
            buffer: Vec::new(),
            result: Number::default(),
            terminator: terminator.as_bytes().to_vec(),
            max_pending_bytes,
        }
    }

    pub fn result(&self) -> Number {
        self.result
    }

    pub fn pending_bytes(&self) -> usize {
        self.buffer.len()
    }

    /// Appends a chunk and answers every action frame it completes, in order.
    /// Bytes after the last terminator stay buffered as the next partial frame.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<String>> {
        self.buffer.extend_from_slice(chunk);

        let mut replies = Vec::new();
        while let Some(end) = self.frame_end() {
            let frame: Vec<u8> = self.buffer.drain(..end).collect();
            self.answer(&String::from_utf8_lossy(&frame));
            replies.push(self.result.to_string());
        }

        if self.buffer.len() > self.max_pending_bytes {
            return Err(ThoughtError::ProcessingError {
                message: format!(
                    "pending input exceeds {} bytes without an action frame",
                    self.max_pending_bytes
                ),
            });
        }
        if replies.is_empty() {
            tracing::trace!("buffered {} bytes", self.buffer.len());
        }
        Ok(replies)
    }

    /// Length of the first complete frame, terminator included.
    fn frame_end(&self) -> Option<usize> {
        if self.terminator.is_empty() {
            return None;
        }
        self.buffer
            .windows(self.terminator.len())
            .position(|window| window == self.terminator.as_slice())
            .map(|start| start + self.terminator.len())
    }

    fn answer(&mut self, frame: &str) {
        tracing::debug!("action frame received: {}", frame);

        match extract_expression(frame) {
            Some(thought) => match evaluate(&thought) {
                Ok(value) => {
                    tracing::info!(
                        "{} {} {} = {}",
                        thought.lhs,
                        thought.operator,
                        thought.rhs,
                        value
                    );
                    self.result = value;
                }
                Err(e) => tracing::warn!("keeping previous result: {}", e),
            },
            None => tracing::debug!("no single expression in frame, keeping previous result"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::DEFAULT_ACTION_TERMINATOR;

    fn session() -> Session {
        Session::new(DEFAULT_ACTION_TERMINATOR, 1024)
    }

    #[test]
    fn test_no_reply_until_action_frame() {
        let mut session = session();
        assert!(session.push(br#"{"thought": [13, "/", 4"#).unwrap().is_empty());
        assert!(session.push(br#", "=", "@"]}"#).unwrap().is_empty());
        assert_eq!(session.push(br#"{"action": 0}"#).unwrap(), vec!["3.25"]);
        assert_eq!(session.pending_bytes(), 0);
    }

    #[test]
    fn test_initial_result_is_zero() {
        let mut session = session();
        assert_eq!(
            session.push(br#"nothing useful {"action": 0}"#).unwrap(),
            vec!["0"]
        );
    }

    #[test]
    fn test_result_persists_across_frames() {
        let mut session = session();
        session.push(br#"[3, "*", 4, "=", "@"] {"action": 0}"#).unwrap();
        assert_eq!(session.result(), Number::Whole(12));

        // division by zero leaves the previous value in place
        let reply = session.push(br#"[3, "/", 0, "=", "@"] {"action": 0}"#).unwrap();
        assert_eq!(reply, vec!["12"]);

        let reply = session.push(br#"[3, "-", 5, "=", "@"] {"action": 0}"#).unwrap();
        assert_eq!(reply, vec!["-2"]);
    }

    #[test]
    fn test_terminator_split_across_chunks() {
        let mut session = session();
        assert!(session.push(br#"[1, "+", 1 {"act"#).unwrap().is_empty());
        assert_eq!(session.push(br#"ion": 0}"#).unwrap(), vec!["2"]);
    }

    #[test]
    fn test_frames_in_one_chunk_are_answered_in_order() {
        let mut session = session();
        let replies = session
            .push(br#"[1, "+", 2 {"action": 0}[3, "+", 4 {"action": 0}"#)
            .unwrap();
        assert_eq!(replies, vec!["3", "7"]);
        assert_eq!(session.pending_bytes(), 0);
    }

    #[test]
    fn test_trailing_partial_frame_is_kept() {
        let mut session = session();
        let replies = session.push(br#"[2, "*", 5 {"action": 0}[6, "-""#).unwrap();
        assert_eq!(replies, vec!["10"]);
        assert_eq!(session.pending_bytes(), br#"[6, "-""#.len());

        assert_eq!(session.push(br#", 1 {"action": 0}"#).unwrap(), vec!["5"]);
    }

    #[test]
    fn test_pending_limit() {
        let mut session = Session::new(DEFAULT_ACTION_TERMINATOR, 8);
        assert!(session.push(b"12345678").unwrap().is_empty());
        assert!(matches!(
            session.push(b"9"),
            Err(ThoughtError::ProcessingError { .. })
        ));
    }
}
