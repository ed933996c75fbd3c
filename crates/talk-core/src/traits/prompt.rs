//! Operator decision on incoming requests

use std::io;

use async_trait::async_trait;

use crate::types::ConnectionRequest;

/// Asks the operator whether to accept a talk request
#[async_trait]
pub trait Prompt: Send {
    /// Returns true to accept `request`
    async fn confirm(&mut self, request: &ConnectionRequest) -> io::Result<bool>;
}

/// Interpret an operator's answer line.
///
/// Only the first character counts; `y` or `Y` accepts, anything else
/// (including an empty line) rejects.
pub fn answer_is_yes(line: &str) -> bool {
    line.chars()
        .next()
        .map(|c| c.eq_ignore_ascii_case(&'y'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answers() {
        assert!(answer_is_yes("y\n"));
        assert!(answer_is_yes("Y"));
        assert!(answer_is_yes("yes please"));
        assert!(answer_is_yes("yikes"));
        assert!(!answer_is_yes("n\n"));
        assert!(!answer_is_yes("\n"));
        assert!(!answer_is_yes(""));
        assert!(!answer_is_yes(" y"));
        assert!(!answer_is_yes("ok"));
    }
}
