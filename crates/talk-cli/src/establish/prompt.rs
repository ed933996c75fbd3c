//! Accept prompt on the controlling terminal

use std::io;

use async_trait::async_trait;

use talk_core::traits::{answer_is_yes, Prompt};
use talk_core::ConnectionRequest;

use crate::output::print_question;

/// Asks on stdout and reads the answer line from stdin
#[derive(Debug, Default)]
pub struct StdinPrompt;

#[async_trait]
impl Prompt for StdinPrompt {
    async fn confirm(&mut self, request: &ConnectionRequest) -> io::Result<bool> {
        print_question(&format!("Mytalk request from {}. Accept (y/n)? ", request));

        let answer = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            io::stdin().read_line(&mut line).map(|_| line)
        })
        .await
        .map_err(io::Error::other)??;

        let accepted = answer_is_yes(&answer);
        tracing::debug!(accepted, "Operator answered {:?}", answer.trim_end());
        Ok(accepted)
    }
}
