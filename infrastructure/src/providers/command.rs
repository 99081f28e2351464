//! Command responder: runs a local program per call.
//!
//! The prompt (with any rendered context) is written to the program's
//! stdin and its stdout is the reply. Useful for local model runners
//! such as `ollama run <model>` or `llm -m <model>`.

use super::prompt_with_context;
use async_trait::async_trait;
use deliberation_application::{Responder, ResponderError};
use deliberation_domain::{Generation, GenerationContext, ResponderInfo};
use std::process::Stdio;
use std::time::Instant;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

/// Upper bound on stderr echoed into an error message
const MAX_STDERR_CHARS: usize = 500;

pub struct CommandResponder {
    info: ResponderInfo,
    program: String,
    args: Vec<String>,
}

impl CommandResponder {
    pub fn new(info: ResponderInfo, program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            info,
            program: program.into(),
            args,
        }
    }
}

#[async_trait]
impl Responder for CommandResponder {
    fn info(&self) -> &ResponderInfo {
        &self.info
    }

    async fn generate(
        &self,
        prompt: &str,
        context: Option<&GenerationContext>,
    ) -> Result<Generation, ResponderError> {
        let start = Instant::now();
        let input = prompt_with_context(prompt, context);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                ResponderError::Provider(format!("Failed to spawn {}: {}", self.program, e))
            })?;

        // stdin is written concurrently with draining stdout and stderr
        let writer = child.stdin.take().map(|mut stdin| {
            let program = self.program.clone();
            tokio::spawn(async move {
                // A program may exit without reading its input; its exit
                // status is what matters.
                if let Err(e) = stdin.write_all(input.as_bytes()).await {
                    debug!("{}: could not write prompt to stdin: {}", program, e);
                }
            })
        });

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ResponderError::Transport(format!("{}: {}", self.program, e)))?;
        if let Some(writer) = writer {
            if let Err(e) = writer.await {
                debug!("{}: stdin writer task failed: {}", self.program, e);
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr: String = stderr.trim().chars().take(MAX_STDERR_CHARS).collect();
            return Err(ResponderError::Provider(format!(
                "{} exited with {}: {}",
                self.program, output.status, stderr
            )));
        }

        let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if text.is_empty() {
            return Err(ResponderError::InvalidResponse(format!(
                "{} produced no output",
                self.program
            )));
        }

        Ok(Generation::new(text, start.elapsed().as_millis() as u64))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn responder(program: &str, args: &[&str]) -> CommandResponder {
        CommandResponder::new(
            ResponderInfo::new("local", "local", "command"),
            program,
            args.iter().map(|a| a.to_string()).collect(),
        )
    }

    #[tokio::test]
    async fn test_stdout_is_the_reply() {
        let generation = responder("cat", &[])
            .generate("Use a queue.", None)
            .await
            .unwrap();
        assert_eq!(generation.text, "Use a queue.");
        assert!(generation.token_count.is_none());
    }

    #[tokio::test]
    async fn test_large_prompt_is_streamed_through() {
        let prompt = "peer position ".repeat(25_000);
        let generation = tokio::time::timeout(
            std::time::Duration::from_secs(10),
            responder("cat", &[]).generate(&prompt, None),
        )
        .await
        .expect("cat should finish")
        .unwrap();
        assert_eq!(generation.text.len(), prompt.trim_end().len());
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_provider_error() {
        let err = responder("sh", &["-c", "echo boom >&2; exit 3"])
            .generate("Q?", None)
            .await
            .unwrap_err();
        match err {
            ResponderError::Provider(msg) => assert!(msg.contains("boom")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_output_is_invalid() {
        let err = responder("true", &[]).generate("Q?", None).await.unwrap_err();
        assert!(matches!(err, ResponderError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_missing_program() {
        let err = responder("definitely-not-a-real-program-4711", &[])
            .generate("Q?", None)
            .await
            .unwrap_err();
        assert!(matches!(err, ResponderError::Provider(_)));
    }
}
