//! Interactive question/answer loop.
//!
//! One question is answered completely before the next one is read. Typing
//! `exit` (any case) or closing stdin ends the loop.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::agent::{AgentDefinition, Runner};
use crate::tools::UserContext;

const PROMPT: &str = "Write a question for the Deep Search Agent (or 'exit' to stop): ";
const RULE_WIDTH: usize = 50;

/// Answers one question per call.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn respond(&self, question: &str) -> anyhow::Result<String>;
}

/// The research agent bound to its runner and the session's user.
pub struct ResearchSession {
    runner: Runner,
    agent: AgentDefinition,
    user: UserContext,
}

impl ResearchSession {
    pub fn new(runner: Runner, agent: AgentDefinition, user: UserContext) -> Self {
        Self {
            runner,
            agent,
            user,
        }
    }
}

#[async_trait]
impl Responder for ResearchSession {
    async fn respond(&self, question: &str) -> anyhow::Result<String> {
        let result = self.runner.run(&self.agent, question, &self.user).await?;
        for entry in &result.log {
            tracing::debug!(
                "[{}] {:?}: {}",
                entry.timestamp,
                entry.entry_type,
                entry.content
            );
        }
        tracing::info!("answered with {} tool calls", result.tool_calls());
        Ok(result.final_output)
    }
}

/// Whether a line read from the user is the exit command.
pub fn is_exit_command(line: &str) -> bool {
    line.trim_end_matches(['\r', '\n']).eq_ignore_ascii_case("exit")
}

/// Write `text` one character at a time, pausing `delay` after each, then a newline.
pub async fn stream_output<W>(writer: &mut W, text: &str, delay: Duration) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        writer.write_all(ch.encode_utf8(&mut buf).as_bytes()).await?;
        writer.flush().await?;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
    writer.write_all(b"\n").await?;
    writer.flush().await
}

async fn write_line<W>(writer: &mut W, line: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(line.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

async fn print_banner<W>(writer: &mut W) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    write_line(writer, "\n🔎 DEEP SEARCH AGENT").await?;
    write_line(writer, &"-".repeat(30)).await?;
    write_line(
        writer,
        "A research agent that answers questions with multi-step web searches.",
    )
    .await?;
    write_line(writer, "Answers are printed as they are rendered.").await
}

/// Run the loop until the exit command or end of input.
///
/// Errors from the responder are returned unchanged and end the loop.
pub async fn run_loop<R, W>(
    reader: R,
    writer: &mut W,
    responder: &dyn Responder,
    delay: Duration,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let rule = "=".repeat(RULE_WIDTH);

    print_banner(writer).await?;

    loop {
        writer.write_all(PROMPT.as_bytes()).await?;
        writer.flush().await?;

        let Some(question) = lines.next_line().await? else {
            tracing::debug!("stdin closed");
            write_line(writer, "").await?;
            break;
        };

        if is_exit_command(&question) {
            write_line(writer, "Exiting the Deep Search Agent. Goodbye!").await?;
            break;
        }

        write_line(writer, "🔎 Searching for answers... Please wait.").await?;

        let answer = responder.respond(&question).await?;

        write_line(writer, &format!("\n{}", rule)).await?;
        write_line(writer, "Agent's final output:\n").await?;
        stream_output(writer, &answer, delay).await?;
        write_line(writer, &rule).await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::io::BufReader;

    struct Recorder {
        questions: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                questions: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Responder for Recorder {
        async fn respond(&self, question: &str) -> anyhow::Result<String> {
            self.questions.lock().unwrap().push(question.to_string());
            Ok(format!("answer to {}", question))
        }
    }

    struct Failing;

    #[async_trait]
    impl Responder for Failing {
        async fn respond(&self, _: &str) -> anyhow::Result<String> {
            Err(anyhow::anyhow!("provider unreachable"))
        }
    }

    #[test]
    fn exit_matches_any_case() {
        assert!(is_exit_command("exit"));
        assert!(is_exit_command("EXIT\n"));
        assert!(is_exit_command("ExIt\r\n"));
        assert!(!is_exit_command("exit now"));
        assert!(!is_exit_command(" exit"));
    }

    #[tokio::test]
    async fn exit_never_reaches_the_responder() {
        for input in ["exit\n", "EXIT\n", "Exit\n"] {
            let stdin = tokio_test::io::Builder::new().read(input.as_bytes()).build();
            let recorder = Recorder::new();
            let mut out = Vec::new();

            run_loop(BufReader::new(stdin), &mut out, &recorder, Duration::ZERO)
                .await
                .unwrap();

            assert!(recorder.questions.lock().unwrap().is_empty());
            let out = String::from_utf8(out).unwrap();
            assert!(out.ends_with("Exiting the Deep Search Agent. Goodbye!\n"));
        }
    }

    #[tokio::test]
    async fn answers_each_question_before_reading_the_next() {
        let stdin = tokio_test::io::Builder::new()
            .read(b"what is rust?\n")
            .read(b"who made tokio?\n")
            .read(b"exit\n")
            .build();
        let recorder = Recorder::new();
        let mut out = Vec::new();

        run_loop(BufReader::new(stdin), &mut out, &recorder, Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(
            *recorder.questions.lock().unwrap(),
            vec!["what is rust?", "who made tokio?"]
        );

        let out = String::from_utf8(out).unwrap();
        let first = out.find("answer to what is rust?\n").unwrap();
        let second = out.find("answer to who made tokio?\n").unwrap();
        assert!(first < second);
        assert_eq!(out.matches(&"=".repeat(50)).count(), 4);
    }

    #[tokio::test]
    async fn end_of_input_exits_cleanly() {
        let stdin = tokio_test::io::Builder::new().build();
        let recorder = Recorder::new();
        let mut out = Vec::new();

        run_loop(BufReader::new(stdin), &mut out, &recorder, Duration::ZERO)
            .await
            .unwrap();

        assert!(recorder.questions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn responder_errors_end_the_loop() {
        let stdin = tokio_test::io::Builder::new().read(b"anything\n").build();
        let mut out = Vec::new();

        let err = run_loop(BufReader::new(stdin), &mut out, &Failing, Duration::ZERO)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("provider unreachable"));
    }

    #[tokio::test]
    async fn stream_output_writes_every_char_then_one_newline() {
        let text = "Héllo, wörld! 🔎\nline two";
        let mut out = Vec::new();

        stream_output(&mut out, text, Duration::ZERO).await.unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.chars().count(), text.chars().count() + 1);
        assert_eq!(out, format!("{}\n", text));
    }

    #[tokio::test]
    async fn stream_output_of_empty_text_is_just_a_newline() {
        let mut out = Vec::new();
        stream_output(&mut out, "", Duration::from_millis(1))
            .await
            .unwrap();
        assert_eq!(out, b"\n");
    }
}
