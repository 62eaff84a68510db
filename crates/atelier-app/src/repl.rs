//! Terminal chat front end for a [`ChatSession`].

use tokio::io::{AsyncBufReadExt, BufReader};

use atelier_chat::{ChatMessage, ChatSession, Role};
use atelier_core::translations;

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Send(String),
    Voice,
    Clear,
    Open,
    Close,
    State,
    Help,
    Quit,
    Unknown(String),
    Empty,
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return Input::Send(line.to_string());
    };
    match command.to_ascii_lowercase().as_str() {
        "voice" => Input::Voice,
        "clear" => Input::Clear,
        "open" => Input::Open,
        "close" => Input::Close,
        "state" => Input::State,
        "help" | "?" => Input::Help,
        "quit" | "exit" | "q" => Input::Quit,
        _ => Input::Unknown(line.to_string()),
    }
}

const HELP: &str = "Commands: /voice /clear /open /close /state /help /quit";

fn render(message: &ChatMessage) -> String {
    let who = match message.role {
        Role::User => "you",
        Role::Assistant => "assistant",
        Role::System => "system",
    };
    format!("[{}] {}: {}", message.timestamp.format("%H:%M"), who, message.content)
}

/// What happened to a line the visitor tried to send.
#[derive(Debug)]
enum Submitted {
    /// The chat is closed; nothing was sent and the pending input is kept.
    Closed,
    /// The assistant's reply, or `None` when there was nothing to send.
    Sent(Option<ChatMessage>),
}

/// Send `typed`, or the pending voice input when `typed` is `None`.
async fn submit(session: &ChatSession, typed: Option<String>) -> Submitted {
    if !session.state().is_open {
        return Submitted::Closed;
    }
    let pending = session.take_pending_input();
    let text = typed.unwrap_or(pending);
    Submitted::Sent(session.send_message(&text).await)
}

fn print_submitted(submitted: Submitted) {
    match submitted {
        Submitted::Closed => println!("(chat is closed; /open to reopen)"),
        Submitted::Sent(Some(reply)) => println!("{}", render(&reply)),
        Submitted::Sent(None) => {}
    }
}

/// Read lines from stdin until EOF or `/quit`.
pub async fn run(session: ChatSession) -> std::io::Result<()> {
    let strings = &translations(session.locale()).chat;
    session.open();
    println!("{}", strings.greeting);
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_input(&line) {
            // Enter on an empty line sends whatever voice input left in the box.
            Input::Empty => print_submitted(submit(&session, None).await),
            Input::Send(text) => print_submitted(submit(&session, Some(text)).await),
            Input::Voice => {
                let outcome = session.voice_input().await;
                match outcome.notice() {
                    Some(notice) => println!("({notice})"),
                    None => println!("({outcome:?})"),
                }
                let pending = session.pending_input();
                if !pending.is_empty() {
                    println!("> {pending}  (press Enter to send)");
                }
            }
            Input::Clear => {
                session.clear_messages();
                println!("(history cleared)");
            }
            Input::Open => session.open(),
            Input::Close => session.close(),
            Input::State => {
                let state = session.state();
                println!("({}, {} messages)", state.phase(), state.messages.len());
                for message in &state.messages {
                    println!("  {}", render(message));
                }
            }
            Input::Help => println!("{HELP}"),
            Input::Quit => break,
            Input::Unknown(command) => println!("Unknown command {command}. {HELP}"),
        }
    }

    tracing::debug!(
        messages = session.state().messages.len(),
        "Chat session ended"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use atelier_chat::{ReplyGenerator, ReplyService};
    use atelier_core::Locale;

    fn session() -> ChatSession {
        let generator: Arc<dyn ReplyGenerator> = Arc::new(ReplyService::new(None));
        ChatSession::new(generator, Locale::En)
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(parse_input("   "), Input::Empty);
        assert_eq!(
            parse_input("  What are your prices? "),
            Input::Send("What are your prices?".to_string())
        );
        assert_eq!(parse_input("/VOICE"), Input::Voice);
        assert_eq!(parse_input("/q"), Input::Quit);
        assert_eq!(parse_input("/nope"), Input::Unknown("/nope".to_string()));
    }

    #[test]
    fn test_render_message() {
        let line = render(&ChatMessage::assistant("- Starter"));
        assert!(line.contains("assistant: - Starter"));
    }

    #[tokio::test]
    async fn test_closed_chat_keeps_pending_voice_input() {
        let session = session();
        session.voice().set_pending_input("how much is a logo?");

        assert!(matches!(submit(&session, None).await, Submitted::Closed));
        assert!(session.state().messages.is_empty());
        assert_eq!(session.pending_input(), "how much is a logo?");
    }

    #[tokio::test]
    async fn test_closed_chat_refuses_typed_text() {
        let session = session();
        assert!(matches!(
            submit(&session, Some("hello".to_string())).await,
            Submitted::Closed
        ));
        assert!(session.state().messages.is_empty());
    }

    #[tokio::test]
    async fn test_empty_line_sends_pending_voice_input() {
        let session = session();
        session.open();
        session.voice().set_pending_input("how much is a logo?");

        let submitted = submit(&session, None).await;
        assert!(matches!(submitted, Submitted::Sent(Some(_))));
        assert_eq!(session.pending_input(), "");
        let state = session.state();
        assert_eq!(state.messages[0].role, Role::User);
        assert_eq!(state.messages[0].content, "how much is a logo?");
    }

    #[tokio::test]
    async fn test_empty_line_without_pending_input_sends_nothing() {
        let session = session();
        session.open();
        assert!(matches!(submit(&session, None).await, Submitted::Sent(None)));
        assert!(session.state().messages.is_empty());
    }
}
