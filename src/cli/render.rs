// src/cli/render.rs — Terminal output for transcripts and menus

use crossterm::style::Stylize;
use crossterm::{cursor, execute, terminal};
use std::io::Write;

use crate::session::{Message, Role, SessionMetadata};

/// "User: ..." in red, "Assistant: ..." in blue, anything else in green.
pub fn format_message(message: &Message) -> String {
    let label = role_label(message.role());
    let styled = match message.role() {
        Role::User => label.red(),
        Role::Assistant => label.blue(),
        Role::Tool => label.green(),
    };
    format!("{}: {}", styled.bold(), message.content())
}

fn role_label(role: Role) -> String {
    let name = role.to_string();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => name,
    }
}

pub fn print_message(message: &Message) {
    println!("{}", format_message(message));
}

pub fn print_transcript(messages: &[Message]) {
    for m in messages {
        print_message(m);
    }
}

/// Menu label for a session: name with its last-modified time.
pub fn session_label(meta: &SessionMetadata) -> String {
    format!(
        "{}  ({})",
        meta.name,
        meta.last_modified
            .with_timezone(&chrono::Local)
            .format("%Y-%m-%d %H:%M")
    )
}

pub fn clear_terminal() {
    let mut out = std::io::stdout();
    let _ = execute!(
        out,
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    );
    out.flush().ok();
}

pub fn print_welcome_message() {
    clear_terminal();
    println!("Hello, I'm your Professor. Ready to learn?\n");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_label_capitalized() {
        assert_eq!(role_label(Role::User), "User");
        assert_eq!(role_label(Role::Assistant), "Assistant");
        assert_eq!(role_label(Role::Tool), "Tool");
    }

    #[test]
    fn test_format_message_contains_label_and_content() {
        let m = Message::assistant("Derivatives measure change.").unwrap();
        let s = format_message(&m);
        assert!(s.contains("Assistant"));
        assert!(s.ends_with(": Derivatives measure change."));
    }

    #[test]
    fn test_session_label_includes_name() {
        let meta = SessionMetadata {
            id: crate::session::SessionId::new(),
            name: "Calculus".into(),
            last_modified: chrono::Utc::now(),
        };
        assert!(session_label(&meta).starts_with("Calculus  ("));
    }
}
