// src/cli/chat.rs — Interactive menus and the per-session REPL

use inquire::InquireError;
use std::fmt;

use super::render;
use crate::session::{SessionController, SessionId, SessionMetadata, SessionStore};

enum TopMenuItem {
    Chat,
    Quit,
}

impl fmt::Display for TopMenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TopMenuItem::Chat => "Chat",
            TopMenuItem::Quit => "Quit",
        })
    }
}

enum ChatMenuItem {
    Session(SessionMetadata),
    New,
    Back,
}

impl fmt::Display for ChatMenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatMenuItem::Session(meta) => f.write_str(&render::session_label(meta)),
            ChatMenuItem::New => f.write_str("New Chat"),
            ChatMenuItem::Back => f.write_str("Back"),
        }
    }
}

/// Run the interactive client until the user quits.
///
/// With `start`, that session is opened first; the menus follow once the
/// user leaves it.
pub async fn run_chat(
    store: &mut SessionStore,
    controller: &SessionController<'_>,
    start: Option<SessionId>,
) -> anyhow::Result<()> {
    render::print_welcome_message();

    for skipped in store.skipped() {
        eprintln!(
            "[warn] skipped unreadable session file {}: {}",
            skipped.path.display(),
            skipped.reason
        );
    }

    if let Some(id) = start {
        open_session(store, controller, id).await?;
    }

    loop {
        let choice = match inquire::Select::new("", vec![TopMenuItem::Chat, TopMenuItem::Quit])
            .without_help_message()
            .prompt()
        {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };

        match choice {
            TopMenuItem::Chat => chat_menu(store, controller).await?,
            TopMenuItem::Quit => break,
        }
    }

    Ok(())
}

async fn chat_menu(
    store: &mut SessionStore,
    controller: &SessionController<'_>,
) -> anyhow::Result<()> {
    loop {
        let mut items: Vec<ChatMenuItem> = store
            .list_sessions()
            .into_iter()
            .map(ChatMenuItem::Session)
            .collect();
        items.push(ChatMenuItem::New);
        items.push(ChatMenuItem::Back);
        let cursor = items.len() - 2;

        let choice = match inquire::Select::new("Chats", items)
            .with_starting_cursor(cursor)
            .with_page_size(15)
            .prompt()
        {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(())
            }
            Err(e) => return Err(e.into()),
        };

        match choice {
            ChatMenuItem::Session(meta) => open_session(store, controller, meta.id).await?,
            ChatMenuItem::New => {
                let name = match inquire::Text::new("Chat name:")
                    .with_default("New Chat")
                    .prompt()
                {
                    Ok(name) => name,
                    Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                        continue
                    }
                    Err(e) => return Err(e.into()),
                };
                let name = name.trim();
                let name = if name.is_empty() { "New Chat" } else { name };
                store.create(name);
                render::clear_terminal();
                session_loop(store, controller).await;
            }
            ChatMenuItem::Back => return Ok(()),
        }
    }
}

async fn open_session(
    store: &mut SessionStore,
    controller: &SessionController<'_>,
    id: SessionId,
) -> anyhow::Result<()> {
    match store.select(id) {
        Ok(messages) => {
            render::clear_terminal();
            render::print_transcript(messages);
        }
        Err(e) => {
            eprintln!("[error] {}", e);
            return Ok(());
        }
    }
    session_loop(store, controller).await;
    Ok(())
}

/// Free-text turns on the selected session until end of input.
async fn session_loop(store: &mut SessionStore, controller: &SessionController<'_>) {
    while let Some(input) = read_input("User message: ") {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }
        exchange(store, controller, trimmed).await;
    }
    println!();
}

async fn exchange(store: &mut SessionStore, controller: &SessionController<'_>, input: &str) {
    loop {
        match controller.turn(store, input).await {
            Ok(reply) => {
                render::print_message(&reply);
                return;
            }
            Err(e) if e.is_retriable_completion() => {
                eprintln!("[error] {}", e);
                if !confirm("Retry this message?") {
                    return;
                }
            }
            Err(e) if e.is_retriable_persist() => {
                if let Some(reply) = store.selected_messages().last() {
                    render::print_message(reply);
                }
                eprintln!("[error] {}", e);
                retry_persist(store);
                return;
            }
            Err(e) => {
                eprintln!("[error] {}", e);
                return;
            }
        }
    }
}

fn retry_persist(store: &mut SessionStore) {
    while confirm("Retry saving this session?") {
        match store.persist_selected() {
            Ok(()) => {
                eprintln!("  Saved.");
                return;
            }
            Err(e) => eprintln!("[error] {}", e),
        }
    }
    tracing::warn!("Session left unsaved after a failed write");
}

fn confirm(question: &str) -> bool {
    inquire::Confirm::new(question)
        .with_default(true)
        .prompt()
        .unwrap_or(false)
}

/// Read one line from stdin. `None` on end of input (Ctrl+D).
fn read_input(prompt: &str) -> Option<String> {
    use std::io::{self, BufRead, Write};

    print!("{}", prompt);
    io::stdout().flush().ok();

    let stdin = io::stdin();
    let mut line = String::new();
    match stdin.lock().read_line(&mut line) {
        Ok(0) => None, // EOF
        Ok(_) => Some(line),
        Err(_) => None,
    }
}
