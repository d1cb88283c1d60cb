//! Interactive chat client for the wayfarer travel-planning service.
//!
//! This binary provides a streaming REPL for planning trips with the
//! assistant.
//!
//! # Usage
//!
//! ```bash
//! # Basic usage with default settings
//! wayfarer-chat
//!
//! # Point at another server
//! wayfarer-chat --api-url https://travel.example.com/api/v1
//!
//! # Persist the login session between runs
//! wayfarer-chat --session-file ~/.wayfarer-session.json
//!
//! # Disable colors (useful for piping output)
//! wayfarer-chat --no-color
//! ```
//!
//! # Commands
//!
//! While chatting, you can use slash commands:
//! - `/help` - Show available commands
//! - `/login <email> <password>` - Log in
//! - `/new` - Start a fresh chat
//! - `/stats` - Show session statistics
//! - `/quit` - Exit the application

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use wayfarer::chat::{
    ChatArgs, ChatCommand, ChatConfig, ChatSession, PlainTextRenderer, Renderer, help_text,
    parse_command,
};
use wayfarer::{FileStorage, MemoryStorage, SessionStore, Wayfarer};

/// Main entry point for the wayfarer-chat application.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (args, _) = ChatArgs::from_command_line_relaxed("wayfarer-chat [OPTIONS]");
    let config = ChatConfig::try_from(args)?;
    let use_color = config.use_color;

    let store = match &config.session_file {
        Some(path) => SessionStore::new(Box::new(FileStorage::new(path)))?,
        None => SessionStore::new(Box::new(MemoryStorage::new()))?,
    };
    let client = Arc::new(Wayfarer::with_options(
        Arc::new(store),
        config.api_url.clone(),
        Some(config.timeout()),
        None,
    )?);

    let mut session = match &config.chat_id {
        Some(chat_id) => ChatSession::with_chat_id(client, chat_id.clone()),
        None => ChatSession::new(client),
    };

    // Flag for interrupt handling during streaming
    let interrupted = Arc::new(AtomicBool::new(false));
    let mut renderer =
        PlainTextRenderer::with_color(use_color).with_interrupt(interrupted.clone());
    let mut rl = DefaultEditor::new()?;

    // Set up Ctrl+C handler
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        interrupted_clone.store(true, Ordering::Relaxed);
    })?;

    println!(
        "Wayfarer travel planner (chat: {})",
        session.transcript().chat_id()
    );
    if let Some(greeting) = session.transcript().messages().first() {
        println!("Bot: {}", greeting.content);
    }
    println!("Type /help for commands, /quit to exit\n");

    loop {
        // Reset interrupt flag before each input
        interrupted.store(false, Ordering::Relaxed);

        let readline = rl.readline("You: ");

        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                // Check for slash commands
                if let Some(cmd) = parse_command(line) {
                    match cmd {
                        ChatCommand::Quit => {
                            println!("Goodbye!");
                            break;
                        }
                        ChatCommand::Login { email, password } => {
                            match session.client().login(&email, &password).await {
                                Ok(_) => renderer.print_info(&format!("Logged in as {email}.")),
                                Err(err) => {
                                    renderer.print_error(&format!("Login failed: {err}"))
                                }
                            }
                        }
                        ChatCommand::Signup {
                            email,
                            password,
                            fullname,
                        } => {
                            match session
                                .client()
                                .signup(&email, &password, fullname.as_deref())
                                .await
                            {
                                Ok(_) => renderer
                                    .print_info(&format!("Account created for {email}.")),
                                Err(err) => {
                                    renderer.print_error(&format!("Signup failed: {err}"))
                                }
                            }
                        }
                        ChatCommand::Logout => match session.client().logout().await {
                            Ok(()) => renderer.print_info("Logged out."),
                            Err(err) => renderer.print_error(&format!("Logout failed: {err}")),
                        },
                        ChatCommand::NewChat => {
                            session.new_chat();
                            renderer.print_info(&format!(
                                "Started a new chat ({}).",
                                session.transcript().chat_id()
                            ));
                        }
                        ChatCommand::SelectChat(chat_id) => {
                            session.select_chat(chat_id.clone());
                            renderer.print_info(&format!("Switched to chat {chat_id}."));
                        }
                        ChatCommand::Stats => {
                            print_stats(&session);
                        }
                        ChatCommand::Help => {
                            for line in help_text().lines() {
                                println!("    {}", line);
                            }
                        }
                        ChatCommand::Invalid(message) => {
                            renderer.print_error(&message);
                        }
                    }
                    continue;
                }

                // Regular message - send to the assistant
                println!("Bot:");
                if let Err(err) = session.send_message(line, &mut renderer).await {
                    // send_message already rendered the failure
                    let _ = err;
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C at prompt - soft interrupt
                println!();
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D - exit
                println!("\nGoodbye!");
                break;
            }
            Err(err) => {
                renderer.print_error(&format!("Input error: {}", err));
                break;
            }
        }
    }

    Ok(())
}

fn print_stats(session: &ChatSession) {
    let stats = session.stats();
    println!("    Session Statistics:");
    println!("      Chat id: {}", stats.chat_id);
    println!("      Messages: {}", stats.message_count);
    println!(
        "      Authenticated: {}",
        if stats.authenticated { "yes" } else { "no" }
    );
    println!("      Sends: {}", stats.total_sends);
    println!("      Frames received: {}", stats.total_frames);
}
