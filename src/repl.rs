//! Interactive chat session
//!
//! Single-session terminal loop: one [`Session`] lives for the whole run,
//! each line is answered in turn, and a failed call prints an apology
//! instead of the raw error.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::assistant::Assistant;
use crate::session::{Role, Session};

/// Shown instead of the underlying gateway error
pub const APOLOGY: &str = "Xin lỗi, hiện tôi không thể trả lời. Bạn vui lòng thử lại sau.";

const HELP: &str = "Commands:
  /help            Show this help
  /history         Print the stored conversation
  /reset           Forget the conversation
  /export [path]   Save the conversation as JSON
  /exit            Quit (Ctrl+D also works)";

/// Slash commands understood by the REPL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    History,
    Reset,
    Export(Option<PathBuf>),
    Exit,
    Unknown(String),
}

/// Parse a line starting with `/`; anything else is a chat message
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let rest = line.strip_prefix('/')?;
    let (name, arg) = match rest.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (rest, ""),
    };

    Some(match name {
        "help" | "?" => Command::Help,
        "history" => Command::History,
        "reset" | "clear" => Command::Reset,
        "export" | "save" => Command::Export((!arg.is_empty()).then(|| PathBuf::from(arg))),
        "exit" | "quit" => Command::Exit,
        other => Command::Unknown(other.to_string()),
    })
}

/// REPL state
pub struct Repl {
    editor: DefaultEditor,
    assistant: Assistant,
    session: Session,
    data_dir: PathBuf,
}

impl Repl {
    pub fn new(assistant: Assistant, data_dir: PathBuf) -> Result<Self> {
        let session = Session::with_capacity_limit(assistant.conversation().max_stored_turns);
        Ok(Self {
            editor: DefaultEditor::new()?,
            assistant,
            session,
            data_dir,
        })
    }

    /// Run the REPL loop
    pub async fn run(&mut self) -> Result<()> {
        println!(
            "panic-doctor {} ({})",
            env!("CARGO_PKG_VERSION"),
            self.assistant.gateway().model()
        );
        println!("Type your message (Ctrl+D to exit, /help for commands)");
        println!();

        loop {
            let line = match self.editor.readline(">>> ") {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            self.editor.add_history_entry(trimmed)?;

            if let Some(command) = parse_command(trimmed) {
                if !self.handle_command(command)? {
                    break;
                }
                continue;
            }

            match self.assistant.respond(&mut self.session, trimmed).await {
                Ok(reply) => println!("\n{}\n", reply),
                Err(e) => {
                    warn!(kind = e.kind(), "Interactive completion failed: {}", e);
                    println!("\n{}\n", APOLOGY);
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Returns false when the loop should stop
    fn handle_command(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Help => println!("{}", HELP),
            Command::History => {
                if self.session.is_empty() {
                    println!("(no messages yet)");
                }
                let labels = &self.assistant.conversation().labels;
                for turn in self.session.turns() {
                    let label = match turn.role {
                        Role::User => &labels.user,
                        Role::Assistant => &labels.assistant,
                    };
                    println!("{}: {}", label, turn.content);
                }
            }
            Command::Reset => {
                self.session.reset();
                println!("Conversation cleared.");
            }
            Command::Export(path) => {
                let path =
                    path.unwrap_or_else(|| default_export_path(&self.data_dir, &self.session));
                match self.session.save_json(&path) {
                    Ok(()) => println!(
                        "Saved {} messages to {}",
                        self.session.len(),
                        path.display()
                    ),
                    Err(e) => println!("Export failed: {}", e),
                }
            }
            Command::Exit => return Ok(false),
            Command::Unknown(name) => println!("Unknown command: /{} (try /help)", name),
        }
        Ok(true)
    }
}

fn default_export_path(data_dir: &Path, session: &Session) -> PathBuf {
    data_dir.join("exports").join(session.export_file_name())
}
