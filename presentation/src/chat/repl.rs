//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::config::ReplConfig;
use crate::output::console::ConsoleFormatter;
use crate::progress::reporter::ProgressReporter;
use colored::Colorize;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::sync::Arc;
use switchyard_application::{DispatchInput, NoProgress, Switchyard};
use switchyard_domain::{Message, Role};
use tracing::warn;

const HISTORY_CAPACITY: usize = 1000;

/// What the loop should do after a slash command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommandOutcome {
    Continue,
    Quit,
}

/// Slash commands understood by the REPL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChatCommand {
    Help,
    Reload,
    Agents,
    Tools,
    History,
    Title,
    Clear,
    Quit,
    Unknown,
}

impl ChatCommand {
    fn parse(line: &str) -> Self {
        match line.split_whitespace().next().unwrap_or_default() {
            "/help" | "/h" | "/?" => ChatCommand::Help,
            "/reload" | "/r" => ChatCommand::Reload,
            "/agents" => ChatCommand::Agents,
            "/tools" => ChatCommand::Tools,
            "/history" => ChatCommand::History,
            "/title" => ChatCommand::Title,
            "/clear" => ChatCommand::Clear,
            "/quit" | "/exit" | "/q" => ChatCommand::Quit,
            _ => ChatCommand::Unknown,
        }
    }
}

/// Interactive chat REPL
pub struct ChatRepl {
    switchyard: Arc<Switchyard>,
    config: ReplConfig,
    history: Vec<Message>,
}

impl ChatRepl {
    pub fn new(switchyard: Arc<Switchyard>) -> Self {
        Self {
            switchyard,
            config: ReplConfig::default(),
            history: Vec::new(),
        }
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.config.show_progress = show;
        self
    }

    fn editor(&self) -> Reedline {
        let editor = Reedline::create();
        let Some(path) = self.config.history_path() else {
            return editor;
        };
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match FileBackedHistory::with_file(HISTORY_CAPACITY, path) {
            Ok(history) => editor.with_history(Box::new(history)),
            Err(e) => {
                warn!(error = %e, "Chat history unavailable");
                editor
            }
        }
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut editor = self.editor();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("switchyard".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line).await == CommandOutcome::Quit {
                            break;
                        }
                        continue;
                    }

                    self.process_message(line).await;
                }
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        let info = self.switchyard.agent_info();
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│            Switchyard - Chat Mode           │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!(
            "Agents ({}): {}",
            info.total_agents,
            info.agents
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help, /h, /?     - Show this help");
        println!("  /reload, /r       - Reload tool and agent manifests");
        println!("  /agents           - List assembled agents");
        println!("  /tools            - List manifest tools");
        println!("  /history          - Show this conversation");
        println!("  /title            - Summarize the conversation as a title");
        println!("  /clear            - Forget this conversation");
        println!("  /quit, /exit, /q  - Exit chat");
        println!();
    }

    async fn handle_command(&mut self, line: &str) -> CommandOutcome {
        match ChatCommand::parse(line) {
            ChatCommand::Quit => {
                println!("Bye!");
                return CommandOutcome::Quit;
            }
            ChatCommand::Help => {
                println!();
                Self::print_help();
            }
            ChatCommand::Reload => match self.switchyard.reload().await {
                Ok(agents) => println!(
                    "{} {} agent(s) loaded (generation {})",
                    "Reloaded:".green().bold(),
                    agents,
                    self.switchyard.snapshot().generation()
                ),
                Err(e) => println!("{} {}", "Reload failed:".red().bold(), e),
            },
            ChatCommand::Agents => {
                println!("{}", ConsoleFormatter::format_agents(&self.switchyard.agent_info()));
            }
            ChatCommand::Tools => {
                println!(
                    "{}",
                    ConsoleFormatter::format_tools(&self.switchyard.available_tools())
                );
            }
            ChatCommand::History => {
                println!();
                if self.history.is_empty() {
                    println!("{}", "(empty)".dimmed());
                }
                for message in &self.history {
                    match message.role {
                        Role::User => println!("{} {}", "you:".cyan().bold(), message.content),
                        Role::Assistant => println!(
                            "{} {}",
                            format!("{}:", message.actor_name.as_deref().unwrap_or("assistant"))
                                .green()
                                .bold(),
                            message.content
                        ),
                    }
                }
                println!();
            }
            ChatCommand::Title => {
                let title = self.switchyard.summarize_title(&self.history).await;
                println!("{} {}", "Title:".cyan().bold(), title);
            }
            ChatCommand::Clear => {
                self.history.clear();
                println!("Conversation cleared.");
            }
            ChatCommand::Unknown => {
                println!("Unknown command: {}", line);
                println!("Type /help for available commands");
            }
        }
        CommandOutcome::Continue
    }

    async fn process_message(&mut self, message: &str) {
        println!();

        let input = DispatchInput::new(message).with_history(self.history.clone());
        let result = if self.config.show_progress {
            self.switchyard
                .dispatch_with(input, &ProgressReporter::new())
                .await
        } else {
            self.switchyard.dispatch_with(input, &NoProgress).await
        };

        println!("{}", ConsoleFormatter::format(&result));

        self.history.push(Message::user(message));
        let mut reply = Message::assistant(result.response);
        if result.agents_used.len() == 1
            && let Some(agent) = result.agents_used.iter().next()
        {
            reply = reply.with_actor(agent.clone());
        }
        self.history.push(reply);
    }
}
