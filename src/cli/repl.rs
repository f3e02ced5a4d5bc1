//! Interactive REPL implementation.

use reedline::Signal;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

use super::completion::{create_reedline, pick_suggestion, TaxCompleter, TaxPrompt, COMMANDS};
use super::spinner::{Spinner, SpinnerHandle, LOADING_TEXT};
use crate::chat::{suggestion, ChatEvent, ChatSession, SubmitOutcome, SUGGESTIONS};
use crate::gemini::TaxExpert;
use crate::render::{truncate_title, TerminalRenderer};

/// REPL state.
pub struct Repl {
    session: ChatSession,
    events: mpsc::UnboundedReceiver<ChatEvent>,
    renderer: TerminalRenderer,
    spinner: Spinner,
}

impl Repl {
    /// Create a new REPL around a fresh conversation.
    pub fn new(expert: Arc<dyn TaxExpert>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            session: ChatSession::new(expert).with_events(tx),
            events: rx,
            renderer: TerminalRenderer::new(),
            spinner: Spinner::new(),
        }
    }

    /// Run the REPL loop.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut line_editor = create_reedline(TaxCompleter::new());
        let prompt = TaxPrompt::new(self.session.model());

        for message in self.session.messages().await {
            self.renderer.render(&message)?;
        }
        if self.session.show_suggestions().await {
            self.renderer
                .render_suggestions(&mut std::io::stdout(), SUGGESTIONS)?;
        }

        loop {
            match line_editor.read_line(&prompt) {
                Ok(Signal::Success(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    match self.handle_input(line).await {
                        Ok(true) => {
                            println!("👋 Goodbye!");
                            break;
                        }
                        Ok(false) => {}
                        Err(e) => println!("❌ Error: {}", e),
                    }
                }
                Ok(Signal::CtrlC) => {
                    println!("^C");
                    continue;
                }
                Ok(Signal::CtrlD) => {
                    println!("👋 Goodbye!");
                    break;
                }
                Err(err) => {
                    println!("❌ Readline error: {}", err);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Returns `true` when the REPL should exit.
    async fn handle_input(&mut self, input: &str) -> anyhow::Result<bool> {
        if let Some(command) = input.strip_prefix('/') {
            return self.handle_command(command).await;
        }
        self.ask(input).await?;
        Ok(false)
    }

    async fn handle_command(&mut self, input: &str) -> anyhow::Result<bool> {
        let (cmd, args) = match input.split_once(' ') {
            Some((cmd, args)) => (cmd.to_lowercase(), args.trim()),
            None => (input.to_lowercase(), ""),
        };

        match cmd.as_str() {
            "help" | "h" | "?" => show_help(),
            "exit" | "quit" | "q" => return Ok(true),
            "clear" | "cls" => print!("\x1b[2J\x1b[1;1H"),
            "suggest" => self.cmd_suggest(args).await?,
            "sources" => self.cmd_sources().await,
            "open" => self.cmd_open(args).await,
            "history" => {
                for message in self.session.messages().await {
                    self.renderer.render(&message)?;
                }
            }
            _ => {
                println!("❓ Unknown command: /{}", cmd);
                println!("   Type /help for available commands");
            }
        }
        Ok(false)
    }

    async fn cmd_suggest(&mut self, args: &str) -> anyhow::Result<()> {
        let question = if args.is_empty() {
            pick_suggestion()
        } else {
            match args.parse::<usize>().ok().and_then(suggestion) {
                Some(q) => Some(q),
                None => {
                    println!("❌ Pick a number between 1 and {}", SUGGESTIONS.len());
                    None
                }
            }
        };

        if let Some(question) = question {
            self.ask(question).await?;
        }
        Ok(())
    }

    async fn cmd_sources(&self) {
        let sources = self.session.latest_sources().await;
        if sources.is_empty() {
            println!("No sources cited yet.");
            return;
        }
        for (idx, source) in sources.iter().enumerate() {
            println!(
                "  \x1b[2m[{}]\x1b[0m \x1b[34m{}\x1b[0m\n      \x1b[2m{}\x1b[0m",
                idx + 1,
                source.title,
                source.uri
            );
        }
    }

    async fn cmd_open(&self, args: &str) {
        let sources = self.session.latest_sources().await;
        let Some(source) = args
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| sources.get(i))
        else {
            println!("❌ Usage: /open <n>  (see /sources)");
            return;
        };

        match webbrowser::open(&source.uri) {
            Ok(()) => println!("🔗 Opened {}", truncate_title(&source.title)),
            Err(e) => println!("❌ Failed to open browser: {}", e),
        }
    }

    /// Submit a question and render every message it appends.
    pub async fn ask(&mut self, question: &str) -> anyhow::Result<SubmitOutcome> {
        let session = self.session.clone();
        let question = question.to_string();
        let mut submit = tokio::spawn(async move { session.submit(&question).await });
        let mut spinner = None;

        let outcome = loop {
            tokio::select! {
                biased;
                Some(event) = self.events.recv() => {
                    self.handle_event(event, &mut spinner).await?;
                }
                outcome = &mut submit => {
                    // Everything was published before submit returned.
                    while let Ok(event) = self.events.try_recv() {
                        self.handle_event(event, &mut spinner).await?;
                    }
                    break outcome?;
                }
            }
        };

        if let Some(handle) = spinner.take() {
            handle.stop().await;
        }
        debug!(?outcome, "Submit finished");
        Ok(outcome)
    }

    async fn handle_event(
        &self,
        event: ChatEvent,
        spinner: &mut Option<SpinnerHandle>,
    ) -> anyhow::Result<()> {
        match event {
            ChatEvent::MessageAppended(message) => {
                if let Some(handle) = spinner.take() {
                    handle.stop().await;
                }
                self.renderer.render(&message)?;
            }
            ChatEvent::LoadingChanged(true) => {
                *spinner = Some(self.spinner.start(LOADING_TEXT));
            }
            ChatEvent::LoadingChanged(false) => {}
        }
        Ok(())
    }
}

/// Print available commands.
pub fn show_help() {
    println!("\n\x1b[1mCommands:\x1b[0m\n");
    for (cmd, desc) in COMMANDS {
        println!("  \x1b[36m{:<12}\x1b[0m {}", cmd, desc);
    }
    println!("\n  Anything else is sent to the tax expert as a question.\n");
}
