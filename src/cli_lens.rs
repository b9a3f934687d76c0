use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

use lyriclens_server::client::{view, HttpLensBackend, LensController, ViewState};

use rustyline::{
    completion::Completer, highlight::Highlighter, history::FileHistory, validate::Validator,
    CompletionType, Config, Editor, Helper,
};

#[derive(Parser, Debug)]
#[command(about = "Interactive LyricLens client")]
struct CliArgs {
    /// Root URL of a running LyricLens server.
    #[clap(long, env = "LYRICLENS_URL", default_value = "http://localhost:8000")]
    pub url: String,

    /// Per-request timeout in seconds. Analyses can take a while.
    #[clap(long, default_value_t = 150)]
    pub timeout_sec: u64,
}

#[derive(Parser)]
#[command(name = "")]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Searches songs by title or artist.
    Search {
        #[arg(required = true, trailing_var_arg = true)]
        query: Vec<String>,
    },

    /// Opens the n-th song of the last search, loading lyrics and analysis.
    Open { index: usize },

    /// Goes back to the search results.
    Back,

    /// Prints the current screen again.
    Show,

    /// Close this program.
    Exit,
}

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

const PROMPT: &str = "lens> ";

fn execute_command(
    line: String,
    runtime: &tokio::runtime::Runtime,
    controller: &LensController,
) -> CommandExecutionResult {
    if line.trim().is_empty() {
        return CommandExecutionResult::Ok;
    }

    let args =
        shlex::split(&line).unwrap_or_else(|| line.split_whitespace().map(String::from).collect());

    let cli = InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)));

    match cli {
        Ok(cli) => {
            match cli.command {
                InnerCommand::Search { query } => {
                    let query = query.join(" ");
                    controller.back();
                    println!("Searching for {:?}...", query);
                    // Failures are already part of the rendered state.
                    let _ = runtime.block_on(controller.search_songs(&query));
                }
                InnerCommand::Open { index } => {
                    let songs = controller.songs();
                    let song = match index.checked_sub(1).and_then(|i| songs.get(i)) {
                        Some(song) => song.clone(),
                        None => {
                            return CommandExecutionResult::Error(format!(
                                "No song number {}, the last search returned {}.",
                                index,
                                songs.len()
                            ))
                        }
                    };
                    println!("Loading {} - {}...", song.title, song.artist);
                    runtime.block_on(controller.select_song(song));
                }
                InnerCommand::Back => {
                    if controller.view() == ViewState::Browsing {
                        return CommandExecutionResult::Error(
                            "Already on the search results.".to_string(),
                        );
                    }
                    controller.back();
                }
                InnerCommand::Show => {}
                InnerCommand::Exit => return CommandExecutionResult::Exit,
            }
            println!("{}", view::render(&controller.snapshot()));
        }

        Err(e) => {
            if e.print().is_err() {
                println!("{}", e);
            }
        }
    }
    CommandExecutionResult::Ok
}

#[derive(rustyline_derive::Hinter)]
struct LensHelper {
    commands_names: Vec<String>,
}

impl LensHelper {
    pub fn new() -> Self {
        let commands_names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();

        LensHelper { commands_names }
    }
}

impl Completer for LensHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        if line.contains(' ') {
            return Ok((0, Vec::with_capacity(0)));
        }
        let matches = self
            .commands_names
            .iter()
            .filter(|c| c.starts_with(line))
            .cloned()
            .collect::<Vec<_>>();

        Ok((0, matches))
    }
}

impl Highlighter for LensHelper {}
impl Validator for LensHelper {}
impl Helper for LensHelper {}

fn main() -> Result<()> {
    let _ = dotenv::dotenv();
    let cli_args = CliArgs::parse();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    let backend = HttpLensBackend::new(&cli_args.url, Duration::from_secs(cli_args.timeout_sec))
        .with_context(|| format!("Could not create a client for {}", cli_args.url))?;
    let controller = LensController::new(Arc::new(backend));

    println!("Connected to {}", cli_args.url);
    InnerCli::command().print_long_help()?;

    let config = Config::builder()
        .completion_type(CompletionType::List)
        .build();

    let mut rl = Editor::<LensHelper, FileHistory>::with_config(config)?;
    rl.set_helper(Some(LensHelper::new()));

    loop {
        let readline = rl.readline(PROMPT);

        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match execute_command(line, &runtime, &controller) {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => {
                        break;
                    }
                    CommandExecutionResult::Error(err) => {
                        eprintln!("Error: {}", err);
                        continue;
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("CTRL-D: exiting.");
                break;
            }
            Err(e) => {
                println!("Error: {:?}", e);
                break;
            }
        }
    }
    Ok(())
}
