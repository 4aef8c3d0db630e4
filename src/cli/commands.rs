//! Command implementations for the Jarvis CLI.

use std::io::{self, BufRead, Write};

use anyhow::Context;
use rand::Rng;

use crate::chatbot::Chatbot;
use crate::cli::args::*;
use crate::cli::output::*;
use crate::cli::session::{ChatInput, Conversation, Role};
use crate::config::ChatbotConfig;
use crate::error::Result;

const CHAT_HELP: &str = "Commands: /clear (forget history), /history, /help, /quit";

/// Execute a CLI command, naming the failed command in the error chain.
pub fn run(args: JarvisArgs) -> anyhow::Result<()> {
    let name = args.command.name();
    execute_command(args).with_context(|| format!("jarvis {name} failed"))
}

/// Execute a CLI command.
pub fn execute_command(args: JarvisArgs) -> Result<()> {
    let config = args.chatbot_config()?;
    match &args.command {
        Command::Chat(chat_args) => run_chat(chat_args, &config, &args),
        Command::Ask(ask_args) => ask(ask_args, &config, &args),
        Command::Inspect(inspect_args) => inspect(inspect_args, &config, &args),
    }
}

/// Run the interactive chat on stdin/stdout.
fn run_chat(args: &ChatArgs, config: &ChatbotConfig, cli_args: &JarvisArgs) -> Result<()> {
    let chatbot = Chatbot::from_config(config);
    if let Some(e) = chatbot.load_error() {
        eprintln!("Warning: {e}");
    }
    if cli_args.verbosity() > 0 && cli_args.output_format == OutputFormat::Human {
        println!("{CHAT_HELP}");
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut conversation = Conversation::new();
    chat_loop(
        &chatbot,
        stdin.lock(),
        &mut stdout.lock(),
        &args.prompt,
        cli_args.output_format,
        &mut conversation,
    )
}

/// Read utterances from `input` until end of input or `/quit`.
///
/// Lines that are not valid UTF-8 are still answered, through the byte entry
/// point of the chatbot.
pub fn chat_loop<R, I, W>(
    chatbot: &Chatbot<R>,
    mut input: I,
    output: &mut W,
    prompt: &str,
    format: OutputFormat,
    conversation: &mut Conversation,
) -> Result<()>
where
    R: Rng,
    I: BufRead,
    W: Write,
{
    let mut buf = Vec::new();
    loop {
        write!(output, "{prompt}")?;
        output.flush()?;

        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }

        let (utterance, reply) = match std::str::from_utf8(&buf) {
            Ok(line) => match ChatInput::parse(line) {
                None => continue,
                Some(ChatInput::Quit) => break,
                Some(ChatInput::Clear) => {
                    conversation.clear();
                    writeln!(output, "History cleared.")?;
                    continue;
                }
                Some(ChatInput::History) => {
                    write_history(conversation, output, format)?;
                    continue;
                }
                Some(ChatInput::Help) => {
                    writeln!(output, "{CHAT_HELP}")?;
                    continue;
                }
                Some(ChatInput::Unknown(command)) => {
                    writeln!(output, "Unknown command {command}. {CHAT_HELP}")?;
                    continue;
                }
                Some(ChatInput::Message(text)) => (text.to_string(), chatbot.respond(text)),
            },
            Err(_) => (
                String::from_utf8_lossy(&buf).trim_end().to_string(),
                chatbot.respond_bytes(&buf),
            ),
        };

        match format {
            OutputFormat::Human => writeln!(output, "{}", reply.text)?,
            OutputFormat::Json => writeln!(output, "{}", serde_json::to_string(&reply)?)?,
        }
        conversation.push(Role::User, utterance);
        conversation.push(Role::Assistant, reply.text);
    }
    Ok(())
}

fn write_history<W: Write>(
    conversation: &Conversation,
    output: &mut W,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Human => {
            if conversation.is_empty() {
                writeln!(output, "(no messages)")?;
            }
            for turn in conversation.turns() {
                writeln!(output, "{}: {}", turn.role, turn.content)?;
            }
        }
        OutputFormat::Json => writeln!(output, "{}", serde_json::to_string(conversation.turns())?)?,
    }
    Ok(())
}

/// Reply to one utterance.
fn ask(args: &AskArgs, config: &ChatbotConfig, cli_args: &JarvisArgs) -> Result<()> {
    let chatbot = Chatbot::from_config(config);
    if let Some(e) = chatbot.load_error()
        && cli_args.verbosity() > 0
    {
        eprintln!("Warning: {e}");
    }

    let result = answer(&chatbot, &args.text, args.explain);
    if !args.explain && cli_args.output_format == OutputFormat::Human {
        println!("{}", result.reply);
        return Ok(());
    }
    output_result("Reply", &result, cli_args)
}

/// Reply to one utterance, with the ranked intent scores when `explain` is set.
pub fn answer<R: Rng>(chatbot: &Chatbot<R>, text: &str, explain: bool) -> AskResult {
    let reply = chatbot.respond(text);
    let scores = if explain {
        chatbot
            .classifier()
            .and_then(|classifier| classifier.rank(text).ok())
    } else {
        None
    };
    AskResult {
        reply: reply.text,
        outcome: reply.outcome,
        scores,
    }
}

/// Summarize the artifacts; fails if they do not load.
fn inspect(args: &InspectArgs, config: &ChatbotConfig, cli_args: &JarvisArgs) -> Result<()> {
    let artifacts = config
        .store()
        .validate_labels(config.validate_labels || args.strict)
        .load()?;

    output_result(
        "Artifact summary",
        &InspectReport::from_artifacts(&config.artifacts, &artifacts),
        cli_args,
    )
}
