//! A terminal front end for the genbridge widgets.

#[macro_use]
extern crate tracing;

mod command;

use std::io::Write as _;
use std::time::Duration;

use genbridge::core::caption::{CaptionEvent, CaptionState, CaptionText};
use genbridge::core::chat::{ChatEvent, ChatPhase, ChatState, Sender};
use genbridge::core::nav::{NavEffect, NavEvent};
use genbridge::core::translator::{
    TranslationOutput, TranslatorEvent, TranslatorState,
};
use genbridge::core::{Perform, Widget, WidgetGoneError};
use genbridge::{Config, Page, PageBuilder, load_image};
use genbridge_http_service::HttpService;
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::io::{self, AsyncBufReadExt};
use tokio::select;
use tokio::time::sleep;

use command::{Command, HELP, parse_command};

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };
    let service = match HttpService::new(config.service_config()) {
        Ok(service) => service,
        Err(err) => {
            eprintln!("failed to set up the HTTP client: {err}");
            return;
        }
    };
    info!("talking to {}", service.config().chat_url());

    let mut page = PageBuilder::with_service(service)
        .with_turn_limit(config.turn_limit)
        .build();
    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    let titles: Vec<_> =
        page.sections().iter().map(|section| section.title()).collect();
    println!("{}", titles.join(" · ").bright_white().bold());
    println!("{}", "Type /help for commands.".dimmed());

    loop {
        print_prompt(&page.chat().snapshot());

        let Some(line) = read_line().await else {
            break;
        };
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("{}", err.bright_red());
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }

        if let Err(err) = run_command(&mut page, command, &progress_style).await
        {
            error!("{err}");
            break;
        }
    }
}

async fn run_command(
    page: &mut Page,
    command: Command,
    style: &ProgressStyle,
) -> Result<(), WidgetGoneError> {
    match command {
        Command::Chat(text) => {
            let chat = page.chat();
            let before = chat.snapshot().messages().len();
            chat.dispatch(ChatEvent::InputChanged(text))?;
            chat.dispatch(ChatEvent::Submit)?;

            let state = settle(chat, style, "💬 Waiting for a reply...", |s| {
                s.phase() == ChatPhase::AwaitingReply
            })
            .await?;
            if state.messages().len() == before {
                if state.show_reset() {
                    println!(
                        "{}",
                        "Chat limit reached, /reset to start over.".yellow()
                    );
                }
                return Ok(());
            }
            for msg in &state.messages()[before..] {
                if msg.sender() == Sender::Bot {
                    println!(
                        "{}🤖 {}",
                        BAR_CHAR.bright_cyan(),
                        msg.text().bright_white()
                    );
                }
            }
        }
        Command::Reset => {
            page.chat().dispatch(ChatEvent::Reset)?;
            page.chat().settled().await?;
            println!("{}", "Fresh chat, no cap.".dimmed());
        }
        Command::Translate(text) => {
            let translator = page.translator();
            translator.dispatch(TranslatorEvent::InputChanged(text))?;
            translator.dispatch(TranslatorEvent::Submit)?;

            let state = settle(translator, style, "🔤 Translating...", |s| {
                s.is_busy()
            })
            .await?;
            print_translation(&state);
        }
        Command::Clear => {
            page.translator().dispatch(TranslatorEvent::Clear)?;
            page.translator().settled().await?;
        }
        Command::Caption(path) => {
            let image = match load_image(&path).await {
                Ok(image) => image,
                Err(err) => {
                    println!("{}", err.bright_red());
                    return Ok(());
                }
            };
            page.caption().dispatch(CaptionEvent::ImageSelected(image))?;
            let state = settle_caption(page, style).await?;
            print_caption(&state);
        }
        Command::Regenerate => {
            page.caption().dispatch(CaptionEvent::Regenerate)?;
            let state = settle_caption(page, style).await?;
            print_caption(&state);
        }
        Command::Edit => {
            page.caption().dispatch(CaptionEvent::Edit)?;
            let state = page.caption().settled().await?;
            match state.draft() {
                Some(draft) => println!(
                    "{} {}  {}",
                    "editing:".dimmed(),
                    draft,
                    "(/draft <text>, /save, /cancel)".dimmed()
                ),
                None => println!("{}", "Nothing to edit.".yellow()),
            }
        }
        Command::Draft(text) => {
            page.caption().dispatch(CaptionEvent::DraftChanged(text))?;
        }
        Command::Save => {
            page.caption().dispatch(CaptionEvent::Save)?;
            print_caption(&page.caption().settled().await?);
        }
        Command::Cancel => {
            page.caption().dispatch(CaptionEvent::Cancel)?;
            print_caption(&page.caption().settled().await?);
        }
        Command::Go(section) => {
            if let Some(NavEffect::ScrollTo { section, .. }) =
                page.navigate(NavEvent::LinkClicked(section))
            {
                println!(
                    "{} {}",
                    section.href().dimmed(),
                    section.title().bright_white().bold()
                );
            }
        }
        Command::State => {
            match serde_json::to_string_pretty(&page.snapshot()) {
                Ok(json) => println!("{json}"),
                Err(err) => error!("failed to serialize the state: {err}"),
            }
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
    Ok(())
}

/// Waits until the widget has applied the dispatched events and is no
/// longer busy, with a spinner in the meantime.
async fn settle<R: Perform>(
    widget: &Widget<R>,
    style: &ProgressStyle,
    message: &'static str,
    busy: impl Fn(&R) -> bool,
) -> Result<R, WidgetGoneError> {
    let state = widget.settled().await?;
    if !busy(&state) {
        return Ok(state);
    }

    let progress_bar = ProgressBar::new_spinner();
    progress_bar.set_style(style.clone());
    progress_bar.set_message(message);

    let done = widget.wait_for(|state| !busy(state));
    tokio::pin!(done);
    let state = loop {
        select! {
            state = &mut done => break state,
            _ = sleep(Duration::from_millis(100)) => progress_bar.inc(1),
        }
    };

    // Finish the progress bar before printing anything else.
    progress_bar.finish_and_clear();
    Ok(state)
}

#[inline]
async fn settle_caption(
    page: &Page,
    style: &ProgressStyle,
) -> Result<CaptionState, WidgetGoneError> {
    settle(page.caption(), style, "🖼️  Looking at the image...", |s| {
        s.is_busy()
    })
    .await
}

fn print_prompt(chat: &ChatState) {
    if chat.show_reset() {
        print!("{} > ", "limit reached, /reset".yellow());
    } else {
        let turns = format!("{}/{}", chat.user_turns(), chat.turn_limit());
        print!("{} > ", turns.dimmed());
    }
    std::io::stdout().flush().ok();
}

fn print_translation(state: &TranslatorState) {
    let text = state.output().display_text();
    match state.output() {
        TranslationOutput::Text(_) => {
            let bar = BAR_CHAR.bright_magenta();
            println!("{bar}🔤 {}", text.bright_white());
        }
        TranslationOutput::Failed => println!("{}", text.bright_red()),
        TranslationOutput::Empty => {}
    }
}

fn print_caption(state: &CaptionState) {
    let text = state.caption().display_text();
    match state.caption() {
        CaptionText::Text(_) => {
            let bar = BAR_CHAR.bright_green();
            println!("{bar}🖼️  {}", text.bright_white());
        }
        CaptionText::Failed => println!("{}", text.bright_red()),
        CaptionText::Empty => {}
    }
}

async fn read_line() -> Option<String> {
    let mut stdin = io::BufReader::new(io::stdin());
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
