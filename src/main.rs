mod app;
mod config;
mod error;
mod fetch;
mod format;
mod models;
mod ui;
mod utils;

use anyhow::Context;
use clap::Parser;
use crossterm::event::{self, Event as CEvent};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::{App, Request, Update};
use crate::config::{Args, Endpoints};
use crate::fetch::{fetch_detail, load_card, load_detail, load_page, DexApi, HttpApi};
use crate::ui::draw_ui;

fn init_logging(args: &Args) -> anyhow::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&args.log_file)
        .with_context(|| format!("Failed to open log file: {}", args.log_file.display()))?;
    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();
    Ok(())
}

/// Run one load in the background and hand the settled state back to the UI loop.
fn dispatch(
    request: Request,
    api: &Arc<dyn DexApi>,
    endpoints: &Arc<Endpoints>,
    tx: &UnboundedSender<Update>,
) {
    let api = api.clone();
    let endpoints = endpoints.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let update = match request {
            Request::Page { url } => Update::Page(load_page(api.as_ref(), &url).await),
            Request::Card { index, url } => Update::Card {
                index,
                state: load_card(api.as_ref(), &endpoints, &url).await,
            },
            Request::Detail { key } => {
                let state = load_detail(api.as_ref(), &endpoints, &key).await;
                Update::Detail { key, state }
            }
        };
        // The receiver is gone once the UI has exited; the result is simply dropped.
        let _ = tx.send(update);
    });
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let endpoints = Arc::new(Endpoints::from_args(&args));
    let api: Arc<dyn DexApi> = Arc::new(HttpApi::new());

    // Support printing a single detail view and exiting (handy for scripting).
    if let Some(key) = &args.show {
        info!(%key, "show mode");
        let detail = fetch_detail(api.as_ref(), &endpoints, key)
            .await
            .with_context(|| format!("Failed to load {}", key))?;
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    let (tx, mut rx) = mpsc::unbounded_channel::<Update>();
    dispatch(
        Request::Page {
            url: endpoints.listing_url(0, args.page_size),
        },
        &api,
        &endpoints,
        &tx,
    );

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    let result: anyhow::Result<()> = loop {
        if let Err(e) = draw_ui(&mut terminal, &mut app) {
            break Err(e.into());
        }

        // Pick up everything the background loads have finished since the last frame.
        while let Ok(update) = rx.try_recv() {
            for request in app.apply(update) {
                dispatch(request, &api, &endpoints, &tx);
            }
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));
        match event::poll(timeout) {
            Ok(true) => {
                if let Ok(CEvent::Key(key)) = event::read() {
                    if let Some(request) = app.on_key(key.code) {
                        dispatch(request, &api, &endpoints, &tx);
                    }
                }
            }
            Ok(false) => {}
            Err(e) => break Err(e.into()),
        }
        if app.should_quit {
            break Ok(());
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick = app.tick.wrapping_add(1);
            last_tick = Instant::now();
        }
    };

    // Restore terminal
    disable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(LeaveAlternateScreen)?;
    info!("exiting");
    result
}
