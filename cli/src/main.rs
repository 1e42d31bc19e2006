//! navstack - line-driven driver for the navigation controller.
//!
//! Builds a [`NavController`] over the in-memory collaborators, pushes the
//! configured first page, then reads commands from stdin until `quit` or EOF.
//!
//! ```text
//! main() -> load config -> NavController::new -> start()
//!              |
//!              v
//!        stdin lines -> Command::parse -> push / pop / back / title
//!              |
//!              v
//!        destroy() on exit
//! ```
//!
//! Logs go to stderr (`RUST_LOG`, default `info`); command output goes to stdout.

mod commands;

use std::path::PathBuf;
use std::rc::Rc;
use std::{env, io};

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use navstack_config::NavConfig;
use navstack_core::memory::{CatalogResolver, MemoryCollaborators};
use navstack_core::{NavController, NavSettings, PopOutcome, PushOutcome};
use navstack_types::RenderableContent;

use crate::commands::{Command, HELP};

const DEMO_FIRST: &str = "home.tmpl";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

/// Explicit path argument wins; otherwise the default location, else defaults.
fn load_config() -> Result<NavConfig> {
    if let Some(path) = env::args_os().nth(1).map(PathBuf::from) {
        return NavConfig::from_path(&path)
            .with_context(|| format!("loading config from {}", path.display()));
    }
    Ok(NavConfig::load()
        .context("loading default config")?
        .unwrap_or_default())
}

fn demo_catalog() -> CatalogResolver {
    CatalogResolver::new()
        .with_page(DEMO_FIRST, RenderableContent::new("Home", "<p>Welcome</p>"))
        .with_page(
            "detail.tmpl",
            RenderableContent::new("Detail", "<p>Item detail</p>"),
        )
        .with_page(
            "settings.tmpl",
            RenderableContent::new("Settings", "<p>Preferences</p>"),
        )
        .with_page(
            "login.tmpl",
            RenderableContent::new("Sign in", "<form/>").with_nav_bar(false),
        )
}

fn print_status(nav: &NavController) {
    let bar = nav.nav_bar_state();
    let last = nav
        .last_direction()
        .map_or("none", |direction| direction.as_str());
    println!(
        "[depth {}] {}  (back: {}, navbar: {}, last: {last})",
        nav.depth(),
        if bar.title.is_empty() { "-" } else { &bar.title },
        if bar.back_button_visible { "yes" } else { "no" },
        if bar.is_visible { "shown" } else { "hidden" },
    );
}

fn report_push(source: &str, outcome: &PushOutcome) {
    match outcome {
        PushOutcome::Pushed(id) => println!("pushed {source} as {id}"),
        PushOutcome::Throttled => println!("push of {source} dropped (throttled)"),
        PushOutcome::Failed(err) => println!("push failed: {err}"),
        PushOutcome::Abandoned => println!("push of {source} abandoned"),
    }
}

fn report_pop(outcome: PopOutcome) {
    match outcome {
        PopOutcome::Popped(id) => println!("popped {id}"),
        PopOutcome::AtRoot => println!("already at the root page"),
        PopOutcome::Throttled => println!("pop dropped (throttled)"),
        PopOutcome::Abandoned => println!("pop abandoned"),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();

    let config = load_config()?;
    let mut settings = NavSettings::from_config(&config);
    let resolver = if config.pages.is_empty() {
        tracing::info!("No pages configured, using the demo catalog");
        if settings.first.is_none() {
            settings = settings.with_first(DEMO_FIRST);
        }
        demo_catalog()
    } else {
        CatalogResolver::from_entries(&config.pages)
    };

    let mem = MemoryCollaborators::new(resolver);
    let nav: Rc<NavController> = NavController::new(settings, mem.handles());

    if let Some(outcome) = nav.start().await? {
        let first = nav.settings().first.clone().unwrap_or_default();
        report_push(&first, &outcome);
    }
    print_status(&nav);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        match Command::parse(&line) {
            Ok(Command::Push(source)) => {
                let outcome = nav.push_from_source(&source).await?;
                report_push(&source, &outcome);
            }
            Ok(Command::Pop) => report_pop(nav.pop().await?),
            Ok(Command::Back) => mem.back_button.press().await,
            Ok(Command::Title(title)) => {
                if !nav.set_title(title)? {
                    println!("no page to retitle");
                }
            }
            Ok(Command::Status) => {}
            Ok(Command::Help) => {
                println!("{HELP}");
                continue;
            }
            Ok(Command::Quit) => break,
            Ok(Command::Empty) => continue,
            Err(message) => {
                eprintln!("{message}");
                continue;
            }
        }
        print_status(&nav);
    }

    nav.destroy().await;
    Ok(())
}
