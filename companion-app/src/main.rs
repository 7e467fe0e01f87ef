mod bank;
mod cli;
mod config;
mod context;
mod suggest_http;
pub mod api;
pub mod tui;

use anyhow::Result;
use clap::Parser; // needed for Cli::parse()
use companion_core::{title_for, CoreError};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use cli::commands::run_cli;
use cli::opts::{Cli, Command};
use context::AppContext;
use tui::app::TuiApp;

fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let res = match &args.cmd {
        // Run TUI on its own runtime (no nested Tokio)
        Command::Quiz => {
            init_tracing("warn");
            let rt = Arc::new(Runtime::new()?);
            rt.block_on(AppContext::open(&args)).and_then(|ctx| {
                let bank = bank::load_bank(ctx.config.question_bank.as_deref())?;
                let mut app = TuiApp::new(
                    ctx.store.clone(),
                    ctx.user.user_id.clone(),
                    bank,
                    ctx.config.default_question_count,
                    rt.clone(),
                );
                app.run()
            })
        }
        _ => {
            init_tracing("companion=info,tower_http=info");
            let rt = Runtime::new()?;
            rt.block_on(run_cli(args))
        }
    };

    if let Err(e) = &res {
        if let Some(core) = e.downcast_ref::<CoreError>() {
            eprintln!("{}: {core}", title_for(core));
            std::process::exit(1);
        }
    }
    res
}
