use anyhow::{Context, Result};
use clap::Parser;
use client_core::HttpGoalsApi;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod controller;
mod repl;
mod ui;

use controller::{GoalListClient, LoadOutcome};

#[derive(Parser, Debug)]
#[command(about = "Track savings goals and ask the advisor about them")]
struct Args {
    #[arg(long, default_value = "http://127.0.0.1:5000")]
    server_url: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let api = HttpGoalsApi::new(&args.server_url).context("invalid --server-url")?;
    let mut client = GoalListClient::new(api);
    if let LoadOutcome::Loaded(count) = client.load_goals().await {
        info!(server_url = %client.api().server_url(), count, "connected to goals backend");
        print!("{}", ui::console::render_goal_list(client.cards()));
    }

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    repl::run(&mut client, &mut stdin.lock(), &mut stdout.lock()).await
}
