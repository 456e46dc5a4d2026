mod cli;
mod config;
mod render;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hookfeed_core::FeedState;
use hookfeed_poller::NotificationPoller;

use cli::Cli;
use config::AppConfig;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = AppConfig::load(&cli.config);
    config.apply_overrides(&cli);

    let poller = match NotificationPoller::new(config.poller) {
        Ok(poller) => poller,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        },
    };

    if cli.once {
        poller.fetch_events().await;
        let state = poller.snapshot();
        print_state(&state, cli.json);
        if state.error.is_some() {
            std::process::exit(1);
        }
        return;
    }

    let handle = poller.spawn();
    let mut rx = handle.subscribe();

    let mut last_printed = rx.borrow_and_update().clone();
    print_state(&last_printed, cli.json);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    tracing::warn!("Poller stopped unexpectedly");
                    break;
                }
                let state = rx.borrow_and_update().clone();
                // Only completed ticks are printed.
                if !state.loading && state != last_printed {
                    print_state(&state, cli.json);
                    last_printed = state;
                }
            },
            result = &mut shutdown => {
                if let Err(e) = result {
                    tracing::error!("Failed to listen for shutdown signal: {e}");
                }
                tracing::info!("Shutting down");
                break;
            },
        }
    }

    handle.join().await;
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_state(state: &FeedState, json: bool) {
    if json {
        match serde_json::to_string(state) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::error!("Failed to serialize feed state: {e}"),
        }
    } else {
        println!("{}\n", render::render(state));
    }
}
