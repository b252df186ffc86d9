use std::str::FromStr;

use alloy_primitives::Address;
use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

use predmarket::chain::MarketClient;
use predmarket::config::Config;
use predmarket::creator::{CreateForm, SubmitState};
use predmarket::events::{Command, Event};
use predmarket::reader::{self, ListState};
use predmarket::render;
use predmarket::wallet::{ConnectionState, Wallet};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());
    let cfg =
        Config::load(&config_path).with_context(|| format!("failed to load {config_path}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&cfg.general.log_level)),
        )
        .init();

    let contract_address = Address::from_str(&cfg.contract.address)
        .with_context(|| format!("invalid contract address {}", cfg.contract.address))?;

    let wallet = Wallet::detect(&cfg);
    let mut connection = ConnectionState::new(wallet.has_key());

    // Reads never need the key; a write client exists only while connected.
    let read_client = MarketClient::new(contract_address, wallet.read_only_provider()?);
    let mut write_client: Option<MarketClient> = None;

    let mut list = ListState::default();
    let mut submit = SubmitState::default();

    let (tx, mut rx) = mpsc::channel::<Event>(32);

    spawn_stdin_task(tx.clone());
    spawn_signal_task(tx.clone());
    spawn_count_read(read_client.clone(), tx.clone());

    println!("{}", render::connection_banner(&connection));
    println!("{}", render::HELP);

    while let Some(event) = rx.recv().await {
        match event {
            Event::Command(Command::Connect) => {
                if !connection.key_present() {
                    println!("{}", render::NO_WALLET_MSG);
                    continue;
                }
                if let Some(address) = connection.address() {
                    println!("Already connected as {}.", render::short_address(&address));
                    continue;
                }
                match wallet.connect() {
                    Ok((address, provider)) => {
                        write_client = Some(MarketClient::new(contract_address, provider));
                        connection.connected(address);
                    }
                    Err(e) => {
                        tracing::error!("failed to connect: {e}");
                        connection.failed(e.to_string());
                    }
                }
                println!("{}", render::connection_banner(&connection));
            }

            Event::Command(Command::Disconnect) => {
                write_client = None;
                connection.disconnected();
                println!("{}", render::connection_banner(&connection));
            }

            Event::Command(Command::Refresh) => {
                spawn_count_read(read_client.clone(), tx.clone());
            }

            Event::Command(Command::Create { days, question }) => {
                submit.touch();
                if !submit.can_submit() {
                    println!("A create transaction is still pending.");
                    continue;
                }
                let Some(client) = write_client.clone() else {
                    println!("Connect a wallet before creating a market.");
                    continue;
                };
                match CreateForm::new(question, days).parse() {
                    Ok(new) => {
                        submit.begin();
                        if let Some(banner) = render::submit_banner(&submit) {
                            println!("{banner}");
                        }
                        let tx = tx.clone();
                        tokio::spawn(async move {
                            let outcome = client
                                .create_market(&new.question, new.duration_secs)
                                .await
                                .map_err(|e| e.to_string());
                            let _ = tx.send(Event::Submitted { outcome }).await;
                        });
                    }
                    Err(e) => println!("{e}"),
                }
            }

            Event::Command(Command::Help) => println!("{}", render::HELP),

            Event::Command(Command::Quit) | Event::Shutdown => {
                println!("Shutting down...");
                break;
            }

            Event::Count { value } => {
                tracing::debug!(count = value, "market count read");
                if let Some(generation) = list.observe_count(value) {
                    let client = read_client.clone();
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let outcome = reader::fetch_batch(&client, value)
                            .await
                            .map_err(|e| e.to_string());
                        let _ = tx.send(Event::Batch { generation, outcome }).await;
                    });
                } else if list.count_known() && !list.is_loading() {
                    println!("{}", render::market_list(list.markets(), now_secs()));
                }
            }

            Event::CountFailed { message } => {
                tracing::error!("market count read failed: {message}");
                println!("Failed to read markets: {message}\nType `refresh` to retry.");
            }

            Event::Batch {
                generation,
                outcome,
            } => {
                if list.apply(generation, outcome) {
                    match list.error() {
                        Some(err) => println!(
                            "Failed to load markets: {err}\nType `refresh` to retry."
                        ),
                        None => println!("{}", render::market_list(list.markets(), now_secs())),
                    }
                }
            }

            Event::Submitted { outcome } => {
                submit.finish(outcome);
                if let Some(banner) = render::submit_banner(&submit) {
                    println!("{banner}");
                }
                // On success the on-chain count moved; re-read it so the
                // list refreshes through the usual count-change path.
                if matches!(submit, SubmitState::Succeeded { .. }) {
                    spawn_count_read(read_client.clone(), tx.clone());
                }
            }
        }
    }

    Ok(())
}

fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn spawn_stdin_task(tx: mpsc::Sender<Event>) {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match Command::parse(&line) {
                        Ok(command) => {
                            if tx.send(Event::Command(command)).await.is_err() {
                                break;
                            }
                        }
                        Err(e) => println!("{e}"),
                    }
                }
                Ok(None) | Err(_) => {
                    let _ = tx.send(Event::Shutdown).await;
                    break;
                }
            }
        }
    });
}

fn spawn_signal_task(tx: mpsc::Sender<Event>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(Event::Shutdown).await;
        }
    });
}

fn spawn_count_read(client: MarketClient, tx: mpsc::Sender<Event>) {
    tokio::spawn(async move {
        let event = match client.market_count().await {
            Ok(value) => Event::Count { value },
            Err(e) => Event::CountFailed {
                message: e.to_string(),
            },
        };
        let _ = tx.send(event).await;
    });
}
