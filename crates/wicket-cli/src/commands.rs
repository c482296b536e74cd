use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;
use wicket_core::{
    AuthzClient, Credential, DecisionCache, Gatekeeper, HttpAuthzClient, LocalAuthzClient,
};

use crate::args::{Cli, Command};
use crate::seed;

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    match cli.command {
        Command::Gate { config, local } => run_gate(&config, local).await,
        Command::CheckSchedule {
            config,
            id,
            date,
            time,
        } => check_schedule(&config, &id, date, &time),
    }
}

async fn run_gate(config_path: &Path, local: bool) -> anyhow::Result<i32> {
    let file = seed::load(config_path)?;

    let client: Arc<dyn AuthzClient> = if local {
        Arc::new(LocalAuthzClient::new(seed::build_store(&file.schedule)?))
    } else {
        Arc::new(HttpAuthzClient::new(&file.gate.authorization_endpoint))
    };
    let cache = Arc::new(DecisionCache::new(
        file.gate.cache_max_age(),
        file.gate.cache_capacity,
    ));
    let gatekeeper = Gatekeeper::new(client, cache, file.gate.clone());

    info!(
        endpoint = %file.gate.authorization_endpoint,
        local,
        "gate ready, reading credential ids from stdin"
    );

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let raw = line.trim();
        if raw.is_empty() {
            continue;
        }
        match Credential::parse(raw) {
            Ok(credential) => {
                let decision = gatekeeper.authenticate(&credential).await;
                println!(
                    "{} {} ({}, {}ms)",
                    credential,
                    decision.outcome,
                    decision.provenance,
                    decision.latency.as_millis()
                );
            }
            Err(e) => {
                // A reader glitch is not a decision; report and keep serving.
                eprintln!("unreadable credential: {e}");
            }
        }
    }
    Ok(0)
}

fn check_schedule(
    config_path: &Path,
    id: &str,
    date: NaiveDate,
    time: &str,
) -> anyhow::Result<i32> {
    let file = seed::load(config_path)?;
    let store = seed::build_store(&file.schedule)?;
    let credential = Credential::parse(id)?;
    let time = seed::parse_time(time)?;

    let permitted = wicket_core::schedule::matches(&store, &credential, date, time)?;
    if permitted {
        println!("granted");
        Ok(0)
    } else {
        println!("denied");
        Ok(1)
    }
}
