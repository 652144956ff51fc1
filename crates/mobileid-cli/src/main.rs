use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use mobileid_client::{AuthClient, ClientConfig, MobileIdClient, WorkerPool, WorkerPoolConfig};

/// Runs Mobile-ID authentications against the provider demo environment.
#[derive(Debug, Parser)]
#[command(name = "mobileid", version, about)]
struct Args {
    /// Relying party name registered with the provider.
    #[arg(long, default_value = "DEMO")]
    relying_party_name: String,

    /// Relying party UUID registered with the provider.
    #[arg(long, default_value = "00000000-0000-0000-0000-000000000000")]
    relying_party_uuid: String,

    /// Provider API base URL.
    #[arg(long, default_value = "https://tsp.demo.sk.ee/mid-api")]
    url: String,

    /// Session timeout in seconds.
    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,

    /// Number of polling workers.
    #[arg(long, default_value_t = 50)]
    concurrency: usize,

    /// Polling queue capacity.
    #[arg(long, default_value_t = 100)]
    queue_size: usize,
}

/// Demo accounts of the provider test environment.
const DEMO_IDENTITIES: &[(&str, &str)] = &[
    ("51307149560", "+37269930366"),
    ("60001017869", "+37268000769"),
    ("60001018800", "+37200000566"),
    ("60001019939", "+37200000266"),
    ("60001019947", "+37207110066"),
    ("60001019950", "+37201100266"),
    ("60001019961", "+37200000666"),
    ("60001019972", "+37201200266"),
    ("60001019983", "+37213100266"),
    ("50001018908", "+37266000266"),
];

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let config = ClientConfig::new(args.relying_party_name, args.relying_party_uuid)
        .with_base_url(args.url)
        .with_timeout(Duration::from_secs(args.timeout_secs));
    let client = Arc::new(AuthClient::new(config)?);

    let pool = WorkerPool::new(
        client.clone(),
        WorkerPoolConfig::new(args.concurrency, args.queue_size)?,
    );
    let token = CancellationToken::new();
    pool.start(token.clone()).await;

    let mut pending = Vec::new();
    for (identity, phone_number) in DEMO_IDENTITIES.iter().copied() {
        match client.create_session(phone_number, identity).await {
            Ok(session) => {
                info!(
                    session_id = %session.id,
                    code = %session.verification_code,
                    identity,
                    "session created"
                );
                pending.push((identity, pool.process(&token, session.id).await));
            }
            Err(err) => error!(identity, %err, "failed to create session"),
        }
    }

    for (identity, receiver) in pending {
        match receiver.await {
            Ok(Ok(person)) => info!(
                identity,
                identity_number = %person.identity_number,
                name = %format!("{} {}", person.first_name, person.last_name),
                "authenticated"
            ),
            Ok(Err(err)) => error!(identity, %err, "authentication failed"),
            Err(_) => error!(identity, "result channel closed"),
        }
    }

    pool.stop().await;
    Ok(())
}
