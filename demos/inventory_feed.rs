use pos_realtime::{ConnectionState, EventEnvelope, RealtimeClient, RealtimeClientOptions, Topic};
use std::sync::Arc;
use std::time::Duration;

/// Watches stock and warranty events with a small connection indicator.
///
/// Configure with POS_API_BASE_URL or POS_REALTIME_WS_URL / POS_REALTIME_SSE_URL,
/// and POS_ACCESS_TOKEN for authenticated backends (a `.env` file works too).
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pos_realtime=debug".into()),
        )
        .init();

    let mut options = RealtimeClientOptions::from_env();
    if options.topics.is_empty() {
        options.topics = vec![Topic::Inventory, Topic::Warranty];
    }
    println!("Topics: {:?}", options.topics);

    let client = RealtimeClient::new(RealtimeClientOptions {
        get_token: Some(Arc::new(|| Ok(std::env::var("POS_ACCESS_TOKEN").ok()))),
        on_status: Some(Arc::new(|state: ConnectionState| {
            let indicator = match state {
                ConnectionState::ConnectedSocket | ConnectionState::ConnectedStream => "🟢",
                ConnectionState::Connecting | ConnectionState::Reconnecting => "🟡",
                ConnectionState::Disconnected => "🔴",
            };
            println!("{} {}", indicator, state);
        })),
        on_backoff: Some(Arc::new(|delay: Duration| {
            println!("   retrying in {}ms", delay.as_millis())
        })),
        on_event: Some(Arc::new(|event: EventEnvelope| match event.resolved_topic() {
            Topic::Inventory => println!("📦 {} {:?}", event.r#type, event.data),
            Topic::Warranty => println!("🛠  {} {:?}", event.r#type, event.data),
            other => println!("   {} ({})", event.r#type, other),
        })),
        ..options
    });

    let endpoints = client.endpoints();
    println!("Socket: {}\nStream: {}\n", endpoints.socket, endpoints.stream);

    client.start().await;
    tokio::signal::ctrl_c().await?;
    client.stop().await;

    println!("Final status: {:?}", client.state().await);
    Ok(())
}
