use pos_realtime::{ConnectionState, EventEnvelope, RealtimeClient, RealtimeClientOptions};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Create client, every topic accepted
    let client = RealtimeClient::new(RealtimeClientOptions {
        socket_url: Some("ws://127.0.0.1:8787/ws".to_string()),
        on_event: Some(Arc::new(|event: EventEnvelope| {
            println!("[{}] {} {:?}", event.resolved_topic(), event.r#type, event.data)
        })),
        on_status: Some(Arc::new(|state: ConnectionState| println!("status: {}", state))),
        ..Default::default()
    });

    println!("Connecting to {}...", client.endpoints().socket);
    client.start().await;

    // Keep feed alive
    tokio::signal::ctrl_c().await?;

    println!("Stopping...");
    client.stop().await;
    println!("Stopped!");

    Ok(())
}
