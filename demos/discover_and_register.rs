//! Find the bridge, pair with it, and turn every light blue.
//!
//! This example demonstrates:
//! - Discovery of the bridge through the cloud lookup service
//! - Polling registration while the user presses the link button
//! - Applying one voice phrase to all lights
//!
//! Run with: cargo run --example discover_and_register

use std::time::Duration;

use hue_voice_rs::{BridgeSession, ClientConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let mut session = BridgeSession::new(ClientConfig::from_env())?;

    println!("Looking for a Hue bridge...");
    let bridge = session.discover().await?;
    println!("Found bridge at {}", bridge.address);

    println!("Press the link button on the bridge (waiting up to 30s)...");
    let mut registered = false;
    for _ in 0..15 {
        match session.register().await {
            Ok(()) => {
                registered = true;
                break;
            }
            Err(e) if e.is_link_button_not_pressed() => {
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
            Err(e) => return Err(e.into()),
        }
    }
    if !registered {
        println!("Link button was not pressed in time.");
        return Ok(());
    }
    println!("Registered with token {}", session.access_token().unwrap_or_default());

    let lights = session.refresh_lights().await?;
    println!("Found {} light(s)", lights.len());
    if lights.is_empty() {
        return Ok(());
    }

    println!("\nSaying \"turn blue\"...");
    match session.apply_voice_command_to_all("turn blue").await {
        Ok(_) => println!("  ✓ All lights are blue"),
        Err(e) => eprintln!("  ✗ {}", e.user_message()),
    }

    println!("\nDone!");
    Ok(())
}
