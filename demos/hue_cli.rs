//! CLI application for controlling Hue lights.
//!
//! This example demonstrates a command-line interface over a bridge session:
//! discovery, pairing, listing lights, setting state, and feeding a spoken
//! phrase through the voice command matcher.
//!
//! Run with: cargo run --example hue_cli -- --help

use clap::{Parser, Subcommand};
use hue_voice_rs::{
    Brightness, BridgeSession, ClientConfig, Hue, Saturation, StateDelta, VoiceCommand,
};
use strum::IntoEnumIterator;

#[derive(Parser)]
#[command(name = "hue-cli")]
#[command(about = "Control Hue lights from the command line", long_about = None)]
struct Cli {
    /// Bridge address (skips discovery when given)
    #[arg(short, long, global = true)]
    bridge: Option<String>,

    /// Access token from an earlier `register`
    #[arg(short, long, global = true, env = "HUE_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List bridges reported by the discovery service
    Discover,

    /// Pair with the bridge (press its link button first)
    Register,

    /// List lights and their state
    Lights,

    /// Turn a light on
    On { id: String },

    /// Turn a light off
    Off { id: String },

    /// Set any combination of brightness, hue and saturation
    Set {
        id: String,
        /// Brightness (0-254)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=254))]
        bri: Option<u8>,
        /// Hue (0-65535)
        #[arg(long)]
        hue: Option<u16>,
        /// Saturation (0-254)
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=254))]
        sat: Option<u8>,
    },

    /// Apply a spoken phrase, e.g. "turn blue"
    Say {
        phrase: String,
        /// Apply to every light instead of the first
        #[arg(long)]
        all: bool,
    },

    /// List the phrases `say` understands
    Phrases,

    /// Print session diagnostics
    Diagnostics,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    if let Commands::Phrases = cli.command {
        for cmd in VoiceCommand::iter() {
            println!("  \"{}\"", cmd.trigger());
        }
        return Ok(());
    }

    let mut session = BridgeSession::new(ClientConfig::from_env())?;

    if let Commands::Discover = cli.command {
        let bridges = session.list_bridges().await?;
        if bridges.is_empty() {
            println!("No bridges found.");
        }
        for bridge in bridges {
            println!(
                "  {:15}  {}",
                bridge.address,
                bridge.id.as_deref().unwrap_or("-")
            );
        }
        return Ok(());
    }

    match cli.bridge {
        Some(address) => session.set_bridge_address(&address),
        None => {
            let bridge = session.discover().await?;
            println!("Using bridge at {}", bridge.address);
        }
    }
    if let Some(token) = cli.token {
        session.set_access_token(&token);
    }

    match cli.command {
        Commands::Discover | Commands::Phrases => unreachable!(),

        Commands::Register => match session.register().await {
            Ok(()) => {
                println!("Registered. Token:");
                println!("{}", session.access_token().unwrap_or_default());
            }
            Err(e) if e.is_link_button_not_pressed() => {
                eprintln!("Press the link button on the bridge, then run this again.");
            }
            Err(e) => eprintln!("Error: {}", e),
        },

        Commands::Lights => {
            let lights = session.refresh_lights().await?;
            if lights.is_empty() {
                println!("No lights on this bridge.");
            }
            for light in lights {
                let state = light.state();
                println!(
                    "  {:>3}  {:20}  {:3}  bri={:<4} hue={:<6} sat={}",
                    light.id(),
                    light.name().unwrap_or("-"),
                    if state.is_on() { "ON" } else { "OFF" },
                    fmt(state.brightness().map(|b| b.value() as u32)),
                    fmt(state.hue().map(|h| h.value() as u32)),
                    fmt(state.saturation().map(|s| s.value() as u32)),
                );
            }
        }

        Commands::On { id } => set(&mut session, &id, StateDelta::new(true)).await,

        Commands::Off { id } => set(&mut session, &id, StateDelta::new(false)).await,

        Commands::Set { id, bri, hue, sat } => {
            let mut delta = StateDelta::new(true);
            if let Some(bri) = bri.and_then(Brightness::create) {
                delta.brightness(&bri);
            }
            if let Some(hue) = hue {
                delta.hue(&Hue::new(hue));
            }
            if let Some(sat) = sat.and_then(Saturation::create) {
                delta.saturation(&sat);
            }
            set(&mut session, &id, delta).await;
        }

        Commands::Say { phrase, all } => {
            session.refresh_lights().await?;
            let phrase = phrase.to_lowercase();
            let outcome = if all {
                session
                    .apply_voice_command_to_all(&phrase)
                    .await
                    .map(|cmd| cmd.map(|c| c.to_string()))
            } else {
                session
                    .apply_voice_command(&phrase)
                    .await
                    .map(|delta| delta.map(|d| format!("{:?}", d)))
            };
            match outcome {
                Ok(Some(applied)) => println!("Applied {}", applied),
                Ok(None) => println!("No command recognized in \"{}\"", phrase),
                Err(e) => eprintln!("Error: {}", e.user_message()),
            }
        }

        Commands::Diagnostics => {
            let diag = session.diagnostics().await;
            println!("{}", serde_json::to_string_pretty(&diag)?);
        }
    }

    Ok(())
}

async fn set(session: &mut BridgeSession, id: &str, delta: StateDelta) {
    match session.set_light(id, &delta).await {
        Ok(ack) => {
            println!("Light {} updated", id);
            for warning in ack.warnings {
                eprintln!("  warning: {} ({})", warning.address, warning.description);
            }
        }
        Err(e) => eprintln!("Error: {}", e.user_message()),
    }
}

fn fmt(value: Option<u32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
