// SPDX-License-Identifier: MPL-2.0

//! Test program: list bulbs, switch each one on for 8 seconds, then off.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example bulb_control -- <username> <password> [--wifi]
//! ```
//!
//! Set `RUST_LOG=sengled_lib=debug` to see the cloud traffic.

use std::env;
use std::time::Duration;

use sengled_lib::{ClientConfig, LightRequest, SengledClient, Subscribable};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 3 {
        eprintln!("Usage: {} <username> <password> [--wifi]", args[0]);
        std::process::exit(1);
    }

    let wifi = args.iter().skip(3).any(|a| a == "--wifi");
    let config = ClientConfig::new(&args[1], &args[2]).with_wifi(wifi);

    println!("Logging in...");
    let client = SengledClient::connect(config).await?;

    let bulbs = client.discover_bulbs().await?;
    println!("Found {} bulb(s)", bulbs.len());

    for bulb in &bulbs {
        let mac = bulb.mac().to_string();
        bulb.on_state_changed(move |change| println!("  [{mac}] {change:?}"));
        println!(
            "- {} ({}, {}) on={} available={}",
            bulb.name(),
            bulb.mac(),
            bulb.transport(),
            bulb.is_on(),
            bulb.is_available()
        );
    }

    for bulb in &bulbs {
        let mut request = LightRequest::new();
        if bulb.capabilities().supports_brightness_control() {
            request = request.with_brightness(128);
        }
        bulb.turn_on(request).await?;
    }

    tokio::time::sleep(Duration::from_secs(8)).await;

    for bulb in &bulbs {
        bulb.turn_off().await?;
        bulb.update().await?;
    }

    for switch in client.list_switches().await? {
        println!("- switch {} on={}", switch.state().name(), switch.is_on());
    }

    client.disconnect().await;
    println!("Done");
    Ok(())
}
