//! Interactive mode for the server.
//!
//! Prompts for the listen address and the cache lifetime before starting.

use dialoguer::{Confirm, Input};
use freezing_zones_source::source_def::CACHE_TTL_ENV;

/// Runs the server in interactive mode, prompting for configuration.
///
/// The answers are exported as `BIND_ADDR`, `PORT` and the cache TTL
/// variable, then [`super::run_server`] takes over.
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run() -> std::io::Result<()> {
    println!("Freezing Zones Dashboard Server");
    println!();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default("127.0.0.1".to_string())
        .interact_text()
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port: u16 = Input::new()
        .with_prompt("Port")
        .default(8080)
        .interact_text()
        .unwrap_or(8080);

    let ttl_secs: String = Input::new()
        .with_prompt("Cache lifetime in seconds (blank keeps data until restart)")
        .allow_empty(true)
        .interact_text()
        .unwrap_or_default();

    // SAFETY: `set_var` is unsound only while another thread reads or writes
    // the environment. Under the CLI, tokio worker threads are alive but
    // idle: the CLI's only task is awaiting this blocking call, and nothing
    // in the process touches the environment again until `run_server`
    // reads these values below, on this same thread.
    unsafe {
        std::env::set_var("BIND_ADDR", &bind_addr);
        std::env::set_var("PORT", port.to_string());
        if !ttl_secs.trim().is_empty() {
            std::env::set_var(CACHE_TTL_ENV, ttl_secs.trim());
        }
    }

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server().await
}
