//! Career Mentor Backend - Main Entry Point
//!
//! Starts the web API server for the AI career counseling assistant.

use career_mentor::api::run_server;
use career_mentor::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    println!("╔════════════════════════════════════════════════╗");
    println!("║   Career Mentor - AI Career Counseling Tool    ║");
    println!("║   Chat → Assess → Recommend                    ║");
    println!("╚════════════════════════════════════════════════╝");
    println!();

    // Missing credentials are fatal: without an API key every chat would
    // degrade to the canned fallback, which is not a useful deployment.
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("Configuration error: {}", err);
            std::process::exit(1);
        }
    };

    run_server(config).await
}
