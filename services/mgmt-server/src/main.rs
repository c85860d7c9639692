// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2026 Edgecast Cloud LLC.

//! Management-plane server
//!
//! Run with:
//! ```bash
//! cargo run -p mgmt-server
//! ```
//!
//! Then query it as a given account:
//! ```bash
//! curl -H 'x-caller-account: 2' http://localhost:8090/accounts
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use dropshot::{ConfigDropshot, ConfigLogging, ConfigLoggingLevel, HttpServerStarter};
use tracing::info;

use mgmt_server::api_description;
use mgmt_server::config::{DEFAULT_BIND_ADDRESS, ServerConfig};
use mgmt_server::context::ApiContext;

/// Default maximum request body size (bytes). Every endpoint is a GET.
const DEFAULT_BODY_MAX_BYTES: usize = 64 * 1024;

fn print_version() {
    let version = env!("CARGO_PKG_VERSION");
    let name = env!("CARGO_PKG_NAME");
    let buildstamp = option_env!("STAMP").unwrap_or("no-STAMP");
    println!("{} {} ({})", name, version, buildstamp);
}

fn print_usage(program: &str) {
    print_version();
    println!("Usage: {} [OPTIONS]", program);
    println!();
    println!("Options:");
    println!("  -h, --help       Display this information");
    println!("  -V, --version    Display the program's version number");
    println!();
    println!("Environment variables:");
    println!(
        "  BIND_ADDRESS              Server bind address (default: {})",
        DEFAULT_BIND_ADDRESS
    );
    println!("  FIXTURES_DIR              Directory of JSON fixtures (default: bundled)");
    println!("  DEFAULT_PAGE_SIZE         Page size when none is given (default: 50)");
    println!("  MAX_PAGE_SIZE             Largest accepted page size (default: 500)");
    println!("  SCOPE_BOUNDED_RECURSIVE   Domain admins see subdomains (default: false)");
    println!("  CONFIG_FILE               JSON config file, used instead of the above");
    println!("  RUST_LOG                  Log filter (default: mgmt_server=info,dropshot=info)");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle --version and --help
    let args: Vec<String> = std::env::args().collect();
    #[allow(clippy::never_loop)] // Intentional: early return on first recognized arg
    for arg in &args[1..] {
        match arg.as_str() {
            "-V" | "--version" => {
                print_version();
                return Ok(());
            }
            "-h" | "--help" => {
                print_usage(&args[0]);
                return Ok(());
            }
            _ => {
                eprintln!("Unknown option: {}", arg);
                std::process::exit(1);
            }
        }
    }

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "mgmt_server=info,dropshot=info".to_string()),
        ))
        .init();

    print_version();

    // Load configuration
    let config = match std::env::var("CONFIG_FILE") {
        Ok(path) => ServerConfig::from_file(&PathBuf::from(path)).await?,
        Err(_) => ServerConfig::from_env().context("Failed to load configuration")?,
    };
    info!(
        fixtures_dir = %config.fixtures_dir.display(),
        max_page_size = config.max_page_size,
        bounded_recursive = config.scope.bounded_recursive,
        "Configuration loaded"
    );

    let api_context = ApiContext::new(&config).context("Failed to create API context")?;

    let api = api_description()
        .map_err(|e| anyhow::anyhow!("Failed to create API description: {}", e))?;

    let bind_address = config
        .bind_address
        .parse()
        .context("Invalid BIND_ADDRESS")?;

    let config_dropshot = ConfigDropshot {
        bind_address,
        default_request_body_max_bytes: DEFAULT_BODY_MAX_BYTES,
        default_handler_task_mode: dropshot::HandlerTaskMode::Detached,
        ..Default::default()
    };

    let config_logging = ConfigLogging::StderrTerminal {
        level: ConfigLoggingLevel::Info,
    };

    let log = config_logging
        .to_logger("mgmt-server")
        .map_err(|error| anyhow::anyhow!("failed to create logger: {}", error))?;

    let server = HttpServerStarter::new(&config_dropshot, api, api_context, &log)
        .map_err(|error| anyhow::anyhow!("failed to create server: {}", error))?
        .start();

    info!("Management server running on http://{}", server.local_addr());

    server
        .await
        .map_err(|error| anyhow::anyhow!("server failed: {}", error))
}
