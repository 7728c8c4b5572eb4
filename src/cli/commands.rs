//! CLI command implementations

use std::path::Path;
use std::sync::Arc;

use serde_json::json;

use super::args::Command;
use super::errors::{CliError, CliResult};
use crate::config::ServiceConfig;
use crate::data::{Entity, Item, Store, StoreRepository};
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::rest_api::{serve, ItemServer};
use crate::service::DefaultItemService;

/// Parse process arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Start { config, port } => start(&config, port),
        Command::Check { config } => check(&config),
    }
}

fn load_config(path: &Path) -> CliResult<ServiceConfig> {
    let config = ServiceConfig::load(path)?;
    Logger::set_level(config.severity()?);
    log_event_with_fields(Event::ConfigLoaded, &[("path", &path.display().to_string())]);
    Ok(config)
}

fn open_store(config: &ServiceConfig) -> CliResult<Store> {
    match &config.data_file {
        Some(path) => Ok(Store::open(path)?),
        None => Ok(Store::in_memory()),
    }
}

/// Create the configured data file
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let path = config
        .data_file
        .as_ref()
        .ok_or_else(|| CliError::config_error("data_file is not set"))?;
    Store::init(path)?;
    Ok(())
}

/// Open the store and serve HTTP until interrupted
pub fn start(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = port {
        config.port = port;
    }

    let store = Arc::new(open_store(&config)?);
    let repo: StoreRepository<Item> = StoreRepository::new(store);
    let service = DefaultItemService::new(repo, config.page_limits());
    let router = ItemServer::from_config(service, &config)?.router();

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(serve(router, &config.socket_addr()))
        .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
}

/// Validate config and data file; print a JSON summary to stdout
pub fn check(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;
    let items = store.len(Item::COLLECTION)?;

    let summary = json!({
        "status": "ok",
        "addr": config.socket_addr(),
        "data_file": store.path().map(|p| p.display().to_string()),
        "items": items,
    });
    println!("{}", summary);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliErrorCode;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, data_file: Option<&Path>) -> std::path::PathBuf {
        let path = dir.path().join("itemsvc.json");
        let config = match data_file {
            Some(p) => json!({"data_file": p, "log_level": "error"}),
            None => json!({"log_level": "error"}),
        };
        fs::write(&path, config.to_string()).unwrap();
        path
    }

    #[test]
    fn test_init_then_check() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("data").join("items.json");
        let config = write_config(&tmp, Some(&data));

        init(&config).unwrap();
        assert!(data.exists());
        check(&config).unwrap();

        let err = init(&config).unwrap_err();
        assert_eq!(err.code(), CliErrorCode::StoreError);
    }

    #[test]
    fn test_init_requires_data_file() {
        let tmp = TempDir::new().unwrap();
        let config = write_config(&tmp, None);
        let err = init(&config).unwrap_err();
        assert_eq!(err.code(), CliErrorCode::ConfigError);
    }

    #[test]
    fn test_check_reports_corrupted_data_file() {
        let tmp = TempDir::new().unwrap();
        let data = tmp.path().join("items.json");
        let config = write_config(&tmp, Some(&data));
        fs::write(&data, r#"{"version":1,"checksum":0,"payload":"{}"}"#).unwrap();

        let err = check(&config).unwrap_err();
        assert_eq!(err.code(), CliErrorCode::DataCorrupted);
    }

    #[test]
    fn test_missing_config() {
        let tmp = TempDir::new().unwrap();
        let err = check(&tmp.path().join("absent.json")).unwrap_err();
        assert_eq!(err.code(), CliErrorCode::ConfigError);
    }
}
