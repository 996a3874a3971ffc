use clap::{ArgAction, Parser, Subcommand};
use color_eyre::{eyre::eyre, Result};
use futures::future::try_join_all;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use recstore::config::Config;
use recstore::network::header_adapter;
use recstore::{
  HttpNetworkManager, JsonRecord, MemoryCache, NetworkManager, NetworkOperation, Store,
};

#[derive(Parser, Debug)]
#[command(name = "recstore")]
#[command(about = "Fetch and mutate records of a REST resource")]
#[command(version)]
struct Args {
  /// Path to config file (default: ./recstore.yaml or $XDG_CONFIG_HOME/recstore/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Base address of the API, overrides the config file
  #[arg(long)]
  host: Option<String>,

  /// Resource name (singular), overrides the config file
  #[arg(short, long)]
  resource: Option<String>,

  /// Increase log verbosity (-v info, -vv debug)
  #[arg(short, long, action = ArgAction::Count)]
  verbose: u8,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Fetch records by id (several ids are fetched concurrently)
  Find {
    #[arg(required = true)]
    ids: Vec<String>,
  },
  /// Fetch the whole collection
  FindAll,
  /// Create a record from a JSON object
  Create { json: String },
  /// Update a record from a JSON object (must carry its id)
  Update { json: String },
  /// Delete a record by id
  Delete { id: String },
  /// Print the operation to HTTP method table
  Methods,
}

type JsonStore = Store<JsonRecord, HttpNetworkManager<JsonRecord>, MemoryCache<JsonRecord>>;

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();

  let config = Config::load(args.config.as_deref())?;

  // Override host if specified on command line
  let config = if let Some(host) = args.host.clone() {
    Config {
      host: Some(host),
      ..config
    }
  } else {
    config
  };

  let _guard = init_tracing(args.verbose, config.log_file.as_deref())?;

  if let Command::Methods = args.command {
    for operation in NetworkOperation::ALL {
      println!("{:<10} {}", operation, operation.method());
    }
    return Ok(());
  }

  let store = build_store(&config, args.resource.as_deref())?;
  run(&store, args.command).await
}

fn build_store(config: &Config, resource: Option<&str>) -> Result<JsonStore> {
  let options = config.options()?;
  let name = config.resource_name(resource)?;

  let mut network = HttpNetworkManager::new(name, &options)
    .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;
  if !config.headers.is_empty() {
    network = network.with_adapter(header_adapter(config.headers.clone()));
  }

  Ok(Store::new(network, MemoryCache::new()))
}

async fn run(store: &JsonStore, command: Command) -> Result<()> {
  match command {
    Command::Find { ids } => {
      let probes: Vec<JsonRecord> = ids
        .iter()
        .map(|id| JsonRecord::with_id(id.as_str()))
        .collect();
      let records = try_join_all(probes.iter().map(|probe| store.find(probe))).await?;
      for record in &records {
        print_json(record)?;
      }
    }
    Command::FindAll => {
      let records = store.find_all(&JsonRecord::with_id(0)).await?;
      print_json(&records)?;
    }
    Command::Create { json } => {
      let created = store.create(&parse_record(&json)?).await?;
      print_json(&created)?;
    }
    Command::Update { json } => {
      let updated = store.update(&parse_record(&json)?).await?;
      print_json(&updated)?;
    }
    Command::Delete { id } => {
      let deleted = store.delete(&JsonRecord::with_id(id.as_str())).await?;
      print_json(&deleted)?;
    }
    Command::Methods => {}
  }

  Ok(())
}

fn parse_record(json: &str) -> Result<JsonRecord> {
  serde_json::from_str(json).map_err(|e| eyre!("Invalid record JSON (an \"id\" field is required): {}", e))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

/// Install the tracing subscriber. The returned guard must live until exit so
/// buffered file logs are flushed.
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
  let default_level = match verbose {
    0 => "warn",
    1 => "info",
    _ => "debug",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  match log_file {
    Some(path) => {
      let file_name = path
        .file_name()
        .ok_or_else(|| eyre!("Invalid log file path: {}", path.display()))?;
      let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

      let appender = tracing_appender::rolling::never(dir, file_name);
      let (writer, guard) = tracing_appender::non_blocking(appender);
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
      Ok(Some(guard))
    }
    None => {
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
      Ok(None)
    }
  }
}
