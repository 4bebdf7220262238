//! tradelog main entry point

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Runtime;
use tradelog_config::{Config, ConfigErrorSeverity};
use tradelog_core::{
    sort_by_timestamp, HttpTransactionsApi, Transaction, TransactionStatus,
    TransactionsHistoryStore,
};

#[derive(Parser, Debug)]
#[command(name = "tradelog")]
#[command(version = "0.1.0")]
#[command(about = "Fetch and record stock transactions on a trading backend", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "tradelog.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the transactions history
    Fetch {
        /// Only print settled transactions
        #[arg(long, conflicts_with = "status")]
        passed_only: bool,
        /// Only print transactions with this status tag (e.g. OPEN, CANCELLED)
        #[arg(long)]
        status: Option<TransactionStatus>,
    },
    /// Post a transaction payload
    Submit {
        /// JSON payload
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        data: Option<String>,
        /// Read the JSON payload from a file
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Fetch, then record a settled transaction locally
    Append {
        /// Transaction as JSON
        #[arg(long)]
        data: String,
    },
    /// Print a default configuration file
    InitConfig,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Command::InitConfig = args.command {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let config = load_config(&args.config)?;
    init_logging(&config);

    log::info!("Using endpoint {}", config.api.endpoint_url());
    let api = HttpTransactionsApi::new(&config.api)?;
    let store = TransactionsHistoryStore::new(Arc::new(api));

    let rt = Runtime::new()?;
    rt.block_on(run(args.command, &store))
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    let error = match Config::load(path.to_path_buf()) {
        Ok(config) => return Ok(config),
        Err(error) => error,
    };
    if error.severity() == ConfigErrorSeverity::Fatal {
        bail!("{}", error.report());
    }

    eprintln!("[WARN] {}; using environment settings", error);
    Config::from_env().map_err(|e| {
        anyhow::anyhow!(
            "no config file at {} and the environment is incomplete:\n{}",
            path.display(),
            e.report()
        )
    })
}

fn init_logging(config: &Config) {
    let env = env_logger::Env::default().default_filter_or(config.logging.level.as_str());
    env_logger::Builder::from_env(env).init();
}

async fn run(command: Command, store: &TransactionsHistoryStore) -> anyhow::Result<()> {
    match command {
        Command::Fetch { passed_only, status } => {
            store.fetch_all().await?;
            let state = store.snapshot();
            let shown: Vec<Transaction> = match status {
                _ if passed_only => state.passed_transactions.clone(),
                Some(status) => state
                    .transactions
                    .iter()
                    .filter(|t| t.has_status(status))
                    .cloned()
                    .collect(),
                None => state.transactions.clone(),
            };
            print_transactions(&shown);
            println!(
                "{} transactions, {} passed",
                state.transactions.len(),
                state.passed_transactions.len()
            );
        }
        Command::Submit { data, file } => {
            let raw = match (data, file) {
                (Some(data), _) => data,
                (None, Some(file)) => std::fs::read_to_string(&file)
                    .with_context(|| format!("reading {}", file.display()))?,
                (None, None) => bail!("either --data or --file is required"),
            };
            let payload: serde_json::Value =
                serde_json::from_str(&raw).context("payload is not valid JSON")?;
            let response = store.submit_one(&payload).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Append { data } => {
            let transaction: Transaction =
                serde_json::from_str(&data).context("transaction is not valid JSON")?;
            store.fetch_all().await?;
            let stock_id = transaction.stock_id.clone();
            if store.append_if_passed(transaction) {
                println!("Recorded {} as passed", stock_id);
            } else {
                println!("Skipped {}: not PASSED or already recorded", stock_id);
            }
            print_transactions(&store.passed_transactions());
        }
        Command::InitConfig => {}
    }
    Ok(())
}

fn print_transactions(transactions: &[Transaction]) {
    let mut transactions = transactions.to_vec();
    sort_by_timestamp(&mut transactions);
    for transaction in &transactions {
        match transaction.total_value() {
            Some(total) => println!("{} = {:.2}", transaction.summary(), total),
            None => println!("{}", transaction.summary()),
        }
    }
}
