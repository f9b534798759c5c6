mod error;
mod logging;
mod summary;

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use synthpop_core::{GenerationConfig, config_json_schema, load_config};
use synthpop_eval::{CustomerRow, EvaluateOptions, ValidationEngine, load_customers_csv};
use synthpop_generate::{GenerationEngine, write_customers_csv};
use synthpop_upload::{LocalDirStore, TransactionFolder, UploadReceipt, Uploader};
use uuid::Uuid;

use error::CliError;
use logging::init_logging;
use summary::{print_errors, print_statistics, write_report};

#[derive(Parser, Debug)]
#[command(name = "synthpop", version, about = "Synthetic credit-card customer generator")]
struct Cli {
    /// Append JSON log lines to this file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate, validate, and write a customer table.
    GenerateCustomers(GenerateArgs),
    /// Validate an existing customer CSV.
    ValidateCustomers(ValidateArgs),
    /// Upload a customer CSV to `customers/<basename>`.
    UploadCustomers(UploadArgs),
    /// Upload a transaction file to `transactions/<folder>/<basename>`.
    UploadTransactions(UploadTransactionsArgs),
    /// List stored objects under a prefix.
    ListObjects(ListArgs),
    /// Print the JSON Schema for generation config files.
    ConfigSchema,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Number of customers to generate (default: 50000).
    #[arg(long)]
    count: Option<usize>,
    /// Output CSV path.
    #[arg(long, default_value = "customers.csv")]
    output: PathBuf,
    /// Random seed (default: 42).
    #[arg(long)]
    seed: Option<u64>,
    /// Generation config file (.toml or .json).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Date account ages are measured from (default: today, UTC).
    #[arg(long, value_name = "YYYY-MM-DD")]
    reference_date: Option<NaiveDate>,
    /// Allowed gap between empirical and target segment shares.
    #[arg(long, default_value_t = 0.05)]
    tolerance: f64,
    /// Write the validation report (.md for markdown, JSON otherwise).
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Customer CSV to validate.
    #[arg(long)]
    file: PathBuf,
    /// Generation config the table should satisfy.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 0.05)]
    tolerance: f64,
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct StoreArgs {
    /// Bucket name (a directory under the store root).
    #[arg(long)]
    bucket: String,
    /// Directory holding the buckets.
    #[arg(long, default_value = "store")]
    store_root: PathBuf,
}

#[derive(Args, Debug)]
struct UploadArgs {
    /// Local file to upload.
    #[arg(long)]
    file: PathBuf,
    #[command(flatten)]
    store: StoreArgs,
}

#[derive(Args, Debug)]
struct UploadTransactionsArgs {
    #[arg(long)]
    file: PathBuf,
    /// `historical` or `streaming`.
    #[arg(long, default_value = "historical")]
    folder: String,
    #[command(flatten)]
    store: StoreArgs,
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(long, default_value = "")]
    prefix: String,
    #[command(flatten)]
    store: StoreArgs,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    let run_id = Uuid::new_v4().to_string();
    tracing::info!(event = "run_started", run_id = %run_id);
    let timer = Instant::now();

    let outcome = match cli.command {
        Command::GenerateCustomers(args) => run_generate(args),
        Command::ValidateCustomers(args) => run_validate(args),
        Command::UploadCustomers(args) => run_upload_customers(args).await,
        Command::UploadTransactions(args) => run_upload_transactions(args).await,
        Command::ListObjects(args) => run_list(args).await,
        Command::ConfigSchema => run_config_schema(),
    };

    let status = if outcome.is_ok() { "success" } else { "failure" };
    tracing::info!(
        event = "run_finished",
        run_id = %run_id,
        status,
        duration_ms = timer.elapsed().as_millis() as u64
    );
    outcome
}

fn load_or_default(path: Option<&Path>) -> Result<GenerationConfig, CliError> {
    match path {
        Some(path) => {
            let config = load_config(path)?;
            tracing::info!(path = %path.display(), "config loaded");
            Ok(config)
        }
        None => Ok(GenerationConfig::default()),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let mut config = load_or_default(args.config.as_deref())?;
    if let Some(count) = args.count {
        config.population_size = count;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.reference_date.is_some() {
        config.reference_date = args.reference_date;
    }

    println!(
        "Generating {} customers with seed {}...",
        config.population_size, config.seed
    );
    let result = GenerationEngine::new(config.clone()).run()?;
    println!("Generated {} customer records", result.records.len());

    println!("\nValidating customer data...");
    let engine = ValidationEngine::new(EvaluateOptions {
        distribution_tolerance: args.tolerance,
        ..EvaluateOptions::default()
    })?;
    let rows: Vec<CustomerRow> = result.records.iter().map(CustomerRow::from).collect();
    let report = engine.run(&rows, &config);
    print_statistics(&report);
    if let Some(path) = &args.report {
        write_report(path, &report)?;
    }
    if !report.is_valid {
        print_errors(&report);
        return Err(CliError::ValidationFailed(report.errors.len()));
    }
    println!("\nValidation passed");

    let summary = write_customers_csv(&args.output, &result.records)?;
    println!(
        "\nSaved {} rows ({} bytes) to {}",
        summary.rows,
        summary.bytes,
        args.output.display()
    );
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<(), CliError> {
    let config = load_or_default(args.config.as_deref())?;
    let rows = load_customers_csv(&args.file)?;
    println!("Validating {} rows from {}...", rows.len(), args.file.display());

    let engine = ValidationEngine::new(EvaluateOptions {
        distribution_tolerance: args.tolerance,
        ..EvaluateOptions::default()
    })?;
    let report = engine.run(&rows, &config);
    print_statistics(&report);
    if let Some(path) = &args.report {
        write_report(path, &report)?;
    }
    if !report.is_valid {
        print_errors(&report);
        return Err(CliError::ValidationFailed(report.errors.len()));
    }
    println!("\nValidation passed");
    Ok(())
}

async fn run_upload_customers(args: UploadArgs) -> Result<(), CliError> {
    let uploader = open_uploader(&args.store);
    println!("Uploading {} to bucket {}", args.file.display(), args.store.bucket);
    let receipt = uploader.upload_customers(&args.file).await?;
    confirm_upload(&uploader, &args.file, &receipt).await
}

async fn run_upload_transactions(args: UploadTransactionsArgs) -> Result<(), CliError> {
    let folder = TransactionFolder::parse(&args.folder)?;
    let uploader = open_uploader(&args.store);
    println!("Uploading {} to bucket {}", args.file.display(), args.store.bucket);
    let receipt = uploader.upload_transactions(&args.file, folder).await?;
    confirm_upload(&uploader, &args.file, &receipt).await
}

async fn run_list(args: ListArgs) -> Result<(), CliError> {
    let uploader = open_uploader(&args.store);
    for key in uploader.list(&args.prefix).await? {
        println!("{key}");
    }
    Ok(())
}

fn run_config_schema() -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(&config_json_schema())?);
    Ok(())
}

fn open_uploader(args: &StoreArgs) -> Uploader<LocalDirStore> {
    Uploader::new(LocalDirStore::new(&args.store_root, args.bucket.clone()))
}

async fn confirm_upload(
    uploader: &Uploader<LocalDirStore>,
    local: &Path,
    receipt: &UploadReceipt,
) -> Result<(), CliError> {
    println!("  File size: {:.2} MB", receipt.size as f64 / (1024.0 * 1024.0));
    println!("\nVerifying upload...");
    if !uploader.verify(local, &receipt.key).await? {
        eprintln!("\nUpload completed but verification failed");
        return Err(CliError::VerificationFailed(receipt.key.clone()));
    }
    println!("\nUpload successful: {}", receipt.location);
    Ok(())
}
