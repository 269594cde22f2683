use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::ConversionService;
use crate::domain::{Account, Cashier, CostCenter, LedgerProfile};
use crate::io::{default_output_path, Importer, ReferenceKind};

/// Contable - ledger export for payments and electronic invoices
#[derive(Parser)]
#[command(name = "contable")]
#[command(about = "Converts payment and e-invoice sheets into a double-entry ledger export")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "contable.db")]
    pub database: String,

    /// JSON file overriding account codes, memo texts and user
    #[arg(short, long, global = true)]
    pub profile: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Convert a payments sheet into cash receipts
    Payment {
        /// Payments CSV (first row is the header)
        file: PathBuf,

        /// Export file (defaults to ~/CONTABLE.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Convert an electronic invoices sheet into sales invoice lines
    Billing {
        /// Invoices CSV (first row is the header)
        file: PathBuf,

        /// Per-item tax breakdown CSV, used for multi-item invoices
        #[arg(short, long)]
        tax_breakdown: PathBuf,

        /// Export file (defaults to ~/CONTABLE.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Reference data management commands
    #[command(subcommand)]
    Reference(ReferenceCommands),

    /// List recorded conversion runs
    Runs {
        /// Which runs: payment, billing (omit for both)
        kind: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ReferenceCommands {
    /// Import reference data from CSV
    Import {
        /// What to import: cashiers, accounts, cost-centers
        kind: String,

        /// Input file
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Map a payment method to a ledger account
    AddCashier {
        /// Payment method code as it appears in the payments sheet
        code: String,

        /// Ledger account code
        account: String,
    },

    /// Register an item key for a ledger account
    AddAccount {
        /// Item code as it appears in the invoices sheet
        key: String,

        /// Ledger account code
        code: String,

        /// Account name
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Register a cost center
    AddCostCenter {
        /// Cost center name as it appears in the invoices sheet
        name: String,

        /// Cost center code
        code: String,
    },

    /// Show how much reference data is loaded
    Stats,
}

impl Cli {
    /// Install the logger. `RUST_LOG` wins over `--verbose`.
    pub fn init_logging(&self) {
        let default_filter = if self.verbose { "debug" } else { "warn" };
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
            .init();
    }

    fn load_profile(&self) -> Result<LedgerProfile> {
        match &self.profile {
            Some(path) => {
                let file = File::open(path)
                    .with_context(|| format!("Failed to open profile: {}", path.display()))?;
                serde_json::from_reader(file)
                    .with_context(|| format!("Invalid profile: {}", path.display()))
            }
            None => Ok(LedgerProfile::default()),
        }
    }

    pub async fn run(self) -> Result<()> {
        let profile = self.load_profile()?;

        match self.command {
            Commands::Init => {
                ConversionService::init(&self.database, profile).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Payment { file, output } => {
                let service = ConversionService::connect(&self.database, profile).await?;
                let output = resolve_output(output)?;

                let report = service.convert_payments(&file, &output).await?;

                eprintln!(
                    "Exported {} entries to {}",
                    report.entries_written,
                    report.output.display()
                );
                println!("{}", report.summary.to_json());
            }

            Commands::Billing {
                file,
                tax_breakdown,
                output,
            } => {
                let service = ConversionService::connect(&self.database, profile).await?;
                let output = resolve_output(output)?;

                let report = service
                    .convert_billing(&file, &tax_breakdown, &output)
                    .await?;

                eprintln!(
                    "Exported {} entries to {}",
                    report.entries_written,
                    report.output.display()
                );
                if report.summary.skipped_items > 0 {
                    eprintln!(
                        "Warning: {} invoice item(s) had no tax breakdown row and were left out",
                        report.summary.skipped_items
                    );
                }
                println!("{}", report.summary.to_json());
            }

            Commands::Reference(reference_cmd) => {
                let service = ConversionService::connect(&self.database, profile).await?;
                run_reference_command(&service, reference_cmd).await?;
            }

            Commands::Runs { kind } => {
                let service = ConversionService::connect(&self.database, profile).await?;
                run_runs_command(&service, kind.as_deref()).await?;
            }
        }

        Ok(())
    }
}

fn resolve_output(output: Option<PathBuf>) -> Result<PathBuf> {
    match output {
        Some(path) => Ok(path),
        None => default_output_path(),
    }
}

async fn run_reference_command(service: &ConversionService, cmd: ReferenceCommands) -> Result<()> {
    match cmd {
        ReferenceCommands::Import { kind, input } => {
            let kind = ReferenceKind::from_str(&kind).with_context(|| {
                format!(
                    "Invalid reference kind '{}'. Valid kinds: cashiers, accounts, cost-centers",
                    kind
                )
            })?;
            run_import_command(service, kind, &input).await?;
        }

        ReferenceCommands::AddCashier { code, account } => {
            service
                .add_cashier(Cashier {
                    code: code.clone(),
                    account_code: account.clone(),
                })
                .await?;
            println!("Added cashier: {} -> {}", code, account);
        }

        ReferenceCommands::AddAccount { key, code, name } => {
            service
                .add_account(Account {
                    key: key.clone(),
                    code: code.clone(),
                    name,
                })
                .await?;
            println!("Added account: {} -> {}", key, code);
        }

        ReferenceCommands::AddCostCenter { name, code } => {
            service
                .add_cost_center(CostCenter {
                    name: name.clone(),
                    code: code.clone(),
                })
                .await?;
            println!("Added cost center: {} -> {}", name, code);
        }

        ReferenceCommands::Stats => {
            let stats = service.reference_stats().await?;
            println!("Cashiers:      {}", stats.cashiers);
            println!("Accounts:      {}", stats.accounts);
            println!("Cost centers:  {}", stats.cost_centers);
        }
    }
    Ok(())
}

async fn run_import_command(
    service: &ConversionService,
    kind: ReferenceKind,
    input: &Path,
) -> Result<()> {
    let file = File::open(input)
        .with_context(|| format!("Failed to open input file: {}", input.display()))?;

    let result = Importer::new(service)
        .import_reference_csv(kind, file)
        .await?;

    println!("Imported {} {}", result.imported, kind.as_str());
    if !result.errors.is_empty() {
        eprintln!("{} line(s) failed:", result.errors.len());
        for error in &result.errors {
            eprintln!("  line {}: {}", error.line, error.error);
        }
    }
    Ok(())
}

async fn run_runs_command(service: &ConversionService, kind: Option<&str>) -> Result<()> {
    let (show_payments, show_billing) = match kind {
        None => (true, true),
        Some("payment") => (true, false),
        Some("billing") => (false, true),
        Some(other) => {
            anyhow::bail!("Invalid run kind '{}'. Valid kinds: payment, billing", other);
        }
    };

    if show_payments {
        let runs = service.list_payment_runs().await?;
        println!("Payment runs ({}):", runs.len());
        for run in runs {
            println!(
                "  {}  consecutive {:>8}  {}",
                run.created_at.format("%Y-%m-%d %H:%M:%S"),
                run.consecutive,
                run.source_file
            );
        }
    }

    if show_billing {
        let runs = service.list_billing_runs().await?;
        println!("Billing runs ({}):", runs.len());
        for run in runs {
            println!(
                "  {}  base {:>14}  debit {:>14}  credit {:>14}  {}",
                run.created_at.format("%Y-%m-%d %H:%M:%S"),
                run.base,
                run.debit,
                run.credit,
                run.source_file
            );
        }
    }

    Ok(())
}
