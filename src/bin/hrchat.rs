//! hrchat — ask the employee database questions
//!
//! # Usage
//!
//! ```bash
//! # Serve the chat page and the /chat endpoint
//! hrchat serve --bind 127.0.0.1:5000
//!
//! # Answer one question from the terminal
//! hrchat ask "Who is the manager of the Sales department?"
//!
//! # Show the SQL a question maps to, without touching the database
//! hrchat explain "List all employees hired after 2021-01-10."
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use hrchat::prelude::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hrchat")]
#[command(version)]
#[command(about = "Ask an employee database plain-English questions", long_about = None)]
#[command(after_help = "EXAMPLES:
    hrchat serve
    hrchat ask 'Show me all employees in the Sales department.'
    hrchat ask 'What is the total salary expense for the Marketing department?' --format json
    hrchat explain 'List all employees hired after 2020-06-10.'")]
struct Cli {
    /// Config file (defaults to ./hrchat.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Database connection URL
    #[arg(long, env = "HRCHAT_DATABASE_URL", global = true)]
    database_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the chat page and the /chat endpoint
    Serve {
        /// Address to listen on
        #[arg(short, long)]
        bind: Option<String>,

        /// Do not write the sample rows at startup
        #[arg(long)]
        no_seed: bool,
    },
    /// Answer one question and print the result
    Ask {
        /// The question to answer
        question: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Show which statement a question maps to
    Explain {
        /// The question to explain
        question: String,
    },
    /// Create the tables and write the sample rows
    InitDb,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "hrchat=debug,tower_http=debug"
    } else {
        "hrchat=info,tower_http=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let mut config = ChatConfig::load(cli.config.as_deref())?;
    if let Some(url) = &cli.database_url {
        config.database.url = url.clone();
    }

    match &cli.command {
        Commands::Serve { bind, no_seed } => {
            let mut builder = ChatServer::builder().config(config);
            if let Some(addr) = bind {
                builder = builder.bind(addr);
            }
            if *no_seed {
                builder = builder.seed(false);
            }
            let server = builder.build_and_init().await?;
            server.serve().await?;
        }
        Commands::Ask { question, format } => ask(&config, question, format).await?,
        Commands::Explain { question } => explain(question),
        Commands::InitDb => init_db(&config).await?,
    }

    Ok(())
}

async fn ask(config: &ChatConfig, question: &str, format: &OutputFormat) -> anyhow::Result<()> {
    let store = Store::connect(&config.database.url).await?;
    let result = answer(&store, question).await;
    store.close().await;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result?)?),
        OutputFormat::Table => print_result(&result?),
    }
    Ok(())
}

fn print_result(result: &QueryResult) {
    match result {
        QueryResult::Employees { employees } => print_table(employees),
        QueryResult::Manager { manager } => {
            println!("{} {}", "Department Manager:".green().bold(), manager.white());
        }
        QueryResult::SalaryTotal {
            total_salary_expense,
        } => {
            println!(
                "{} ${}",
                "Total Salary Expense:".green().bold(),
                total_salary_expense.to_string().white()
            );
        }
        QueryResult::NotFound { message } | QueryResult::Empty { message } => {
            println!("{}", message.dimmed());
        }
    }
}

fn print_table(rows: &[Row]) {
    let Some(first) = rows.first() else {
        println!("{}", "(no results)".dimmed());
        return;
    };

    let columns: Vec<&String> = first.keys().collect();

    let widths: Vec<usize> = columns
        .iter()
        .map(|col| {
            rows.iter()
                .map(|row| row.get(*col).map(val_to_string).unwrap_or_default().len())
                .max()
                .unwrap_or(0)
                .max(col.len())
        })
        .collect();

    let header: Vec<String> = columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| format!("{:width$}", c, width = *w))
        .collect();
    println!("{}", header.join(" │ ").white().bold());

    let sep: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    println!("{}", sep.join("─┼─").dimmed());

    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| {
                let val = row.get(*c).map(val_to_string).unwrap_or_default();
                format!("{:width$}", val, width = *w)
            })
            .collect();
        println!("{}", cells.join(" │ "));
    }

    println!();
    println!("{} row(s) returned", rows.len().to_string().cyan());
}

fn val_to_string(val: &serde_json::Value) -> String {
    match val {
        serde_json::Value::Null => "NULL".to_string(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn explain(question: &str) {
    println!("{} {}", "Question:".dimmed(), question.yellow());
    println!();

    match hrchat::parse(question) {
        Some(parsed) => {
            println!("{}", "Matched:".green().bold());
            println!("  {} {}", "Kind:".dimmed(), parsed.kind.to_string().cyan());
            println!("  {} {}", "SQL:".dimmed(), parsed.sql().white());
            for (i, param) in parsed.params.iter().enumerate() {
                println!("  {} ?{} = {}", "Bind:".dimmed(), i + 1, param.to_string().yellow());
            }
        }
        None => {
            println!("{}", "Not recognized.".red().bold());
            println!("Try one of:");
            for sample in [
                "Show me all employees in the Sales department.",
                "Who is the manager of the Engineering department?",
                "List all employees hired after 2020-06-10.",
                "What is the total salary expense for the Marketing department?",
            ] {
                println!("  • {}", sample.white());
            }
        }
    }
}

async fn init_db(config: &ChatConfig) -> anyhow::Result<()> {
    println!("{} Opening {}", "→".dimmed(), config.database.url.cyan());
    let store = Store::connect(&config.database.url).await?;

    seed::create_schema(&store).await?;
    seed::seed_sample_data(&store).await?;

    let employees = store.employees().await?;
    let departments = store.departments().await?;
    store.close().await;

    println!(
        "{} {} employees across {} departments",
        "✓".green(),
        employees.len().to_string().green(),
        departments.len().to_string().green()
    );
    for dept in &departments {
        let headcount = employees.iter().filter(|e| e.department == dept.name).count();
        let manager = dept.manager.as_deref().unwrap_or("(none)");
        println!(
            "  {} {} staff, managed by {}",
            format!("{:12}", dept.name).white(),
            headcount,
            manager.yellow()
        );
    }
    Ok(())
}
