//! TableDB 交互式命令行
//!
//! Reads one command per line from stdin, executes it and renders the result.

use anyhow::Context;
use clap::Parser as ClapParser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tabledb::query::TableInfo;
use tabledb::types::{Record, TableSchema};
use tabledb::{parse_command, CommandOutput, DBConfig, Database, ErrorReport, Outcome};
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const MAX_CELL_WIDTH: usize = 50;

#[derive(ClapParser, Debug)]
#[command(name = "tabledb-cli", version, about = "Interactive shell for TableDB")]
struct Args {
    /// Data directory (overrides the config file)
    #[arg(short = 'd', long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Slow operation threshold in milliseconds
    #[arg(long, value_name = "N")]
    slow_ms: Option<u64>,

    /// Disable the select result cache
    #[arg(long)]
    no_cache: bool,

    /// Enable verbose output
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("tabledb=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tabledb=warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn load_config(args: &Args) -> anyhow::Result<DBConfig> {
    let mut config = match &args.config {
        Some(path) => DBConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => DBConfig::default(),
    };

    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(ms) = args.slow_ms {
        config.slow_threshold_ms = ms;
    }
    if args.no_cache {
        config.cache_enabled = false;
    }

    Ok(config)
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    let db = Database::open(config.clone())
        .with_context(|| format!("failed to open database at {}", config.data_dir.display()))?;

    println!("🚀 TableDB v{}", VERSION);
    println!("📂 Database: {}", config.data_dir.display());
    print_help();

    let stdin = io::stdin();
    let mut buffer = String::new();

    loop {
        print!("tabledb> ");
        io::stdout().flush()?;

        buffer.clear();
        if stdin.lock().read_line(&mut buffer)? == 0 {
            break;
        }

        let input = buffer.trim();
        if input.is_empty() {
            continue;
        }

        let command = match parse_command(input) {
            Ok(command) => command,
            Err(e) => {
                print_error(&ErrorReport::from(e));
                continue;
            }
        };

        match db.execute(&command, &mut prompt_confirm) {
            Ok(Outcome::Completed(CommandOutput::Exit)) => break,
            Ok(Outcome::Completed(output)) => display_output(&output),
            Ok(Outcome::Aborted) => println!("Operation cancelled."),
            Err(report) => print_error(&report),
        }
    }

    println!("👋 Goodbye!");
    Ok(())
}

/// Ask on stdout, read the answer from stdin; only `y` approves
fn prompt_confirm(operation: &str) -> bool {
    print!("Are you sure you want to {}? [y/n] ", operation);
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => answer.trim() == "y",
        Err(_) => false,
    }
}

fn print_error(report: &ErrorReport) {
    eprintln!("Error [{}]: {}", report.kind, report.message);
}

fn display_output(output: &CommandOutput) {
    match output {
        CommandOutput::TableCreated(schema) => {
            println!("✅ Table \"{}\" created: {}", schema.name, schema.describe());
        }
        CommandOutput::Tables(tables) => {
            if tables.is_empty() {
                println!("📊 No tables found");
            } else {
                println!("📋 Tables:");
                for table in tables {
                    println!("  • {}", table);
                }
            }
        }
        CommandOutput::TableDropped(name) => println!("✅ Table \"{}\" dropped", name),
        CommandOutput::Inserted(record) => match record.id() {
            Some(id) => println!("✅ Record inserted with ID {}", id),
            None => println!("✅ Record inserted"),
        },
        CommandOutput::Rows { schema, records } => display_table(schema, records),
        CommandOutput::Updated(n) => println!("✅ {} record(s) updated", n),
        CommandOutput::Deleted(n) => println!("✅ {} record(s) deleted", n),
        CommandOutput::Info(info) => display_info(info),
        CommandOutput::Help => print_help(),
        CommandOutput::Exit => {}
    }
}

fn cell(text: String) -> String {
    if text.chars().count() > MAX_CELL_WIDTH {
        let truncated: String = text.chars().take(MAX_CELL_WIDTH - 3).collect();
        format!("{}...", truncated)
    } else {
        text
    }
}

fn border(widths: &[usize], left: &str, middle: &str, right: &str) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    format!("{}{}{}", left, segments.join(middle), right)
}

fn display_table(schema: &TableSchema, records: &[Record]) {
    if records.is_empty() {
        println!("📊 No results");
        return;
    }

    let headers: Vec<String> = schema.columns.iter().map(|c| c.name.clone()).collect();
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|record| {
            record
                .values_in(schema)
                .into_iter()
                .map(|value| cell(value.map(|v| v.to_string()).unwrap_or_default()))
                .collect()
        })
        .collect();

    // 计算列宽
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, text) in widths.iter_mut().zip(row) {
            *width = (*width).max(text.chars().count());
        }
    }

    let print_row = |cells: &[String]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(text, width)| {
                let pad = width - text.chars().count();
                format!(" {}{} ", text, " ".repeat(pad))
            })
            .collect();
        println!("│{}│", padded.join("│"));
    };

    println!("{}", border(&widths, "┌", "┬", "┐"));
    print_row(&headers);
    println!("{}", border(&widths, "├", "┼", "┤"));
    for row in &rows {
        print_row(row);
    }
    println!("{}", border(&widths, "└", "┴", "┘"));

    println!("\n📊 {} row(s) returned", records.len());
}

fn display_info(info: &TableInfo) {
    println!("📋 Table: {}", info.schema.name);
    println!("┌─────────────────┬──────────┐");
    println!("│ Column          │ Type     │");
    println!("├─────────────────┼──────────┤");
    for col in &info.schema.columns {
        println!("│ {:15} │ {:8} │", col.name, col.col_type.name());
    }
    println!("└─────────────────┴──────────┘");
    println!("Records: {}", info.record_count);
}

fn print_help() {
    println!(
        r#"
命令:
  create_table <name> <col>:<type> ...        创建表 (type: int | str | bool)
  list_tables                                 列出所有表
  drop_table <name>                           删除表 (需要确认)
  insert into <name> values (<v>, ...)        插入记录 (ID 自动分配)
  select from <name> [where <col> = <v>]      查询
  update <name> set <col> = <v> where <col> = <v>
  delete from <name> where <col> = <v>        删除记录 (需要确认)
  info <name>                                 显示表结构和记录数
  help                                        显示此帮助
  exit                                        退出

示例:
  create_table users name:str age:int
  insert into users values ("Sergei", 28)
  select from users where age = 28
"#
    );
}
