//! gds: command-line access to Graph Data Science procedures
//!
//! Uses the graphdatascience HttpQueryRunner to talk to a running Neo4j server.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{ContentArrangement, Table};
use graphdatascience::{ClientConfig, Graph, GraphDataScience, Params, ProcConfig, QueryResult};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gds", version, about = "Graph Data Science client")]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true)]
    config_file: Option<PathBuf>,

    /// Server HTTP URL (overrides config file and GDS_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    /// Username
    #[arg(long, global = true)]
    user: Option<String>,

    /// Password
    #[arg(long, global = true)]
    password: Option<String>,

    /// Database name
    #[arg(long, global = true)]
    database: Option<String>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScoreFunction {
    AdamicAdar,
    CommonNeighbors,
    PreferentialAttachment,
    ResourceAllocation,
    TotalNeighbors,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a Cypher query
    Query {
        /// The Cypher query string
        cypher: String,

        /// Query parameter as key=value (value parsed as JSON when possible)
        #[arg(long = "param", value_parser = parse_key_value)]
        params: Vec<(String, Value)>,
    },
    /// Run an algorithm procedure, e.g. `pageRank.stream`
    Run {
        procedure: String,

        /// Projected graph name
        #[arg(long)]
        graph: String,

        /// Configuration entry as key=value
        #[arg(long = "config", value_parser = parse_key_value)]
        config: Vec<(String, Value)>,
    },
    /// Estimate memory for an algorithm procedure
    Estimate {
        procedure: String,

        #[arg(long)]
        graph: String,

        #[arg(long = "config", value_parser = parse_key_value)]
        config: Vec<(String, Value)>,
    },
    /// Score a node pair with a topological link-prediction function
    Score {
        function: ScoreFunction,
        node1: u64,
        node2: u64,

        #[arg(long = "config", value_parser = parse_key_value)]
        config: Vec<(String, Value)>,
    },
    /// Whether two nodes share a community
    SameCommunity {
        node1: u64,
        node2: u64,

        /// Community property (server default when omitted)
        #[arg(long)]
        property: Option<String>,
    },
    /// Create a link-prediction training pipeline
    CreatePipeline { name: String },
    /// List projected graphs
    Graphs,
    /// List stored models
    Models,
    /// Show the server library version
    Version,
}

fn parse_key_value(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    if key.is_empty() {
        return Err(format!("empty key in '{}'", raw));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

fn load_config(cli: &Cli) -> Result<ClientConfig, Box<dyn std::error::Error>> {
    let mut config = match &cli.config_file {
        Some(path) => ClientConfig::from_yaml_file(path)?,
        None => ClientConfig::default(),
    }
    .with_env_overrides();

    if let Some(url) = &cli.url {
        config.url = url.clone();
    }
    if let Some(user) = &cli.user {
        config.user = Some(user.clone());
    }
    if let Some(password) = &cli.password {
        config.password = Some(password.clone());
    }
    if let Some(database) = &cli.database {
        config.database = database.clone();
    }

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(&cli)?;
    debug!(url = %config.url, database = %config.database, "connecting");
    let gds = GraphDataScience::connect(&config)?;
    let format = &cli.format;

    match cli.command {
        Commands::Query { cypher, params } => {
            let params: Params = params.into_iter().collect();
            let params = if params.is_empty() { None } else { Some(params) };
            print_result(&gds.run_query(&cypher, params).await?, format)?;
        }
        Commands::Run { procedure, graph, config } => {
            let graph = Graph::new(graph, gds.runner().clone());
            let result = gds
                .algo(&procedure)?
                .call(&graph, config.into_iter().collect())
                .await?;
            print_result(&result, format)?;
        }
        Commands::Estimate { procedure, graph, config } => {
            let graph = Graph::new(graph, gds.runner().clone());
            let result = gds
                .algo(&procedure)?
                .estimate(&graph, config.into_iter().collect())
                .await?;
            print_result(&result, format)?;
        }
        Commands::Score { function, node1, node2, config } => {
            let lp = gds.link_prediction();
            let config: ProcConfig = config.into_iter().collect();
            let score = match function {
                ScoreFunction::AdamicAdar => lp.adamic_adar(node1, node2, config).await?,
                ScoreFunction::CommonNeighbors => lp.common_neighbors(node1, node2, config).await?,
                ScoreFunction::PreferentialAttachment => {
                    lp.preferential_attachment(node1, node2, config).await?
                }
                ScoreFunction::ResourceAllocation => {
                    lp.resource_allocation(node1, node2, config).await?
                }
                ScoreFunction::TotalNeighbors => lp.total_neighbors(node1, node2, config).await?,
            };
            println!("{}", score);
        }
        Commands::SameCommunity { node1, node2, property } => {
            let score = gds
                .link_prediction()
                .same_community(node1, node2, property.as_deref())
                .await?;
            println!("{}", score);
        }
        Commands::CreatePipeline { name } => {
            let pipeline = gds.lp_pipeline().create(&name).await?;
            println!("Created pipeline '{}'", pipeline.name());
        }
        Commands::Graphs => print_result(&gds.graph().list().await?, format)?,
        Commands::Models => print_result(&gds.model().list().await?, format)?,
        Commands::Version => println!("{}", gds.system().version().await?),
    }

    Ok(())
}

fn print_result(
    result: &QueryResult,
    format: &OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&result.rows)?);
        }
        OutputFormat::Csv => {
            if !result.columns.is_empty() {
                println!("{}", result.columns.join(","));
                for row in result {
                    let cells: Vec<String> = result
                        .columns
                        .iter()
                        .map(|col| row.get(col).map(format_csv_value).unwrap_or_default())
                        .collect();
                    println!("{}", cells.join(","));
                }
            }
        }
        OutputFormat::Table => {
            if result.columns.is_empty() {
                println!("(no results)");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(&result.columns);

            for row in result {
                let cells: Vec<String> = result
                    .columns
                    .iter()
                    .map(|col| row.get(col).map(format_table_value).unwrap_or_default())
                    .collect();
                table.add_row(cells);
            }

            println!("{}", table);
            println!("{} row(s)", result.len());
        }
    }

    Ok(())
}

fn format_table_value(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(_) | Value::Array(_) => serde_json::to_string(v).unwrap_or_default(),
    }
}

fn format_csv_value(v: &Value) -> String {
    match v {
        Value::Null => "".to_string(),
        Value::String(s) => {
            if s.contains(',') || s.contains('"') || s.contains('\n') {
                format!("\"{}\"", s.replace('"', "\"\""))
            } else {
                s.clone()
            }
        }
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => {
            let json = serde_json::to_string(v).unwrap_or_default();
            format!("\"{}\"", json.replace('"', "\"\""))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("dampingFactor=0.85").unwrap(),
            ("dampingFactor".to_string(), json!(0.85))
        );
        assert_eq!(
            parse_key_value("mutateProperty=rank").unwrap(),
            ("mutateProperty".to_string(), json!("rank"))
        );
        assert_eq!(parse_key_value("labels=[\"A\",\"B\"]").unwrap().1, json!(["A", "B"]));
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=1").is_err());
    }

    #[test]
    fn test_csv_quoting() {
        assert_eq!(format_csv_value(&json!("a,b")), "\"a,b\"");
        assert_eq!(format_csv_value(&json!(null)), "");
        assert_eq!(format_csv_value(&json!({"k": 1})), "\"{\"\"k\"\":1}\"");
    }
}
