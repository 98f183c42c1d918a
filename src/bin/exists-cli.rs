use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use reqwest::StatusCode;

#[derive(Parser)]
#[command(name = "exists-cli")]
#[command(about = "Check resource existence against a running resource-exists server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:9200")]
    url: String,

    /// Comma-separated resource names, aliases or wildcards.
    resources: String,

    /// Which resource states wildcards may expand to.
    #[arg(short, long, value_enum)]
    expand_wildcards: Vec<Expand>,

    /// Only consult the server's locally cached cluster state.
    #[arg(short, long)]
    local: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Expand {
    Open,
    Closed,
    None,
    All,
}

impl Expand {
    fn token(self) -> &'static str {
        match self {
            Expand::Open => "open",
            Expand::Closed => "closed",
            Expand::None => "none",
            Expand::All => "all",
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut query: Vec<(&str, String)> = Vec::new();
    if !cli.expand_wildcards.is_empty() {
        let tokens: Vec<&str> = cli.expand_wildcards.iter().map(|e| e.token()).collect();
        query.push(("expand_wildcards", tokens.join(",")));
    }
    if cli.local {
        query.push(("local", "true".to_string()));
    }

    let res = client
        .head(format!("{}/{}", cli.url.trim_end_matches('/'), cli.resources))
        .query(&query)
        .send()
        .await?;

    match res.status() {
        StatusCode::OK => {
            println!("{}: exists", cli.resources);
            Ok(ExitCode::SUCCESS)
        }
        StatusCode::NOT_FOUND => {
            println!("{}: missing", cli.resources);
            Ok(ExitCode::from(1))
        }
        status => {
            eprintln!("Error: server returned status {}", status);
            Ok(ExitCode::from(2))
        }
    }
}
