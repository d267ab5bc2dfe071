use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "svgopt-cli")]
#[command(about = "Management CLI for the SVG optimizer service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// API key sent as X-Api-Key on optimize requests.
    #[arg(short, long)]
    key: Option<String>,

    /// Bearer key for the admin endpoints.
    #[arg(short, long, default_value = "admin-secret-key")]
    admin_key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Optimize an SVG file through the service
    Optimize {
        /// Input file
        file: PathBuf,
        /// Write the optimized document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Keep hyphenated attribute names
        #[arg(long)]
        no_camel_case: bool,
        /// Skip sanitization (the response reports warnings instead)
        #[arg(long)]
        no_sanitize: bool,
    },
    /// Check service status
    Status,
    /// Inspect optimization cache counters
    Cache,
    /// View request analytics
    Analytics,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut admin_headers = HeaderMap::new();
    admin_headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.admin_key))?,
    );

    match cli.command {
        Commands::Optimize {
            file,
            output,
            no_camel_case,
            no_sanitize,
        } => {
            let content = std::fs::read_to_string(&file)?;
            let filename = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "untitled.svg".to_string());

            let body = json!({
                "content": content,
                "filename": filename,
                "camelCase": !no_camel_case,
                "sanitize": !no_sanitize,
            });

            let mut request = client.post(format!("{}/api/optimize", cli.url)).json(&body);
            if let Some(key) = &cli.key {
                request = request.header("X-Api-Key", key);
            }

            let res = request.send().await?;
            let status = res.status();
            let json: Value = res.json().await?;

            if !status.is_success() {
                eprintln!("Error: service returned status {}", status);
                eprintln!("{}", serde_json::to_string_pretty(&json)?);
                return Ok(());
            }

            let result = json["result"].as_str().unwrap_or_default();
            match output {
                Some(path) => {
                    std::fs::write(&path, result)?;
                    eprintln!("Wrote optimized document to {}", path.display());
                }
                None => println!("{}", result),
            }

            eprintln!(
                "{} -> {} bytes (saved {})",
                json["optimization"]["originalSize"],
                json["optimization"]["optimizedSize"],
                json["optimization"]["savedPercent"]
                    .as_str()
                    .unwrap_or("?")
            );
            if let Some(warnings) = json["securityWarnings"].as_array() {
                for warning in warnings {
                    eprintln!("warning: {}", warning.as_str().unwrap_or_default());
                }
            }
        }
        Commands::Status => {
            let res = client
                .get(format!("{}/admin/status", cli.url))
                .headers(admin_headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Cache => {
            let res = client
                .get(format!("{}/admin/cache", cli.url))
                .headers(admin_headers)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Analytics => {
            let res = client
                .get(format!("{}/admin/analytics", cli.url))
                .headers(admin_headers)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
