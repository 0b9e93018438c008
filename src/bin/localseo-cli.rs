use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Map, Value};

#[derive(Parser)]
#[command(name = "localseo-cli")]
#[command(about = "Management CLI for the LocalSEO router", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[arg(short, long, env = "LOCALSEO_ADMIN_KEY", default_value = "CHANGE_ME_IN_PRODUCTION")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service status
    Status,
    /// Manage LocalPage rows
    #[command(subcommand)]
    Pages(PageCommands),
    /// Manage static redirect rules
    #[command(subcommand)]
    Redirects(RedirectCommands),
    /// Generate AI copy for one page, or for every page missing it
    Generate {
        /// Page ID; omit to fill every page with missing copy
        id: Option<i64>,
    },
}

#[derive(Subcommand)]
enum PageCommands {
    /// List all pages
    List,
    /// Show one page
    Get { id: i64 },
    /// Create a page
    Add {
        #[arg(long)]
        service: String,
        #[arg(long)]
        city: String,
        #[arg(long, default_value = "")]
        zip: String,
        #[arg(long)]
        slug: Option<String>,
        /// Comma-separated
        #[arg(long)]
        nearby: Option<String>,
        /// Comma-separated
        #[arg(long)]
        landmarks: Option<String>,
    },
    /// Update fields of a page
    Set {
        id: i64,
        #[arg(long)]
        service: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        zip: Option<String>,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long)]
        intro: Option<String>,
        #[arg(long)]
        meta_title: Option<String>,
        #[arg(long)]
        meta_description: Option<String>,
    },
    /// Delete a page
    Delete { id: i64 },
}

#[derive(Subcommand)]
enum RedirectCommands {
    /// List rules with hit counts
    List,
    /// Add a rule
    Add {
        source: String,
        target: String,
        /// 301 or 302
        #[arg(long, default_value_t = 301)]
        status: u16,
    },
    /// Delete a rule
    Delete { id: i64 },
}

/// Collect the `Some` fields into a JSON object.
fn object(fields: &[(&str, Option<String>)]) -> Value {
    let map: Map<String, Value> = fields
        .iter()
        .filter_map(|(name, value)| {
            value
                .as_ref()
                .map(|v| (name.to_string(), Value::String(v.clone())))
        })
        .collect();
    Value::Object(map)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    let request = match cli.command {
        Commands::Status => client.get(format!("{}/admin/status", base)),
        Commands::Pages(PageCommands::List) => client.get(format!("{}/admin/pages", base)),
        Commands::Pages(PageCommands::Get { id }) => {
            client.get(format!("{}/admin/pages/{}", base, id))
        }
        Commands::Pages(PageCommands::Add {
            service,
            city,
            zip,
            slug,
            nearby,
            landmarks,
        }) => {
            let mut body = json!({
                "service_keyword": service,
                "city": city,
                "zip": zip,
            });
            let extra = object(&[
                ("slug", slug),
                ("nearby_cities", nearby),
                ("local_landmarks", landmarks),
            ]);
            if let (Some(body), Value::Object(extra)) = (body.as_object_mut(), extra) {
                body.extend(extra);
            }
            client.post(format!("{}/admin/pages", base)).json(&body)
        }
        Commands::Pages(PageCommands::Set {
            id,
            service,
            city,
            zip,
            slug,
            intro,
            meta_title,
            meta_description,
        }) => {
            let body = object(&[
                ("service_keyword", service),
                ("city", city),
                ("zip", zip),
                ("slug", slug),
                ("ai_intro", intro),
                ("meta_title", meta_title),
                ("meta_description", meta_description),
            ]);
            client
                .put(format!("{}/admin/pages/{}", base, id))
                .json(&body)
        }
        Commands::Pages(PageCommands::Delete { id }) => {
            client.delete(format!("{}/admin/pages/{}", base, id))
        }
        Commands::Redirects(RedirectCommands::List) => {
            client.get(format!("{}/admin/redirects", base))
        }
        Commands::Redirects(RedirectCommands::Add {
            source,
            target,
            status,
        }) => client.post(format!("{}/admin/redirects", base)).json(&json!({
            "source_path": source,
            "target_url": target,
            "redirect_type": status,
        })),
        Commands::Redirects(RedirectCommands::Delete { id }) => {
            client.delete(format!("{}/admin/redirects/{}", base, id))
        }
        Commands::Generate { id: Some(id) } => {
            client.post(format!("{}/admin/pages/{}/generate", base, id))
        }
        Commands::Generate { id: None } => {
            client.post(format!("{}/admin/pages/generate-missing", base))
        }
    };

    let res = request.headers(headers).send().await?;
    print_response(res).await?;
    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    if status == reqwest::StatusCode::NO_CONTENT {
        println!("OK");
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
