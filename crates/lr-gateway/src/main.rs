//! line-relay: LINE talk relay binary
//!
//! Usage:
//!   line-relay profile                       - Print the account profile
//!   line-relay send-text <to> <text>         - Send a text message
//!   line-relay send-image <to> <path>        - Send a local image
//!   line-relay send-image-url <to> <url>     - Download an image and send it
//!   line-relay --help                        - Show help

use lr_http::HttpClient;
use lr_line::{Config, LineApiClient, Message};
use tracing_subscriber::EnvFilter;

/// Run mode
#[derive(Debug, PartialEq)]
enum RunMode {
    /// Print the logged-in profile as JSON
    Profile,
    /// Send a text message
    SendText { to: String, text: String },
    /// Send a local image file
    SendImage { to: String, path: String },
    /// Send an image fetched from a URL
    SendImageUrl { to: String, url: String },
    /// Show help
    Help,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let mode = match parse_args(&args) {
        Ok(mode) => mode,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!();
            print_help();
            std::process::exit(2);
        }
    };

    match mode {
        RunMode::Help => {
            print_help();
            return Ok(());
        }
        RunMode::Version => {
            println!("line-relay {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Load .env file
    dotenvy::dotenv().ok();

    let config = Config::load().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    tracing::info!("Talk endpoint: {}", config.line.talk_url);

    let client = LineApiClient::from_config(&config)
        .map_err(|e| anyhow::anyhow!("Failed to create LINE client: {}", e))?;

    run(&client, mode).await
}

/// Execute one command against the talk API
async fn run<C: HttpClient>(client: &LineApiClient<C>, mode: RunMode) -> anyhow::Result<()> {
    match mode {
        RunMode::Profile => {
            let profile = client.get_profile().await?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        RunMode::SendText { to, text } => {
            let sent = client.send_message(&Message::text(&to, text)).await?;
            tracing::info!("Sent message {} to {}", sent.id.as_deref().unwrap_or("-"), to);
        }
        RunMode::SendImage { to, path } => {
            client.send_image(&to, &path).await?;
            tracing::info!("Sent image {} to {}", path, to);
        }
        RunMode::SendImageUrl { to, url } => {
            client.send_image_with_url(&to, &url).await?;
            tracing::info!("Sent image {} to {}", url, to);
        }
        RunMode::Help | RunMode::Version => {}
    }
    Ok(())
}

/// Parse command line arguments (program name excluded)
fn parse_args(args: &[String]) -> Result<RunMode, String> {
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "--help" | "-h"))
    {
        return Ok(RunMode::Help);
    }
    if args
        .iter()
        .any(|arg| matches!(arg.as_str(), "--version" | "-v"))
    {
        return Ok(RunMode::Version);
    }

    let Some((command, rest)) = args.split_first() else {
        return Ok(RunMode::Help);
    };

    let pair = |what: &str| -> Result<(String, String), String> {
        match rest {
            [to, value] => Ok((to.clone(), value.clone())),
            _ => Err(format!("{} expects <to> <{}>", command, what)),
        }
    };

    match command.as_str() {
        "profile" if rest.is_empty() => Ok(RunMode::Profile),
        "profile" => Err("profile takes no arguments".to_string()),
        "send-text" => pair("text").map(|(to, text)| RunMode::SendText { to, text }),
        "send-image" => pair("path").map(|(to, path)| RunMode::SendImage { to, path }),
        "send-image-url" => pair("url").map(|(to, url)| RunMode::SendImageUrl { to, url }),
        other => Err(format!("Unknown command: {}", other)),
    }
}

/// Print help message
fn print_help() {
    println!("line-relay - LINE talk relay");
    println!();
    println!("Usage:");
    println!("  line-relay profile                    Print the account profile as JSON");
    println!("  line-relay send-text <to> <text>      Send a text message");
    println!("  line-relay send-image <to> <path>     Send a local image file");
    println!("  line-relay send-image-url <to> <url>  Download an image and send it");
    println!("  line-relay --help                     Show this help message");
    println!("  line-relay --version                  Show version");
    println!();
    println!("Configuration is read from ./line-relay.toml when present, then");
    println!("overridden by environment variables (.env is loaded first).");
    println!();
    println!("Environment Variables:");
    println!("  LINE_ACCESS_TOKEN          Access token (required)");
    println!("  LINE_TALK_URL              Talk RPC endpoint (required)");
    println!("  LINE_UPLOAD_URL            Media upload endpoint (default: obs-sg upload.nhn)");
    println!("  LINE_USER_AGENT            User-Agent header (default: line-relay/<version>)");
    println!("  LINE_STAGING_DIR           Directory for downloaded images (default: system temp)");
    println!("  HTTP_TIMEOUT_SECS          Request timeout in seconds (default: 5)");
    println!("  HTTP_CONNECT_TIMEOUT_SECS  Connect timeout in seconds (default: same as above)");
    println!("  RUST_LOG                   Log filter (default: info)");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args_commands() {
        assert_eq!(parse_args(&args(&["profile"])).unwrap(), RunMode::Profile);
        assert_eq!(
            parse_args(&args(&["send-text", "U1", "hello there"])).unwrap(),
            RunMode::SendText {
                to: "U1".to_string(),
                text: "hello there".to_string()
            }
        );
        assert_eq!(
            parse_args(&args(&["send-image-url", "U1", "https://img.test/a.png"])).unwrap(),
            RunMode::SendImageUrl {
                to: "U1".to_string(),
                url: "https://img.test/a.png".to_string()
            }
        );
    }

    #[test]
    fn test_parse_args_flags() {
        assert_eq!(parse_args(&[]).unwrap(), RunMode::Help);
        assert_eq!(parse_args(&args(&["send-image", "--help"])).unwrap(), RunMode::Help);
        assert_eq!(parse_args(&args(&["-v"])).unwrap(), RunMode::Version);
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&args(&["send-image", "U1"])).is_err());
        assert!(parse_args(&args(&["profile", "extra"])).is_err());
        assert!(parse_args(&args(&["delete-everything"])).is_err());
    }
}
