use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

use inbucket_config::config::usage;
use inbucket_config::{BuildInfo, Root};

#[derive(Parser, Debug)]
#[command(name = "inbucket-config")]
#[command(about = "Check the Inbucket environment and print the effective configuration")]
#[command(disable_help_flag = true, disable_version_flag = true)]
struct Args {
    /// Describe every INBUCKET_* variable on stderr and exit
    #[arg(short, long)]
    help: bool,

    /// Print build information as JSON and exit
    #[arg(long)]
    version: bool,

    /// Dump SMTP and POP3 network traffic
    #[arg(long)]
    netdebug: bool,

    /// Emit log lines as JSON
    #[arg(long)]
    logjson: bool,
}

fn init_tracing(level: &str, json: bool) -> Result<()> {
    let level = Level::from_str(level)
        .map_err(|_| anyhow::anyhow!("Invalid INBUCKET_LOGLEVEL: {}", level))?;
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.help {
        usage::print();
        return Ok(());
    }

    let build = BuildInfo::current();
    if args.version {
        println!("{}", serde_json::to_string_pretty(&build)?);
        return Ok(());
    }

    let mut config = match Root::from_env() {
        Ok(config) => config,
        Err(errors) => {
            eprintln!("Configuration error:\n{}", errors);
            eprintln!();
            usage::print();
            std::process::exit(1);
        }
    };
    config.smtp.debug = args.netdebug;
    config.pop3.debug = args.netdebug;

    init_tracing(&config.log_level, args.logjson)?;

    info!(
        version = build.version(),
        build_date = build.build_date(),
        git_hash = build.git_hash(),
        "Inbucket configuration check"
    );
    if let Some(domain) = &config.smtp.domain_no_store {
        info!(domain = %domain, "Messages for this domain will not be stored");
    }
    if config.web.cookie_auth_key.is_none() {
        warn!("INBUCKET_WEB_COOKIEAUTHKEY is not set");
    }

    let json = serde_json::to_string_pretty(&config).context("Failed to serialize configuration")?;
    println!("{}", json);

    Ok(())
}
