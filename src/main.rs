use clap::{Arg, Command};
use tracing::info;
use tracing_subscriber::EnvFilter;

use shellsage::config::Config;
use shellsage::session::Session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let matches = Command::new("sage")
        .about("Natural language shell assistant")
        .long_about("sage turns a plain-language request into a shell command, explains what it does, rates how safe it is, and runs it only after you confirm")
        .arg(Arg::new("query")
            .help("Natural language request; leave empty for interactive mode")
            .num_args(1..))
        .arg(Arg::new("set-api-key")
            .long("set-api-key")
            .help("Store the Anthropic API key in the config file")
            .value_name("API_KEY")
            .num_args(1))
        .arg(Arg::new("config")
            .long("config")
            .help("Show configuration information")
            .action(clap::ArgAction::SetTrue))
        .arg(Arg::new("verbose")
            .long("verbose")
            .short('v')
            .help("Show extra progress output")
            .action(clap::ArgAction::SetTrue))
        .get_matches();

    // Handle configuration commands
    if let Some(api_key) = matches.get_one::<String>("set-api-key") {
        let mut config = Config::load()?;
        config.set_api_key(api_key.clone())?;
        println!("✅ API key saved successfully");
        return Ok(());
    }

    if matches.get_flag("config") {
        Config::show_config_info()?;
        return Ok(());
    }

    let config = Config::load()?;
    let session = Session::new(&config, matches.get_flag("verbose"))?;

    let query_args: Vec<String> = matches
        .get_many::<String>("query")
        .unwrap_or_default()
        .map(|s| s.to_string())
        .collect();

    if query_args.is_empty() {
        session.run_interactive().await
    } else {
        let query = query_args.join(" ");
        info!("Processing one-shot query: {}", query);
        session.process_query(&query).await
    }
}
