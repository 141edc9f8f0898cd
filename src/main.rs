use bearer_proxy::RunOptions;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Listen port (overrides the config file)
    #[arg(short, long, env = "BEARER_PROXY_PORT")]
    port: Option<u16>,

    /// Data directory holding the config file and logs
    #[arg(short, long, env = "BEARER_PROXY_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Config file path (defaults to <data_dir>/proxy_config.json)
    #[arg(short, long, env = "BEARER_PROXY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    bearer_proxy::run(RunOptions {
        port: args.port,
        data_dir: args.data_dir,
        config_path: args.config,
    })
    .await?;

    Ok(())
}
