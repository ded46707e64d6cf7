use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = specgate::cli::Cli::parse();
    if let Err(e) = specgate::cmd::dispatch(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
