// src/main.rs

use serverless_plugin::{cli, logging, run};

#[tokio::main]
async fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("serverless-plugin error: {err:?}");
        std::process::exit(1);
    }
    if let Err(err) = run(args).await {
        eprintln!("serverless-plugin error: {err}");
        std::process::exit(1);
    }
}
