// src/main.rs

use scriptdag::{cli, logging, run};

#[tokio::main]
async fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("scriptdag error: {err:?}");
        std::process::exit(1);
    }

    let code = match run(args).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("scriptdag error: {err}");
            err.exit_code()
        }
    };
    std::process::exit(code);
}
