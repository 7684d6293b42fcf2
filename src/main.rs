// src/main.rs

use xrdbatch::{cli, logging, resolve_app_dir, run};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    match run_main().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("xrdbatch error: {err:?}");
            std::process::exit(1);
        }
    }
}

async fn run_main() -> anyhow::Result<bool> {
    let args = cli::parse();
    let app_dir = resolve_app_dir(args.app_dir.as_deref());
    logging::init_logging(args.log_level, Some(&app_dir.join(logging::LOG_FILE_NAME)))?;
    run(args, &app_dir).await
}
