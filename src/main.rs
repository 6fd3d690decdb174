use mimalloc::MiMalloc;
use status_fixer::{Config, SupabaseClient, service};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cfg = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(e.kind().exit_code());
        }
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    info!(
        supabase_url = %cfg.supabase_url,
        proxy = %cfg.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        timeout_secs = cfg.request_timeout.as_secs(),
        loglevel = %cfg.loglevel
    );

    let client = match SupabaseClient::new(&cfg) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::from(e.kind().exit_code());
        }
    };

    let mut stdout = std::io::stdout().lock();
    let result = service::run(&client, &mut stdout).await;
    if let Err(e) = &result {
        error!(error = %e, "failed to write report to stdout");
    }
    ExitCode::from(service::exit_code_for(&result))
}
