use std::path::Path;
use std::sync::Arc;

use prospect_triage::classify::{ClassificationEngine, RoeQualifier};
use prospect_triage::config::Config;
use prospect_triage::crm::{CrmClient, HttpCrmClient};
use prospect_triage::directory::{DirectoryClient, HttpDirectoryClient};
use prospect_triage::email::EmailWaterfall;
use prospect_triage::output::WorkbookSink;
use prospect_triage::pipeline::Runner;
use prospect_triage::progress::FileProgressSink;
use prospect_triage::roster;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let Some(roster_path) = std::env::args().nth(1) else {
        eprintln!("Usage: prospect-triage <roster.csv>");
        std::process::exit(1);
    };

    let config = Config::from_env()?;
    let _log_guard = init_tracing(config.log_dir.as_deref());

    eprintln!("🔎 Prospect Triage v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Roster: {}", roster_path);
    eprintln!("   Output: {}", config.output_dir.display());

    let prospects = roster::read_roster(Path::new(&roster_path))?;
    eprintln!("   Loaded {} prospects\n", prospects.len());

    // ── Wiring ──────────────────────────────────────────────────────
    let console_url = config.crm.console_url.clone();
    let directory: Arc<dyn DirectoryClient> =
        Arc::new(HttpDirectoryClient::new(config.directory));
    let crm: Arc<dyn CrmClient> = Arc::new(HttpCrmClient::new(config.crm));

    let waterfall = EmailWaterfall::new(directory);
    let engine = ClassificationEngine::new(crm, RoeQualifier::new(), console_url);
    let output = Arc::new(WorkbookSink::new(&config.output_dir));
    let progress = Arc::new(FileProgressSink::new(&config.progress_dir));

    let mut runner = Runner::new(waterfall, engine, output, progress);
    let report = runner.run(prospects).await?;

    // ── Summary ─────────────────────────────────────────────────────
    let counts = report.classified.counts();
    eprintln!("\n🎉 Processing complete");
    eprintln!(
        "   Email discovery: {} found, {} not found",
        report.email_stats.found, report.email_stats.not_found
    );
    eprintln!("   Current customers:  {}", counts.current_customer);
    eprintln!("   Open opportunities: {}", counts.open_opportunity);
    eprintln!("   Qualified:          {}", counts.qualified);
    eprintln!("   No CRM match:       {}", counts.no_relationship);
    eprintln!("   Disqualified:       {}", counts.disqualified);
    eprintln!("   Output files: {}", config.output_dir.display());

    Ok(())
}

/// Console logging by default; daily-rolling file logging when a log
/// directory is configured. The returned guard must stay alive for the
/// file writer to flush.
fn init_tracing(log_dir: Option<&Path>) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    match log_dir {
        Some(dir) => {
            let (writer, guard) = tracing_appender::non_blocking(
                tracing_appender::rolling::daily(dir, "prospect-triage.log"),
            );
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .init();
            None
        }
    }
}
