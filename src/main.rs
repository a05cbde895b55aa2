//! Demo binary: classify one RFC 822 message file and print the result.

use mail_classifier::config::StageConfig;
use mail_classifier::mail::InMemoryMail;
use mail_classifier::stage::ClassificationStage;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: mail-classifier <message.eml>");
        eprintln!("  CLASSIFIER_SERVICE_URL   classification service endpoint (required)");
        eprintln!("  CLASSIFIER_HEADER_NAME   header to append (default X-Classification-Guess)");
        eprintln!("  CLASSIFIER_WORKER_COUNT  concurrent call cap (default 2)");
        eprintln!("  CLASSIFIER_TIMEOUT_MS    per-call deadline, absent = wait forever");
        std::process::exit(2);
    });

    let config = StageConfig::from_env()?;
    let stage = ClassificationStage::new(config)?;

    let raw = std::fs::read(&path)?;
    let mut mail = InMemoryMail::from_rfc822(raw);

    stage.process(&mut mail).await;

    if mail.appended_headers().is_empty() {
        println!("No classification answer — message left unmodified.");
    } else {
        for (name, value) in mail.appended_headers() {
            println!("{name}: {value}");
        }
    }

    Ok(())
}
