use crate::adapters::storage::LocalStorage;
use crate::core::etl::EtlEngine;
use crate::core::pipeline::StoreLocatorPipeline;
use crate::core::ConfigProvider;
use crate::utils::error::EtlError;
use crate::utils::validation::Validate;

/// Validates `config`, runs the pipeline and reports the outcome.
///
/// Returns the process exit code: 0 on success, otherwise the code derived
/// from the error severity.
pub async fn execute<C>(config: C, dry_run: bool) -> i32
where
    C: ConfigProvider + Validate,
{
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        return e.exit_code();
    }

    let pipeline = match StoreLocatorPipeline::new(LocalStorage::default(), config) {
        Ok(pipeline) => pipeline,
        Err(e) => return report_failure(&e),
    };
    let engine = EtlEngine::new(pipeline);

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - no output will be written");
        return match engine.dry_run().await {
            Ok(result) => {
                println!(
                    "🔍 {} of {} stores selected and decoded",
                    result.stores.len(),
                    result.fetched_count
                );
                0
            }
            Err(e) => report_failure(&e),
        };
    }

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ ETL process completed successfully!");
            println!("✅ ETL process completed successfully!");
            println!("📁 Output saved to: {}", output_path);
            0
        }
        Err(e) => report_failure(&e),
    }
}

fn report_failure(e: &EtlError) -> i32 {
    tracing::error!(
        "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    e.exit_code()
}
