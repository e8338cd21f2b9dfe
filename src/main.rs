use anyhow::Context;
use catalog_app::modules;
use catalog_kernel::{settings::Settings, InitCtx, ModuleRegistry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load catalog settings")?;
    catalog_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        collection = %settings.database.collection,
        "catalog-app bootstrap starting"
    );

    let store = catalog_db::connect(&settings.database)
        .await
        .context("failed to open document store")?;

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store, &settings);

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    tracing::info!("catalog-app bootstrap complete");

    let served = catalog_http::start_server(&registry, &settings).await;
    registry.stop_all().await?;
    served
}
