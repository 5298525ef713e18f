use anyhow::Context;
use rental_scout::export::{to_csv, to_json};
use rental_scout::logging::init_logging;
use rental_scout::models::filter::available_areas;
use rental_scout::{
    AppConfig, FavoritesStore, LocalPropertyRepository, PropertyFilter, PropertyListController,
    PropertyRepository, RemotePropertyRepository,
};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();
    init_logging(&config.log_level);

    info!("🏠 Rental Scout");
    info!("Listings API: {}", config.base_url);

    let local: Arc<dyn PropertyRepository> = Arc::new(LocalPropertyRepository::new(
        config.resource_dir.clone(),
        config.fallback_resource.clone(),
    ));

    let repository: Arc<dyn PropertyRepository> = if config.use_api {
        let fallback = config.use_fallback.then(|| Arc::clone(&local));
        Arc::new(
            RemotePropertyRepository::from_config(&config, fallback)
                .context("Failed to create HTTP transport")?,
        )
    } else {
        info!("API disabled, reading bundled listings only");
        local
    };

    let controller = PropertyListController::new(repository);
    controller.reload_and_wait().await;
    let state = controller.state();

    if let Some(message) = &state.error_message {
        anyhow::bail!("Could not load listings: {}", message);
    }

    let properties = PropertyFilter::default().apply(&state.records);
    info!(
        "\n✅ Loaded {} listings across {} areas\n",
        properties.len(),
        available_areas(&properties).len()
    );

    let favorites = FavoritesStore::open(config.favorites_dir.clone())
        .await
        .context("Failed to open favorites")?;
    info!("⭐ {} saved favorites", favorites.ids().len());

    for (i, property) in properties.iter().enumerate() {
        let star = if favorites.is_favorite(property) { "★ " } else { "" };
        println!("{}. {}{} ({} 円)", i + 1, star, property.title, property.rent);
        println!("   {} / {}", property.layout, property.area);
        println!(
            "   {} 徒歩{}分",
            property.nearest_station, property.walk_minutes
        );
        println!("   ID: {}", property.id);
        println!();
    }

    let json = to_json(&properties)?;
    tokio::fs::write("properties.json", json).await?;
    tokio::fs::write("properties.csv", to_csv(&properties)).await?;
    info!("💾 Saved listings to properties.json and properties.csv");

    Ok(())
}
