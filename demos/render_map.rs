use meteocast::credentials::error::CredentialError;
use meteocast::credentials::resolver::SessionResolver;
use meteocast::credentials::source::{CachedCredentialSource, InteractiveCredentialSource};
use meteocast::maps::render_theme;
use meteocast::maps::service::HttpTileService;
use meteocast::maps::themes::Theme;
use meteocast::MeteocastError;
use std::env;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), MeteocastError> {
    env_logger::init();
    let endpoint =
        env::var("TILE_ENDPOINT").unwrap_or_else(|_| "http://localhost:8080/v1/tiles".to_string());

    // A token from the environment stands in for a browser sign-in.
    let cache = CachedCredentialSource::new()?;
    let from_env = InteractiveCredentialSource::new(
        |_project: &str| {
            env::var("TILE_TOKEN")
                .map_err(|_| CredentialError::Interactive("TILE_TOKEN is not set".into()))
        },
        cache.clone(),
    );
    let session = SessionResolver::new(cache, from_env).resolve("meteocast-maps")?;

    let service = HttpTileService::new(endpoint);
    for theme in [Theme::Demo, Theme::DroughtWater] {
        let path = render_theme(theme, &service, &session, Path::new("maps")).await?;
        println!("{} -> {}", theme.title(), path.display());
    }
    Ok(())
}
