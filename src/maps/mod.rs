//! Thematic environmental maps: raster expressions rendered to tiles by a remote
//! service and assembled into standalone HTML pages.

pub mod document;
pub mod error;
pub mod raster;
pub mod service;
pub mod themes;

use crate::credentials::Session;
use crate::maps::document::{MapDocument, MapLayer};
use crate::maps::error::MapError;
use crate::maps::service::TileService;
use crate::maps::themes::Theme;
use log::info;
use std::path::{Path, PathBuf};

/// Builds the document of `theme`, requesting one tile URL per layer.
pub async fn compose_theme<S: TileService>(
    theme: Theme,
    service: &S,
    session: &Session,
) -> Result<MapDocument, MapError> {
    let mut document = MapDocument::new(theme.title(), theme.center(), theme.zoom());
    for layer in theme.layers() {
        let tile_url = service.tile_url(session, &layer.expr, &layer.vis).await?;
        info!("Layer '{}' ready", layer.name);
        document.add_layer(MapLayer::new(layer.name, tile_url));
    }
    Ok(document)
}

/// Composes `theme` and writes it into `out_dir`, returning the file path.
pub async fn render_theme<S: TileService>(
    theme: Theme,
    service: &S,
    session: &Session,
    out_dir: &Path,
) -> Result<PathBuf, MapError> {
    let document = compose_theme(theme, service, session).await?;
    let path = out_dir.join(theme.file_name());
    document.write_html(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::Credential;
    use crate::maps::document::config_of;
    use crate::maps::raster::{RasterExpr, VisParams};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    struct CountingService {
        calls: AtomicUsize,
    }

    impl TileService for CountingService {
        async fn tile_url(
            &self,
            session: &Session,
            _expr: &RasterExpr,
            _vis: &VisParams,
        ) -> Result<String, MapError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("https://tiles.test/{}/{n}/{{z}}/{{x}}/{{y}}", session.project()))
        }
    }

    #[tokio::test]
    async fn test_render_theme_writes_every_layer() {
        let dir = tempdir().unwrap();
        let service = CountingService {
            calls: AtomicUsize::new(0),
        };
        let session = Session::new(Credential::new("demo", "t"), "cached");

        let path = render_theme(Theme::FireWatch, &service, &session, dir.path())
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("fire_watch_map.html"));
        assert_eq!(service.calls.load(Ordering::SeqCst), 3);
        let html = std::fs::read_to_string(path).unwrap();
        let config = config_of(&html);
        let layers = config["layers"].as_array().unwrap();
        assert_eq!(layers.len(), 3);
        assert_eq!(layers[2]["tile_url"], "https://tiles.test/demo/2/{z}/{x}/{y}");
        assert!(layers
            .iter()
            .any(|layer| layer["name"] == "Fire Frequency (2015-2023)"));
    }
}
