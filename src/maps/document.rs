//! Standalone HTML map pages built on Leaflet.

use crate::maps::error::MapError;
use crate::meteocast::LatLon;
use crate::utils::ensure_dir_exists;
use log::info;
use serde::Serialize;
use serde_json::json;
use std::path::Path;
use tera::{Context, Tera};

const LEAFLET_VERSION: &str = "1.9.4";
const BASE_TILES: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
const BASE_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";
const TEMPLATE_NAME: &str = "map.html";

/// The page. Map settings travel as JSON in an autoescaped `data-config` attribute,
/// so no value is ever spliced into the script.
const MAP_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{{ title }}</title>
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <link rel="stylesheet" href="https://unpkg.com/leaflet@{{ leaflet_version }}/dist/leaflet.css">
  <script src="https://unpkg.com/leaflet@{{ leaflet_version }}/dist/leaflet.js"></script>
  <style>html, body, #map { height: 100%; margin: 0; }</style>
</head>
<body>
  <div id="map" data-config="{{ config }}"></div>
  <script>
    const config = JSON.parse(document.getElementById('map').dataset.config);
    const map = L.map('map').setView(config.center, config.zoom);
    const base = L.tileLayer(config.base.url, {attribution: config.base.attribution}).addTo(map);
    const overlays = {};
    for (const layer of config.layers) {
      const overlay = L.tileLayer(layer.tile_url, {opacity: layer.opacity});
      if (layer.visible) {
        overlay.addTo(map);
      }
      overlays[layer.name] = overlay;
    }
    L.control.layers({"OpenStreetMap": base}, overlays).addTo(map);
  </script>
</body>
</html>
"#;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayer {
    pub name: String,
    pub tile_url: String,
    pub opacity: f64,
    pub visible: bool,
}

impl MapLayer {
    pub fn new(name: impl Into<String>, tile_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tile_url: tile_url.into(),
            opacity: 1.0,
            visible: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapDocument {
    pub title: String,
    pub center: LatLon,
    pub zoom: u8,
    pub layers: Vec<MapLayer>,
}

impl MapDocument {
    pub fn new(title: impl Into<String>, center: LatLon, zoom: u8) -> Self {
        Self {
            title: title.into(),
            center,
            zoom,
            layers: Vec::new(),
        }
    }

    pub fn add_layer(&mut self, layer: MapLayer) {
        self.layers.push(layer);
    }

    /// Renders the page: an OpenStreetMap base layer, every overlay in order, and a
    /// layer control listing the overlays.
    pub fn to_html(&self) -> Result<String, MapError> {
        let layers: Vec<MapLayer> = self
            .layers
            .iter()
            .map(|layer| MapLayer {
                opacity: layer.opacity.clamp(0.0, 1.0),
                ..layer.clone()
            })
            .collect();
        let config = json!({
            "center": [self.center.0, self.center.1],
            "zoom": self.zoom,
            "base": {"url": BASE_TILES, "attribution": BASE_ATTRIBUTION},
            "layers": layers,
        });

        let mut context = Context::new();
        context.insert("title", &self.title);
        context.insert("leaflet_version", LEAFLET_VERSION);
        context.insert("config", &serde_json::to_string(&config)?);
        Ok(templates()?.render(TEMPLATE_NAME, &context)?)
    }

    /// Writes [`Self::to_html`] to `path`, creating missing parent directories.
    pub fn write_html(&self, path: impl AsRef<Path>) -> Result<(), MapError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir_exists(parent).map_err(|e| MapError::Write(parent.to_path_buf(), e))?;
        }
        let html = self.to_html()?;
        std::fs::write(path, html).map_err(|e| MapError::Write(path.to_path_buf(), e))?;
        info!("Map saved as {}", path.display());
        Ok(())
    }
}

fn templates() -> Result<Tera, MapError> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![".html"]);
    tera.add_raw_template(TEMPLATE_NAME, MAP_TEMPLATE)?;
    Ok(tera)
}

/// The `data-config` JSON the way the browser sees it.
#[cfg(test)]
pub(crate) fn config_of(html: &str) -> serde_json::Value {
    let start = html.find("data-config=\"").unwrap() + "data-config=\"".len();
    let len = html[start..].find('"').unwrap();
    let raw = html[start..start + len]
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&#x27;", "'")
        .replace("&#x2F;", "/")
        .replace("&amp;", "&");
    serde_json::from_str(&raw).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn document() -> MapDocument {
        let mut doc = MapDocument::new("Eco <Trend>", LatLon(10.0, 0.0), 2);
        doc.add_layer(MapLayer::new("Mean NDVI", "https://tiles.test/a/{z}/{x}/{y}"));
        doc.add_layer(MapLayer {
            visible: false,
            opacity: 1.5,
            ..MapLayer::new("Night \"lights\"", "https://tiles.test/b/{z}/{x}/{y}")
        });
        doc
    }

    #[test]
    fn test_html_contains_view_and_layers() {
        let html = document().to_html().unwrap();
        assert!(html.contains("<title>Eco &lt;Trend&gt;</title>"));
        assert!(html.contains("leaflet@1.9.4/dist/leaflet.js"));
        assert!(html.contains("L.control.layers"));

        let config = config_of(&html);
        assert_eq!(config["center"], serde_json::json!([10.0, 0.0]));
        assert_eq!(config["zoom"], 2);
        assert_eq!(config["base"]["attribution"], BASE_ATTRIBUTION);
        let layers = config["layers"].as_array().unwrap();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0]["tile_url"], "https://tiles.test/a/{z}/{x}/{y}");
        assert_eq!(layers[0]["visible"], true);
        assert_eq!(layers[1]["name"], "Night \"lights\"");
        assert_eq!(layers[1]["visible"], false);
        assert_eq!(layers[1]["opacity"], 1.0);
    }

    #[test]
    fn test_markup_in_values_stays_inert() {
        let mut doc = MapDocument::new("<script>alert(1)</script>", LatLon(0.0, 0.0), 1);
        doc.add_layer(MapLayer::new("</script><b>", "https://tiles.test/\"><img src=x>"));
        let html = doc.to_html().unwrap();

        // Only the Leaflet include and the page script close a script tag.
        assert_eq!(html.matches("</script>").count(), 2);
        assert!(!html.contains("<b>"));
        assert!(!html.contains("<img"));
        let config = config_of(&html);
        assert_eq!(config["layers"][0]["name"], "</script><b>");
        assert_eq!(config["layers"][0]["tile_url"], "https://tiles.test/\"><img src=x>");
    }

    #[test]
    fn test_write_html_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("maps").join("eco_trend_map.html");
        document().write_html(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, document().to_html().unwrap());
    }
}
