//! The remote service that turns raster expressions into map tile URLs.

use crate::credentials::Session;
use crate::maps::error::MapError;
use crate::maps::raster::{RasterExpr, VisParams};
use log::{debug, warn};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::future::Future;

pub trait TileService {
    /// Returns an XYZ tile URL template (`.../{z}/{x}/{y}`) for the rendered layer.
    fn tile_url(
        &self,
        session: &Session,
        expr: &RasterExpr,
        vis: &VisParams,
    ) -> impl Future<Output = Result<String, MapError>> + Send;
}

#[derive(Serialize)]
struct TileRequest<'a> {
    expression: &'a RasterExpr,
    visualization: &'a VisParams,
    project: &'a str,
}

#[derive(Deserialize)]
struct TileResponse {
    tile_url: String,
}

/// Posts each expression as JSON to a tile endpoint, authenticated with the
/// session's bearer token.
#[derive(Debug, Clone)]
pub struct HttpTileService {
    http: Client,
    endpoint: String,
}

impl HttpTileService {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(http: Client, endpoint: impl Into<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl TileService for HttpTileService {
    async fn tile_url(
        &self,
        session: &Session,
        expr: &RasterExpr,
        vis: &VisParams,
    ) -> Result<String, MapError> {
        let url = &self.endpoint;
        debug!("Requesting tiles for {:?} from {}", expr.datasets(), url);
        let body = TileRequest {
            expression: expr,
            visualization: vis,
            project: session.project(),
        };
        let response = self
            .http
            .post(url)
            .bearer_auth(session.token().expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| MapError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    MapError::HttpStatus {
                        url: url.clone(),
                        status,
                        source: e,
                    }
                } else {
                    MapError::NetworkRequest(url.clone(), e)
                });
            }
        };

        let tiles: TileResponse = response.json().await.map_err(MapError::InvalidResponse)?;
        Ok(tiles.tile_url)
    }
}
