use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;
use meteocast::config::MeteocastConfig;
use meteocast::credentials::error::CredentialError;
use meteocast::credentials::resolver::SessionResolver;
use meteocast::credentials::source::{CachedCredentialSource, InteractiveCredentialSource};
use meteocast::forecast::pipeline::{ForecastReport, PipelineKind};
use meteocast::forecast::recursive::LagPolicy;
use meteocast::maps::render_theme;
use meteocast::maps::service::HttpTileService;
use meteocast::maps::themes::Theme;
use meteocast::report;
use meteocast::Meteocast;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Runs one forecast and returns the rendered report, plus the plots written when
/// `plot` names a directory.
pub async fn forecast(
    config: MeteocastConfig,
    kind: PipelineKind,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    horizon: Option<usize>,
    lag_policy: LagPolicy,
    plot: Option<PathBuf>,
) -> Result<(String, Vec<PathBuf>)> {
    let client = Meteocast::with_config(config);
    let report = client
        .forecast(kind)
        .maybe_start(start)
        .maybe_end(end)
        .maybe_horizon(horizon)
        .lag_policy(lag_policy)
        .call()
        .await
        .with_context(|| format!("{kind} forecast failed"))?;
    let rendered = report::render(&report)?;
    let plots = match plot {
        Some(dir) => write_plots(&report, &dir)?,
        None => Vec::new(),
    };
    Ok((rendered, plots))
}

#[cfg(feature = "plot")]
fn write_plots(report: &ForecastReport, dir: &Path) -> Result<Vec<PathBuf>> {
    match report {
        ForecastReport::Temperature(report) => Ok(meteocast::plot::write_plots(report, dir)?),
        ForecastReport::Precipitation(report) => {
            anyhow::bail!("{} reports have no plots", report.kind)
        }
    }
}

#[cfg(not(feature = "plot"))]
fn write_plots(_report: &ForecastReport, _dir: &Path) -> Result<Vec<PathBuf>> {
    anyhow::bail!("Plots need meteocast built with the `plot` feature")
}

/// Renders `theme` and returns the written file.
pub async fn map(
    config: MeteocastConfig,
    theme: Theme,
    out: Option<PathBuf>,
    project: Option<String>,
) -> Result<PathBuf> {
    let project = project.unwrap_or(config.maps.project);
    let out_dir = out.unwrap_or(config.maps.out_dir);

    let cache = CachedCredentialSource::new()?;
    let interactive = InteractiveCredentialSource::new(prompt_for_token, cache.clone());
    let session = SessionResolver::new(cache, interactive)
        .resolve(&project)
        .context("Could not initialize a session")?;
    info!("Session for '{}' from {} credentials", session.project(), session.source());

    let service = HttpTileService::new(config.maps.endpoint);
    let path = render_theme(theme, &service, &session, &out_dir).await?;
    Ok(path)
}

fn prompt_for_token(project: &str) -> Result<String, CredentialError> {
    eprint!("Access token for project '{project}': ");
    io::stderr()
        .flush()
        .map_err(|e| CredentialError::Interactive(e.to_string()))?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| CredentialError::Interactive(e.to_string()))?;
    let token = line.trim();
    if token.is_empty() {
        return Err(CredentialError::Interactive("no token entered".to_string()));
    }
    Ok(token.to_string())
}
