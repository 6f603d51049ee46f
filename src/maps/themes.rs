//! The thematic maps: which composites to render, where to center them and where
//! to save them.

use crate::maps::error::MapError;
use crate::maps::raster::{ImageCollection, PixelOp, RasterExpr, VisParams};
use crate::meteocast::LatLon;
use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

const NDVI: &str = "MODIS/061/MOD13A2";
const LAND_SURFACE_TEMPERATURE: &str = "MODIS/061/MOD11A2";
const WORLD_COVER_2020: &str = "ESA/WorldCover/v100/2020";
const WORLD_COVER_2021: &str = "ESA/WorldCover/v200/2021";
const WORLD_COVER_PALETTE: [&str; 4] = ["#006400", "#FFFF00", "#8B4513", "#00BFFF"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Theme {
    Demo,
    EcoTrend,
    BiodiversityPulse,
    DroughtWater,
    FireWatch,
    SolarAtlas,
}

/// One overlay of a theme.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeLayer {
    pub name: String,
    pub expr: RasterExpr,
    pub vis: VisParams,
}

impl ThemeLayer {
    fn new(name: &str, expr: RasterExpr, vis: VisParams) -> Self {
        Self {
            name: name.to_string(),
            expr,
            vis,
        }
    }
}

impl Theme {
    pub const ALL: [Theme; 6] = [
        Theme::Demo,
        Theme::EcoTrend,
        Theme::BiodiversityPulse,
        Theme::DroughtWater,
        Theme::FireWatch,
        Theme::SolarAtlas,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Theme::Demo => "demo",
            Theme::EcoTrend => "eco-trend",
            Theme::BiodiversityPulse => "biodiversity-pulse",
            Theme::DroughtWater => "drought-water",
            Theme::FireWatch => "fire-watch",
            Theme::SolarAtlas => "solar-atlas",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Theme::Demo => "Elevation",
            Theme::EcoTrend => "Eco Trend",
            Theme::BiodiversityPulse => "Biodiversity Pulse",
            Theme::DroughtWater => "Drought & Water",
            Theme::FireWatch => "Fire Watch",
            Theme::SolarAtlas => "Solar Atlas",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}_map.html", self.name().replace('-', "_"))
    }

    pub fn center(&self) -> LatLon {
        match self {
            Theme::Demo => LatLon(20.0, 0.0),
            Theme::EcoTrend | Theme::DroughtWater => LatLon(10.0, 0.0),
            Theme::BiodiversityPulse | Theme::FireWatch | Theme::SolarAtlas => LatLon(0.0, 0.0),
        }
    }

    pub fn zoom(&self) -> u8 {
        2
    }

    pub fn layers(&self) -> Vec<ThemeLayer> {
        match self {
            Theme::Demo => vec![ThemeLayer::new(
                "SRTM Elevation",
                RasterExpr::image("CGIAR/SRTM90_V4"),
                VisParams::range(0.0, 3000.0, &["blue", "green", "brown"]),
            )],
            Theme::EcoTrend => eco_trend(),
            Theme::BiodiversityPulse => biodiversity_pulse(),
            Theme::DroughtWater => drought_water(),
            Theme::FireWatch => fire_watch(),
            Theme::SolarAtlas => solar_atlas(),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = MapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Theme::ALL
            .into_iter()
            .find(|theme| theme.name() == s)
            .ok_or_else(|| MapError::UnknownTheme(s.to_string()))
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn ndvi() -> ImageCollection {
    ImageCollection::new(NDVI).select("NDVI")
}

fn land_surface_temperature_kelvin() -> RasterExpr {
    ImageCollection::new(LAND_SURFACE_TEMPERATURE)
        .select("LST_Day_1km")
        .mean()
        .multiply(0.02)
}

fn eco_trend() -> Vec<ThemeLayer> {
    let change = RasterExpr::image(WORLD_COVER_2021)
        .subtract(RasterExpr::image(WORLD_COVER_2020))
        .neq(0.0)
        .self_mask();
    vec![
        ThemeLayer::new(
            "Mean NDVI",
            ndvi().mean(),
            VisParams::range(0.0, 9000.0, &["white", "green"]),
        ),
        ThemeLayer::new(
            "NDVI January (Seasonality Example)",
            ndvi().calendar_month(1).mean(),
            VisParams::range(0.0, 9000.0, &["brown", "yellow", "green"]),
        ),
        ThemeLayer::new(
            "ESA WorldCover 2020",
            RasterExpr::image(WORLD_COVER_2020),
            VisParams::range(10.0, 100.0, &WORLD_COVER_PALETTE),
        ),
        ThemeLayer::new(
            "ESA WorldCover 2021",
            RasterExpr::image(WORLD_COVER_2021),
            VisParams::range(10.0, 100.0, &WORLD_COVER_PALETTE),
        ),
        ThemeLayer::new(
            "Land Cover Change (2020-2021)",
            change,
            VisParams::palette(&["#FF0000"]),
        ),
        ThemeLayer::new(
            "Human Pressure (Nightlights)",
            ImageCollection::new("NOAA/VIIRS/DNB/MONTHLY_V1/VCMCFG")
                .select("avg_rad")
                .mean(),
            VisParams::range(0.0, 60.0, &["black", "purple", "orange", "white"]),
        ),
    ]
}

fn biodiversity_pulse() -> Vec<ThemeLayer> {
    vec![
        ThemeLayer::new(
            "NDVI (Mean)",
            ndvi().mean(),
            VisParams::range(0.0, 9000.0, &["white", "green"]),
        ),
        ThemeLayer::new(
            "Temperature (LST)",
            land_surface_temperature_kelvin(),
            VisParams::range(200.0, 320.0, &["blue", "white", "red"]),
        ),
        ThemeLayer::new(
            "Protected Areas",
            RasterExpr::features("WCMC/WDPA/current/polygons"),
            VisParams::outline("blue"),
        ),
        ThemeLayer::new(
            "ESA WorldCover 2020",
            RasterExpr::image(WORLD_COVER_2020),
            VisParams::range(10.0, 100.0, &["forestgreen", "yellow", "brown", "blue"]),
        ),
    ]
}

fn drought_water() -> Vec<ThemeLayer> {
    let baseline = ndvi().filter_date(date(2001, 1, 1), date(2010, 12, 31)).mean();
    let recent = ndvi().filter_date(date(2021, 1, 1), date(2024, 12, 31)).mean();
    vec![
        ThemeLayer::new(
            "Surface Water Occurrence",
            RasterExpr::image_band("JRC/GSW1_4/GlobalSurfaceWater", "occurrence"),
            VisParams::range(0.0, 100.0, &["white", "blue"]),
        ),
        ThemeLayer::new(
            "NDVI Anomaly (Recent - Baseline)",
            recent.subtract(baseline),
            VisParams::range(-1000.0, 1000.0, &["brown", "white", "green"]),
        ),
        ThemeLayer::new(
            "Land Surface Temperature (°C)",
            land_surface_temperature_kelvin().subtract_scalar(273.15),
            VisParams::range(10.0, 45.0, &["blue", "yellow", "red"]),
        ),
        ThemeLayer::new(
            "Evapotranspiration",
            ImageCollection::new("MODIS/061/MOD16A2GF")
                .select("ET")
                .mean()
                .multiply(0.1),
            VisParams::range(0.0, 2000.0, &["white", "lightblue", "darkblue"]),
        ),
        ThemeLayer::new(
            "Mean Precipitation (CHIRPS)",
            ImageCollection::new("UCSB-CHG/CHIRPS/DAILY")
                .filter_date(date(2020, 1, 1), date(2024, 12, 31))
                .select("precipitation")
                .mean(),
            VisParams::range(0.0, 10.0, &["white", "lightblue", "blue"]),
        ),
    ]
}

fn fire_watch() -> Vec<ThemeLayer> {
    let (start, end) = (date(2015, 1, 1), date(2023, 12, 31));
    let fires = ImageCollection::new("MODIS/061/MCD64A1")
        .filter_date(start, end)
        .select("BurnDate");
    vec![
        ThemeLayer::new(
            "Fire Frequency (2015-2023)",
            fires.clone().map(PixelOp::GreaterThan(0.0)).sum(),
            VisParams::range(0.0, 100.0, &["white", "orange", "red"]),
        ),
        ThemeLayer::new(
            "Cumulative Burned Area (2015-2023)",
            fires.count(),
            VisParams::range(0.0, 120.0, &["white", "yellow", "brown"]),
        ),
        ThemeLayer::new(
            "Mean NDVI (2015-2023)",
            ndvi().filter_date(start, end).mean(),
            VisParams::range(0.0, 9000.0, &["white", "green"]),
        ),
    ]
}

fn solar_atlas() -> Vec<ThemeLayer> {
    let solar = ImageCollection::new("MODIS/006/MOD09GA")
        .select("sur_refl_b01")
        .filter_date(date(2023, 1, 1), date(2023, 12, 31))
        .mean();
    let land = RasterExpr::image(WORLD_COVER_2020);
    // Forest (10) and open water (80) are unsuitable.
    let suitable = land
        .clone()
        .update_mask(land.clone().neq(10.0))
        .update_mask(land.neq(80.0));
    let population = ImageCollection::new("CIESIN/GPWv4/population-count").first();
    vec![
        ThemeLayer::new(
            "Solar Radiation Proxy (MODIS B01)",
            solar.clone(),
            VisParams::range(0.0, 2000.0, &["blue", "yellow", "red"]),
        ),
        ThemeLayer::new(
            "Suitable Land (simplified)",
            suitable,
            VisParams::palette(&["lightgreen"]),
        ),
        ThemeLayer::new(
            "Solar Radiation per Capita",
            solar.divide(population.add_scalar(1.0)),
            VisParams::range(0.0, 500.0, &["white", "yellow", "red"]),
        ),
    ]
}
