//! Serializable descriptions of raster composites, evaluated by the tile service.
//!
//! Nothing is computed locally: an expression names public image collections and
//! the per-pixel arithmetic to apply, and the service renders the result as tiles.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reducer {
    Mean,
    Median,
    Sum,
    Count,
    First,
}

/// Per-pixel operation with a constant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum PixelOp {
    GreaterThan(f64),
    NotEqual(f64),
    Multiply(f64),
    Add(f64),
    Subtract(f64),
}

/// Per-pixel operation between two rasters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    Divide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RasterExpr {
    Image {
        id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        band: Option<String>,
    },
    /// An image collection filtered, optionally transformed image by image, then
    /// reduced to a single image.
    Collection {
        id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        band: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        date_range: Option<DateRange>,
        #[serde(skip_serializing_if = "Option::is_none")]
        month: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        per_image: Option<PixelOp>,
        reducer: Reducer,
    },
    /// Vector features, drawn as outlines.
    Features { id: String },
    Map {
        input: Box<RasterExpr>,
        op: PixelOp,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<RasterExpr>,
        rhs: Box<RasterExpr>,
    },
    UpdateMask {
        input: Box<RasterExpr>,
        mask: Box<RasterExpr>,
    },
    SelfMask { input: Box<RasterExpr> },
}

/// An image collection being narrowed down before reduction.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageCollection {
    id: String,
    band: Option<String>,
    date_range: Option<DateRange>,
    month: Option<u32>,
    per_image: Option<PixelOp>,
}

impl ImageCollection {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            band: None,
            date_range: None,
            month: None,
            per_image: None,
        }
    }

    pub fn select(mut self, band: impl Into<String>) -> Self {
        self.band = Some(band.into());
        self
    }

    pub fn filter_date(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_range = Some(DateRange { start, end });
        self
    }

    /// Keeps images from one calendar month (1 to 12) of any year.
    pub fn calendar_month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    pub fn map(mut self, op: PixelOp) -> Self {
        self.per_image = Some(op);
        self
    }

    pub fn reduce(self, reducer: Reducer) -> RasterExpr {
        RasterExpr::Collection {
            id: self.id,
            band: self.band,
            date_range: self.date_range,
            month: self.month,
            per_image: self.per_image,
            reducer,
        }
    }

    pub fn mean(self) -> RasterExpr {
        self.reduce(Reducer::Mean)
    }

    pub fn median(self) -> RasterExpr {
        self.reduce(Reducer::Median)
    }

    pub fn sum(self) -> RasterExpr {
        self.reduce(Reducer::Sum)
    }

    pub fn count(self) -> RasterExpr {
        self.reduce(Reducer::Count)
    }

    pub fn first(self) -> RasterExpr {
        self.reduce(Reducer::First)
    }
}

impl RasterExpr {
    pub fn image(id: impl Into<String>) -> Self {
        RasterExpr::Image {
            id: id.into(),
            band: None,
        }
    }

    pub fn image_band(id: impl Into<String>, band: impl Into<String>) -> Self {
        RasterExpr::Image {
            id: id.into(),
            band: Some(band.into()),
        }
    }

    pub fn features(id: impl Into<String>) -> Self {
        RasterExpr::Features { id: id.into() }
    }

    fn map_op(self, op: PixelOp) -> Self {
        RasterExpr::Map {
            input: Box::new(self),
            op,
        }
    }

    fn binary(self, op: BinaryOp, rhs: RasterExpr) -> Self {
        RasterExpr::Binary {
            op,
            lhs: Box::new(self),
            rhs: Box::new(rhs),
        }
    }

    pub fn gt(self, value: f64) -> Self {
        self.map_op(PixelOp::GreaterThan(value))
    }

    pub fn neq(self, value: f64) -> Self {
        self.map_op(PixelOp::NotEqual(value))
    }

    pub fn multiply(self, value: f64) -> Self {
        self.map_op(PixelOp::Multiply(value))
    }

    pub fn add_scalar(self, value: f64) -> Self {
        self.map_op(PixelOp::Add(value))
    }

    pub fn subtract_scalar(self, value: f64) -> Self {
        self.map_op(PixelOp::Subtract(value))
    }

    pub fn subtract(self, rhs: RasterExpr) -> Self {
        self.binary(BinaryOp::Subtract, rhs)
    }

    pub fn divide(self, rhs: RasterExpr) -> Self {
        self.binary(BinaryOp::Divide, rhs)
    }

    pub fn update_mask(self, mask: RasterExpr) -> Self {
        RasterExpr::UpdateMask {
            input: Box::new(self),
            mask: Box::new(mask),
        }
    }

    pub fn self_mask(self) -> Self {
        RasterExpr::SelfMask {
            input: Box::new(self),
        }
    }

    /// Dataset identifiers referenced anywhere in the expression, in visit order.
    pub fn datasets(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.collect_datasets(&mut ids);
        ids
    }

    fn collect_datasets<'a>(&'a self, ids: &mut Vec<&'a str>) {
        match self {
            RasterExpr::Image { id, .. }
            | RasterExpr::Collection { id, .. }
            | RasterExpr::Features { id } => ids.push(id),
            RasterExpr::Map { input, .. } | RasterExpr::SelfMask { input } => {
                input.collect_datasets(ids)
            }
            RasterExpr::Binary { lhs, rhs, .. } => {
                lhs.collect_datasets(ids);
                rhs.collect_datasets(ids);
            }
            RasterExpr::UpdateMask { input, mask } => {
                input.collect_datasets(ids);
                mask.collect_datasets(ids);
            }
        }
    }
}

/// How the service colors a rendered layer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VisParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub palette: Vec<String>,
    /// Outline color of vector features.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl VisParams {
    pub fn range(min: f64, max: f64, palette: &[&str]) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            palette: palette.iter().map(|c| c.to_string()).collect(),
            color: None,
        }
    }

    pub fn palette(palette: &[&str]) -> Self {
        Self {
            palette: palette.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn outline(color: &str) -> Self {
        Self {
            color: Some(color.to_string()),
            ..Default::default()
        }
    }
}
