use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::Error;

/// Agricultural futures tracked by the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commodity {
    Corn,
    Soy,
    Oats,
    Hogs,
    Cattle,
    Rice,
    Wheat,
    Cotton,
}

impl Commodity {
    /// Every commodity, in display order
    pub const ALL: [Commodity; 8] = [
        Commodity::Corn,
        Commodity::Soy,
        Commodity::Oats,
        Commodity::Hogs,
        Commodity::Cattle,
        Commodity::Rice,
        Commodity::Wheat,
        Commodity::Cotton,
    ];

    /// Continuous front-month futures ticker
    pub fn ticker(self) -> &'static str {
        match self {
            Commodity::Corn => "ZC=F",
            Commodity::Soy => "ZS=F",
            Commodity::Oats => "ZO=F",
            Commodity::Hogs => "HE=F",
            Commodity::Cattle => "LE=F",
            Commodity::Rice => "ZR=F",
            Commodity::Wheat => "KE=F",
            Commodity::Cotton => "CT=F",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Commodity::Corn => "Corn",
            Commodity::Soy => "Soy",
            Commodity::Oats => "Oats",
            Commodity::Hogs => "Hogs",
            Commodity::Cattle => "Cattle",
            Commodity::Rice => "Rice",
            Commodity::Wheat => "Wheat",
            Commodity::Cotton => "Cotton",
        }
    }
}

impl fmt::Display for Commodity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Commodity {
    type Err = Error;

    /// Accepts a name ("corn", case-insensitive) or a ticker ("ZC=F")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Commodity::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s) || c.ticker().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownCommodity(s.to_string()))
    }
}

/// Direction of a price change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    Flat,
}

impl Trend {
    pub fn from_change(change: f64) -> Self {
        if change > 0.0 {
            Trend::Up
        } else if change < 0.0 {
            Trend::Down
        } else {
            // Zero and NaN
            Trend::Flat
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Trend::Up => "▲",
            Trend::Down => "▼",
            Trend::Flat => "■",
        }
    }
}

/// Quote fields used by the dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommodityQuote {
    pub regular_market_price: f64,
    pub regular_market_change_percent: f64,
    pub short_name: String,
}

impl CommodityQuote {
    pub fn trend(&self) -> Trend {
        Trend::from_change(self.regular_market_change_percent)
    }
}

/// One OHLCV bar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    /// Bar open time, unix seconds
    pub time: i64,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    #[serde(default)]
    pub volume: f64,
}

/// Percentage change from `from` to `to`
pub fn change_percent(from: f64, to: f64) -> Option<f64> {
    if from == 0.0 || !from.is_finite() || !to.is_finite() {
        return None;
    }
    Some((to - from) / from * 100.0)
}

/// Bars for one commodity, oldest first
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalSeries {
    pub commodity: Commodity,
    pub points: Vec<HistoricalPoint>,
}

impl HistoricalSeries {
    /// Change from the first bar's open to the last bar's close
    pub fn change_percent(&self) -> Option<f64> {
        let first = self.points.first()?;
        let last = self.points.last()?;
        change_percent(first.open, last.close)
    }

    pub fn trend(&self) -> Trend {
        self.change_percent()
            .map(Trend::from_change)
            .unwrap_or(Trend::Flat)
    }

    pub fn high(&self) -> Option<f64> {
        self.points.iter().map(|p| p.high).reduce(f64::max)
    }

    pub fn low(&self) -> Option<f64> {
        self.points.iter().map(|p| p.low).reduce(f64::min)
    }
}
