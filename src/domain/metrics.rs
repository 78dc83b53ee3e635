//! Derived business metrics: price segment and value score

use serde::{Deserialize, Serialize};
use std::fmt;

/// Market tier derived from the price alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceSegment {
    Budget,
    MidRange,
    Premium,
    Flagship,
}

impl PriceSegment {
    pub const MID_RANGE_FROM: u64 = 10_000;
    pub const PREMIUM_FROM: u64 = 20_000;
    pub const FLAGSHIP_FROM: u64 = 40_000;

    /// Segment for a price; `None` for a missing or zero price.
    ///
    /// Boundaries are lower-inclusive: 10000 is already mid-range.
    pub fn from_price(price: Option<u64>) -> Option<Self> {
        let price = price.filter(|p| *p > 0)?;
        Some(match price {
            p if p < Self::MID_RANGE_FROM => Self::Budget,
            p if p < Self::PREMIUM_FROM => Self::MidRange,
            p if p < Self::FLAGSHIP_FROM => Self::Premium,
            _ => Self::Flagship,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Budget => "budget",
            Self::MidRange => "mid-range",
            Self::Premium => "premium",
            Self::Flagship => "flagship",
        }
    }
}

impl fmt::Display for PriceSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueCategory {
    ExceptionalValue,
    GreatValue,
    GoodValue,
    AverageValue,
    PoorValue,
}

impl ValueCategory {
    /// Lower-inclusive thresholds, checked top-down
    const THRESHOLDS: [(f64, Self); 4] = [
        (0.3, Self::ExceptionalValue),
        (0.2, Self::GreatValue),
        (0.1, Self::GoodValue),
        (0.05, Self::AverageValue),
    ];

    pub fn from_score(score: f64) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(threshold, _)| score >= *threshold)
            .map_or(Self::PoorValue, |(_, category)| *category)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ExceptionalValue => "exceptional_value",
            Self::GreatValue => "great_value",
            Self::GoodValue => "good_value",
            Self::AverageValue => "average_value",
            Self::PoorValue => "poor_value",
        }
    }
}

impl fmt::Display for ValueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value score rounded to three decimals, with its category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueScore {
    pub score: f64,
    pub category: ValueCategory,
}

/// Everything the value score depends on
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ValueInputs {
    pub price: Option<u64>,
    pub old_price: Option<u64>,
    pub rating: Option<f64>,
    pub ram_gb: Option<u32>,
    pub storage_gb: Option<u32>,
    pub max_camera_mp: Option<u32>,
    pub has_5g: bool,
}

impl ValueInputs {
    const RAM_WEIGHT: f64 = 1000.0;
    const STORAGE_WEIGHT: f64 = 50.0;
    const CAMERA_WEIGHT: f64 = 100.0;
    const FIVE_G_BONUS: f64 = 1000.0;
    const UNRATED_FACTOR: f64 = 0.5;

    pub fn feature_score(&self) -> f64 {
        let mut score = 0.0;
        if let Some(ram) = self.ram_gb {
            score += f64::from(ram) * Self::RAM_WEIGHT;
        }
        if let Some(storage) = self.storage_gb {
            score += f64::from(storage) * Self::STORAGE_WEIGHT;
        }
        if let Some(camera) = self.max_camera_mp {
            score += f64::from(camera) * Self::CAMERA_WEIGHT;
        }
        if self.has_5g {
            score += Self::FIVE_G_BONUS;
        }
        score
    }

    /// 1 without a valid discount, else `1 + (old - price) / old`
    pub fn discount_factor(&self) -> f64 {
        match (self.price, self.old_price) {
            (Some(price), Some(old)) if old > price => 1.0 + (old - price) as f64 / old as f64,
            _ => 1.0,
        }
    }

    /// 0.5 when unrated, else `(rating - 3) / 2` clamped to `[0, 1]`
    pub fn rating_factor(&self) -> f64 {
        self.rating
            .map_or(Self::UNRATED_FACTOR, |rating| ((rating - 3.0) / 2.0).clamp(0.0, 1.0))
    }

    /// Score and category; `None` without a positive price.
    pub fn score(&self) -> Option<ValueScore> {
        let price = self.price.filter(|p| *p > 0)? as f64;
        let raw = self.discount_factor() * (self.feature_score() / price) * self.rating_factor();
        let score = round_to_thousandths(raw);
        Some(ValueScore {
            score,
            category: ValueCategory::from_score(score),
        })
    }
}

fn round_to_thousandths(value: f64) -> f64 {
    (value * 1000.0).round_ties_even() / 1000.0
}
