//! [`Config`]-related definitions.

use common::{Money, Percent};
use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use derive_more::{Display, Error};
use rust_decimal::Decimal;
use serde::Deserialize;
use service::pricing;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Rental pricing configuration.
    pub pricing: Pricing,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Rental pricing configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Pricing {
    /// Weekly plan pricing.
    #[default(PlanPricing::new(30, 20))]
    pub weekly: PlanPricing,

    /// Biweekly plan pricing.
    #[default(PlanPricing::new(28, 40))]
    pub biweekly: PlanPricing,

    /// Monthly plan pricing.
    #[default(PlanPricing::new(22, 60))]
    pub monthly: PlanPricing,

    /// Flat fee charged per day exceeding the planned rental period.
    #[default(Decimal::from(50))]
    pub daily_exceeded_fee: Decimal,
}

/// Pricing configuration of a single rental plan.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct PlanPricing {
    /// Cost of a single rental day.
    #[default(Decimal::from(30))]
    pub daily_cost: Decimal,

    /// Percent of the daily cost charged per day of an early return,
    /// as a whole number between `0` and `100`.
    #[default(20)]
    pub early_return_fee: u32,
}

impl PlanPricing {
    /// Creates a new [`PlanPricing`] out of the provided whole values.
    fn new(daily_cost: u32, early_return_fee: u32) -> Self {
        Self {
            daily_cost: daily_cost.into(),
            early_return_fee,
        }
    }
}

impl TryFrom<Pricing> for pricing::Options {
    type Error = InvalidPercentError;

    fn try_from(value: Pricing) -> Result<Self, Self::Error> {
        let Pricing {
            weekly,
            biweekly,
            monthly,
            daily_exceeded_fee,
        } = value;

        let plan = |p: PlanPricing| {
            Ok(pricing::PlanOptions {
                daily_cost: Money::new(p.daily_cost),
                early_return_fee: Percent::new(p.early_return_fee.into())
                    .ok_or(InvalidPercentError(p.early_return_fee))?,
            })
        };

        Ok(Self {
            weekly: plan(weekly)?,
            biweekly: plan(biweekly)?,
            monthly: plan(monthly)?,
            daily_exceeded_fee: Money::new(daily_exceeded_fee),
        })
    }
}

/// Error of a configured early return fee not being a valid percent.
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`{_0}` is not a valid percent value")]
pub struct InvalidPercentError(#[error(not(source))] pub u32);

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
