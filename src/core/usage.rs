//! Usage-intent categories a buyer can ask for.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UsageCategory {
    /// Fuel-economy commuting
    FuelEconomy,
    /// Family space (seats, cargo)
    FamilySpace,
    /// Durable business / commercial use
    Business,
    /// Status and prestige
    Prestige,
    /// Driving enjoyment
    DrivingEnjoyment,
    /// Low-stakes first car for a learner
    Learner,
}

impl UsageCategory {
    pub const ALL: [UsageCategory; 6] = [
        UsageCategory::FuelEconomy,
        UsageCategory::FamilySpace,
        UsageCategory::Business,
        UsageCategory::Prestige,
        UsageCategory::DrivingEnjoyment,
        UsageCategory::Learner,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            UsageCategory::FuelEconomy => "fuel-economy",
            UsageCategory::FamilySpace => "family-space",
            UsageCategory::Business => "business",
            UsageCategory::Prestige => "prestige",
            UsageCategory::DrivingEnjoyment => "driving-enjoyment",
            UsageCategory::Learner => "learner",
        }
    }
}

impl fmt::Display for UsageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown usage category '{0}'")]
pub struct UnknownUsage(pub String);

impl FromStr for UsageCategory {
    type Err = UnknownUsage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['_', ' '], "-");
        let category = match key.as_str() {
            "fuel-economy" | "fuel-economy-commuting" | "commute" | "commuting" | "economy" => {
                UsageCategory::FuelEconomy
            }
            "family-space" | "family" => UsageCategory::FamilySpace,
            "business" | "durable-business-use" | "durable" | "work" => UsageCategory::Business,
            "prestige" | "status" | "status-prestige" => UsageCategory::Prestige,
            "driving-enjoyment" | "enjoyment" | "fun" | "sport" => UsageCategory::DrivingEnjoyment,
            "learner" | "low-stakes-learner" | "beginner" => UsageCategory::Learner,
            _ => return Err(UnknownUsage(s.trim().to_string())),
        };
        Ok(category)
    }
}
