//! Driver domain entity

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Employment model of a driver; selects wage and fuel rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DriverType {
    Company,
    Rental,
    OwnerOperator,
}

impl DriverType {
    /// Code used in rate rule types and persisted rows.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Company => "COM",
            Self::Rental => "RNR",
            Self::OwnerOperator => "OO",
        }
    }
}

impl std::fmt::Display for DriverType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for DriverType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "COM" | "COMPANY" => Ok(Self::Company),
            "RNR" | "RENTAL" => Ok(Self::Rental),
            "OO" | "OWNER_OPERATOR" => Ok(Self::OwnerOperator),
            other => Err(DomainError::Validation(format!(
                "Unknown driver type: {}",
                other
            ))),
        }
    }
}

/// Owner-operator pay zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OoZone {
    Zone1,
    Zone2,
    Zone3,
}

impl OoZone {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Zone1 => "ZONE1",
            Self::Zone2 => "ZONE2",
            Self::Zone3 => "ZONE3",
        }
    }
}

impl std::fmt::Display for OoZone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for OoZone {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ZONE1" => Ok(Self::Zone1),
            "ZONE2" => Ok(Self::Zone2),
            "ZONE3" => Ok(Self::Zone3),
            other => Err(DomainError::Validation(format!("Unknown OO zone: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriverProfile {
    pub id: String,
    pub name: String,
    pub driver_type: DriverType,
    /// Only meaningful for [`DriverType::OwnerOperator`].
    pub oo_zone: Option<OoZone>,
    /// Unit number the driver is normally assigned to.
    pub unit_number: Option<String>,
    pub is_active: bool,
}

impl DriverProfile {
    /// Zone that applies to wage lookup; ignored for non owner-operators.
    pub fn effective_zone(&self) -> Option<OoZone> {
        match self.driver_type {
            DriverType::OwnerOperator => self.oo_zone,
            _ => None,
        }
    }
}
