// Asset and transport mode enums with their display names
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which financing terms an asset is annualized with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinancingClass {
    Plant,
    Wind,
    Solar,
    Infrastructure,
}

/// Sizable components of the production plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Wind,
    Solar,
    Electrolyzer,
    Battery,
    CompressedH2Store,
    AmmoniaStore,
    AmmoniaSynthesis,
}

impl AssetClass {
    pub const ALL: [AssetClass; 7] = [
        AssetClass::Wind,
        AssetClass::Solar,
        AssetClass::Electrolyzer,
        AssetClass::Battery,
        AssetClass::CompressedH2Store,
        AssetClass::AmmoniaStore,
        AssetClass::AmmoniaSynthesis,
    ];

    pub fn financing_class(&self) -> FinancingClass {
        match self {
            AssetClass::Wind => FinancingClass::Wind,
            AssetClass::Solar => FinancingClass::Solar,
            _ => FinancingClass::Plant,
        }
    }

    /// Name used in output column headers
    pub fn display_name(&self) -> &'static str {
        match self {
            AssetClass::Wind => "wind",
            AssetClass::Solar => "solar",
            AssetClass::Electrolyzer => "electrolyzer",
            AssetClass::Battery => "battery",
            AssetClass::CompressedH2Store => "H2 storage",
            AssetClass::AmmoniaStore => "NH3 storage",
            AssetClass::AmmoniaSynthesis => "ammonia synthesis",
        }
    }

    pub fn capacity_unit(&self) -> &'static str {
        match self {
            AssetClass::Battery | AssetClass::CompressedH2Store | AssetClass::AmmoniaStore => "MWh",
            _ => "MW",
        }
    }

    pub fn is_storage(&self) -> bool {
        self.capacity_unit() == "MWh"
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportMode {
    Trucking,
    Pipeline,
}

impl TransportMode {
    pub const ALL: [TransportMode; 2] = [TransportMode::Trucking, TransportMode::Pipeline];

    pub fn display_name(&self) -> &'static str {
        match self {
            TransportMode::Trucking => "trucking",
            TransportMode::Pipeline => "pipeline",
        }
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for TransportMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trucking" | "truck" => Ok(TransportMode::Trucking),
            "pipeline" => Ok(TransportMode::Pipeline),
            other => Err(format!("unknown transport mode '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_financing_class() {
        assert_eq!(AssetClass::Wind.financing_class(), FinancingClass::Wind);
        assert_eq!(AssetClass::Solar.financing_class(), FinancingClass::Solar);
        assert_eq!(AssetClass::Battery.financing_class(), FinancingClass::Plant);
        assert_eq!(AssetClass::AmmoniaSynthesis.financing_class(), FinancingClass::Plant);
    }

    #[test]
    fn test_transport_mode_parse() {
        assert_eq!("Trucking".parse::<TransportMode>(), Ok(TransportMode::Trucking));
        assert_eq!(" pipeline ".parse::<TransportMode>(), Ok(TransportMode::Pipeline));
        assert!("ship".parse::<TransportMode>().is_err());
    }
}
