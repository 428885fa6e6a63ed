use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripType {
    Sencillo,
    Doble,
}

impl TripType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sencillo => "SENCILLO",
            Self::Doble => "DOBLE",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EquipmentType {
    Rampa,
    RoboticaPlegable,
}

impl EquipmentType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Rampa => "RAMPA",
            Self::RoboticaPlegable => "ROBOTICA_PLEGABLE",
        }
    }
}

/// Direction of a hub-to-municipality trip, used by the rate table in place
/// of a distance bracket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OriginType {
    DesdeMedellin,
    DesdeMunicipio,
}

impl OriginType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::DesdeMedellin => "DESDE_MEDELLIN",
            Self::DesdeMunicipio => "DESDE_MUNICIPIO",
        }
    }
}
