//! Driver profile entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Driver type as stored in `driver_profiles` and `trip_costs`
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(8))")]
pub enum DriverType {
    #[sea_orm(string_value = "COM")]
    Company,
    #[sea_orm(string_value = "RNR")]
    Rental,
    #[sea_orm(string_value = "OO")]
    OwnerOperator,
}

impl From<DriverType> for crate::domain::driver::DriverType {
    fn from(t: DriverType) -> Self {
        match t {
            DriverType::Company => Self::Company,
            DriverType::Rental => Self::Rental,
            DriverType::OwnerOperator => Self::OwnerOperator,
        }
    }
}

impl From<crate::domain::driver::DriverType> for DriverType {
    fn from(t: crate::domain::driver::DriverType) -> Self {
        use crate::domain::driver::DriverType as Domain;
        match t {
            Domain::Company => Self::Company,
            Domain::Rental => Self::Rental,
            Domain::OwnerOperator => Self::OwnerOperator,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "driver_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub driver_id: String,
    pub driver_name: String,
    pub driver_type: DriverType,
    /// `ZONE1`..`ZONE3`; owner-operators only
    #[sea_orm(nullable)]
    pub oo_zone: Option<String>,
    #[sea_orm(nullable)]
    pub unit_number: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
