//! Trip cost audit record entity

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::driver_profile::DriverType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
pub enum Direction {
    #[sea_orm(string_value = "INBOUND")]
    Inbound,
    #[sea_orm(string_value = "OUTBOUND")]
    Outbound,
}

impl From<Direction> for crate::domain::trip_cost::Direction {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Inbound => Self::Inbound,
            Direction::Outbound => Self::Outbound,
        }
    }
}

impl From<crate::domain::trip_cost::Direction> for Direction {
    fn from(d: crate::domain::trip_cost::Direction) -> Self {
        use crate::domain::trip_cost::Direction as Domain;
        match d {
            Domain::Inbound => Self::Inbound,
            Domain::Outbound => Self::Outbound,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trip_costs")]
pub struct Model {
    /// Insertion order; the latest row for an order has the highest id
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub cost_id: String,
    #[sea_orm(nullable)]
    pub trip_id: Option<String>,
    pub order_id: String,
    pub driver_id: String,
    #[sea_orm(nullable)]
    pub unit_id: Option<String>,
    pub driver_type: DriverType,
    #[sea_orm(nullable)]
    pub oo_zone: Option<String>,

    pub miles: f64,
    pub direction: Direction,
    pub is_round_trip: bool,
    #[sea_orm(nullable)]
    pub week_start: Option<NaiveDate>,

    pub border_crossings: i32,
    pub drop_hooks: i32,
    pub pickups: i32,
    pub deliveries: i32,

    pub fixed_cpm: f64,
    pub wage_cpm: f64,
    pub rolling_cpm: f64,
    pub accessorial_cpm: f64,
    pub total_cpm: f64,
    pub total_cost: f64,

    #[sea_orm(nullable)]
    pub revenue: Option<f64>,
    #[sea_orm(nullable)]
    pub rpm: Option<f64>,
    #[sea_orm(nullable)]
    pub ppm: Option<f64>,
    #[sea_orm(nullable)]
    pub profit: Option<f64>,
    #[sea_orm(nullable)]
    pub margin_pct: Option<f64>,
    #[sea_orm(nullable)]
    pub is_profitable: Option<bool>,

    /// Full-precision calculation trace, JSON text
    pub calculation_formula: String,
    pub calculated_at: DateTimeUtc,

    #[sea_orm(nullable)]
    pub actual_miles: Option<f64>,
    #[sea_orm(nullable)]
    pub actual_cost: Option<f64>,
    #[sea_orm(nullable)]
    pub variance: Option<f64>,
    #[sea_orm(nullable)]
    pub variance_pct: Option<f64>,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
