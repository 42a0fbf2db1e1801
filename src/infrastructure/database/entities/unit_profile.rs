//! Unit profile entity with weekly fixed costs

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "unit_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub unit_id: String,
    #[sea_orm(unique)]
    pub unit_number: String,
    #[sea_orm(nullable)]
    pub driver_id: Option<String>,

    // Weekly fixed costs, dollars
    pub truck_weekly_cost: f64,
    pub trailer_weekly_cost: f64,
    pub insurance_weekly_cost: f64,
    pub telematics_weekly_cost: f64,
    pub permits_weekly_cost: f64,
    pub sga_weekly_cost: f64,
    pub misc_weekly_cost: f64,

    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
