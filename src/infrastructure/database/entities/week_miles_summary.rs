//! Weekly mileage aggregate per unit

use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "week_miles_summary")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub unit_number: String,
    /// Sunday of the week
    #[sea_orm(primary_key, auto_increment = false)]
    pub week_start: NaiveDate,
    pub total_miles: f64,
    pub trip_count: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
