//! Costing rule entity (rate table rows)

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "costing_rules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// e.g. `BASE_WAGE`, `FUEL_CPM`, `BC_PER`
    pub rule_key: String,
    /// Driver type code, `OO_ZONEn` or `GLOBAL`
    pub rule_type: String,
    pub rule_value: f64,
    #[sea_orm(nullable)]
    pub description: Option<String>,
    pub effective_date: DateTimeUtc,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
