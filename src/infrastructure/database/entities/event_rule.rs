//! Event detection rule entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event_rules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub event_code: String,
    /// `BORDER_CROSSING` or `ORDER_TYPE`
    pub trigger_type: String,
    /// JSON document, e.g. `{"order_types":["FTL"],"count":1}`
    pub trigger_condition: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
