//! Create event_types and event_rules tables with the default catalog

use sea_orm_migration::prelude::*;

use crate::infrastructure::seed;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EventTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EventTypes::EventCode)
                            .string_len(20)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EventTypes::EventName).string().not_null())
                    .col(
                        ColumnDef::new(EventTypes::CostPerEvent)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(EventTypes::IsAutomatic)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(EventRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EventRules::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EventRules::EventCode).string_len(20).not_null())
                    .col(ColumnDef::new(EventRules::TriggerType).string_len(30).not_null())
                    .col(
                        ColumnDef::new(EventRules::TriggerCondition)
                            .text()
                            .not_null()
                            .default("{}"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_event_rules_event_code")
                            .from(EventRules::Table, EventRules::EventCode)
                            .to(EventTypes::Table, EventTypes::EventCode)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        let mut types = Query::insert()
            .into_table(EventTypes::Table)
            .columns([
                EventTypes::EventCode,
                EventTypes::EventName,
                EventTypes::CostPerEvent,
                EventTypes::IsAutomatic,
            ])
            .to_owned();
        for event_type in seed::default_event_types() {
            types.values_panic([
                event_type.code.into(),
                event_type.name.into(),
                event_type.cost_per_event.into(),
                event_type.is_automatic.into(),
            ]);
        }
        manager.exec_stmt(types).await?;

        let mut rules = Query::insert()
            .into_table(EventRules::Table)
            .columns([
                EventRules::EventCode,
                EventRules::TriggerType,
                EventRules::TriggerCondition,
            ])
            .to_owned();
        for rule in seed::default_event_rules() {
            let condition = serde_json::to_string(&rule.condition)
                .map_err(|e| DbErr::Custom(format!("Invalid trigger condition: {}", e)))?;
            rules.values_panic([
                rule.event_code.into(),
                rule.trigger_type.code().into(),
                condition.into(),
            ]);
        }
        manager.exec_stmt(rules).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(EventRules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EventTypes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum EventTypes {
    Table,
    EventCode,
    EventName,
    CostPerEvent,
    IsAutomatic,
}

#[derive(Iden)]
pub enum EventRules {
    Table,
    Id,
    EventCode,
    TriggerType,
    TriggerCondition,
}
