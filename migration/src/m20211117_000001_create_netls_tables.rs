use entity::{idc, ip_addr, ip_expand, vendor, vlan};
use sea_orm::{EntityTrait, Schema};
use sea_orm_migration::prelude::*;

pub struct Migration;

const EXPAND_PARENT_INDEX: &str = "idx_ty_ipaddr_expand_ipaddr_id";

fn create_stmt<E: EntityTrait>(manager: &SchemaManager, e: E) -> TableCreateStatement {
    let schema = Schema::new(manager.get_database_backend());

    schema
        .create_table_from_entity(e)
        .if_not_exists()
        .to_owned()
}

fn drop_stmt<E: EntityTrait>(e: E) -> TableDropStatement {
    Table::drop().table(e).if_exists().to_owned()
}

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20211117_000001_create_netls_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // referenced tables first
        let stmts = vec![
            create_stmt(manager, vendor::Entity),
            create_stmt(manager, idc::Entity),
            create_stmt(manager, vlan::Entity),
            create_stmt(manager, ip_addr::Entity),
            create_stmt(manager, ip_expand::Entity),
        ];

        for stmt in stmts {
            manager.create_table(stmt).await?;
        }

        manager
            .create_index(
                Index::create()
                    .name(EXPAND_PARENT_INDEX)
                    .table(ip_expand::Entity)
                    .col(ip_expand::Column::IpaddrId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(EXPAND_PARENT_INDEX)
                    .table(ip_expand::Entity)
                    .to_owned(),
            )
            .await?;

        let stmts = vec![
            drop_stmt(ip_expand::Entity),
            drop_stmt(ip_addr::Entity),
            drop_stmt(vlan::Entity),
            drop_stmt(idc::Entity),
            drop_stmt(vendor::Entity),
        ];

        for stmt in stmts {
            manager.drop_table(stmt).await?;
        }

        Ok(())
    }
}
