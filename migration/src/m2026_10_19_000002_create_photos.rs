use sea_orm_migration::prelude::*;

use crate::m2026_10_19_000001_create_users::Users;

/// Table: photos (FK -> users, owner must be a photographer)
#[derive(DeriveIden)]
enum Photos {
    Table,
    Id,
    UserId,
    Image,
    PhotoType,
    Title,
    Description,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Photos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Photos::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Photos::UserId).integer().not_null())
                    // inline base64 or a URL locator
                    .col(ColumnDef::new(Photos::Image).text().not_null())
                    .col(ColumnDef::new(Photos::PhotoType).string().not_null())
                    .col(ColumnDef::new(Photos::Title).string().null())
                    .col(ColumnDef::new(Photos::Description).text().null())
                    .col(
                        ColumnDef::new(Photos::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_photos_user")
                            .from(Photos::Table, Photos::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_photos_user")
                    .table(Photos::Table)
                    .col(Photos::UserId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Photos::Table).to_owned())
            .await
    }
}
