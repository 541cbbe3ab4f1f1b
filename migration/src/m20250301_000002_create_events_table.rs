use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Events::Id).uuid().not_null().primary_key())
                    // String identifier carried over from the historical document store
                    .col(ColumnDef::new(Events::LegacyId).string().null().unique_key())
                    .col(ColumnDef::new(Events::Title).string().null())
                    .col(ColumnDef::new(Events::Name).string().null())
                    .col(ColumnDef::new(Events::Description).text().null())
                    .col(ColumnDef::new(Events::Date).timestamp().not_null())
                    .col(ColumnDef::new(Events::Location).string().null())
                    .col(ColumnDef::new(Events::PhotographerEmail).string().null())
                    .col(ColumnDef::new(Events::CoverImageUrl).string().null())
                    .col(
                        ColumnDef::new(Events::Status)
                            .string()
                            .not_null()
                            .default("UPCOMING"),
                    )
                    .col(ColumnDef::new(Events::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Events::UpdatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_events_date")
                    .table(Events::Table)
                    .col(Events::Date)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    LegacyId,
    Title,
    Name,
    Description,
    Date,
    Location,
    PhotographerEmail,
    CoverImageUrl,
    Status,
    CreatedAt,
    UpdatedAt,
}
