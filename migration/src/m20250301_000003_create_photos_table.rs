use sea_orm_migration::prelude::*;

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
                    .col(ColumnDef::new(Photos::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Photos::Url).string().null())
                    .col(ColumnDef::new(Photos::Filename).string().null())
                    // Event reference, kept in whichever form it was written:
                    // raw text or native id. No foreign key on purpose.
                    .col(ColumnDef::new(Photos::EventId).string().null())
                    .col(ColumnDef::new(Photos::EventUuid).uuid().null())
                    .col(ColumnDef::new(Photos::UploadedAt).timestamp().not_null())
                    .col(ColumnDef::new(Photos::FaceEncodings).json().null())
                    .col(ColumnDef::new(Photos::UploadedBy).integer().null())
                    .col(ColumnDef::new(Photos::Description).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_photos_uploaded_by")
                            .from(Photos::Table, Photos::UploadedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_photos_uploaded_at")
                    .table(Photos::Table)
                    .col(Photos::UploadedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_photos_event_id")
                    .table(Photos::Table)
                    .col(Photos::EventId)
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

#[derive(DeriveIden)]
enum Photos {
    Table,
    Id,
    Url,
    Filename,
    EventId,
    EventUuid,
    UploadedAt,
    FaceEncodings,
    UploadedBy,
    Description,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
