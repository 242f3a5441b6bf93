//! Initial migration to create the prmirror database schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        self.create_users(manager).await?;
        self.create_repositories(manager).await?;
        self.create_pull_requests(manager).await?;
        self.create_comments(manager).await?;
        self.create_review_comments(manager).await?;
        self.create_commits(manager).await?;
        self.create_events(manager).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Commits::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ReviewComments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Comments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PullRequests::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Repositories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

impl Migration {
    async fn create_users(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Login).string().not_null())
                    .col(ColumnDef::new(Users::Name).string().null())
                    .col(ColumnDef::new(Users::Email).string().null())
                    .col(ColumnDef::new(Users::AvatarUrl).text().null())
                    .col(ColumnDef::new(Users::Url).text().null())
                    .col(ColumnDef::new(Users::AccountType).string().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_login")
                    .table(Users::Table)
                    .col(Users::Login)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_repositories(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Repositories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Repositories::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Repositories::Owner).string().not_null())
                    .col(ColumnDef::new(Repositories::Name).string().not_null())
                    .col(ColumnDef::new(Repositories::DisplayName).string().null())
                    .col(ColumnDef::new(Repositories::Url).text().null())
                    .to_owned(),
            )
            .await?;

        // Unique constraint on the natural key (owner, name)
        manager
            .create_index(
                Index::create()
                    .name("idx_repositories_owner_name")
                    .table(Repositories::Table)
                    .col(Repositories::Owner)
                    .col(Repositories::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_pull_requests(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PullRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PullRequests::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PullRequests::GithubId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PullRequests::Number)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PullRequests::RepositoryId)
                            .uuid()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PullRequests::Title).string().null())
                    .col(ColumnDef::new(PullRequests::Body).text().null())
                    .col(ColumnDef::new(PullRequests::State).string().null())
                    .col(
                        ColumnDef::new(PullRequests::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PullRequests::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PullRequests::ClosedAt).date_time().null())
                    .col(ColumnDef::new(PullRequests::MergedAt).date_time().null())
                    .col(
                        ColumnDef::new(PullRequests::Merged)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(PullRequests::MergeableState).string().null())
                    .col(ColumnDef::new(PullRequests::MergeCommitSha).string().null())
                    .col(ColumnDef::new(PullRequests::Additions).integer().null())
                    .col(ColumnDef::new(PullRequests::Deletions).integer().null())
                    .col(ColumnDef::new(PullRequests::ChangedFiles).integer().null())
                    .col(ColumnDef::new(PullRequests::AuthorId).uuid().null())
                    .col(ColumnDef::new(PullRequests::AssigneeId).uuid().null())
                    .col(ColumnDef::new(PullRequests::MergedById).uuid().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pull_requests_repository")
                            .from(PullRequests::Table, PullRequests::RepositoryId)
                            .to(Repositories::Table, Repositories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pull_requests_author")
                            .from(PullRequests::Table, PullRequests::AuthorId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pull_requests_assignee")
                            .from(PullRequests::Table, PullRequests::AssigneeId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pull_requests_merged_by")
                            .from(PullRequests::Table, PullRequests::MergedById)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique constraint on the remote id
        manager
            .create_index(
                Index::create()
                    .name("idx_pull_requests_github_id")
                    .table(PullRequests::Table)
                    .col(PullRequests::GithubId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Composite index serving the since-cursor query
        manager
            .create_index(
                Index::create()
                    .name("idx_pull_requests_repo_updated")
                    .table(PullRequests::Table)
                    .col(PullRequests::RepositoryId)
                    .col(PullRequests::UpdatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_comments(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Comments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Comments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Comments::PullRequestId).uuid().not_null())
                    .col(ColumnDef::new(Comments::UserId).uuid().null())
                    .col(ColumnDef::new(Comments::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Comments::Body).text().null())
                    .col(ColumnDef::new(Comments::Url).text().null())
                    .col(ColumnDef::new(Comments::UpdatedAt).date_time().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_pull_request")
                            .from(Comments::Table, Comments::PullRequestId)
                            .to(PullRequests::Table, PullRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_comments_user")
                            .from(Comments::Table, Comments::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Composite natural key; the API exposes no stable comment id
        manager
            .create_index(
                Index::create()
                    .name("idx_comments_natural_key")
                    .table(Comments::Table)
                    .col(Comments::PullRequestId)
                    .col(Comments::UserId)
                    .col(Comments::CreatedAt)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_review_comments(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReviewComments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReviewComments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ReviewComments::PullRequestId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReviewComments::CommitSha)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReviewComments::UserId).uuid().null())
                    .col(
                        ColumnDef::new(ReviewComments::CreatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReviewComments::Body).text().null())
                    .col(ColumnDef::new(ReviewComments::Url).text().null())
                    .col(
                        ColumnDef::new(ReviewComments::UpdatedAt)
                            .date_time()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReviewComments::OriginalCommitSha)
                            .string()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_comments_pull_request")
                            .from(ReviewComments::Table, ReviewComments::PullRequestId)
                            .to(PullRequests::Table, PullRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_comments_user")
                            .from(ReviewComments::Table, ReviewComments::UserId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_review_comments_natural_key")
                    .table(ReviewComments::Table)
                    .col(ReviewComments::PullRequestId)
                    .col(ReviewComments::CommitSha)
                    .col(ReviewComments::UserId)
                    .col(ReviewComments::CreatedAt)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_commits(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Commits::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Commits::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Commits::PullRequestId).uuid().not_null())
                    .col(ColumnDef::new(Commits::Sha).string().not_null())
                    .col(ColumnDef::new(Commits::AuthorId).uuid().null())
                    .col(ColumnDef::new(Commits::CommitterId).uuid().null())
                    .col(ColumnDef::new(Commits::AuthorDate).date_time().null())
                    .col(ColumnDef::new(Commits::CommitDate).date_time().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_commits_pull_request")
                            .from(Commits::Table, Commits::PullRequestId)
                            .to(PullRequests::Table, PullRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_commits_author")
                            .from(Commits::Table, Commits::AuthorId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_commits_committer")
                            .from(Commits::Table, Commits::CommitterId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_commits_natural_key")
                    .table(Commits::Table)
                    .col(Commits::PullRequestId)
                    .col(Commits::Sha)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn create_events(&self, manager: &SchemaManager<'_>) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Events::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Events::GithubId).big_integer().not_null())
                    .col(ColumnDef::new(Events::PullRequestId).uuid().not_null())
                    .col(ColumnDef::new(Events::Kind).string().not_null())
                    .col(ColumnDef::new(Events::CreatedAt).date_time().not_null())
                    .col(ColumnDef::new(Events::CommitSha).string().null())
                    .col(ColumnDef::new(Events::ActorId).uuid().null())
                    .col(ColumnDef::new(Events::Extra).string().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_events_pull_request")
                            .from(Events::Table, Events::PullRequestId)
                            .to(PullRequests::Table, PullRequests::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_events_actor")
                            .from(Events::Table, Events::ActorId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_events_github_id")
                    .table(Events::Table)
                    .col(Events::GithubId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_events_pull_request")
                    .table(Events::Table)
                    .col(Events::PullRequestId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
#[sea_orm(iden = "users")]
enum Users {
    Table,
    Id,
    Login,
    Name,
    Email,
    AvatarUrl,
    Url,
    AccountType,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "repositories")]
enum Repositories {
    Table,
    Id,
    Owner,
    Name,
    DisplayName,
    Url,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "pull_requests")]
enum PullRequests {
    Table,
    Id,
    GithubId,
    Number,
    RepositoryId,
    Title,
    Body,
    State,
    CreatedAt,
    UpdatedAt,
    ClosedAt,
    MergedAt,
    Merged,
    MergeableState,
    MergeCommitSha,
    Additions,
    Deletions,
    ChangedFiles,
    AuthorId,
    AssigneeId,
    MergedById,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "comments")]
enum Comments {
    Table,
    Id,
    PullRequestId,
    UserId,
    CreatedAt,
    Body,
    Url,
    UpdatedAt,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "review_comments")]
enum ReviewComments {
    Table,
    Id,
    PullRequestId,
    CommitSha,
    UserId,
    CreatedAt,
    Body,
    Url,
    UpdatedAt,
    OriginalCommitSha,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "commits")]
enum Commits {
    Table,
    Id,
    PullRequestId,
    Sha,
    AuthorId,
    CommitterId,
    AuthorDate,
    CommitDate,
}

#[derive(DeriveIden)]
#[sea_orm(iden = "events")]
enum Events {
    Table,
    Id,
    GithubId,
    PullRequestId,
    Kind,
    CreatedAt,
    CommitSha,
    ActorId,
    Extra,
}
