//! Re-exports of entity types under stable aliases.

pub use super::comment::{
    ActiveModel as CommentActiveModel, Column as CommentColumn, Entity as Comment,
    Model as CommentModel,
};
pub use super::commit::{
    ActiveModel as CommitActiveModel, Column as CommitColumn, Entity as Commit,
    Model as CommitModel,
};
pub use super::event::{
    ActiveModel as EventActiveModel, Column as EventColumn, Entity as Event, Model as EventModel,
};
pub use super::pull_request::{
    ActiveModel as PullRequestActiveModel, Column as PullRequestColumn, Entity as PullRequest,
    Model as PullRequestModel,
};
pub use super::repository::{
    ActiveModel as RepositoryActiveModel, Column as RepositoryColumn, Entity as Repository,
    Model as RepositoryModel,
};
pub use super::review_comment::{
    ActiveModel as ReviewCommentActiveModel, Column as ReviewCommentColumn,
    Entity as ReviewComment, Model as ReviewCommentModel,
};
pub use super::user::{
    ActiveModel as UserActiveModel, Column as UserColumn, Entity as User, Model as UserModel,
};
