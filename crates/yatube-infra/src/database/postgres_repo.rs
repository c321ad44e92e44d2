//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};

use yatube_core::domain::{
    Comment, CommentEntry, Group, NewComment, NewFollow, NewGroup, NewPost, NewUser, Post,
    PostChanges, PostEntry, PostFilter, User,
};
use yatube_core::error::RepoError;
use yatube_core::pagination::{Page, PageRequest};
use yatube_core::ports::{
    CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository,
};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::follow::{self, Entity as FollowEntity};
use super::entity::group::{self, Entity as GroupEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL group repository.
pub type PostgresGroupRepository = PostgresBaseRepository<GroupEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL follow repository.
pub type PostgresFollowRepository = PostgresBaseRepository<FollowEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(username = %username, "Finding user by username");

        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn create(&self, new_user: NewUser) -> Result<User, RepoError> {
        let active: user::ActiveModel = new_user.into();
        let model = active.insert(&self.db).await.map_err(map_db_err)?;

        tracing::info!(user_id = model.id, username = %model.username, "User created");
        Ok(model.into())
    }
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let result = GroupEntity::find()
            .filter(group::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<Group>, RepoError> {
        let result = GroupEntity::find()
            .order_by_asc(group::Column::Title)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, new_group: NewGroup) -> Result<Group, RepoError> {
        let active: group::ActiveModel = new_group.into();
        let model = active.insert(&self.db).await.map_err(map_db_err)?;

        Ok(model.into())
    }
}

impl PostgresPostRepository {
    fn filtered(filter: PostFilter) -> Select<PostEntity> {
        let query = PostEntity::find();
        match filter {
            PostFilter::All => query,
            PostFilter::Group(group_id) => query.filter(post::Column::GroupId.eq(group_id)),
            PostFilter::Author(author_id) => query.filter(post::Column::AuthorId.eq(author_id)),
            PostFilter::FollowedBy(user_id) => query.filter(
                post::Column::AuthorId.in_subquery(
                    Query::select()
                        .column(follow::Column::AuthorId)
                        .from(FollowEntity)
                        .and_where(follow::Column::UserId.eq(user_id))
                        .to_owned(),
                ),
            ),
        }
    }

    /// Attach groups to posts loaded together with their authors.
    async fn entries(
        &self,
        rows: Vec<(post::Model, Option<user::Model>)>,
    ) -> Result<Vec<PostEntry>, RepoError> {
        let group_ids: Vec<i32> = rows.iter().filter_map(|(post, _)| post.group_id).collect();

        let groups: HashMap<i32, Group> = if group_ids.is_empty() {
            HashMap::new()
        } else {
            GroupEntity::find()
                .filter(group::Column::Id.is_in(group_ids))
                .all(&self.db)
                .await
                .map_err(map_db_err)?
                .into_iter()
                .map(|model| (model.id, Group::from(model)))
                .collect()
        };

        rows.into_iter()
            .map(|(post, author)| {
                let author = author
                    .ok_or_else(|| RepoError::Query(format!("post {} has no author", post.id)))?;
                let group = post.group_id.and_then(|id| groups.get(&id).cloned());
                Ok(PostEntry {
                    post: post.into(),
                    author: author.into(),
                    group,
                })
            })
            .collect()
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let active: post::ActiveModel = new_post.into();
        let model = active.insert(&self.db).await.map_err(map_db_err)?;

        tracing::info!(post_id = model.id, author_id = model.author_id, "Post created");
        Ok(model.into())
    }

    async fn update(&self, id: i32, changes: PostChanges) -> Result<Post, RepoError> {
        let model = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .ok_or(RepoError::NotFound)?;

        let mut active = model.into_active_model();
        active.text = Set(changes.text);
        active.group_id = Set(changes.group_id);
        active.image = Set(changes.image);
        let model = active.update(&self.db).await.map_err(map_db_err)?;

        tracing::info!(post_id = model.id, "Post updated");
        Ok(model.into())
    }

    async fn find_entry(&self, id: i32) -> Result<Option<PostEntry>, RepoError> {
        let row = PostEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        match row {
            Some(row) => Ok(self.entries(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn page(
        &self,
        filter: PostFilter,
        request: PageRequest,
    ) -> Result<Page<PostEntry>, RepoError> {
        let total = self.count(filter).await?;
        let window = request.window(total);

        tracing::debug!(?filter, page = window.number, total, "Loading post page");

        let rows = Self::filtered(filter)
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .offset(window.offset())
            .limit(window.limit())
            .find_also_related(UserEntity)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(Page::new(self.entries(rows).await?, window))
    }

    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError> {
        Self::filtered(filter)
            .count(&self.db)
            .await
            .map_err(map_db_err)
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn create(&self, new_comment: NewComment) -> Result<Comment, RepoError> {
        let active: comment::ActiveModel = new_comment.into();
        let model = active.insert(&self.db).await.map_err(map_db_err)?;

        tracing::info!(comment_id = model.id, post_id = model.post_id, "Comment created");
        Ok(model.into())
    }

    async fn list_for_post(&self, post_id: i32) -> Result<Vec<CommentEntry>, RepoError> {
        let rows = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .find_also_related(UserEntity)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        rows.into_iter()
            .map(|(comment, author)| {
                let author = author.ok_or_else(|| {
                    RepoError::Query(format!("comment {} has no author", comment.id))
                })?;
                Ok(CommentEntry {
                    comment: comment.into(),
                    author: author.into(),
                })
            })
            .collect()
    }
}

#[async_trait]
impl FollowRepository for PostgresFollowRepository {
    async fn follow(&self, new_follow: NewFollow) -> Result<bool, RepoError> {
        if self
            .is_following(new_follow.user_id(), new_follow.author_id())
            .await?
        {
            return Ok(false);
        }

        let active: follow::ActiveModel = new_follow.into();
        match active.insert(&self.db).await.map_err(map_db_err) {
            Ok(model) => {
                tracing::info!(
                    user_id = model.user_id,
                    author_id = model.author_id,
                    "Follow created"
                );
                Ok(true)
            }
            // Lost a race against a concurrent follow of the same pair.
            Err(RepoError::Constraint(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn unfollow(&self, user_id: i32, author_id: i32) -> Result<bool, RepoError> {
        let result = FollowEntity::delete_many()
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn is_following(&self, user_id: i32, author_id: i32) -> Result<bool, RepoError> {
        let count = FollowEntity::find()
            .filter(follow::Column::UserId.eq(user_id))
            .filter(follow::Column::AuthorId.eq(author_id))
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(count > 0)
    }

    async fn following_ids(&self, user_id: i32) -> Result<Vec<i32>, RepoError> {
        FollowEntity::find()
            .select_only()
            .column(follow::Column::AuthorId)
            .filter(follow::Column::UserId.eq(user_id))
            .into_tuple::<i32>()
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }
}
