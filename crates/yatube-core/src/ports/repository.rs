use async_trait::async_trait;

use crate::domain::{
    Comment, CommentEntry, Group, NewComment, NewFollow, NewGroup, NewPost, NewUser, Post,
    PostChanges, PostEntry, PostFilter, User,
};
use crate::error::RepoError;
use crate::pagination::{Page, PageRequest};

/// Generic repository trait shared by every entity.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

#[async_trait]
pub trait UserRepository: BaseRepository<User, i32> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Fails with `RepoError::Constraint` when the username is taken.
    async fn create(&self, user: NewUser) -> Result<User, RepoError>;
}

#[async_trait]
pub trait GroupRepository: BaseRepository<Group, i32> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError>;

    /// All groups ordered by title.
    async fn list(&self) -> Result<Vec<Group>, RepoError>;

    async fn create(&self, group: NewGroup) -> Result<Group, RepoError>;
}

#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Apply changes to an existing post, keeping its id and timestamp.
    async fn update(&self, id: i32, changes: PostChanges) -> Result<Post, RepoError>;

    /// A post with its author and group.
    async fn find_entry(&self, id: i32) -> Result<Option<PostEntry>, RepoError>;

    /// One page of a listing, newest first.
    async fn page(
        &self,
        filter: PostFilter,
        request: PageRequest,
    ) -> Result<Page<PostEntry>, RepoError>;

    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError>;
}

#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i32> {
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError>;

    /// Comments under a post, oldest first.
    async fn list_for_post(&self, post_id: i32) -> Result<Vec<CommentEntry>, RepoError>;
}

#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Create the edge unless it already exists. Returns `true` when created.
    async fn follow(&self, follow: NewFollow) -> Result<bool, RepoError>;

    /// Remove the edge. Returns `true` when an edge was removed.
    async fn unfollow(&self, user_id: i32, author_id: i32) -> Result<bool, RepoError>;

    async fn is_following(&self, user_id: i32, author_id: i32) -> Result<bool, RepoError>;

    /// Ids of the authors `user_id` follows.
    async fn following_ids(&self, user_id: i32) -> Result<Vec<i32>, RepoError>;
}
