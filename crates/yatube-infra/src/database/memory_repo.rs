//! In-memory store - used when no database is configured, and in tests.
//!
//! Mirrors the relational constraints of the PostgreSQL schema: unique
//! usernames and slugs, one follow edge per pair, cascading deletes from
//! users and posts, and `SET NULL` when a group goes away.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use yatube_core::domain::{
    Comment, CommentEntry, Follow, Group, NewComment, NewFollow, NewGroup, NewPost, NewUser, Post,
    PostChanges, PostEntry, PostFilter, User,
};
use yatube_core::error::RepoError;
use yatube_core::pagination::{Page, PageRequest};
use yatube_core::ports::{
    BaseRepository, CommentRepository, FollowRepository, GroupRepository, PostRepository,
    UserRepository,
};

/// Rows of one table plus its id sequence. Ids are never reused.
struct Table<T> {
    rows: BTreeMap<i32, T>,
    last_id: i32,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T: Clone> Table<T> {
    fn insert_with(&mut self, build: impl FnOnce(i32) -> T) -> T {
        self.last_id += 1;
        let row = build(self.last_id);
        self.rows.insert(self.last_id, row.clone());
        row
    }
}

#[derive(Default)]
struct Tables {
    users: Table<User>,
    groups: Table<Group>,
    posts: Table<Post>,
    comments: Table<Comment>,
    follows: Table<Follow>,
}

impl Tables {
    fn matches(&self, post: &Post, filter: PostFilter) -> bool {
        match filter {
            PostFilter::All => true,
            PostFilter::Group(group_id) => post.group_id == Some(group_id),
            PostFilter::Author(author_id) => post.author_id == author_id,
            PostFilter::FollowedBy(user_id) => self
                .follows
                .rows
                .values()
                .any(|f| f.user_id == user_id && f.author_id == post.author_id),
        }
    }

    fn entry(&self, post: &Post) -> Result<PostEntry, RepoError> {
        let author = self
            .users
            .rows
            .get(&post.author_id)
            .ok_or_else(|| RepoError::Query(format!("post {} has no author", post.id)))?;
        let group = post
            .group_id
            .and_then(|id| self.groups.rows.get(&id))
            .cloned();

        Ok(PostEntry {
            post: post.clone(),
            author: author.into(),
            group,
        })
    }

    fn check_group(&self, group_id: Option<i32>) -> Result<(), RepoError> {
        match group_id {
            Some(id) if !self.groups.rows.contains_key(&id) => {
                Err(RepoError::Constraint(format!("group {id} does not exist")))
            }
            _ => Ok(()),
        }
    }

    fn delete_post(&mut self, id: i32) -> bool {
        if self.posts.rows.remove(&id).is_none() {
            return false;
        }
        self.comments.rows.retain(|_, c| c.post_id != id);
        true
    }

    fn delete_user(&mut self, id: i32) -> bool {
        if self.users.rows.remove(&id).is_none() {
            return false;
        }
        let posts: Vec<i32> = self
            .posts
            .rows
            .values()
            .filter(|p| p.author_id == id)
            .map(|p| p.id)
            .collect();
        for post_id in posts {
            self.delete_post(post_id);
        }
        self.comments.rows.retain(|_, c| c.author_id != id);
        self.follows
            .rows
            .retain(|_, f| f.user_id != id && f.author_id != id);
        true
    }

    fn delete_group(&mut self, id: i32) -> bool {
        if self.groups.rows.remove(&id).is_none() {
            return false;
        }
        for post in self.posts.rows.values_mut() {
            if post.group_id == Some(id) {
                post.group_id = None;
            }
        }
        true
    }
}

/// Shared in-memory implementation of every repository port.
///
/// Cloning is cheap; clones see the same data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn deleted(removed: bool) -> Result<(), RepoError> {
    if removed {
        Ok(())
    } else {
        Err(RepoError::NotFound)
    }
}

#[async_trait]
impl BaseRepository<User, i32> for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.rows.get(&id).cloned())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        deleted(self.tables.write().await.delete_user(id))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .rows
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create(&self, new_user: NewUser) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .rows
            .values()
            .any(|u| u.username == new_user.username)
        {
            return Err(RepoError::Constraint(format!(
                "username {} is taken",
                new_user.username
            )));
        }

        let user = tables.users.insert_with(|id| User {
            id,
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: Utc::now(),
        });
        tracing::info!(user_id = user.id, username = %user.username, "User created");
        Ok(user)
    }
}

#[async_trait]
impl BaseRepository<Group, i32> for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Group>, RepoError> {
        Ok(self.tables.read().await.groups.rows.get(&id).cloned())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        deleted(self.tables.write().await.delete_group(id))
    }
}

#[async_trait]
impl GroupRepository for InMemoryStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.groups.rows.values().find(|g| g.slug == slug).cloned())
    }

    async fn list(&self) -> Result<Vec<Group>, RepoError> {
        let tables = self.tables.read().await;
        let mut groups: Vec<Group> = tables.groups.rows.values().cloned().collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(groups)
    }

    async fn create(&self, new_group: NewGroup) -> Result<Group, RepoError> {
        let mut tables = self.tables.write().await;
        if tables
            .groups
            .rows
            .values()
            .any(|g| g.slug == new_group.slug)
        {
            return Err(RepoError::Constraint(format!(
                "slug {} is taken",
                new_group.slug
            )));
        }

        Ok(tables.groups.insert_with(|id| Group {
            id,
            title: new_group.title,
            slug: new_group.slug,
            description: new_group.description,
        }))
    }
}

#[async_trait]
impl BaseRepository<Post, i32> for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.rows.get(&id).cloned())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        deleted(self.tables.write().await.delete_post(id))
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.users.rows.contains_key(&new_post.author_id) {
            return Err(RepoError::Constraint(format!(
                "user {} does not exist",
                new_post.author_id
            )));
        }
        tables.check_group(new_post.group_id)?;

        let post = tables.posts.insert_with(|id| Post {
            id,
            author_id: new_post.author_id,
            group_id: new_post.group_id,
            text: new_post.text,
            image: new_post.image,
            created_at: Utc::now(),
        });
        tracing::info!(post_id = post.id, author_id = post.author_id, "Post created");
        Ok(post)
    }

    async fn update(&self, id: i32, changes: PostChanges) -> Result<Post, RepoError> {
        let mut tables = self.tables.write().await;
        tables.check_group(changes.group_id)?;

        let post = tables.posts.rows.get_mut(&id).ok_or(RepoError::NotFound)?;
        changes.apply(post);
        tracing::info!(post_id = id, "Post updated");
        Ok(post.clone())
    }

    async fn find_entry(&self, id: i32) -> Result<Option<PostEntry>, RepoError> {
        let tables = self.tables.read().await;
        tables.posts.rows.get(&id).map(|p| tables.entry(p)).transpose()
    }

    async fn page(
        &self,
        filter: PostFilter,
        request: PageRequest,
    ) -> Result<Page<PostEntry>, RepoError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<&Post> = tables
            .posts
            .rows
            .values()
            .filter(|p| tables.matches(p, filter))
            .collect();
        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let page = Page::from_ordered(posts, request);
        let items = page
            .items
            .iter()
            .map(|p| tables.entry(p))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(items, page.window))
    }

    async fn count(&self, filter: PostFilter) -> Result<u64, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .rows
            .values()
            .filter(|p| tables.matches(p, filter))
            .count() as u64)
    }
}

#[async_trait]
impl BaseRepository<Comment, i32> for InMemoryStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.rows.get(&id).cloned())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        deleted(self.tables.write().await.comments.rows.remove(&id).is_some())
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn create(&self, new_comment: NewComment) -> Result<Comment, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.posts.rows.contains_key(&new_comment.post_id) {
            return Err(RepoError::Constraint(format!(
                "post {} does not exist",
                new_comment.post_id
            )));
        }
        if !tables.users.rows.contains_key(&new_comment.author_id) {
            return Err(RepoError::Constraint(format!(
                "user {} does not exist",
                new_comment.author_id
            )));
        }

        let comment = tables.comments.insert_with(|id| Comment {
            id,
            post_id: new_comment.post_id,
            author_id: new_comment.author_id,
            text: new_comment.text,
            created_at: Utc::now(),
        });
        tracing::info!(comment_id = comment.id, post_id = comment.post_id, "Comment created");
        Ok(comment)
    }

    async fn list_for_post(&self, post_id: i32) -> Result<Vec<CommentEntry>, RepoError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<&Comment> = tables
            .comments
            .rows
            .values()
            .filter(|c| c.post_id == post_id)
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        comments
            .into_iter()
            .map(|comment| {
                let author = tables.users.rows.get(&comment.author_id).ok_or_else(|| {
                    RepoError::Query(format!("comment {} has no author", comment.id))
                })?;
                Ok(CommentEntry {
                    comment: comment.clone(),
                    author: author.into(),
                })
            })
            .collect()
    }
}

#[async_trait]
impl FollowRepository for InMemoryStore {
    async fn follow(&self, new_follow: NewFollow) -> Result<bool, RepoError> {
        let (user_id, author_id) = (new_follow.user_id(), new_follow.author_id());
        let mut tables = self.tables.write().await;

        for id in [user_id, author_id] {
            if !tables.users.rows.contains_key(&id) {
                return Err(RepoError::Constraint(format!("user {id} does not exist")));
            }
        }
        if tables
            .follows
            .rows
            .values()
            .any(|f| f.user_id == user_id && f.author_id == author_id)
        {
            return Ok(false);
        }

        tables.follows.insert_with(|id| Follow {
            id,
            user_id,
            author_id,
        });
        tracing::info!(user_id, author_id, "Follow created");
        Ok(true)
    }

    async fn unfollow(&self, user_id: i32, author_id: i32) -> Result<bool, RepoError> {
        let mut tables = self.tables.write().await;
        let before = tables.follows.rows.len();
        tables
            .follows
            .rows
            .retain(|_, f| !(f.user_id == user_id && f.author_id == author_id));
        Ok(tables.follows.rows.len() < before)
    }

    async fn is_following(&self, user_id: i32, author_id: i32) -> Result<bool, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .rows
            .values()
            .any(|f| f.user_id == user_id && f.author_id == author_id))
    }

    async fn following_ids(&self, user_id: i32) -> Result<Vec<i32>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .follows
            .rows
            .values()
            .filter(|f| f.user_id == user_id)
            .map(|f| f.author_id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn user(store: &InMemoryStore, name: &str) -> User {
        UserRepository::create(store, NewUser::new(name, "", "hash".to_string()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_username_is_a_constraint_error() {
        let store = InMemoryStore::new();
        user(&store, "leo").await;

        let err = UserRepository::create(&store, NewUser::new("leo", "", "x".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }

    #[tokio::test]
    async fn test_page_is_newest_first() {
        let store = InMemoryStore::new();
        let author = user(&store, "leo").await;
        for i in 0..13 {
            PostRepository::create(&store, NewPost::new(author.id, format!("post {i}")))
                .await
                .unwrap();
        }

        let first = store
            .page(PostFilter::All, PageRequest::first(10))
            .await
            .unwrap();
        assert_eq!(first.len(), 10);
        assert_eq!(first.items[0].post.text, "post 12");
        assert_eq!(first.items[0].author.username, "leo");

        let last = store
            .page(PostFilter::Author(author.id), PageRequest::number(99, 10))
            .await
            .unwrap();
        assert_eq!(last.number(), 2);
        assert_eq!(last.len(), 3);
        assert_eq!(last.items[2].post.text, "post 0");
    }

    #[tokio::test]
    async fn test_followed_filter_and_unique_edges() {
        let store = InMemoryStore::new();
        let reader = user(&store, "reader").await;
        let author = user(&store, "author").await;
        let other = user(&store, "other").await;
        PostRepository::create(&store, NewPost::new(author.id, "followed"))
            .await
            .unwrap();
        PostRepository::create(&store, NewPost::new(other.id, "not followed"))
            .await
            .unwrap();

        let edge = NewFollow::new(reader.id, author.id).unwrap();
        assert!(store.follow(edge).await.unwrap());
        assert!(!store.follow(edge).await.unwrap());
        assert_eq!(store.following_ids(reader.id).await.unwrap(), vec![author.id]);

        let feed = store
            .page(PostFilter::FollowedBy(reader.id), PageRequest::first(10))
            .await
            .unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed.items[0].post.text, "followed");

        assert!(store.unfollow(reader.id, author.id).await.unwrap());
        assert!(!store.unfollow(reader.id, author.id).await.unwrap());
        assert_eq!(
            store.count(PostFilter::FollowedBy(reader.id)).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn test_deleting_group_detaches_posts() {
        let store = InMemoryStore::new();
        let author = user(&store, "leo").await;
        let group = GroupRepository::create(&store, NewGroup::new("Cats", "cats", ""))
            .await
            .unwrap();
        let post = PostRepository::create(&store, NewPost::new(author.id, "hi").in_group(group.id))
            .await
            .unwrap();

        BaseRepository::<Group, i32>::delete(&store, group.id)
            .await
            .unwrap();

        let entry = store.find_entry(post.id).await.unwrap().unwrap();
        assert_eq!(entry.post.group_id, None);
        assert!(entry.group.is_none());
    }

    #[tokio::test]
    async fn test_deleting_post_removes_comments() {
        let store = InMemoryStore::new();
        let author = user(&store, "leo").await;
        let post = PostRepository::create(&store, NewPost::new(author.id, "hi"))
            .await
            .unwrap();
        CommentRepository::create(
            &store,
            NewComment {
                post_id: post.id,
                author_id: author.id,
                text: "nice".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(store.list_for_post(post.id).await.unwrap().len(), 1);

        BaseRepository::<Post, i32>::delete(&store, post.id)
            .await
            .unwrap();
        assert!(store.list_for_post(post.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_rejects_unknown_group() {
        let store = InMemoryStore::new();
        let author = user(&store, "leo").await;
        let post = PostRepository::create(&store, NewPost::new(author.id, "hi"))
            .await
            .unwrap();

        let err = store
            .update(
                post.id,
                PostChanges {
                    text: "edited".to_string(),
                    group_id: Some(42),
                    image: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Constraint(_)));
    }
}
