//! Follow entity for SeaORM.
//!
//! Both columns reference `users`; `(user_id, author_id)` is unique and the
//! two ids must differ (enforced by the migration).

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use yatube_core::domain::{Follow, NewFollow};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "follows")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub author_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Follow {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            author_id: model.author_id,
        }
    }
}

impl From<NewFollow> for ActiveModel {
    fn from(follow: NewFollow) -> Self {
        Self {
            user_id: Set(follow.user_id()),
            author_id: Set(follow.author_id()),
            ..Default::default()
        }
    }
}
