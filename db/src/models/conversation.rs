use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QuerySelect};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A user's assistant-concierge thread, one row per user.
///
/// Turns are stored denormalized as a json array ordered by timestamp.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "conversations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub user_id: i32,
    pub messages: Json,
    pub last_updated: DateTime<Utc>,
}

/// One role-tagged turn inside the json `messages` column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Users that already have a thread.
    pub async fn user_ids_with_conversation<C: ConnectionTrait>(
        db: &C,
    ) -> Result<HashSet<i32>, DbErr> {
        let ids: Vec<i32> = Entity::find()
            .select_only()
            .column(Column::UserId)
            .into_tuple()
            .all(db)
            .await?;
        Ok(ids.into_iter().collect())
    }

    /// Deserializes the stored turns.
    pub fn turns(&self) -> Result<Vec<ChatTurn>, serde_json::Error> {
        serde_json::from_value(self.messages.clone())
    }
}
