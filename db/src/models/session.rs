use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Represents a booked advisory session in the `sessions` table.
///
/// `start_time`/`end_time` describe the scheduled window; the `actual_*`
/// columns are tracked independently and only populated once a session
/// actually ran. `billed_amount` is `rate_per_minute * actual_duration`
/// and exists only for completed sessions.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub advisor_id: i32,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub session_type: SessionType,
    pub status: SessionStatus,
    pub notes: Option<String>,
    /// The per-minute rate applied for this session, in cents.
    pub rate_per_minute: i32,
    pub actual_start_time: Option<DateTime<Utc>>,
    pub actual_end_time: Option<DateTime<Utc>>,
    /// Actual length in minutes.
    pub actual_duration: Option<i32>,
    /// Total charge in cents; completed sessions only.
    pub billed_amount: Option<i32>,
    pub is_paid: bool,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SessionType {
    #[sea_orm(string_value = "chat")]
    Chat,

    #[sea_orm(string_value = "audio")]
    Audio,

    #[sea_orm(string_value = "video")]
    Video,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SessionStatus {
    #[sea_orm(string_value = "scheduled")]
    Scheduled,

    #[sea_orm(string_value = "in_progress")]
    InProgress,

    #[sea_orm(string_value = "completed")]
    Completed,

    #[sea_orm(string_value = "canceled")]
    Canceled,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AdvisorId",
        to = "super::user::Column::Id"
    )]
    Advisor,
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// All sessions that ran to completion, in no particular order.
    pub async fn find_completed<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::Status.eq(SessionStatus::Completed))
            .all(db)
            .await
    }
}
