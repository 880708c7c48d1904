use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A typed ledger entry in the `transactions` table.
///
/// Amounts are signed cents from the user's point of view: session
/// payments are negative, topups positive.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_name = "type")]
    pub kind: TransactionType,
    pub user_id: i32,
    pub advisor_id: Option<i32>,
    pub session_id: Option<i32>,
    pub amount: i32,
    pub description: String,
    pub timestamp: DateTime<Utc>,
    pub payment_status: String,
    /// External payment reference; unique where present.
    #[sea_orm(unique)]
    pub payment_reference: Option<String>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TransactionType {
    #[sea_orm(string_value = "session_payment")]
    SessionPayment,

    #[sea_orm(string_value = "advisor_payout")]
    AdvisorPayout,

    #[sea_orm(string_value = "user_topup")]
    UserTopup,
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
        belongs_to = "super::session::Entity",
        from = "Column::SessionId",
        to = "super::session::Column::Id"
    )]
    Session,
}

impl Related<super::session::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// All ledger entries of one type.
    pub async fn find_by_kind<C: ConnectionTrait>(
        db: &C,
        kind: TransactionType,
    ) -> Result<Vec<Model>, DbErr> {
        Entity::find().filter(Column::Kind.eq(kind)).all(db).await
    }
}
