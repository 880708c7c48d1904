use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{ConnectionTrait, QueryFilter, QuerySelect};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum::{Display, EnumString};

/// Represents an account in the `users` table.
///
/// Regular users, advisors and admins share the table; the advisor-only
/// columns (rates, ratings, earnings) are nullable.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Primary key ID (auto-incremented).
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Unique login name.
    #[sea_orm(unique)]
    pub username: String,
    pub password: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// Role tag: regular user, advisor or admin.
    pub user_type: UserType,
    pub is_advisor: bool,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    /// Specialty IDs as a json array; advisors only.
    pub specialties: Option<Json>,
    pub profile_completed: bool,
    /// Per-minute rate for chat sessions, in cents.
    pub chat_rate: Option<i32>,
    /// Per-minute rate for audio sessions, in cents.
    pub audio_rate: Option<i32>,
    /// Per-minute rate for video sessions, in cents.
    pub video_rate: Option<i32>,
    /// Aggregate review average in stars times ten (35 means 3.5 stars).
    pub rating: Option<i32>,
    pub review_count: Option<i32>,
    pub online: bool,
    /// Spendable balance for users, in cents.
    pub account_balance: i32,
    /// Withdrawable balance for advisors, in cents.
    pub earnings_balance: Option<i32>,
    /// Lifetime earnings for advisors, in cents.
    pub total_earnings: Option<i32>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum UserType {
    #[sea_orm(string_value = "user")]
    User,

    #[sea_orm(string_value = "advisor")]
    Advisor,

    #[sea_orm(string_value = "admin")]
    Admin,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// IDs of every account with the given role.
    pub async fn ids_by_type<C: ConnectionTrait>(
        db: &C,
        user_type: UserType,
    ) -> Result<Vec<i32>, DbErr> {
        Entity::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::UserType.eq(user_type))
            .into_tuple()
            .all(db)
            .await
    }

    /// Usernames already taken by accounts with the given role.
    pub async fn usernames_by_type<C: ConnectionTrait>(
        db: &C,
        user_type: UserType,
    ) -> Result<HashSet<String>, DbErr> {
        let names: Vec<String> = Entity::find()
            .select_only()
            .column(Column::Username)
            .filter(Column::UserType.eq(user_type))
            .into_tuple()
            .all(db)
            .await?;
        Ok(names.into_iter().collect())
    }

    /// Advisors that carry a rate for every session modality.
    pub async fn find_rated_advisors<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::UserType.eq(UserType::Advisor))
            .filter(Column::ChatRate.is_not_null())
            .filter(Column::AudioRate.is_not_null())
            .filter(Column::VideoRate.is_not_null())
            .all(db)
            .await
    }

    /// Adds `amount` cents to a user's spendable balance.
    pub async fn credit_balance<C: ConnectionTrait>(
        db: &C,
        user_id: i32,
        amount: i32,
    ) -> Result<(), DbErr> {
        Entity::update_many()
            .col_expr(
                Column::AccountBalance,
                Expr::col(Column::AccountBalance).add(amount),
            )
            .filter(Column::Id.eq(user_id))
            .exec(db)
            .await?;
        Ok(())
    }

    /// Writes the aggregated review figures onto an advisor row.
    pub async fn write_rating<C: ConnectionTrait>(
        db: &C,
        advisor_id: i32,
        rating: i32,
        review_count: i32,
    ) -> Result<(), DbErr> {
        Entity::update_many()
            .col_expr(Column::Rating, Expr::value(rating))
            .col_expr(Column::ReviewCount, Expr::value(review_count))
            .filter(Column::Id.eq(advisor_id))
            .exec(db)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{insert_test_user, setup_test_db};

    #[tokio::test]
    async fn credit_balance_accumulates() {
        let db = setup_test_db().await;
        let user = insert_test_user(&db, "user1", UserType::User).await;

        Model::credit_balance(&db, user.id, 1500).await.unwrap();
        Model::credit_balance(&db, user.id, 2500).await.unwrap();

        let reloaded = Entity::find_by_id(user.id).one(&db).await.unwrap().unwrap();
        assert_eq!(reloaded.account_balance, 4000);
    }

    #[tokio::test]
    async fn ids_by_type_filters_roles() {
        let db = setup_test_db().await;
        let user = insert_test_user(&db, "user1", UserType::User).await;
        let advisor = insert_test_user(&db, "advisor101", UserType::Advisor).await;

        let users = Model::ids_by_type(&db, UserType::User).await.unwrap();
        let advisors = Model::ids_by_type(&db, UserType::Advisor).await.unwrap();

        assert_eq!(users, vec![user.id]);
        assert_eq!(advisors, vec![advisor.id]);
    }

    #[tokio::test]
    async fn write_rating_targets_single_advisor() {
        let db = setup_test_db().await;
        let a = insert_test_user(&db, "advisor101", UserType::Advisor).await;
        let b = insert_test_user(&db, "advisor102", UserType::Advisor).await;

        Model::write_rating(&db, a.id, 42, 7).await.unwrap();

        let a = Entity::find_by_id(a.id).one(&db).await.unwrap().unwrap();
        let b = Entity::find_by_id(b.id).one(&db).await.unwrap().unwrap();
        assert_eq!((a.rating, a.review_count), (Some(42), Some(7)));
        assert_eq!((b.rating, b.review_count), (None, None));
    }
}
