use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QuerySelect};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

use crate::models::user;

/// A review left for a completed session, one per session at most.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub advisor_id: i32,
    #[sea_orm(unique)]
    pub session_id: i32,
    /// Star rating, 1 to 5.
    pub rating: i32,
    pub content: Option<String>,
    pub created_at: DateTime<Utc>,
    pub response: Option<String>,
    pub response_date: Option<DateTime<Utc>>,
    pub is_hidden: bool,
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
    /// Session IDs that already carry a review.
    pub async fn reviewed_session_ids<C: ConnectionTrait>(
        db: &C,
    ) -> Result<HashSet<i32>, DbErr> {
        let ids: Vec<i32> = Entity::find()
            .select_only()
            .column(Column::SessionId)
            .into_tuple()
            .all(db)
            .await?;
        Ok(ids.into_iter().collect())
    }

    /// Recomputes every advisor's `rating` and `review_count` from their
    /// full review set and writes the figures back.
    ///
    /// The stored rating is the average in stars times ten, truncated to an
    /// integer. Advisors without reviews are left untouched. The pass is a
    /// full recomputation and is safe to re-run.
    pub async fn aggregate_advisor_ratings<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
        let reviews = Entity::find().all(db).await?;

        let mut per_advisor: BTreeMap<i32, (i64, i64)> = BTreeMap::new();
        for review in &reviews {
            let entry = per_advisor.entry(review.advisor_id).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += i64::from(review.rating);
        }

        let mut updated = 0u64;
        for (advisor_id, (count, star_sum)) in per_advisor {
            let rating = ((star_sum * 10) / count) as i32;
            user::Model::write_rating(db, advisor_id, rating, count as i32).await?;
            updated += 1;
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::{self, UserType};
    use crate::test_utils::{insert_test_review, insert_test_user, setup_test_db};

    #[tokio::test]
    async fn aggregation_truncates_average_times_ten() {
        let db = setup_test_db().await;
        let reviewer = insert_test_user(&db, "user1", UserType::User).await;
        let advisor = insert_test_user(&db, "advisor101", UserType::Advisor).await;

        // 3, 4, 4 stars: average 3.666..., stored as 36 rather than 37.
        insert_test_review(&db, &reviewer, &advisor, 3).await;
        insert_test_review(&db, &reviewer, &advisor, 4).await;
        insert_test_review(&db, &reviewer, &advisor, 4).await;

        let updated = Model::aggregate_advisor_ratings(&db).await.unwrap();
        assert_eq!(updated, 1);

        let advisor = user::Entity::find_by_id(advisor.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(advisor.rating, Some(36));
        assert_eq!(advisor.review_count, Some(3));
    }

    #[tokio::test]
    async fn aggregation_is_idempotent() {
        let db = setup_test_db().await;
        let reviewer = insert_test_user(&db, "user1", UserType::User).await;
        let advisor = insert_test_user(&db, "advisor101", UserType::Advisor).await;
        insert_test_review(&db, &reviewer, &advisor, 5).await;

        Model::aggregate_advisor_ratings(&db).await.unwrap();
        Model::aggregate_advisor_ratings(&db).await.unwrap();

        let advisor = user::Entity::find_by_id(advisor.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(advisor.rating, Some(50));
        assert_eq!(advisor.review_count, Some(1));
    }

    #[tokio::test]
    async fn untouched_advisors_keep_their_seeded_figures() {
        let db = setup_test_db().await;
        let reviewer = insert_test_user(&db, "user1", UserType::User).await;
        let reviewed = insert_test_user(&db, "advisor101", UserType::Advisor).await;
        let unreviewed = insert_test_user(&db, "advisor102", UserType::Advisor).await;
        user::Model::write_rating(&db, unreviewed.id, 44, 12)
            .await
            .unwrap();

        insert_test_review(&db, &reviewer, &reviewed, 4).await;
        Model::aggregate_advisor_ratings(&db).await.unwrap();

        let unreviewed = user::Entity::find_by_id(unreviewed.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(unreviewed.rating, Some(44));
        assert_eq!(unreviewed.review_count, Some(12));
    }
}
