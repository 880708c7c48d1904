use crate::seed::Seeder;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use db::insert_or_skip;
use db::models::review;
use db::models::session;
use fake::Fake;
use fake::faker::lorem::en::Paragraph;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use sea_orm::ActiveValue::Set;
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};

const COMMIT_EVERY: u64 = 20;

/// Star ratings 3 to 5, weighted toward the top.
const RATING_WEIGHTS: [(i32, u32); 3] = [(3, 1), (4, 3), (5, 6)];

/// Reviews a share of the completed sessions, then recomputes every
/// advisor's aggregate rating figures.
pub struct ReviewSeeder;

#[async_trait]
impl Seeder for ReviewSeeder {
    async fn seed(&self, db: &DatabaseConnection, rng: &mut StdRng) -> Result<u64, DbErr> {
        let completed = session::Model::find_completed(db).await?;
        if completed.is_empty() {
            println!("No completed sessions found. Skipping review generation.");
            return Ok(0);
        }
        let reviewed = review::Model::reviewed_session_ids(db).await?;

        let now = Utc::now();
        let mut created = 0u64;
        let mut txn = db.begin().await?;
        for session in completed {
            if reviewed.contains(&session.id) {
                continue;
            }
            if !rng.gen_bool(0.7) {
                continue;
            }

            let rating = RATING_WEIGHTS
                .choose_weighted(rng, |(_, weight)| *weight)
                .unwrap()
                .0;
            // Happier customers write more.
            let content: Option<String> = rng
                .gen_bool(0.4 + 0.1 * f64::from(rating))
                .then(|| Paragraph(2..5).fake_with_rng(rng));
            let response: Option<String> =
                rng.gen_bool(0.4).then(|| Paragraph(1..3).fake_with_rng(rng));
            let response_date = response
                .as_ref()
                .map(|_| now - Duration::days(rng.gen_range(0..=10)));

            let row = review::ActiveModel {
                user_id: Set(session.user_id),
                advisor_id: Set(session.advisor_id),
                session_id: Set(session.id),
                rating: Set(rating),
                content: Set(content),
                created_at: Set(now - Duration::days(rng.gen_range(0..=30))),
                response: Set(response),
                response_date: Set(response_date),
                is_hidden: Set(rng.gen_bool(0.05)),
                ..Default::default()
            };

            if insert_or_skip(&txn, row).await?.is_none() {
                continue;
            }
            created += 1;

            if created % COMMIT_EVERY == 0 {
                txn.commit().await?;
                txn = db.begin().await?;
            }
        }
        txn.commit().await?;

        if created > 0 {
            review::Model::aggregate_advisor_ratings(db).await?;
        }

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seeds::session::SessionSeeder;
    use db::models::user::{self, UserType};
    use db::test_utils::{insert_test_user, setup_test_db};
    use rand::SeedableRng;
    use sea_orm::EntityTrait;
    use std::collections::{HashMap, HashSet};

    async fn db_with_sessions(seed: u64) -> (DatabaseConnection, StdRng) {
        let db = setup_test_db().await;
        for i in 1..=5 {
            insert_test_user(&db, &format!("user{i}"), UserType::User).await;
        }
        for i in 101..=103 {
            insert_test_user(&db, &format!("advisor{i}"), UserType::Advisor).await;
        }
        let mut rng = StdRng::seed_from_u64(seed);
        SessionSeeder { count: 50 }.seed(&db, &mut rng).await.unwrap();
        (db, rng)
    }

    #[tokio::test]
    async fn reviews_only_completed_sessions_once() {
        let (db, mut rng) = db_with_sessions(11).await;

        let created = ReviewSeeder.seed(&db, &mut rng).await.unwrap();
        assert!(created > 0);

        let completed_ids: HashSet<i32> = session::Model::find_completed(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        let reviews = review::Entity::find().all(&db).await.unwrap();

        let mut seen = HashSet::new();
        for review in &reviews {
            assert!(completed_ids.contains(&review.session_id));
            assert!((3..=5).contains(&review.rating));
            assert!(seen.insert(review.session_id), "one review per session");
            assert_eq!(review.response.is_some(), review.response_date.is_some());
        }

        // A second pass only reviews sessions missed the first time.
        let before = reviews.len();
        ReviewSeeder.seed(&db, &mut rng).await.ok();
        let after = review::Entity::find().all(&db).await.unwrap().len();
        assert!(after >= before);
        assert!(after <= completed_ids.len());
    }

    #[tokio::test]
    async fn aggregation_matches_review_set() {
        let (db, mut rng) = db_with_sessions(12).await;
        ReviewSeeder.seed(&db, &mut rng).await.unwrap();

        let reviews = review::Entity::find().all(&db).await.unwrap();
        assert!(!reviews.is_empty());

        let mut expected: HashMap<i32, (i32, i64)> = HashMap::new();
        for review in &reviews {
            let entry = expected.entry(review.advisor_id).or_insert((0, 0));
            entry.0 += 1;
            entry.1 += i64::from(review.rating);
        }

        for (advisor_id, (count, star_sum)) in expected {
            let advisor = user::Entity::find_by_id(advisor_id)
                .one(&db)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(advisor.review_count, Some(count));
            assert_eq!(advisor.rating, Some(((star_sum * 10) / i64::from(count)) as i32));
        }
    }
}
