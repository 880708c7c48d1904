use crate::seed::Seeder;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use db::insert_or_skip;
use db::models::transaction::{self, TransactionType};
use db::models::user::{self, UserType};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use sea_orm::ActiveValue::Set;
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};

const COMMIT_EVERY: u64 = 10;

/// Gives a sample of users 1-3 balance topups each, crediting the same
/// amount onto their account balance.
pub struct TopupSeeder {
    pub count: usize,
}

#[async_trait]
impl Seeder for TopupSeeder {
    async fn seed(&self, db: &DatabaseConnection, rng: &mut StdRng) -> Result<u64, DbErr> {
        let user_ids = user::Model::ids_by_type(db, UserType::User).await?;
        if user_ids.is_empty() {
            println!("No users found. Skipping topup generation.");
            return Ok(0);
        }

        let selected: Vec<i32> = user_ids
            .choose_multiple(rng, self.count.min(user_ids.len()))
            .copied()
            .collect();

        let now = Utc::now();
        let mut created = 0u64;
        let mut txn = db.begin().await?;
        for user_id in selected {
            for _ in 0..rng.gen_range(1..=3) {
                let amount: i32 = rng.gen_range(1_000..=20_000);
                let row = transaction::ActiveModel {
                    kind: Set(TransactionType::UserTopup),
                    user_id: Set(user_id),
                    amount: Set(amount),
                    description: Set("Account balance topup".to_owned()),
                    timestamp: Set(now - Duration::days(rng.gen_range(0..=60))),
                    payment_status: Set("completed".to_owned()),
                    payment_reference: Set(Some(payment_reference(rng))),
                    ..Default::default()
                };

                // The balance only moves when the ledger row actually landed.
                if insert_or_skip(&txn, row).await?.is_none() {
                    continue;
                }
                user::Model::credit_balance(&txn, user_id, amount).await?;
                created += 1;

                if created % COMMIT_EVERY == 0 {
                    txn.commit().await?;
                    txn = db.begin().await?;
                }
            }
        }
        txn.commit().await?;

        Ok(created)
    }
}

/// Unique reference in the acquirer's `top_` namespace, drawn from the
/// run's random source so seeded runs stay reproducible.
fn payment_reference(rng: &mut StdRng) -> String {
    let mut bytes = [0u8; 16];
    rng.fill(&mut bytes);
    format!("top_{}", uuid::Builder::from_random_bytes(bytes).into_uuid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::test_utils::{insert_test_user, setup_test_db};
    use rand::SeedableRng;
    use sea_orm::EntityTrait;
    use std::collections::HashMap;

    #[tokio::test]
    async fn topup_sums_equal_the_balance_delta() {
        let db = setup_test_db().await;
        for i in 1..=6 {
            insert_test_user(&db, &format!("user{i}"), UserType::User).await;
        }
        let before: HashMap<i32, i32> = user::Entity::find()
            .all(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|u| (u.id, u.account_balance))
            .collect();

        let mut rng = StdRng::seed_from_u64(14);
        let created = TopupSeeder { count: 4 }.seed(&db, &mut rng).await.unwrap();
        assert!(created >= 4);

        let topups = transaction::Model::find_by_kind(&db, TransactionType::UserTopup)
            .await
            .unwrap();
        assert_eq!(topups.len() as u64, created);

        let mut per_user: HashMap<i32, i32> = HashMap::new();
        for topup in &topups {
            assert!((1_000..=20_000).contains(&topup.amount));
            let reference = topup.payment_reference.as_deref().unwrap();
            assert!(reference.starts_with("top_"));
            *per_user.entry(topup.user_id).or_default() += topup.amount;
        }
        assert!((1..=4).contains(&per_user.len()));

        for user in user::Entity::find().all(&db).await.unwrap() {
            let delta = user.account_balance - before[&user.id];
            assert_eq!(delta, per_user.get(&user.id).copied().unwrap_or(0));
        }
    }

    #[tokio::test]
    async fn references_are_unique_per_run() {
        let db = setup_test_db().await;
        for i in 1..=5 {
            insert_test_user(&db, &format!("user{i}"), UserType::User).await;
        }

        let mut rng = StdRng::seed_from_u64(15);
        TopupSeeder { count: 5 }.seed(&db, &mut rng).await.unwrap();

        let topups = transaction::Model::find_by_kind(&db, TransactionType::UserTopup)
            .await
            .unwrap();
        let mut references: Vec<_> = topups
            .iter()
            .map(|t| t.payment_reference.clone().unwrap())
            .collect();
        let total = references.len();
        references.sort();
        references.dedup();
        assert_eq!(references.len(), total);
    }
}
