use crate::seed::Seeder;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use db::models::message;
use db::models::user::{self, UserType};
use fake::Fake;
use fake::faker::lorem::en::Sentence;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, TransactionTrait};

const COMMIT_EVERY: u64 = 50;
const MAX_THREADS: usize = 30;

/// Fills user/advisor inboxes with alternating message threads.
pub struct MessageSeeder {
    pub count: usize,
}

#[async_trait]
impl Seeder for MessageSeeder {
    async fn seed(&self, db: &DatabaseConnection, rng: &mut StdRng) -> Result<u64, DbErr> {
        let user_ids = user::Model::ids_by_type(db, UserType::User).await?;
        let advisor_ids = user::Model::ids_by_type(db, UserType::Advisor).await?;
        if user_ids.is_empty() || advisor_ids.is_empty() {
            println!("No users or advisors found. Skipping message generation.");
            return Ok(0);
        }

        let pair_count = user_ids.len().min(advisor_ids.len()).min(MAX_THREADS);
        let mut pairs = Vec::with_capacity(pair_count);
        for _ in 0..pair_count {
            pairs.push((
                *user_ids.choose(rng).unwrap(),
                *advisor_ids.choose(rng).unwrap(),
            ));
        }

        let now = Utc::now();
        let requested = self.count as u64;
        let mut created = 0u64;
        let mut txn = db.begin().await?;
        for (user_id, advisor_id) in pairs {
            let remaining = requested - created;
            if remaining == 0 {
                break;
            }
            let thread_len = rng.gen_range(3u64..=20).min(remaining);

            for i in 0..thread_len {
                // Threads alternate, the user opening each one.
                let (sender_id, receiver_id, content): (i32, i32, String) = if i % 2 == 0 {
                    (user_id, advisor_id, Sentence(4..10).fake_with_rng(rng))
                } else {
                    (advisor_id, user_id, Sentence(6..14).fake_with_rng(rng))
                };

                let timestamp = now
                    - Duration::days(rng.gen_range(0..=7))
                    - Duration::hours(rng.gen_range(0..=23))
                    - Duration::minutes(rng.gen_range(0..=59));
                // Anything older than a day has been seen by now.
                let read = if timestamp < now - Duration::days(1) {
                    true
                } else {
                    rng.gen_bool(0.5)
                };

                let row = message::ActiveModel {
                    sender_id: Set(sender_id),
                    receiver_id: Set(receiver_id),
                    content: Set(content),
                    timestamp: Set(timestamp),
                    read: Set(read),
                    ..Default::default()
                };
                row.insert(&txn).await?;
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
