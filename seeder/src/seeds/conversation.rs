use crate::seed::Seeder;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use db::insert_or_skip;
use db::models::conversation::{self, ChatRole, ChatTurn};
use db::models::user::{self, UserType};
use fake::Fake;
use fake::faker::lorem::en::{Paragraph, Sentence};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use sea_orm::ActiveValue::Set;
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};

const COMMIT_EVERY: u64 = 10;

/// Gives a sample of users an assistant-concierge thread.
pub struct ConversationSeeder {
    pub count: usize,
}

#[async_trait]
impl Seeder for ConversationSeeder {
    async fn seed(&self, db: &DatabaseConnection, rng: &mut StdRng) -> Result<u64, DbErr> {
        let user_ids = user::Model::ids_by_type(db, UserType::User).await?;
        if user_ids.is_empty() {
            println!("No users found. Skipping conversation generation.");
            return Ok(0);
        }

        let existing = conversation::Model::user_ids_with_conversation(db).await?;
        let available: Vec<i32> = user_ids
            .into_iter()
            .filter(|id| !existing.contains(id))
            .collect();
        let selected: Vec<i32> = available
            .choose_multiple(rng, self.count.min(available.len()))
            .copied()
            .collect();

        let now = Utc::now();
        let mut created = 0u64;
        let mut txn = db.begin().await?;
        for user_id in selected {
            let turn_count = rng.gen_range(3..=10);
            let mut turns = Vec::with_capacity(turn_count);
            for i in 0..turn_count {
                let (role, content): (ChatRole, String) = if i % 2 == 0 {
                    (ChatRole::User, Sentence(4..10).fake_with_rng(rng))
                } else {
                    (ChatRole::Assistant, Paragraph(1..3).fake_with_rng(rng))
                };
                let timestamp = now
                    - Duration::days(rng.gen_range(0..=14))
                    - Duration::hours(rng.gen_range(0..=23))
                    - Duration::minutes(rng.gen_range(0..=59));
                turns.push(ChatTurn {
                    role,
                    content,
                    timestamp,
                });
            }
            // Stored threads read in chronological order.
            turns.sort_by_key(|turn| turn.timestamp);

            let messages =
                serde_json::to_value(&turns).map_err(|err| DbErr::Custom(err.to_string()))?;
            let row = conversation::ActiveModel {
                user_id: Set(user_id),
                messages: Set(messages),
                last_updated: Set(now - Duration::days(rng.gen_range(0..=14))),
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

        Ok(created)
    }
}
