use crate::seed::Seeder;
use async_trait::async_trait;
use db::insert_or_skip;
use db::models::user::{self, UserType};
use db::models::{advisor_specialty, specialty};
use fake::Fake;
use fake::faker::internet::en::FreeEmail;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use sea_orm::ActiveValue::Set;
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};

const COMMIT_EVERY: u64 = 5;

/// Creates `advisor{N}` accounts with rates, specialties and seeded
/// review figures.
pub struct AdvisorSeeder {
    pub count: usize,
}

#[async_trait]
impl Seeder for AdvisorSeeder {
    async fn seed(&self, db: &DatabaseConnection, rng: &mut StdRng) -> Result<u64, DbErr> {
        let existing = user::Model::usernames_by_type(db, UserType::Advisor).await?;
        let specialty_ids = specialty::Model::all_ids(db).await?;

        let mut created = 0u64;
        let mut txn = db.begin().await?;
        for i in 0..self.count {
            // Numbered after the user range so fixture logins stay recognizable.
            let username = format!("advisor{}", i + 101);
            if existing.contains(&username) {
                continue;
            }

            // Audio costs more than chat, video more than audio.
            let chat_rate: i32 = rng.gen_range(100..=500);
            let audio_rate = chat_rate + rng.gen_range(50..=150);
            let video_rate = audio_rate + rng.gen_range(100..=300);

            let picked = pick_specialties(&specialty_ids, rng);

            let row = user::ActiveModel {
                username: Set(username),
                password: Set(format!("password{}", i + 101)),
                name: Set(Name().fake_with_rng(rng)),
                email: Set(FreeEmail().fake_with_rng(rng)),
                phone: Set(Some(PhoneNumber().fake_with_rng(rng))),
                user_type: Set(UserType::Advisor),
                is_advisor: Set(true),
                bio: Set(Some(random_bio(rng))),
                specialties: Set(Some(serde_json::json!(picked))),
                profile_completed: Set(true),
                chat_rate: Set(Some(chat_rate)),
                audio_rate: Set(Some(audio_rate)),
                video_rate: Set(Some(video_rate)),
                rating: Set(Some(rng.gen_range(35..=50))),
                review_count: Set(Some(rng.gen_range(5..=100))),
                online: Set(rng.gen_bool(0.3)),
                account_balance: Set(0),
                earnings_balance: Set(Some(if rng.gen_bool(0.3) {
                    rng.gen_range(5_000..=50_000)
                } else {
                    0
                })),
                total_earnings: Set(Some(if rng.gen_bool(0.5) {
                    rng.gen_range(10_000..=100_000)
                } else {
                    0
                })),
                ..Default::default()
            };

            let Some(advisor) = insert_or_skip(&txn, row).await? else {
                continue;
            };

            for specialty_id in picked {
                let link = advisor_specialty::ActiveModel {
                    advisor_id: Set(advisor.id),
                    specialty_id: Set(specialty_id),
                    ..Default::default()
                };
                insert_or_skip(&txn, link).await?;
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

fn pick_specialties(ids: &[i32], rng: &mut StdRng) -> Vec<i32> {
    let want = rng.gen_range(2..=5).min(ids.len());
    ids.choose_multiple(rng, want).copied().collect()
}

fn random_bio(rng: &mut StdRng) -> String {
    const INTROS: [&str; 6] = [
        "I am a gifted spiritual advisor with over",
        "I've been practicing spiritual healing for",
        "With a natural talent for psychic readings and",
        "I discovered my spiritual gifts",
        "My journey into the spiritual realm began",
        "I have been blessed with the ability to connect with spirits for",
    ];
    const SKILLS: [&str; 12] = [
        "tarot readings",
        "energy healing",
        "aura cleansing",
        "spiritual guidance",
        "angel communication",
        "past life regression",
        "astral projection guidance",
        "chakra alignment",
        "crystal healing",
        "mediumship",
        "clairvoyance",
        "empathic healing",
    ];
    const PROMISES: [&str; 6] = [
        "I promise to guide you on your spiritual journey with compassion and wisdom.",
        "My goal is to help you find clarity and peace in your life.",
        "I'm here to connect you with your higher self and spiritual guides.",
        "Let me help you discover your true path and purpose.",
        "I can help you heal from past wounds and embrace your future.",
        "Together, we'll unlock the spiritual insights you've been seeking.",
    ];

    let years = rng.gen_range(3..=30);
    format!(
        "{} {} years. I specialize in {} and {}. {}",
        INTROS.choose(rng).unwrap(),
        years,
        SKILLS.choose(rng).unwrap(),
        SKILLS.choose(rng).unwrap(),
        PROMISES.choose(rng).unwrap()
    )
}
