use crate::seed::Seeder;
use async_trait::async_trait;
use db::insert_or_skip;
use db::models::user::{self, UserType};
use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use rand::Rng;
use rand::rngs::StdRng;
use sea_orm::ActiveValue::Set;
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};

const COMMIT_EVERY: u64 = 10;

/// Creates `user{N}` accounts with known fixture passwords.
pub struct UserSeeder {
    pub count: usize,
}

#[async_trait]
impl Seeder for UserSeeder {
    async fn seed(&self, db: &DatabaseConnection, rng: &mut StdRng) -> Result<u64, DbErr> {
        let existing = user::Model::usernames_by_type(db, UserType::User).await?;

        let mut created = 0u64;
        let mut txn = db.begin().await?;
        for i in 0..self.count {
            let username = format!("user{}", i + 1);
            if existing.contains(&username) {
                continue;
            }

            let name: String = Name().fake_with_rng(rng);
            let email: String = SafeEmail().fake_with_rng(rng);
            let phone: String = PhoneNumber().fake_with_rng(rng);
            // Most accounts start without funds.
            let account_balance = if rng.gen_bool(0.3) {
                rng.gen_range(0..=10_000)
            } else {
                0
            };

            let row = user::ActiveModel {
                username: Set(username),
                password: Set(format!("password{}", i + 1)),
                name: Set(name),
                email: Set(email),
                phone: Set(Some(phone)),
                user_type: Set(UserType::User),
                is_advisor: Set(false),
                bio: Set(Some("Regular user account".to_owned())),
                profile_completed: Set(true),
                online: Set(false),
                account_balance: Set(account_balance),
                ..Default::default()
            };

            if insert_or_skip(&txn, row).await?.is_none() {
                continue;
            }
            created += 1;

            // Commit in batches to bound transaction size.
            if created % COMMIT_EVERY == 0 {
                txn.commit().await?;
                txn = db.begin().await?;
            }
        }
        txn.commit().await?;

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::test_utils::setup_test_db;
    use rand::SeedableRng;
    use sea_orm::EntityTrait;

    #[tokio::test]
    async fn rerun_skips_existing_usernames() {
        let db = setup_test_db().await;
        let mut rng = StdRng::seed_from_u64(2);

        let first = UserSeeder { count: 10 }.seed(&db, &mut rng).await.unwrap();
        let second = UserSeeder { count: 10 }.seed(&db, &mut rng).await.unwrap();

        assert_eq!(first, 10);
        assert_eq!(second, 0);

        let users = user::Entity::find().all(&db).await.unwrap();
        assert_eq!(users.len(), 10);
        for user in &users {
            assert_eq!(user.user_type, UserType::User);
            assert!(!user.is_advisor);
            assert!(user.username.starts_with("user"));
        }
    }
}
