use crate::seed::Seeder;
use async_trait::async_trait;
use db::insert_or_skip;
use db::models::user::{self, UserType};
use fake::Fake;
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use rand::rngs::StdRng;
use sea_orm::ActiveValue::Set;
use sea_orm::{DatabaseConnection, DbErr};

/// Creates the fixed `admin{N}` accounts.
pub struct AdminSeeder {
    pub count: usize,
}

#[async_trait]
impl Seeder for AdminSeeder {
    async fn seed(&self, db: &DatabaseConnection, rng: &mut StdRng) -> Result<u64, DbErr> {
        let existing = user::Model::usernames_by_type(db, UserType::Admin).await?;

        let mut created = 0u64;
        for i in 0..self.count {
            let username = format!("admin{}", i + 1);
            if existing.contains(&username) {
                continue;
            }

            let name: String = Name().fake_with_rng(rng);
            let phone: String = PhoneNumber().fake_with_rng(rng);
            let row = user::ActiveModel {
                username: Set(username),
                password: Set(format!("admin{}pass", i + 1)),
                name: Set(name),
                email: Set(format!("admin{}@angelguides.ai", i + 1)),
                phone: Set(Some(phone)),
                user_type: Set(UserType::Admin),
                is_advisor: Set(false),
                bio: Set(Some("Administrator account".to_owned())),
                profile_completed: Set(true),
                online: Set(false),
                account_balance: Set(0),
                ..Default::default()
            };

            if insert_or_skip(db, row).await?.is_some() {
                created += 1;
            }
        }

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::test_utils::setup_test_db;
    use rand::SeedableRng;

    #[tokio::test]
    async fn rerun_skips_existing_admins() {
        let db = setup_test_db().await;
        let mut rng = StdRng::seed_from_u64(3);

        let first = AdminSeeder { count: 2 }.seed(&db, &mut rng).await.unwrap();
        let second = AdminSeeder { count: 2 }.seed(&db, &mut rng).await.unwrap();

        assert_eq!(first, 2);
        assert_eq!(second, 0);

        let admins = user::Model::usernames_by_type(&db, UserType::Admin)
            .await
            .unwrap();
        assert_eq!(admins.len(), 2);
        assert!(admins.contains("admin1"));
        assert!(admins.contains("admin2"));
    }
}
