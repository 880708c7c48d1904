use crate::seed::Seeder;
use async_trait::async_trait;
use db::models::specialty::{self, SpecialtyCategory};
use rand::rngs::StdRng;
use sea_orm::ActiveValue::Set;
use sea_orm::{DatabaseConnection, DbErr, EntityTrait};

/// The fixed catalogue of specialties offered on the marketplace.
const CATALOGUE: [(&str, &str, SpecialtyCategory); 20] = [
    ("Tarot Reading", "tarot", SpecialtyCategory::Divination),
    ("Palm Reading", "palm", SpecialtyCategory::Divination),
    ("Astrology", "stars", SpecialtyCategory::Astrology),
    ("Energy Healing", "energy", SpecialtyCategory::Healing),
    ("Chakra Alignment", "chakra", SpecialtyCategory::EnergyWork),
    ("Spirit Communication", "spirit", SpecialtyCategory::Mediumship),
    ("Angel Guidance", "angel", SpecialtyCategory::SpiritualGuidance),
    ("Dream Interpretation", "dream", SpecialtyCategory::DreamInterpretation),
    ("Past Life Reading", "pastlife", SpecialtyCategory::PastLives),
    ("Numerology", "numbers", SpecialtyCategory::Divination),
    ("Crystal Healing", "crystal", SpecialtyCategory::Healing),
    ("Aura Reading", "aura", SpecialtyCategory::EnergyWork),
    ("Spiritual Counseling", "counsel", SpecialtyCategory::SpiritualGuidance),
    ("Reiki", "reiki", SpecialtyCategory::Healing),
    ("Channeling", "channel", SpecialtyCategory::Channeling),
    ("Mediumship", "medium", SpecialtyCategory::Mediumship),
    ("Natal Chart Reading", "natalchart", SpecialtyCategory::Astrology),
    ("Shamanic Healing", "shamanic", SpecialtyCategory::Healing),
    ("Akashic Records", "akashic", SpecialtyCategory::PastLives),
    ("Sound Healing", "sound", SpecialtyCategory::Healing),
];

pub struct SpecialtySeeder;

#[async_trait]
impl Seeder for SpecialtySeeder {
    async fn seed(&self, db: &DatabaseConnection, _rng: &mut StdRng) -> Result<u64, DbErr> {
        let existing = specialty::Model::existing_names(db).await?;

        let missing: Vec<specialty::ActiveModel> = CATALOGUE
            .iter()
            .filter(|(name, _, _)| !existing.contains(*name))
            .map(|(name, icon, category)| specialty::ActiveModel {
                name: Set((*name).to_owned()),
                icon: Set((*icon).to_owned()),
                category: Set(*category),
                ..Default::default()
            })
            .collect();

        if missing.is_empty() {
            return Ok(0);
        }

        let created = missing.len() as u64;
        specialty::Entity::insert_many(missing).exec(db).await?;
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::test_utils::setup_test_db;
    use rand::SeedableRng;
    use sea_orm::PaginatorTrait;

    #[tokio::test]
    async fn rerun_creates_no_duplicates() {
        let db = setup_test_db().await;
        let mut rng = StdRng::seed_from_u64(1);

        let first = SpecialtySeeder.seed(&db, &mut rng).await.unwrap();
        let second = SpecialtySeeder.seed(&db, &mut rng).await.unwrap();

        assert_eq!(first, 20);
        assert_eq!(second, 0);
        let total = specialty::Entity::find().count(&db).await.unwrap();
        assert_eq!(total, 20);
    }
}
