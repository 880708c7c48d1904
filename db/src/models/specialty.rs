use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, QuerySelect};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum::{Display, EnumString};

/// Represents an advisory specialty in the `specialties` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "specialties")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub icon: String,
    pub category: SpecialtyCategory,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum SpecialtyCategory {
    #[sea_orm(string_value = "divination")]
    Divination,

    #[sea_orm(string_value = "healing")]
    Healing,

    #[sea_orm(string_value = "spiritual-guidance")]
    SpiritualGuidance,

    #[sea_orm(string_value = "mediumship")]
    Mediumship,

    #[sea_orm(string_value = "astrology")]
    Astrology,

    #[sea_orm(string_value = "dream-interpretation")]
    DreamInterpretation,

    #[sea_orm(string_value = "energy-work")]
    EnergyWork,

    #[sea_orm(string_value = "past-lives")]
    PastLives,

    #[sea_orm(string_value = "channeling")]
    Channeling,

    #[sea_orm(string_value = "general")]
    General,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Names already present in the catalogue.
    pub async fn existing_names<C: ConnectionTrait>(db: &C) -> Result<HashSet<String>, DbErr> {
        let names: Vec<String> = Entity::find()
            .select_only()
            .column(Column::Name)
            .into_tuple()
            .all(db)
            .await?;
        Ok(names.into_iter().collect())
    }

    /// All specialty IDs, for random assignment to advisors.
    pub async fn all_ids<C: ConnectionTrait>(db: &C) -> Result<Vec<i32>, DbErr> {
        Entity::find()
            .select_only()
            .column(Column::Id)
            .into_tuple()
            .all(db)
            .await
    }
}
