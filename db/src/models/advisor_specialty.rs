use sea_orm::entity::prelude::*;
use serde::Serialize;

/// Join row linking an advisor to one of their specialties.
///
/// The (advisor_id, specialty_id) pair is unique in the target schema.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "advisor_specialties")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub advisor_id: i32,
    pub specialty_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AdvisorId",
        to = "super::user::Column::Id"
    )]
    Advisor,

    #[sea_orm(
        belongs_to = "super::specialty::Entity",
        from = "Column::SpecialtyId",
        to = "super::specialty::Column::Id"
    )]
    Specialty,
}

impl Related<super::specialty::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Specialty.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
