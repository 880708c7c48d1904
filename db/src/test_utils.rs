//! Helpers for exercising the storage layer against in-memory sqlite.
//!
//! The target database's schema pre-exists in real runs; tests derive an
//! equivalent sqlite schema from the entities themselves so nothing here
//! touches a live database.

use chrono::{Duration, Utc};
use sea_orm::ActiveValue::Set;
use sea_orm::sea_query::Index;
use sea_orm::{
    ActiveModelTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema,
};

use crate::models::{self, advisor_specialty, review, session, user};

/// Connects to a fresh in-memory sqlite database carrying the full schema.
///
/// A single pooled connection keeps every handle on the same memory
/// database.
pub async fn setup_test_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("Failed to connect to in-memory db");

    create_tables(&db).await.expect("Failed to create tables");

    db
}

async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    db.execute(backend.build(&schema.create_table_from_entity(models::User)))
        .await?;
    db.execute(backend.build(&schema.create_table_from_entity(models::Specialty)))
        .await?;
    db.execute(backend.build(&schema.create_table_from_entity(models::AdvisorSpecialty)))
        .await?;
    db.execute(backend.build(&schema.create_table_from_entity(models::Session)))
        .await?;
    db.execute(backend.build(&schema.create_table_from_entity(models::Transaction)))
        .await?;
    db.execute(backend.build(&schema.create_table_from_entity(models::Message)))
        .await?;
    db.execute(backend.build(&schema.create_table_from_entity(models::Review)))
        .await?;
    db.execute(backend.build(&schema.create_table_from_entity(models::Conversation)))
        .await?;

    // The (advisor_id, specialty_id) pair is unique in the target schema.
    let pair_unique = Index::create()
        .name("uq_advisor_specialties_pair")
        .table(models::AdvisorSpecialty)
        .col(advisor_specialty::Column::AdvisorId)
        .col(advisor_specialty::Column::SpecialtyId)
        .unique()
        .to_owned();
    db.execute(backend.build(&pair_unique)).await?;

    Ok(())
}

/// Inserts a minimal account of the given role. Advisors get a rate for
/// every modality so they qualify for session generation.
pub async fn insert_test_user(
    db: &DatabaseConnection,
    username: &str,
    user_type: user::UserType,
) -> user::Model {
    let is_advisor = user_type == user::UserType::Advisor;
    let row = user::ActiveModel {
        username: Set(username.to_owned()),
        password: Set("password123".to_owned()),
        name: Set(format!("Test {username}")),
        email: Set(format!("{username}@example.com")),
        user_type: Set(user_type),
        is_advisor: Set(is_advisor),
        profile_completed: Set(true),
        online: Set(false),
        account_balance: Set(0),
        chat_rate: Set(is_advisor.then_some(200)),
        audio_rate: Set(is_advisor.then_some(300)),
        video_rate: Set(is_advisor.then_some(450)),
        ..Default::default()
    };
    row.insert(db).await.expect("Failed to insert test user")
}

/// Inserts a completed session between the pair and a review for it.
pub async fn insert_test_review(
    db: &DatabaseConnection,
    reviewer: &user::Model,
    advisor: &user::Model,
    rating: i32,
) -> review::Model {
    let start = Utc::now() - Duration::days(10);
    let end = start + Duration::minutes(30);
    let session = session::ActiveModel {
        user_id: Set(reviewer.id),
        advisor_id: Set(advisor.id),
        start_time: Set(start),
        end_time: Set(end),
        session_type: Set(session::SessionType::Chat),
        status: Set(session::SessionStatus::Completed),
        rate_per_minute: Set(200),
        actual_start_time: Set(Some(start)),
        actual_end_time: Set(Some(end)),
        actual_duration: Set(Some(30)),
        billed_amount: Set(Some(6000)),
        is_paid: Set(true),
        ..Default::default()
    };
    let session = session
        .insert(db)
        .await
        .expect("Failed to insert test session");

    let row = review::ActiveModel {
        user_id: Set(reviewer.id),
        advisor_id: Set(advisor.id),
        session_id: Set(session.id),
        rating: Set(rating),
        created_at: Set(Utc::now()),
        is_hidden: Set(false),
        ..Default::default()
    };
    row.insert(db).await.expect("Failed to insert test review")
}
