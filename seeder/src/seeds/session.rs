use crate::seed::Seeder;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use db::insert_or_skip;
use db::models::session::{self, SessionStatus, SessionType};
use db::models::transaction::{self, TransactionType};
use db::models::user::{self, UserType};
use fake::Fake;
use fake::faker::lorem::en::Sentence;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, TransactionTrait};

const COMMIT_EVERY: u64 = 20;

/// Books random sessions between existing users and advisors, and charges
/// the user for each paid completed one.
pub struct SessionSeeder {
    pub count: usize,
}

#[async_trait]
impl Seeder for SessionSeeder {
    async fn seed(&self, db: &DatabaseConnection, rng: &mut StdRng) -> Result<u64, DbErr> {
        let user_ids = user::Model::ids_by_type(db, UserType::User).await?;
        let advisors = user::Model::find_rated_advisors(db).await?;
        if user_ids.is_empty() || advisors.is_empty() {
            println!("No users or advisors found. Skipping session generation.");
            return Ok(0);
        }

        let now = Utc::now();
        let mut created = 0u64;
        let mut txn = db.begin().await?;
        for _ in 0..self.count {
            let user_id = *user_ids.choose(rng).unwrap();
            let advisor = advisors.choose(rng).unwrap();

            let days_ago: i64 = rng.gen_range(0..=30);
            let start_time =
                now - Duration::days(days_ago) - Duration::hours(rng.gen_range(0..=23));
            let duration_minutes: i32 = rng.gen_range(15..=90);
            let end_time = start_time + Duration::minutes(i64::from(duration_minutes));

            let session_type = *[SessionType::Chat, SessionType::Audio, SessionType::Video]
                .choose(rng)
                .unwrap();
            let rate = match session_type {
                SessionType::Chat => advisor.chat_rate,
                SessionType::Audio => advisor.audio_rate,
                SessionType::Video => advisor.video_rate,
            };
            let Some(rate) = rate else { continue };

            let outcome =
                outcome_for_age(days_ago, start_time, end_time, duration_minutes, rate, rng);
            let notes: Option<String> =
                rng.gen_bool(0.3).then(|| Sentence(8..16).fake_with_rng(rng));

            let row = session::ActiveModel {
                user_id: Set(user_id),
                advisor_id: Set(advisor.id),
                start_time: Set(start_time),
                end_time: Set(end_time),
                session_type: Set(session_type),
                status: Set(outcome.status),
                notes: Set(notes),
                rate_per_minute: Set(rate),
                actual_start_time: Set(outcome.actual_start),
                actual_end_time: Set(outcome.actual_end),
                actual_duration: Set(outcome.actual_duration),
                billed_amount: Set(outcome.billed_amount),
                is_paid: Set(outcome.is_paid),
                ..Default::default()
            };

            let Some(session) = insert_or_skip(&txn, row).await? else {
                continue;
            };
            created += 1;

            // Each paid completed session produces exactly one charge.
            if session.status == SessionStatus::Completed && session.is_paid {
                if let Some(billed) = session.billed_amount {
                    let payment = transaction::ActiveModel {
                        kind: Set(TransactionType::SessionPayment),
                        user_id: Set(user_id),
                        advisor_id: Set(Some(advisor.id)),
                        session_id: Set(Some(session.id)),
                        amount: Set(-billed),
                        description: Set(format!(
                            "Payment for {} session with advisor #{}",
                            session_type, advisor.id
                        )),
                        timestamp: Set(now),
                        payment_status: Set("completed".to_owned()),
                        ..Default::default()
                    };
                    payment.insert(&txn).await?;
                }
            }

            if created % COMMIT_EVERY == 0 {
                txn.commit().await?;
                txn = db.begin().await?;
            }
        }
        txn.commit().await?;

        Ok(created)
    }
}

struct Outcome {
    status: SessionStatus,
    actual_start: Option<DateTime<Utc>>,
    actual_end: Option<DateTime<Utc>>,
    actual_duration: Option<i32>,
    billed_amount: Option<i32>,
    is_paid: bool,
}

/// Sessions age into their status: week-old ones have completed, recent
/// ones completed or got canceled, fresh ones are still scheduled or
/// running. Only completed sessions carry actuals and a billed amount.
fn outcome_for_age(
    days_ago: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    duration_minutes: i32,
    rate: i32,
    rng: &mut StdRng,
) -> Outcome {
    let unstarted = |status: SessionStatus| Outcome {
        status,
        actual_start: None,
        actual_end: None,
        actual_duration: None,
        billed_amount: None,
        is_paid: false,
    };
    let completed = |rng: &mut StdRng, paid_chance: f64| Outcome {
        status: SessionStatus::Completed,
        actual_start: Some(start),
        actual_end: Some(end),
        actual_duration: Some(duration_minutes),
        billed_amount: Some(rate * duration_minutes),
        is_paid: rng.gen_bool(paid_chance),
    };

    if days_ago > 7 {
        completed(rng, 0.7)
    } else if days_ago > 2 {
        if rng.gen_bool(0.5) {
            completed(rng, 0.5)
        } else {
            unstarted(SessionStatus::Canceled)
        }
    } else if rng.gen_bool(0.5) {
        Outcome {
            actual_start: Some(start),
            ..unstarted(SessionStatus::InProgress)
        }
    } else {
        unstarted(SessionStatus::Scheduled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::test_utils::{insert_test_user, setup_test_db};
    use rand::SeedableRng;
    use sea_orm::EntityTrait;

    async fn seeded_db() -> DatabaseConnection {
        let db = setup_test_db().await;
        for i in 1..=5 {
            insert_test_user(&db, &format!("user{i}"), UserType::User).await;
        }
        for i in 101..=103 {
            insert_test_user(&db, &format!("advisor{i}"), UserType::Advisor).await;
        }
        db
    }

    #[tokio::test]
    async fn billing_only_on_completed_sessions() {
        let db = seeded_db().await;
        let mut rng = StdRng::seed_from_u64(6);

        let created = SessionSeeder { count: 40 }.seed(&db, &mut rng).await.unwrap();
        assert_eq!(created, 40);

        let sessions = session::Entity::find().all(&db).await.unwrap();
        assert_eq!(sessions.len(), 40);

        for s in &sessions {
            match s.status {
                SessionStatus::Completed => {
                    let duration = s.actual_duration.unwrap();
                    assert_eq!(s.actual_start_time, Some(s.start_time));
                    assert_eq!(s.actual_end_time, Some(s.end_time));
                    assert_eq!(s.billed_amount, Some(s.rate_per_minute * duration));
                }
                SessionStatus::InProgress => {
                    assert_eq!(s.actual_start_time, Some(s.start_time));
                    assert!(s.actual_end_time.is_none());
                    assert!(s.actual_duration.is_none());
                    assert!(s.billed_amount.is_none());
                    assert!(!s.is_paid);
                }
                SessionStatus::Scheduled | SessionStatus::Canceled => {
                    assert!(s.actual_start_time.is_none());
                    assert!(s.actual_end_time.is_none());
                    assert!(s.actual_duration.is_none());
                    assert!(s.billed_amount.is_none());
                    assert!(!s.is_paid);
                }
            }
        }
    }

    #[tokio::test]
    async fn each_paid_completed_session_has_one_negated_payment() {
        let db = seeded_db().await;
        let mut rng = StdRng::seed_from_u64(7);

        SessionSeeder { count: 60 }.seed(&db, &mut rng).await.unwrap();

        let sessions = session::Entity::find().all(&db).await.unwrap();
        let payments =
            transaction::Model::find_by_kind(&db, TransactionType::SessionPayment)
                .await
                .unwrap();

        let paid_completed: Vec<_> = sessions
            .iter()
            .filter(|s| s.status == SessionStatus::Completed && s.is_paid)
            .collect();
        assert!(!paid_completed.is_empty());
        assert_eq!(payments.len(), paid_completed.len());

        for payment in &payments {
            let session = sessions
                .iter()
                .find(|s| Some(s.id) == payment.session_id)
                .expect("payment references a generated session");
            assert_eq!(payment.amount, -session.billed_amount.unwrap());
            assert_eq!(payment.user_id, session.user_id);
            assert_eq!(payment.advisor_id, Some(session.advisor_id));
            assert_eq!(payment.kind, TransactionType::SessionPayment);
            assert!(payment.amount < 0);
        }
    }

    #[tokio::test]
    async fn skips_when_no_prerequisites_exist() {
        let db = setup_test_db().await;
        let mut rng = StdRng::seed_from_u64(8);

        let created = SessionSeeder { count: 10 }.seed(&db, &mut rng).await.unwrap();
        assert_eq!(created, 0);
    }
}
