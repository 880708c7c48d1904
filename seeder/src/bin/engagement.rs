//! Tops up engagement data (messages, reviews, conversations, topups) on
//! an already-populated database.

use seeder::seed::{Seeder, run_seeder, seed_rng};
use seeder::seeds::{
    conversation::ConversationSeeder, message::MessageSeeder, review::ReviewSeeder,
    topup::TopupSeeder,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let db = match db::connect().await {
        Ok(db) => db,
        Err(err) => {
            eprintln!("Failed to connect to database: {err}");
            std::process::exit(1);
        }
    };
    let mut rng = seed_rng();

    for (seeder, name) in [
        (
            Box::new(MessageSeeder { count: 200 }) as Box<dyn Seeder + Send + Sync>,
            "Message",
        ),
        (Box::new(ReviewSeeder), "Review"),
        (Box::new(ConversationSeeder { count: 30 }), "Conversation"),
        (Box::new(TopupSeeder { count: 30 }), "Topup"),
    ] {
        run_seeder(&*seeder, name, &db, &mut rng).await;
    }
}
