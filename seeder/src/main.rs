use seeder::seed::{Seeder, run_seeder, seed_rng};
use seeder::seeds::{
    admin::AdminSeeder, advisor::AdvisorSeeder, conversation::ConversationSeeder,
    message::MessageSeeder, review::ReviewSeeder, session::SessionSeeder,
    specialty::SpecialtySeeder, topup::TopupSeeder, user::UserSeeder,
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
            Box::new(SpecialtySeeder) as Box<dyn Seeder + Send + Sync>,
            "Specialty",
        ),
        (Box::new(UserSeeder { count: 100 }), "User"),
        (Box::new(AdvisorSeeder { count: 50 }), "Advisor"),
        (Box::new(AdminSeeder { count: 2 }), "Admin"),
        (Box::new(SessionSeeder { count: 200 }), "Session"),
        (Box::new(MessageSeeder { count: 500 }), "Message"),
        (Box::new(ReviewSeeder), "Review"),
        (Box::new(ConversationSeeder { count: 50 }), "Conversation"),
        (Box::new(TopupSeeder { count: 50 }), "Topup"),
    ] {
        run_seeder(&*seeder, name, &db, &mut rng).await;
    }
}
