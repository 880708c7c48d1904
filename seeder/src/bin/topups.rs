//! Generates topup transactions for a sample of existing users.

use seeder::seed::{run_seeder, seed_rng};
use seeder::seeds::topup::TopupSeeder;

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

    run_seeder(&TopupSeeder { count: 30 }, "Topup", &db, &mut rng).await;
}
