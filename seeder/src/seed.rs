use async_trait::async_trait;
use colored::*;
use futures::FutureExt;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sea_orm::{DatabaseConnection, DbErr};
use std::io::{self, Write};
use std::time::Instant;
use util::config::AppConfig;

const STATUS_COLUMN: usize = 80;

/// A fixture generator for one entity type.
///
/// Implementations fetch whatever prerequisite rows they need, synthesize
/// new rows from the passed-in random source, and report how many rows
/// they created.
#[async_trait]
pub trait Seeder {
    async fn seed(&self, db: &DatabaseConnection, rng: &mut StdRng) -> Result<u64, DbErr>;
}

/// The run's single random source.
///
/// `SEEDER_SEED` pins it for reproducible runs; otherwise it is drawn
/// from entropy.
pub fn seed_rng() -> StdRng {
    match AppConfig::global().seeder_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

pub async fn run_seeder<S: Seeder + ?Sized>(
    seeder: &S,
    name: &str,
    db: &DatabaseConnection,
    rng: &mut StdRng,
) {
    let base_msg = format!("Seeding {}", name.bold());
    let dots = ".".repeat(STATUS_COLUMN.saturating_sub(base_msg.len()));
    print!("{}{} ", base_msg, dots);
    io::stdout().flush().ok();

    let start = Instant::now();
    match std::panic::AssertUnwindSafe(seeder.seed(db, rng))
        .catch_unwind()
        .await
    {
        Ok(Ok(rows)) => {
            let time_str = format!("({} rows, {:.2?})", rows, start.elapsed()).dimmed();
            println!("{} {}", "done".green(), time_str);
        }
        Ok(Err(err)) => {
            println!("{} {}", "failed".red(), err.to_string().dimmed());
            std::process::exit(1);
        }
        Err(_) => {
            println!("{}", "failed".red());
            std::process::exit(1);
        }
    }
}
