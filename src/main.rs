use std::path::Path;
use std::time::Instant;
use templog::{authorize, timestamp, Database, NewReading, OwnerId, TokenTable, Value};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

const HOUR: u128 = 3_600 * 1_000_000_000;

fn main() -> templog::Result<()> {
    env_logger::builder()
        .filter_module("lsm_tree", log::LevelFilter::Warn)
        .filter_module("fjall", log::LevelFilter::Info)
        .filter_module("templog", log::LevelFilter::Debug)
        .parse_default_env()
        .init();

    let path = Path::new(".testy");

    if path.try_exists()? {
        std::fs::remove_dir_all(path)?;
    }

    let db = Database::builder().cache_size_mib(16).open(path)?;

    let mut tokens = TokenTable::new();
    tokens.insert("dev-token-alice", OwnerId::try_from("alice")?);
    tokens.insert("dev-token-bob", OwnerId::try_from("bob")?);

    let now = timestamp();
    let start = Instant::now();

    {
        use rand::Rng;

        let mut rng = rand::thread_rng();

        for token in ["dev-token-alice", "dev-token-bob"] {
            let header = format!("Bearer {token}");
            let owner = authorize(&tokens, Some(header.as_str()))?;

            // A reading roughly every 20 minutes over the last 10 days
            for idx in 0..(10 * 24 * 3) {
                let recorded_at = now.saturating_sub(idx * HOUR / 3);

                // Body temperature with a slight daily rhythm and some noise
                let hour_of_day = (recorded_at / HOUR) % 24;
                let rhythm: Value = if (14..20).contains(&hour_of_day) { 0.4 } else { 0.0 };
                let value = 36.4 + rhythm + rng.gen_range(-0.3..0.3);

                db.append(&owner, NewReading::new(value).recorded_at(recorded_at))?;
            }

            log::info!("[{owner}] ingested readings");
        }
    }

    db.persist()?;

    log::info!("ingested in {:?}", start.elapsed());

    let owner = authorize(&tokens, Some("Bearer dev-token-alice"))?;

    for reading in db.list(&owner, 3)? {
        log::info!("latest: {:.2} °C at {}", reading.value_celsius, reading.recorded_at);
    }

    for range in ["day", "week", "fortnight"] {
        let start = Instant::now();

        let stats = db.aggregate(&owner, range)?;

        log::info!(
            "{range:?} -> {} buckets in {:?}",
            stats.buckets.len(),
            start.elapsed()
        );

        match serde_json::to_string_pretty(&stats) {
            Ok(json) => println!("{json}"),
            Err(e) => log::error!("could not serialize stats: {e}"),
        }
    }

    if let Err(e) = authorize(&tokens, Some("Bearer nope")) {
        log::info!("unknown token rejected: {e}");
    }

    Ok(())
}
