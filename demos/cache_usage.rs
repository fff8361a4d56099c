//! Example demonstrating the location cache
//!
//! This example resolves a handful of addresses twice under each load policy
//! and prints how many store queries each pass needed.
//!
//! Run with:
//! ```bash
//! # Built-in sample rows
//! cargo run --example cache_usage
//!
//! # An existing SQLite database holding the location tables
//! LOCATION_DB=locations.db cargo run --example cache_usage --features store-sqlite
//! ```

use location_cache::{
    resolve_address, Building, City, LoadPolicy, LocationCache, LocationCacheConfig,
    LocationStore, MemoryStore, Street,
};

const ADDRESSES: [(&str, Option<&str>, &str); 4] = [
    ("0918123", Some("12345"), "5"),
    ("0918123", Some("12345"), "7"),
    ("0918123", None, "17"),
    ("0465011", Some("54321"), "1"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🚀 Location Cache Example\n");

    let config = LocationCacheConfig::from_env()?;

    for policy in [LoadPolicy::OnDemand, LoadPolicy::Full] {
        println!("--- Policy: {policy} ---");
        let cache = LocationCache::new(open_store().await?, config.clone().with_policy(policy));

        for pass in 1..=2 {
            for (city, street, number) in ADDRESSES {
                match resolve_address(&cache, city, street, number).await? {
                    Some(address) => println!(
                        "  ✅ {city} / {} / {number}: {}",
                        street.unwrap_or("-"),
                        serde_json::to_string(&address.building)?
                    ),
                    None => println!("  ❌ {city} / {} / {number}: not found", street.unwrap_or("-")),
                }
            }

            let stats = cache.stats().await;
            println!(
                "  📊 after pass {pass}: {} store queries, hit rate {:.1}%\n",
                stats.store_queries,
                stats.hit_rate()
            );
        }
    }

    println!("🎉 Example completed successfully!");

    Ok(())
}

#[cfg(feature = "store-sqlite")]
async fn open_store() -> Result<Box<dyn LocationStore>, Box<dyn std::error::Error>> {
    match dotenvy::var("LOCATION_DB") {
        Ok(path) => Ok(Box::new(location_cache::SqliteStore::new(&path).await?)),
        Err(_) => Ok(Box::new(sample_store())),
    }
}

#[cfg(not(feature = "store-sqlite"))]
async fn open_store() -> Result<Box<dyn LocationStore>, Box<dyn std::error::Error>> {
    Ok(Box::new(sample_store()))
}

fn sample_store() -> MemoryStore {
    MemoryStore::new()
        .with_cities([
            City {
                id: 1,
                ident: "0918123".to_string(),
                city_id: Some(1),
            },
            City {
                id: 2,
                ident: "0465011".to_string(),
                city_id: Some(2),
            },
        ])
        .with_streets([
            Street {
                id: 10,
                ident: "12345".to_string(),
                city_id: 1,
            },
            Street {
                id: 20,
                ident: "54321".to_string(),
                city_id: 2,
            },
        ])
        .with_buildings([
            Building {
                id: 100,
                city_id: 1,
                street_id: Some(10),
                building_num: "5".to_string(),
                longitude: Some(21.0122),
                latitude: Some(52.2297),
            },
            Building {
                id: 101,
                city_id: 1,
                street_id: None,
                building_num: "17".to_string(),
                longitude: None,
                latitude: None,
            },
            Building {
                id: 200,
                city_id: 2,
                street_id: Some(20),
                building_num: "1".to_string(),
                longitude: Some(19.9450),
                latitude: Some(50.0647),
            },
        ])
}
