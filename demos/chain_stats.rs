use std::hash::Hash;
use std::hash::Hasher;

use chained_hash::HashTable;
use clap::Parser;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use siphasher::sip::SipHasher;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "capacity", default_value_t = 1021)]
    capacity: usize,

    /// Entries per bucket to insert.
    #[arg(short = 'l', long = "load", default_value_t = 4.0)]
    load: f64,

    /// Fraction of inserted entries removed again afterwards.
    #[arg(short = 'r', long = "remove", default_value_t = 0.25)]
    remove: f64,

    #[arg(short = 's', long = "seed", default_value_t = 0x5EED)]
    seed: u64,
}

fn main() -> Result<(), chained_hash::Error> {
    let args = Args::parse();
    let hash_u64 = |value: u64| {
        let mut hasher = SipHasher::new_with_keys(args.seed, 0);
        value.hash(&mut hasher);
        hasher.finish()
    };

    println!("Creating HashTable with {} buckets", args.capacity);
    let mut table: HashTable<u64> = HashTable::with_capacity(args.capacity)?;

    let num_values = (args.capacity as f64 * args.load) as usize;
    let mut rng = SmallRng::seed_from_u64(args.seed);
    let values: Vec<u64> = (0..num_values).map(|_| rng.random()).collect();

    println!("Filling table with {num_values} u64 values...");
    for &value in &values {
        table.insert(hash_u64(value), value)?;
    }

    let mut removed = 0;
    for &value in &values {
        if rng.random_bool(args.remove.clamp(0.0, 1.0))
            && table.remove(hash_u64(value), |&v| v == value).is_some()
        {
            removed += 1;
        }
    }

    println!("Inserted {num_values} values, removed {removed}");
    println!("Final load factor: {:.2}", table.load_factor());

    table.chain_histogram().print();
    table.debug_stats().print();

    Ok(())
}
