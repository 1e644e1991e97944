use chained_hash::HashMap;
use chained_hash::hasher::BuildModuloHasher;
use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "capacity", default_value_t = chained_hash::DEFAULT_CAPACITY)]
    capacity: usize,

    /// Extra `key=value` pairs inserted after the built-in ones.
    #[arg(value_parser = parse_pair)]
    pairs: Vec<(String, String)>,
}

fn parse_pair(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))
}

fn print_table(map: &HashMap<String, String, BuildModuloHasher>) {
    for bucket in map.buckets() {
        print!("[{}]", bucket.index());
        for (key, value) in bucket.iter() {
            print!(" => [{key} : {value}]");
        }
        println!();
    }
}

fn main() -> Result<(), chained_hash::Error> {
    let args = Args::parse();

    let mut map = HashMap::with_capacity_and_hasher(args.capacity, BuildModuloHasher::default())?;
    println!("Created table with {} buckets", map.capacity());

    let builtin = [("adam", "19"), ("eve", "22"), ("john", "4"), ("doe", "87")]
        .map(|(k, v)| (k.to_string(), v.to_string()));
    for (key, value) in builtin.into_iter().chain(args.pairs) {
        println!("put {key} -> bucket {}", map.bucket_index(key.as_str()));
        map.put(key, value)?;
    }

    print_table(&map);

    match map.get("adam") {
        Some(age) => println!("get adam: {age}"),
        None => println!("get adam: not found"),
    }
    println!("remove adam: {}", map.remove("adam").is_some());
    match map.get("adam") {
        Some(age) => println!("get adam: {age}"),
        None => println!("get adam: not found"),
    }

    print_table(&map);

    println!("load factor: {:.2}", map.load_factor());
    println!("clear released {} entries", map.clear());

    Ok(())
}
