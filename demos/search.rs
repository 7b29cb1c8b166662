use bigsi_core::{BigsiIndex, BloomFilter, Config, MemoryStorage};

fn main() {
    tracing_subscriber::fmt::init();

    let config = Config::new(31, 1000, 3);
    let mut filter = BloomFilter::new(config.m, config.h);
    filter.insert(b"GATCGTTTGCGGCCACAGTTGCCAGAGATGA");

    let index = BigsiIndex::build_from_blooms(
        &config,
        &[filter],
        &["s1".to_string()],
        MemoryStorage::new(),
    )
    .unwrap();

    let hits = index
        .search(b"GATCGTTTGCGGCCACAGTTGCCAGAGATGA", config.k, 1.0, false)
        .unwrap();
    for hit in hits {
        println!(
            "{}: {:.2} ({}/{} k-mers)",
            hit.sample_name,
            hit.percent_kmers_found,
            (hit.percent_kmers_found * hit.num_kmers as f64).round() as usize,
            hit.num_kmers
        );
    }
}
