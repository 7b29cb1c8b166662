use bigsi_core::{BigsiIndex, BloomFilter, Config, MemoryStorage};

fn kmers(seq: &[u8], k: usize) -> impl Iterator<Item = &[u8]> {
    (0..=seq.len().saturating_sub(k)).map(move |i| &seq[i..i + k])
}

fn main() {
    tracing_subscriber::fmt::init();

    let config = Config::new(31, 25_000_000, 3);
    let samples = [
        ("s1", b"GATCGTTTGCGGCCACAGTTGCCAGAGATGA".to_vec()),
        ("s2", b"TTTTTGCGGCCACAGTTGCCAGAGATGACCC".to_vec()),
    ];

    let mut blooms = Vec::new();
    let mut names = Vec::new();
    for (name, seq) in &samples {
        let mut filter = BloomFilter::new(config.m, config.h);
        filter.update(kmers(seq, config.k));
        blooms.push(filter);
        names.push(name.to_string());
    }

    let index =
        BigsiIndex::build_from_blooms(&config, &blooms, &names, MemoryStorage::new()).unwrap();
    println!("built index: {} samples, m={}", index.num_samples().unwrap(), index.m());
}
