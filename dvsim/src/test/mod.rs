
use lazy_static::lazy_static;

lazy_static! {
    /// Seeds used by the randomized tests
    static ref SEEDS: Vec<u64> = (0..16).map(|i| 0x5eed_0000 + i * 7919).collect();
}

fn init_logger() {
    let _ = pretty_env_logger::try_init();
}
