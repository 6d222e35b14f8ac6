use log::warn;

/// Worker threads for processing `num_shards` shard pairs. More threads than shards would
/// only sit idle, since a shard is never split between threads
pub fn determine_thread_count(total: Option<usize>, num_shards: usize) -> anyhow::Result<usize> {
    let total = if let Some(total) = total {
        if total < 1 {
            anyhow::bail!("Cannot set number of threads to be less than 1")
        }
        total
    } else if let Ok(total) = std::thread::available_parallelism() {
        total.get()
    } else {
        warn!("Could not autodetect the number of threads available. Setting to 1, but it is better if you specify");
        1
    };
    anyhow::Ok(total.min(num_shards.max(1)))
}
