//! Conditional parallel iteration over statement batches.
//!
//! Uses rayon when the `parallel` feature is enabled and the batch exceeds
//! the configured threshold. Output order always matches input order.

use crate::config::EngineConfig;

/// Maps a function over items, conditionally using parallel iteration.
#[allow(unused_variables)]
pub fn maybe_parallel_map<T, U, F>(items: &[T], config: &EngineConfig, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if config.should_parallelize(items.len()) {
            return items.par_iter().map(f).collect();
        }
    }

    items.iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_map_preserves_order() {
        let config = EngineConfig::sequential();
        let items = vec![1, 2, 3, 4, 5];
        let results: Vec<i32> = maybe_parallel_map(&items, &config, |x| x * 2);
        assert_eq!(results, vec![2, 4, 6, 8, 10]);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_map_preserves_order() {
        let config = EngineConfig {
            parallel: true,
            parallel_threshold: 0,
            ..EngineConfig::default()
        };
        let items: Vec<u64> = (0..2_000).collect();
        let results = maybe_parallel_map(&items, &config, |x| x + 1);
        assert_eq!(results, (1..2_001).collect::<Vec<_>>());
    }
}
