// Copyright 2026 the Parley Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::env;

/// Environment variable overriding the size of the worker pool.
pub const NUMBER_OF_THREADS_ENV: &str = "ASYNC_TASK_THREAD_POOL_SIZE";

const DEFAULT_NUMBER_OF_THREADS: usize = 8;
const MAX_NUMBER_OF_THREADS: usize = 16;

/// Construction options of an [`AsyncTaskManager`](crate::AsyncTaskManager).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AsyncTaskManagerConfig {
    /// Size of the worker pool. Workers start on demand.
    pub number_of_threads: usize,
}

impl Default for AsyncTaskManagerConfig {
    fn default() -> Self {
        Self {
            number_of_threads: DEFAULT_NUMBER_OF_THREADS,
        }
    }
}

impl AsyncTaskManagerConfig {
    /// Reads the pool size from [`NUMBER_OF_THREADS_ENV`].
    ///
    /// Values outside `1..=16` fall back to the default of 8.
    pub fn from_env() -> Self {
        let number_of_threads = match env::var(NUMBER_OF_THREADS_ENV) {
            Ok(value) => parse_number_of_threads(&value).unwrap_or_else(|| {
                log::warn!(
                    "{NUMBER_OF_THREADS_ENV}={value:?} is not in 1..={MAX_NUMBER_OF_THREADS}, \
                     using {DEFAULT_NUMBER_OF_THREADS} threads"
                );
                DEFAULT_NUMBER_OF_THREADS
            }),
            Err(env::VarError::NotPresent) => DEFAULT_NUMBER_OF_THREADS,
            Err(env::VarError::NotUnicode(_)) => {
                log::warn!("{NUMBER_OF_THREADS_ENV} is not valid unicode");
                DEFAULT_NUMBER_OF_THREADS
            }
        };
        Self { number_of_threads }
    }
}

fn parse_number_of_threads(value: &str) -> Option<usize> {
    value
        .trim()
        .parse()
        .ok()
        .filter(|n| (1..=MAX_NUMBER_OF_THREADS).contains(n))
}

#[cfg(test)]
mod tests {
    use super::parse_number_of_threads;

    #[test]
    fn pool_size_bounds() {
        assert_eq!(parse_number_of_threads("4"), Some(4));
        assert_eq!(parse_number_of_threads(" 16\n"), Some(16));
        assert_eq!(parse_number_of_threads("0"), None);
        assert_eq!(parse_number_of_threads("17"), None);
        assert_eq!(parse_number_of_threads("-2"), None);
        assert_eq!(parse_number_of_threads("many"), None);
    }
}
