//! This module contains various utility functions and helper macros used
//! throughout the pmpkit crate.
//!
//! Key functionalities include:
//!
//! - Statistical functions: Fisher's exact test on 2×2 tables and summary
//!   statistics (median, mean, sample standard deviation).
//! - The global rayon thread pool used by batch tools, sized from the
//!   `PMPKIT_NUM_THREADS` environment variable.
//! - A macro generating builder-style `with_*` methods for config structs.

use once_cell::sync::Lazy;
use rayon::{
    ThreadPool,
    ThreadPoolBuilder,
};

mod stats;
pub use stats::*;

pub static THREAD_POOL: Lazy<ThreadPool> = Lazy::new(|| {
    let num_threads: Option<usize> = std::env::var("PMPKIT_NUM_THREADS")
        .ok()
        .and_then(|str| str.parse::<usize>().ok());
    ThreadPoolBuilder::new()
        .num_threads(num_threads.unwrap_or(0))
        .build()
        .expect("Failed to create thread pool")
});

pub fn n_threads() -> usize {
    THREAD_POOL.current_num_threads()
}

#[macro_export]
macro_rules! with_field_fn {
    ($field_name: ident, $field_type: ty) => {
        $crate::exports::paste::paste! {
            pub fn [<with_$field_name>](mut self, value: $field_type) -> Self {
            self.$field_name = value;
            self
            }
        }
    };
}
pub use with_field_fn;
