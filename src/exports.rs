pub use {anyhow,
         csv,
         itertools,
         log,
         noodles_vcf,
         paste,
         polars,
         pretty_env_logger,
         rand,
         rand_chacha,
         rayon,
         serde,
         serde_json,
         statrs};
