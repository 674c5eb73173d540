//! RocksDB column family definitions.
//!
//! Two column families:
//!
//! | Name | Purpose | Key |
//! |------|---------|-----|
//! | checkpoints | Serialized run checkpoints | run id (utf-8) |
//! | system | Store metadata, rare access | string key |
//!
//! Checkpoints are overwritten in place many times per run, so the
//! checkpoints CF keeps a small write buffer and leaves compression on.

use rocksdb::{BlockBasedOptions, Cache, ColumnFamilyDescriptor, Options};

/// Column family name constants.
pub mod cf_names {
    /// Serialized run checkpoints keyed by run id.
    pub const CHECKPOINTS: &str = "checkpoints";

    /// Store metadata (format version and the like), rare access.
    pub const SYSTEM: &str = "system";

    /// All column families, in creation order.
    pub const ALL: &[&str] = &[CHECKPOINTS, SYSTEM];
}

/// Shared block cache size: 8 MB. Checkpoints are small and read rarely.
const CACHE_SIZE: usize = 8 * 1024 * 1024;

/// Database-level options: create missing CFs on open.
pub fn get_db_options() -> Options {
    let mut opts = Options::default();
    opts.create_if_missing(true);
    opts.create_missing_column_families(true);
    opts
}

/// Descriptors for all column families with a shared block cache.
pub fn get_column_family_descriptors() -> Vec<ColumnFamilyDescriptor> {
    let cache = Cache::new_lru_cache(CACHE_SIZE);
    cf_names::ALL
        .iter()
        .map(|name| {
            let mut block_opts = BlockBasedOptions::default();
            block_opts.set_block_cache(&cache);
            let mut opts = Options::default();
            opts.set_block_based_table_factory(&block_opts);
            ColumnFamilyDescriptor::new(*name, opts)
        })
        .collect()
}
