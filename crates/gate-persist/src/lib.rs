//! Gate persistence using LMDB (heed).
//!
//! Each world gets its own environment directory. Records are keyed by the
//! gate's 16 UUID bytes and hold a bincode-encoded [`GateInfo`].
//!
//! # Usage
//!
//! ```ignore
//! let db = GateDb::open("data/worlds/overworld/gates")?;
//! let registry = GateRegistry::load(db)?;
//! ```
//!
//! [`GateInfo`]: gate_registry::GateInfo

mod db;

pub use db::GateDb;
