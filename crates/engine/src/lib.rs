//! Coupon ledger engine.
//!
//! Tracks value-bearing coupons, their lifecycle (`Pending`, `Active`,
//! `Archived`) and an append-only history of every mutation that can be
//! undone one entry at a time.

pub use categories::Category;
pub use coupons::{Coupon, CouponState, NewCoupon};
pub use error::EngineError;
pub use history::{HistoryAction, HistoryEntry, HistoryKind};
pub use money::MoneyCents;
pub use ops::{CategorySpending, Dashboard, Engine, EngineBuilder};
pub use snapshot::{CouponSnapshot, SNAPSHOT_VERSION};

mod categories;
mod coupons;
mod error;
mod history;
mod money;
mod ops;
mod snapshot;
pub mod storage;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
