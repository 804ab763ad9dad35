//! Versioned coupon snapshots stored alongside history entries.
//!
//! A snapshot mirrors every `Coupon` field one-to-one. Both conversions
//! destructure exhaustively, so adding a field to `Coupon` fails to compile
//! until the snapshot learns about it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Coupon, EngineError, MoneyCents, ResultEngine};

/// Current snapshot layout.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponSnapshot {
    pub version: u32,
    pub id: i64,
    pub name: String,
    pub current_value: MoneyCents,
    pub initial_value: MoneyCents,
    pub expiration_date: DateTime<Utc>,
    pub category_id: Option<i64>,
    pub redeem_code: Option<String>,
    pub is_archived: bool,
    pub is_pending: bool,
}

impl CouponSnapshot {
    /// Serialize to the JSON text kept in the `coupon_state` column.
    pub fn encode(&self) -> ResultEngine<String> {
        serde_json::to_string(self)
            .map_err(|err| EngineError::CorruptHistory(format!("cannot encode snapshot: {err}")))
    }

    /// Parse a stored snapshot, rejecting layouts this build does not know.
    pub fn decode(raw: &str) -> ResultEngine<Self> {
        let snapshot: Self = serde_json::from_str(raw)
            .map_err(|err| EngineError::CorruptHistory(format!("invalid snapshot: {err}")))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(EngineError::CorruptHistory(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        Ok(snapshot)
    }

    /// The coupon this snapshot describes.
    pub fn to_coupon(&self) -> Coupon {
        Coupon::from(self.clone())
    }
}

impl From<&Coupon> for CouponSnapshot {
    fn from(coupon: &Coupon) -> Self {
        let Coupon {
            id,
            name,
            current_value,
            initial_value,
            expiration_date,
            category_id,
            redeem_code,
            is_archived,
            is_pending,
        } = coupon.clone();
        Self {
            version: SNAPSHOT_VERSION,
            id,
            name,
            current_value,
            initial_value,
            expiration_date,
            category_id,
            redeem_code,
            is_archived,
            is_pending,
        }
    }
}

impl From<CouponSnapshot> for Coupon {
    fn from(snapshot: CouponSnapshot) -> Self {
        let CouponSnapshot {
            version: _,
            id,
            name,
            current_value,
            initial_value,
            expiration_date,
            category_id,
            redeem_code,
            is_archived,
            is_pending,
        } = snapshot;
        Self {
            id,
            name,
            current_value,
            initial_value,
            expiration_date,
            category_id,
            redeem_code,
            is_archived,
            is_pending,
        }
    }
}
