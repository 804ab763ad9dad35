use sea_orm::TransactionTrait;

use crate::{
    Coupon, CouponState, EngineError, NewCoupon, ResultEngine, history::NewHistoryEntry, storage,
};

use super::{Engine, with_tx};

impl Engine {
    /// Insert a new coupon and record its `Created` history entry.
    ///
    /// Fails with [`EngineError::DuplicateRedeemCode`] when the coupon carries a
    /// non-blank redeem code already used by another coupon; nothing is
    /// written in that case. Blank or absent codes are never checked.
    pub async fn insert(&self, coupon: NewCoupon) -> ResultEngine<Coupon> {
        with_tx!(self, |db_tx| {
            if let Some(code) = coupon.non_blank_redeem_code()
                && storage::coupon_by_redeem_code(&db_tx, code)
                    .await?
                    .is_some()
            {
                tracing::debug!(redeem_code = code, "rejected duplicate redeem code");
                return Err(EngineError::DuplicateRedeemCode(code.to_string()));
            }

            let id = storage::insert_coupon(&db_tx, &coupon).await?;
            let coupon = coupon.into_coupon(id);
            storage::insert_history(&db_tx, &NewHistoryEntry::created(&coupon)).await?;

            tracing::debug!(coupon_id = id, "coupon created");
            Ok(coupon)
        })
    }

    /// Replace the stored coupon with `coupon`, recording an `Edited` entry
    /// that describes every changed field.
    ///
    /// The entry keeps the previous version of the coupon so the edit can be
    /// undone. Updating a coupon that does not exist writes nothing.
    pub async fn update(&self, coupon: &Coupon) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            match storage::coupon_by_id(&db_tx, coupon.id).await? {
                Some(old) => {
                    let entry = NewHistoryEntry::edited(&old, coupon);
                    storage::insert_history(&db_tx, &entry).await?;
                }
                None => {
                    tracing::warn!(coupon_id = coupon.id, "update of a missing coupon");
                }
            }
            storage::update_coupon(&db_tx, coupon).await?;
            Ok(())
        })
    }

    /// Delete a coupon and, with it, its whole history.
    pub async fn delete(&self, coupon: &Coupon) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let rows = storage::delete_coupon(&db_tx, coupon.id).await?;
            tracing::debug!(coupon_id = coupon.id, rows, "coupon deleted");
            Ok(())
        })
    }

    /// Turn a pending draft into an active coupon.
    pub async fn approve(&self, coupon: &Coupon) -> ResultEngine<()> {
        let approved = Coupon {
            is_pending: false,
            ..coupon.clone()
        };
        with_tx!(self, |db_tx| {
            let rows = storage::update_coupon(&db_tx, &approved).await?;
            if rows == 0 {
                tracing::warn!(coupon_id = coupon.id, "approval of a missing coupon");
            }
            Ok(())
        })
    }

    /// Drop a pending draft. No audit trail is kept for rejected drafts.
    ///
    /// Coupons that are no longer pending in storage are left untouched.
    pub async fn reject_pending(&self, coupon: &Coupon) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            match storage::coupon_by_id(&db_tx, coupon.id).await? {
                Some(stored) if stored.state() == CouponState::Pending => {
                    storage::delete_coupon(&db_tx, stored.id).await?;
                    tracing::debug!(coupon_id = stored.id, "pending coupon rejected");
                }
                Some(_) => {
                    tracing::warn!(coupon_id = coupon.id, "rejecting a coupon that is not pending");
                }
                None => {}
            }
            Ok(())
        })
    }

    /// Return a coupon snapshot from DB.
    pub async fn coupon(&self, coupon_id: i64) -> ResultEngine<Option<Coupon>> {
        storage::coupon_by_id(&self.database, coupon_id).await
    }

    /// Look a coupon up by its redeem code. The match is exact and case-sensitive.
    pub async fn coupon_by_redeem_code(&self, code: &str) -> ResultEngine<Option<Coupon>> {
        storage::coupon_by_redeem_code(&self.database, code).await
    }

    /// Coupons that are neither pending nor archived.
    pub async fn active_coupons(&self) -> ResultEngine<Vec<Coupon>> {
        storage::coupons_in_state(&self.database, CouponState::Active).await
    }

    /// Archived coupons, soonest expiring first.
    pub async fn archived_coupons(&self) -> ResultEngine<Vec<Coupon>> {
        storage::coupons_in_state(&self.database, CouponState::Archived).await
    }

    /// Drafts waiting for approval, whatever their archived flag.
    pub async fn pending_coupons(&self) -> ResultEngine<Vec<Coupon>> {
        storage::coupons_in_state(&self.database, CouponState::Pending).await
    }
}
