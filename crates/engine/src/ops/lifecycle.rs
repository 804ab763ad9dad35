use sea_orm::TransactionTrait;

use crate::{
    Coupon, MoneyCents, ResultEngine, history::NewHistoryEntry, money::balance_overflow, storage,
};

use super::{Engine, with_tx};

impl Engine {
    /// Archive a coupon by hand.
    pub async fn archive(&self, coupon: &Coupon) -> ResultEngine<()> {
        let archived = Coupon {
            is_archived: true,
            ..coupon.clone()
        };
        self.record_and_persist(NewHistoryEntry::archived(coupon), &archived)
            .await?;
        Ok(())
    }

    /// Bring an archived coupon back to the active list.
    pub async fn unarchive(&self, coupon: &Coupon) -> ResultEngine<()> {
        let active = Coupon {
            is_archived: false,
            ..coupon.clone()
        };
        self.record_and_persist(NewHistoryEntry::unarchived(coupon), &active)
            .await?;
        Ok(())
    }

    /// Consume `amount` from the coupon balance.
    ///
    /// There is no floor: the balance may go negative. When the resulting
    /// balance is zero or below the coupon is archived in the same write.
    /// Returns the coupon as persisted. A balance that would leave the `i64`
    /// range is rejected with [`crate::EngineError::InvalidAmount`] and nothing is
    /// written.
    pub async fn use_coupon(&self, coupon: &Coupon, amount: MoneyCents) -> ResultEngine<Coupon> {
        let current_value = coupon
            .current_value
            .checked_sub(amount)
            .ok_or_else(balance_overflow)?;
        let used = Coupon {
            current_value,
            is_archived: coupon.is_archived || !current_value.is_positive(),
            ..coupon.clone()
        };
        if self
            .record_and_persist(NewHistoryEntry::used(coupon, amount), &used)
            .await?
            && used.is_archived
            && !coupon.is_archived
        {
            tracing::debug!(coupon_id = coupon.id, "coupon exhausted, archived");
        }
        Ok(used)
    }

    /// Append `entry`, then overwrite the coupon with `updated`, in one
    /// transaction. Returns `false` without writing when the coupon is gone.
    async fn record_and_persist(
        &self,
        entry: NewHistoryEntry,
        updated: &Coupon,
    ) -> ResultEngine<bool> {
        with_tx!(self, |db_tx| {
            if storage::coupon_by_id(&db_tx, updated.id).await?.is_none() {
                tracing::warn!(
                    coupon_id = updated.id,
                    action = entry.action.kind().as_str(),
                    "mutation of a missing coupon"
                );
                return Ok(false);
            }

            storage::insert_history(&db_tx, &entry).await?;
            storage::update_coupon(&db_tx, updated).await?;
            tracing::debug!(
                coupon_id = updated.id,
                action = entry.action.kind().as_str(),
                "history recorded"
            );
            Ok(true)
        })
    }
}
