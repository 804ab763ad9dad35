use sea_orm::{DatabaseTransaction, TransactionTrait};

use crate::{HistoryAction, HistoryEntry, ResultEngine, money::balance_overflow, storage};

use super::{Engine, with_tx};

impl Engine {
    /// Timeline of a coupon, newest entry first.
    pub async fn history(&self, coupon_id: i64) -> ResultEngine<Vec<HistoryEntry>> {
        storage::history_for_coupon(&self.database, coupon_id).await
    }

    /// Reverse a recorded mutation and consume its history entry.
    ///
    /// - `Used`: the amount is added back to the coupon's *current* balance.
    ///   The archived flag is left as it is, even if the balance is positive
    ///   again.
    /// - every other action: the coupon is overwritten with the snapshot kept
    ///   in the entry.
    ///
    /// The entry is deleted in any case, so it can be undone at most once.
    /// A coupon that no longer exists is not recreated.
    pub async fn undo(&self, entry: &HistoryEntry) -> ResultEngine<()> {
        with_tx!(self, |db_tx| revert(&db_tx, entry).await)
    }

    /// Undo the newest history entry of a coupon, returning it.
    ///
    /// Returns `None` when the coupon has no history.
    pub async fn undo_latest(&self, coupon_id: i64) -> ResultEngine<Option<HistoryEntry>> {
        with_tx!(self, |db_tx| {
            match storage::latest_history(&db_tx, coupon_id).await? {
                Some(entry) => {
                    revert(&db_tx, &entry).await?;
                    Ok(Some(entry))
                }
                None => Ok(None),
            }
        })
    }
}

async fn revert(db_tx: &DatabaseTransaction, entry: &HistoryEntry) -> ResultEngine<()> {
    let rows = match &entry.action {
        HistoryAction::Used { amount, .. } => {
            match storage::coupon_by_id(db_tx, entry.coupon_id).await? {
                Some(mut coupon) => {
                    coupon.current_value = coupon
                        .current_value
                        .checked_add(*amount)
                        .ok_or_else(balance_overflow)?;
                    storage::update_coupon(db_tx, &coupon).await?
                }
                None => 0,
            }
        }
        other => storage::update_coupon(db_tx, &other.coupon_state().to_coupon()).await?,
    };
    if rows == 0 {
        tracing::warn!(
            coupon_id = entry.coupon_id,
            entry_id = entry.id,
            "undo target coupon is missing"
        );
    }

    storage::delete_history(db_tx, entry.id).await?;
    tracing::debug!(
        coupon_id = entry.coupon_id,
        entry_id = entry.id,
        action = entry.kind().as_str(),
        "history entry undone"
    );
    Ok(())
}
