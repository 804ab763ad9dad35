//! Row-level access to coupons and their history.
//!
//! Every function is generic over [`ConnectionTrait`], so the engine runs them
//! inside a `DatabaseTransaction` while tests and tools can use a plain
//! connection. Missing rows are reported as `None` or as zero affected rows,
//! never as errors.

use chrono::Duration;
use sea_orm::{ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, prelude::*};

use crate::{
    Coupon, CouponState, HistoryEntry, NewCoupon, ResultEngine, coupons, history,
    history::NewHistoryEntry,
};

pub async fn coupon_by_id<C: ConnectionTrait>(conn: &C, id: i64) -> ResultEngine<Option<Coupon>> {
    let model = coupons::Entity::find_by_id(id).one(conn).await?;
    Ok(model.map(Coupon::from))
}

/// Exact, case-sensitive lookup.
pub async fn coupon_by_redeem_code<C: ConnectionTrait>(
    conn: &C,
    code: &str,
) -> ResultEngine<Option<Coupon>> {
    let model = coupons::Entity::find()
        .filter(coupons::Column::RedeemCode.eq(code))
        .order_by_asc(coupons::Column::Id)
        .one(conn)
        .await?;
    Ok(model.map(Coupon::from))
}

/// Insert a coupon and return the id storage assigned to it.
pub async fn insert_coupon<C: ConnectionTrait>(conn: &C, coupon: &NewCoupon) -> ResultEngine<i64> {
    let result = coupons::Entity::insert(coupons::ActiveModel::from(coupon))
        .exec(conn)
        .await?;
    Ok(result.last_insert_id)
}

/// Overwrite every column of the row with `coupon.id`.
pub async fn update_coupon<C: ConnectionTrait>(conn: &C, coupon: &Coupon) -> ResultEngine<u64> {
    let mut active = coupons::ActiveModel::from(coupon);
    active.id = ActiveValue::NotSet;
    let result = coupons::Entity::update_many()
        .set(active)
        .filter(coupons::Column::Id.eq(coupon.id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

/// Delete a coupon together with its history.
pub async fn delete_coupon<C: ConnectionTrait>(conn: &C, coupon_id: i64) -> ResultEngine<u64> {
    history::Entity::delete_many()
        .filter(history::Column::CouponId.eq(coupon_id))
        .exec(conn)
        .await?;
    let result = coupons::Entity::delete_by_id(coupon_id).exec(conn).await?;
    Ok(result.rows_affected)
}

/// Append a history entry.
///
/// The stored timestamp is the entry's own, raised to one microsecond past the
/// coupon's newest entry when the clock is behind it, so timestamps of a
/// coupon only ever grow.
pub(crate) async fn insert_history<C: ConnectionTrait>(
    conn: &C,
    entry: &NewHistoryEntry,
) -> ResultEngine<i64> {
    let newest = history::Entity::find()
        .filter(history::Column::CouponId.eq(entry.coupon_id))
        .order_by_desc(history::Column::Timestamp)
        .one(conn)
        .await?
        .map(|model| model.timestamp);

    let mut active = entry.to_active_model()?;
    if let Some(newest) = newest
        && newest >= entry.timestamp
    {
        tracing::warn!(
            coupon_id = entry.coupon_id,
            %newest,
            "clock behind newest history entry, bumping timestamp"
        );
        active.timestamp = ActiveValue::Set(newest + Duration::microseconds(1));
    }

    let result = history::Entity::insert(active).exec(conn).await?;
    Ok(result.last_insert_id)
}

pub async fn delete_history<C: ConnectionTrait>(conn: &C, entry_id: i64) -> ResultEngine<u64> {
    let result = history::Entity::delete_by_id(entry_id).exec(conn).await?;
    Ok(result.rows_affected)
}

/// History of a coupon, newest first.
///
/// Rows that cannot be decoded are logged and left out.
pub async fn history_for_coupon<C: ConnectionTrait>(
    conn: &C,
    coupon_id: i64,
) -> ResultEngine<Vec<HistoryEntry>> {
    let models = history::Entity::find()
        .filter(history::Column::CouponId.eq(coupon_id))
        .order_by_desc(history::Column::Timestamp)
        .order_by_desc(history::Column::Id)
        .all(conn)
        .await?;
    Ok(models.into_iter().filter_map(readable_entry).collect())
}

/// Newest readable history entry of a coupon.
pub async fn latest_history<C: ConnectionTrait>(
    conn: &C,
    coupon_id: i64,
) -> ResultEngine<Option<HistoryEntry>> {
    let models = history::Entity::find()
        .filter(history::Column::CouponId.eq(coupon_id))
        .order_by_desc(history::Column::Timestamp)
        .order_by_desc(history::Column::Id)
        .all(conn)
        .await?;
    Ok(models.into_iter().find_map(readable_entry))
}

fn readable_entry(model: history::Model) -> Option<HistoryEntry> {
    let (entry_id, coupon_id) = (model.id, model.coupon_id);
    match HistoryEntry::try_from(model) {
        Ok(entry) => Some(entry),
        Err(err) => {
            tracing::warn!(entry_id, coupon_id, "skipping unreadable history entry: {err}");
            None
        }
    }
}

/// Coupons currently in `state`, soonest expiring first.
pub async fn coupons_in_state<C: ConnectionTrait>(
    conn: &C,
    state: CouponState,
) -> ResultEngine<Vec<Coupon>> {
    let query = coupons::Entity::find();
    let query = match state {
        CouponState::Pending => query.filter(coupons::Column::IsPending.eq(true)),
        CouponState::Active => query
            .filter(coupons::Column::IsPending.eq(false))
            .filter(coupons::Column::IsArchived.eq(false)),
        CouponState::Archived => query
            .filter(coupons::Column::IsPending.eq(false))
            .filter(coupons::Column::IsArchived.eq(true)),
    };
    let models = query
        .order_by_asc(coupons::Column::ExpirationDate)
        .order_by_asc(coupons::Column::Id)
        .all(conn)
        .await?;
    Ok(models.into_iter().map(Coupon::from).collect())
}
