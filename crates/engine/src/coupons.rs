//! The module contains the `Coupon` struct, its lifecycle state and the
//! `coupons` table entity.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::MoneyCents;

/// Lifecycle state of a coupon, derived from its `is_pending`/`is_archived`
/// flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CouponState {
    /// Draft waiting for approval.
    Pending,
    Active,
    /// Inactive, either archived by hand or exhausted by usage.
    Archived,
}

impl CouponState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Archived => "archived",
        }
    }
}

/// A value-bearing coupon (gift card, discount voucher, ...).
///
/// `current_value` may go negative when the coupon is used for more than its
/// remaining balance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coupon {
    /// Identifier assigned by storage on insert.
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

impl Coupon {
    /// A pending draft is never listed as archived, even if both flags are set.
    pub fn state(&self) -> CouponState {
        if self.is_pending {
            CouponState::Pending
        } else if self.is_archived {
            CouponState::Archived
        } else {
            CouponState::Active
        }
    }

    /// The redeem code, if present and not blank.
    pub fn redeem_code(&self) -> Option<&str> {
        non_blank(self.redeem_code.as_deref())
    }
}

/// A coupon that has not been persisted yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCoupon {
    pub name: String,
    pub current_value: MoneyCents,
    pub initial_value: MoneyCents,
    pub expiration_date: DateTime<Utc>,
    pub category_id: Option<i64>,
    pub redeem_code: Option<String>,
    pub is_archived: bool,
    pub is_pending: bool,
}

impl NewCoupon {
    /// A fresh, active coupon whose current value equals its initial value.
    #[must_use]
    pub fn new(name: impl Into<String>, value: MoneyCents, expiration_date: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            current_value: value,
            initial_value: value,
            expiration_date,
            category_id: None,
            redeem_code: None,
            is_archived: false,
            is_pending: false,
        }
    }

    #[must_use]
    pub fn category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn redeem_code(mut self, code: impl Into<String>) -> Self {
        self.redeem_code = Some(code.into());
        self
    }

    #[must_use]
    pub fn current_value(mut self, value: MoneyCents) -> Self {
        self.current_value = value;
        self
    }

    /// Mark the coupon as a draft that needs approval.
    #[must_use]
    pub fn pending(mut self) -> Self {
        self.is_pending = true;
        self
    }

    pub(crate) fn non_blank_redeem_code(&self) -> Option<&str> {
        non_blank(self.redeem_code.as_deref())
    }

    pub(crate) fn into_coupon(self, id: i64) -> Coupon {
        Coupon {
            id,
            name: self.name,
            current_value: self.current_value,
            initial_value: self.initial_value,
            expiration_date: self.expiration_date,
            category_id: self.category_id,
            redeem_code: self.redeem_code,
            is_archived: self.is_archived,
            is_pending: self.is_pending,
        }
    }
}

fn non_blank(code: Option<&str>) -> Option<&str> {
    code.filter(|code| !code.trim().is_empty())
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "coupons")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub current_value_minor: i64,
    pub initial_value_minor: i64,
    pub expiration_date: DateTimeUtc,
    pub category_id: Option<i64>,
    pub redeem_code: Option<String>,
    pub is_archived: bool,
    pub is_pending: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Category,
    #[sea_orm(has_many = "super::history::Entity")]
    History,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::History.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Coupon {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            current_value: MoneyCents::new(model.current_value_minor),
            initial_value: MoneyCents::new(model.initial_value_minor),
            expiration_date: model.expiration_date,
            category_id: model.category_id,
            redeem_code: model.redeem_code,
            is_archived: model.is_archived,
            is_pending: model.is_pending,
        }
    }
}

impl From<&Coupon> for ActiveModel {
    fn from(value: &Coupon) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            name: ActiveValue::Set(value.name.clone()),
            current_value_minor: ActiveValue::Set(value.current_value.cents()),
            initial_value_minor: ActiveValue::Set(value.initial_value.cents()),
            expiration_date: ActiveValue::Set(value.expiration_date),
            category_id: ActiveValue::Set(value.category_id),
            redeem_code: ActiveValue::Set(value.redeem_code.clone()),
            is_archived: ActiveValue::Set(value.is_archived),
            is_pending: ActiveValue::Set(value.is_pending),
        }
    }
}

impl From<&NewCoupon> for ActiveModel {
    fn from(value: &NewCoupon) -> Self {
        Self {
            id: ActiveValue::NotSet,
            name: ActiveValue::Set(value.name.clone()),
            current_value_minor: ActiveValue::Set(value.current_value.cents()),
            initial_value_minor: ActiveValue::Set(value.initial_value.cents()),
            expiration_date: ActiveValue::Set(value.expiration_date),
            category_id: ActiveValue::Set(value.category_id),
            redeem_code: ActiveValue::Set(value.redeem_code.clone()),
            is_archived: ActiveValue::Set(value.is_archived),
            is_pending: ActiveValue::Set(value.is_pending),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn coupon() -> Coupon {
        NewCoupon::new(
            "Gift Card",
            MoneyCents::new(100_00),
            Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap(),
        )
        .into_coupon(1)
    }

    #[test]
    fn state_follows_flags() {
        let mut coupon = coupon();
        assert_eq!(coupon.state(), CouponState::Active);

        coupon.is_archived = true;
        assert_eq!(coupon.state(), CouponState::Archived);

        coupon.is_pending = true;
        assert_eq!(coupon.state(), CouponState::Pending);
    }

    #[test]
    fn blank_redeem_codes_are_ignored() {
        let mut coupon = coupon();
        assert_eq!(coupon.redeem_code(), None);

        coupon.redeem_code = Some("   ".to_string());
        assert_eq!(coupon.redeem_code(), None);

        coupon.redeem_code = Some("ABCD-1234".to_string());
        assert_eq!(coupon.redeem_code(), Some("ABCD-1234"));
    }

    #[test]
    fn new_coupon_starts_with_full_balance() {
        let coupon = coupon();
        assert_eq!(coupon.current_value, coupon.initial_value);
        assert!(!coupon.is_archived);
        assert!(!coupon.is_pending);
    }
}
