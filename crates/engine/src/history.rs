//! The History Log: one immutable audit record per coupon mutation.
//!
//! Each [`HistoryAction`] carries exactly what undo needs, so reversing an
//! entry never re-parses its human readable summary.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{Coupon, CouponSnapshot, EngineError, MoneyCents, ResultEngine};

pub(crate) const ARCHIVED_SUMMARY: &str = "Coupon has been archived";
pub(crate) const UNARCHIVED_SUMMARY: &str = "Coupon has been unarchived";
pub(crate) const NO_CHANGES_SUMMARY: &str = "No changes";

/// Payload-free tag of a history entry, as stored in the `action` column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HistoryKind {
    Created,
    Edited,
    Archived,
    Unarchived,
    Used,
}

impl HistoryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Edited => "edited",
            Self::Archived => "archived",
            Self::Unarchived => "unarchived",
            Self::Used => "used",
        }
    }
}

impl TryFrom<&str> for HistoryKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "created" => Ok(Self::Created),
            "edited" => Ok(Self::Edited),
            "archived" => Ok(Self::Archived),
            "unarchived" => Ok(Self::Unarchived),
            "used" => Ok(Self::Used),
            other => Err(EngineError::CorruptHistory(format!(
                "unknown history action: {other}"
            ))),
        }
    }
}

/// What happened to the coupon, with the data needed to reverse it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HistoryAction {
    /// `state` is the coupon as first persisted, including its id.
    Created { state: CouponSnapshot },
    Edited { previous: CouponSnapshot },
    Archived { previous: CouponSnapshot },
    Unarchived { previous: CouponSnapshot },
    /// `amount` was subtracted from the current value.
    Used {
        amount: MoneyCents,
        previous: CouponSnapshot,
    },
}

impl HistoryAction {
    pub fn kind(&self) -> HistoryKind {
        match self {
            Self::Created { .. } => HistoryKind::Created,
            Self::Edited { .. } => HistoryKind::Edited,
            Self::Archived { .. } => HistoryKind::Archived,
            Self::Unarchived { .. } => HistoryKind::Unarchived,
            Self::Used { .. } => HistoryKind::Used,
        }
    }

    /// Coupon state recorded with the entry (pre-mutation, except for
    /// `Created` which records the inserted coupon).
    pub fn coupon_state(&self) -> &CouponSnapshot {
        match self {
            Self::Created { state } => state,
            Self::Edited { previous }
            | Self::Archived { previous }
            | Self::Unarchived { previous }
            | Self::Used { previous, .. } => previous,
        }
    }

    fn amount(&self) -> Option<MoneyCents> {
        match self {
            Self::Used { amount, .. } => Some(*amount),
            _ => None,
        }
    }
}

/// A persisted history entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: i64,
    pub coupon_id: i64,
    pub action: HistoryAction,
    pub change_summary: String,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn kind(&self) -> HistoryKind {
        self.action.kind()
    }
}

/// A history entry about to be appended.
#[derive(Clone, Debug)]
pub(crate) struct NewHistoryEntry {
    pub(crate) coupon_id: i64,
    pub(crate) action: HistoryAction,
    pub(crate) change_summary: String,
    pub(crate) timestamp: DateTime<Utc>,
}

impl NewHistoryEntry {
    pub(crate) fn created(coupon: &Coupon) -> Self {
        Self::now(
            coupon.id,
            HistoryAction::Created {
                state: coupon.into(),
            },
            format!(
                "Coupon created with initial value of {}",
                coupon.initial_value
            ),
        )
    }

    pub(crate) fn edited(old: &Coupon, new: &Coupon) -> Self {
        Self::now(
            old.id,
            HistoryAction::Edited {
                previous: old.into(),
            },
            edit_summary(old, new),
        )
    }

    pub(crate) fn archived(coupon: &Coupon) -> Self {
        Self::now(
            coupon.id,
            HistoryAction::Archived {
                previous: coupon.into(),
            },
            ARCHIVED_SUMMARY.to_string(),
        )
    }

    pub(crate) fn unarchived(coupon: &Coupon) -> Self {
        Self::now(
            coupon.id,
            HistoryAction::Unarchived {
                previous: coupon.into(),
            },
            UNARCHIVED_SUMMARY.to_string(),
        )
    }

    pub(crate) fn used(coupon: &Coupon, amount: MoneyCents) -> Self {
        Self::now(
            coupon.id,
            HistoryAction::Used {
                amount,
                previous: coupon.into(),
            },
            amount.to_string(),
        )
    }

    fn now(coupon_id: i64, action: HistoryAction, change_summary: String) -> Self {
        Self {
            coupon_id,
            action,
            change_summary,
            timestamp: Utc::now(),
        }
    }

    pub(crate) fn to_active_model(&self) -> ResultEngine<ActiveModel> {
        Ok(ActiveModel {
            id: ActiveValue::NotSet,
            coupon_id: ActiveValue::Set(self.coupon_id),
            action: ActiveValue::Set(self.action.kind().as_str().to_string()),
            amount_minor: ActiveValue::Set(self.action.amount().map(MoneyCents::cents)),
            change_summary: ActiveValue::Set(self.change_summary.clone()),
            coupon_state: ActiveValue::Set(Some(self.action.coupon_state().encode()?)),
            timestamp: ActiveValue::Set(self.timestamp),
        })
    }
}

/// Human readable diff between two versions of a coupon, one clause per
/// changed field.
pub(crate) fn edit_summary(old: &Coupon, new: &Coupon) -> String {
    let mut changes = Vec::new();
    if old.name != new.name {
        changes.push(format!(
            "Name changed from '{}' to '{}'",
            old.name, new.name
        ));
    }
    if old.current_value != new.current_value {
        changes.push(format!(
            "Balance changed from {} to {}",
            old.current_value, new.current_value
        ));
    }
    if old.expiration_date != new.expiration_date {
        changes.push("Expiration date changed".to_string());
    }
    if old.category_id != new.category_id {
        changes.push("Category changed".to_string());
    }
    if old.redeem_code != new.redeem_code {
        changes.push("Redeem code changed".to_string());
    }

    if changes.is_empty() {
        NO_CHANGES_SUMMARY.to_string()
    } else {
        changes.join(", ")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "coupon_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub coupon_id: i64,
    pub action: String,
    pub amount_minor: Option<i64>,
    pub change_summary: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub coupon_state: Option<String>,
    pub timestamp: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::coupons::Entity",
        from = "Column::CouponId",
        to = "super::coupons::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Coupon,
}

impl Related<super::coupons::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Coupon.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for HistoryEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let kind = HistoryKind::try_from(model.action.as_str())?;
        let raw_state = model.coupon_state.as_deref().ok_or_else(|| {
            EngineError::CorruptHistory(format!("entry {} has no coupon state", model.id))
        })?;
        let snapshot = CouponSnapshot::decode(raw_state)?;

        let action = match kind {
            HistoryKind::Created => HistoryAction::Created { state: snapshot },
            HistoryKind::Edited => HistoryAction::Edited { previous: snapshot },
            HistoryKind::Archived => HistoryAction::Archived { previous: snapshot },
            HistoryKind::Unarchived => HistoryAction::Unarchived { previous: snapshot },
            HistoryKind::Used => {
                let amount = model.amount_minor.ok_or_else(|| {
                    EngineError::CorruptHistory(format!(
                        "used entry {} has no amount",
                        model.id
                    ))
                })?;
                HistoryAction::Used {
                    amount: MoneyCents::new(amount),
                    previous: snapshot,
                }
            }
        };

        Ok(Self {
            id: model.id,
            coupon_id: model.coupon_id,
            action,
            change_summary: model.change_summary,
            timestamp: model.timestamp,
        })
    }
}
