use std::collections::HashMap;

use crate::{Category, CouponState, MoneyCents, ResultEngine, money::balance_overflow, storage};

use super::Engine;

const UNCATEGORIZED_NAME: &str = "Uncategorized";

/// Aggregated view over the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dashboard {
    /// Remaining balance of active coupons.
    pub total_balance: MoneyCents,
    /// `initial - current` summed over every non-pending coupon.
    pub total_spent: MoneyCents,
    /// Largest spending first. Categories with nothing spent are omitted.
    pub spending_by_category: Vec<CategorySpending>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategorySpending {
    pub category_id: Option<i64>,
    pub name: String,
    pub total_spent: MoneyCents,
}

impl Engine {
    /// Totals over every active and archived coupon. Pending drafts are ignored.
    pub async fn dashboard(&self) -> ResultEngine<Dashboard> {
        let active = storage::coupons_in_state(&self.database, CouponState::Active).await?;
        let archived = storage::coupons_in_state(&self.database, CouponState::Archived).await?;
        let names: HashMap<i64, String> = self
            .categories()
            .await?
            .into_iter()
            .map(|Category { id, name, .. }| (id, name))
            .collect();

        let total_balance = active
            .iter()
            .try_fold(MoneyCents::ZERO, |acc, c| acc.checked_add(c.current_value))
            .ok_or_else(balance_overflow)?;

        let mut total_spent = MoneyCents::ZERO;
        let mut by_category: HashMap<Option<i64>, MoneyCents> = HashMap::new();
        for coupon in active.iter().chain(archived.iter()) {
            let spent = coupon
                .initial_value
                .checked_sub(coupon.current_value)
                .ok_or_else(balance_overflow)?;
            total_spent = total_spent
                .checked_add(spent)
                .ok_or_else(balance_overflow)?;
            let category = by_category.entry(coupon.category_id).or_default();
            *category = category.checked_add(spent).ok_or_else(balance_overflow)?;
        }

        let mut spending_by_category: Vec<CategorySpending> = by_category
            .into_iter()
            .filter(|(_, spent)| !spent.is_zero())
            .map(|(category_id, total_spent)| CategorySpending {
                category_id,
                name: category_id
                    .and_then(|id| names.get(&id).cloned())
                    .unwrap_or_else(|| UNCATEGORIZED_NAME.to_string()),
                total_spent,
            })
            .collect();
        spending_by_category.sort_by(|a, b| {
            b.total_spent
                .cmp(&a.total_spent)
                .then_with(|| a.name.cmp(&b.name))
        });

        Ok(Dashboard {
            total_balance,
            total_spent,
            spending_by_category,
        })
    }
}
