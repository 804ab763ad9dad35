use sea_orm::{
    ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr,
};

use crate::{
    Category, EngineError, ResultEngine, categories, coupons,
    util::{normalize_display_name, normalize_name_key},
};

use super::{Engine, with_tx};

impl Engine {
    /// Add a new category.
    ///
    /// Names are unique ignoring case and accents.
    pub async fn new_category(
        &self,
        name: &str,
        color_hex: &str,
        icon_name: &str,
    ) -> ResultEngine<Category> {
        let name = normalize_display_name(name, "category")?;
        let name_norm = normalize_name_key(&name);
        with_tx!(self, |db_tx| {
            let exists = categories::Entity::find()
                .filter(categories::Column::NameNorm.eq(name_norm.clone()))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(name));
            }

            let active = categories::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(name.clone()),
                name_norm: ActiveValue::Set(name_norm),
                color_hex: ActiveValue::Set(color_hex.to_string()),
                icon_name: ActiveValue::Set(icon_name.to_string()),
            };
            let id = categories::Entity::insert(active)
                .exec(&db_tx)
                .await?
                .last_insert_id;

            Ok(Category {
                id,
                name,
                color_hex: color_hex.to_string(),
                icon_name: icon_name.to_string(),
            })
        })
    }

    /// All categories, ordered by name.
    pub async fn categories(&self) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    pub async fn category(&self, category_id: i64) -> ResultEngine<Option<Category>> {
        let model = categories::Entity::find_by_id(category_id)
            .one(&self.database)
            .await?;
        Ok(model.map(Category::from))
    }

    /// Renames an existing category.
    pub async fn rename_category(&self, category_id: i64, new_name: &str) -> ResultEngine<()> {
        let new_name = normalize_display_name(new_name, "category")?;
        let name_norm = normalize_name_key(&new_name);
        with_tx!(self, |db_tx| {
            categories::Entity::find_by_id(category_id)
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::KeyNotFound("category not exists".to_string()))?;

            let exists = categories::Entity::find()
                .filter(categories::Column::NameNorm.eq(name_norm.clone()))
                .filter(categories::Column::Id.ne(category_id))
                .one(&db_tx)
                .await?
                .is_some();
            if exists {
                return Err(EngineError::ExistingKey(new_name));
            }

            let active = categories::ActiveModel {
                id: ActiveValue::Set(category_id),
                name: ActiveValue::Set(new_name),
                name_norm: ActiveValue::Set(name_norm),
                ..Default::default()
            };
            active.update(&db_tx).await?;
            Ok(())
        })
    }

    /// Delete a category. Coupons in it become uncategorized.
    pub async fn delete_category(&self, category_id: i64) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let detached = coupons::Entity::update_many()
                .col_expr(coupons::Column::CategoryId, Expr::value(Option::<i64>::None))
                .filter(coupons::Column::CategoryId.eq(category_id))
                .exec(&db_tx)
                .await?
                .rows_affected;

            let deleted = categories::Entity::delete_by_id(category_id)
                .exec(&db_tx)
                .await?
                .rows_affected;
            if deleted == 0 {
                return Err(EngineError::KeyNotFound("category not exists".to_string()));
            }

            tracing::debug!(category_id, detached, "category deleted");
            Ok(())
        })
    }
}
