use sea_orm::DatabaseConnection;

use crate::ResultEngine;

mod categories;
mod coupons;
mod history;
mod lifecycle;
mod stats;

pub use stats::{CategorySpending, Dashboard};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
///
/// Each ledger mutation writes its history entry and its coupon row inside one
/// transaction, so the audit trail and the coupon never diverge.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The ledger engine.
///
/// Stateless between calls: every operation reads and writes through the
/// injected database connection, nothing is cached in memory.
#[derive(Debug, Clone)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// The connection the engine writes through.
    pub fn database(&self) -> &DatabaseConnection {
        &self.database
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}
