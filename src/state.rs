use std::sync::Arc;

use crate::{
    config::AuthSettings,
    db::{DbPool, OrmConn},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub auth: Arc<AuthSettings>,
}

impl AppState {
    /// Builds the state from a SeaORM connection, sharing its sqlx pool for
    /// the raw queries.
    pub fn new(orm: OrmConn, auth: AuthSettings) -> Self {
        let pool = orm.get_postgres_connection_pool().clone();
        Self {
            pool,
            orm,
            auth: Arc::new(auth),
        }
    }
}
