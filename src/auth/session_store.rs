use async_trait::async_trait;
use model::entities::session;
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use time::OffsetDateTime;
use tower_sessions::{
    session::{Id, Record},
    session_store, SessionStore,
};
use tracing::{debug, trace};

/// `SessionStore` keeping session records in the `sessions` table.
///
/// Records are stored as JSON; rows whose expiry has passed are never loaded.
#[derive(Clone, Debug)]
pub struct SeaOrmSessionStore {
    db: DatabaseConnection,
}

impl SeaOrmSessionStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Remove every expired session row, returning how many were deleted.
    pub async fn delete_expired(&self) -> Result<u64, DbErr> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let result = session::Entity::delete_many()
            .filter(session::Column::ExpiryDate.lte(now))
            .exec(&self.db)
            .await?;
        debug!("Pruned {} expired sessions", result.rows_affected);
        Ok(result.rows_affected)
    }

    async fn id_exists(&self, id: &Id) -> session_store::Result<bool> {
        let found = session::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(backend)?;
        Ok(found.is_some())
    }
}

fn backend(err: DbErr) -> session_store::Error {
    session_store::Error::Backend(err.to_string())
}

fn to_active_model(record: &Record) -> session_store::Result<session::ActiveModel> {
    let data = serde_json::to_vec(record)
        .map_err(|e| session_store::Error::Encode(e.to_string()))?;

    Ok(session::ActiveModel {
        id: Set(record.id.to_string()),
        data: Set(data),
        expiry_date: Set(record.expiry_date.unix_timestamp()),
    })
}

#[async_trait]
impl SessionStore for SeaOrmSessionStore {
    async fn create(&self, record: &mut Record) -> session_store::Result<()> {
        while self.id_exists(&record.id).await? {
            trace!("Session id collision, generating a new one");
            record.id = Id::default();
        }
        self.save(record).await
    }

    async fn save(&self, record: &Record) -> session_store::Result<()> {
        trace!("Saving session record");
        let model = to_active_model(record)?;

        session::Entity::insert(model)
            .on_conflict(
                OnConflict::column(session::Column::Id)
                    .update_columns([session::Column::Data, session::Column::ExpiryDate])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(backend)?;
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> session_store::Result<Option<Record>> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let row = session::Entity::find_by_id(session_id.to_string())
            .filter(session::Column::ExpiryDate.gt(now))
            .one(&self.db)
            .await
            .map_err(backend)?;

        row.map(|row| {
            serde_json::from_slice::<Record>(&row.data)
                .map_err(|e| session_store::Error::Decode(e.to_string()))
        })
        .transpose()
    }

    async fn delete(&self, session_id: &Id) -> session_store::Result<()> {
        session::Entity::delete_by_id(session_id.to_string())
            .exec(&self.db)
            .await
            .map_err(backend)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::setup_test_db;
    use std::collections::HashMap;
    use time::Duration;

    fn record(expiry: OffsetDateTime) -> Record {
        let mut data = HashMap::new();
        data.insert("user_id".to_string(), serde_json::json!(7));
        Record {
            id: Id::default(),
            data,
            expiry_date: expiry,
        }
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = SeaOrmSessionStore::new(setup_test_db().await);
        let mut rec = record(OffsetDateTime::now_utc() + Duration::hours(1));

        store.create(&mut rec).await.unwrap();
        let loaded = store.load(&rec.id).await.unwrap().expect("session should load");
        assert_eq!(loaded.data.get("user_id"), Some(&serde_json::json!(7)));

        store.delete(&rec.id).await.unwrap();
        assert!(store.load(&rec.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_sessions_are_not_loaded() {
        let store = SeaOrmSessionStore::new(setup_test_db().await);
        let rec = record(OffsetDateTime::now_utc() - Duration::minutes(5));

        store.save(&rec).await.unwrap();
        assert!(store.load(&rec.id).await.unwrap().is_none());
        assert_eq!(store.delete_expired().await.unwrap(), 1);
    }
}
