//! Generic CRUD accessor bound to one entity type and a store.

use crate::error::AppError;
use crate::model::Entity;
use crate::service::RequestValidator;
use crate::store::Store;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

/// Forwards create/read/update/delete for entity `E` to store `S`.
/// A missing record is reported as `Ok(None)`, never as an error.
pub struct Collection<E, S> {
    store: Arc<S>,
    _entity: PhantomData<fn() -> E>,
}

impl<E, S> Clone for Collection<E, S> {
    fn clone(&self) -> Self {
        Collection {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity, S: Store<E>> Collection<E, S> {
    pub fn new(store: Arc<S>) -> Self {
        Collection {
            store,
            _entity: PhantomData,
        }
    }

    /// Validates `data` and stores it as a new record; returns it with its assigned id.
    pub async fn create(&self, data: Value) -> Result<E, AppError> {
        let new = RequestValidator::<E>::validate_new(data)?;
        self.store.create(&new).await
    }

    /// All records when `id` is `None`; otherwise zero or one record.
    pub async fn read(&self, id: Option<i64>) -> Result<Vec<E>, AppError> {
        match id {
            None => self.store.find_all().await,
            Some(id) => Ok(self.store.find_by_id(id).await?.into_iter().collect()),
        }
    }

    /// Merges `data` into the record with `id` and persists it. A body that
    /// failed to parse is only reported once the record is known to exist.
    pub async fn update(
        &self,
        id: i64,
        data: Result<Value, AppError>,
    ) -> Result<Option<E>, AppError> {
        let Some(mut record) = self.store.find_by_id(id).await? else {
            return Ok(None);
        };
        let patch = RequestValidator::<E>::validate_patch(data?)?;
        record.apply(patch)?;
        self.store.update(&record).await
    }

    /// Removes the record with `id`; returns its state before removal.
    pub async fn delete(&self, id: i64) -> Result<Option<E>, AppError> {
        self.store.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DatabaseSettings;
    use crate::migration::sync_schema;
    use crate::model::{Author, Book, Food, FoodKind};
    use crate::store::Database;
    use serde_json::json;

    async fn setup() -> Arc<Database> {
        let db = Database::connect(&DatabaseSettings::in_memory()).await.unwrap();
        sync_schema(&db).await.unwrap();
        Arc::new(db)
    }

    #[tokio::test]
    async fn create_assigns_ids() {
        let authors = Collection::<Author, _>::new(setup().await);
        let a = authors.create(json!({"name": "Author 1"})).await.unwrap();
        let b = authors.create(json!({"name": "Author 2"})).await.unwrap();
        assert_eq!(a.name, "Author 1");
        assert!(a.id > 0);
        assert_ne!(a.id, b.id);
    }

    #[tokio::test]
    async fn read_all_and_by_id() {
        let authors = Collection::<Author, _>::new(setup().await);
        let a = authors.create(json!({"name": "Author 1"})).await.unwrap();
        authors.create(json!({"name": "Author 2"})).await.unwrap();

        let all = authors.read(None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, a.id);

        assert_eq!(authors.read(Some(a.id)).await.unwrap(), vec![a]);
        assert!(authors.read(Some(9999)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_merges_and_refreshes_stamp() {
        let food = Collection::<Food, _>::new(setup().await);
        let carrot = food
            .create(json!({"name": "Carrot", "calories": 25, "type": "vegetable"}))
            .await
            .unwrap();
        let updated = food.update(carrot.id, Ok(json!({"calories": 30}))).await.unwrap().unwrap();
        assert_eq!(updated.name, "Carrot");
        assert_eq!(updated.calories, 30);
        assert_eq!(updated.kind, FoodKind::Vegetable);
        assert_eq!(updated.stamps.created_at, carrot.stamps.created_at);
        assert!(updated.stamps.updated_at >= carrot.stamps.updated_at);
    }

    #[tokio::test]
    async fn update_missing_is_none_even_with_bad_body() {
        let food = Collection::<Food, _>::new(setup().await);
        assert!(food.update(42, Ok(json!({"calories": "x"}))).await.unwrap().is_none());
        let unparsed = Err(AppError::Validation("expected value".into()));
        assert!(food.update(42, unparsed).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_rejects_invalid_fields() {
        let food = Collection::<Food, _>::new(setup().await);
        let apple = food
            .create(json!({"name": "Apple", "calories": 95, "type": "fruit"}))
            .await
            .unwrap();
        let err = food.update(apple.id, Ok(json!({"type": "mineral"}))).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(food.read(Some(apple.id)).await.unwrap()[0].kind, FoodKind::Fruit);
    }

    #[tokio::test]
    async fn delete_returns_prior_state_once() {
        let db = setup().await;
        let books = Collection::<Book, _>::new(db);
        let book = books.create(json!({"title": "Book 1"})).await.unwrap();
        assert_eq!(books.delete(book.id).await.unwrap(), Some(book.clone()));
        assert_eq!(books.delete(book.id).await.unwrap(), None);
        assert!(books.read(Some(book.id)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_author_orphans_books() {
        let db = setup().await;
        let authors = Collection::<Author, _>::new(Arc::clone(&db));
        let books = Collection::<Book, _>::new(db);
        let author = authors.create(json!({"name": "Author 1"})).await.unwrap();
        let book = books
            .create(json!({"title": "Book 1", "authorId": author.id}))
            .await
            .unwrap();
        assert_eq!(book.author_id, Some(author.id));

        authors.delete(author.id).await.unwrap();
        let book = books.read(Some(book.id)).await.unwrap().remove(0);
        assert_eq!(book.author_id, None);
    }

    #[tokio::test]
    async fn unknown_author_is_a_constraint_violation() {
        let books = Collection::<Book, _>::new(setup().await);
        let err = books
            .create(json!({"title": "Orphan", "authorId": 404}))
            .await
            .unwrap_err();
        assert!(err.is_constraint_violation(), "unexpected error: {err}");
    }
}
