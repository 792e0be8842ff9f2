use std::collections::HashSet;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{Book, BookId};
use kernel::KernelError;

use crate::database::memory::InMemoryTransaction;

pub struct InMemoryBookRepository;

#[async_trait::async_trait]
impl BookQuery for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let store = con.0.read().await;
        let key: i32 = *id.as_ref();
        Ok(store.books.get(&key).cloned())
    }

    async fn find_by_ids(
        &self,
        con: &mut InMemoryTransaction,
        ids: &[BookId],
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        let wanted = ids.iter().map(|id| *id.as_ref()).collect::<HashSet<i32>>();
        let store = con.0.read().await;
        let found = store
            .books
            .iter()
            .filter(|(id, _)| wanted.contains(*id))
            .map(|(_, book)| book.clone())
            .collect();
        Ok(found)
    }

    async fn find_all(
        &self,
        con: &mut InMemoryTransaction,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        let store = con.0.read().await;
        Ok(store.books.values().cloned().collect())
    }
}

#[async_trait::async_trait]
impl BookModifier for InMemoryBookRepository {
    type Transaction = InMemoryTransaction;

    async fn save(
        &self,
        con: &mut InMemoryTransaction,
        book: Book,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let mut store = con.0.write().await;
        let id = match *book.id() {
            Some(id) => {
                let id: i32 = *id.as_ref();
                if !store.books.contains_key(&id) {
                    return Ok(None);
                }
                id
            }
            None => store.next_id(),
        };
        let book = book.reconstruct(|book| book.id = Some(BookId::new(id)));
        store.books.insert(id, book.clone());
        tracing::debug!(id, "saved book");
        Ok(Some(book))
    }

    async fn delete(
        &self,
        con: &mut InMemoryTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        let mut store = con.0.write().await;
        let key: i32 = *book_id.as_ref();
        store.books.remove(&key);
        Ok(())
    }
}
