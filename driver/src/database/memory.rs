use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::DependOnBookQuery;
use kernel::interface::update::DependOnBookModifier;
use kernel::prelude::entity::Book;
use kernel::KernelError;

pub use self::book::*;

mod book;

/// Process local storage backend. Contents are lost when the last handle is dropped.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    store: Arc<RwLock<BookStore>>,
}

#[derive(Default)]
pub(in crate::database) struct BookStore {
    books: BTreeMap<i32, Book>,
    sequence: i32,
}

impl BookStore {
    /// Ids are handed out once; deleted ids are never reissued.
    fn next_id(&mut self) -> i32 {
        self.sequence += 1;
        self.sequence
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for InMemoryDatabase {
    type Transaction = InMemoryTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        Ok(InMemoryTransaction(Arc::clone(&self.store)))
    }
}

/// Writes are visible immediately, so committing has nothing left to do.
pub struct InMemoryTransaction(Arc<RwLock<BookStore>>);

#[async_trait::async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

impl DependOnBookQuery for InMemoryDatabase {
    type BookQuery = InMemoryBookRepository;
    fn book_query(&self) -> &Self::BookQuery {
        &InMemoryBookRepository
    }
}

impl DependOnBookModifier for InMemoryDatabase {
    type BookModifier = InMemoryBookRepository;
    fn book_modifier(&self) -> &Self::BookModifier {
        &InMemoryBookRepository
    }
}
