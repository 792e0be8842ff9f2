use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::query::{BookQuery, DependOnBookQuery};
use kernel::interface::update::{BookModifier, DependOnBookModifier};
use kernel::prelude::entity::{BookAuthor, BookTitle, BookYear};
use kernel::KernelError;

use crate::mapper::{BookMapper, Mapper};
use crate::transfer::{
    BookDto, CreateBookDto, DeleteBookDto, GetBookDto, GetBooksDto, UpdateBookDto,
};

#[async_trait::async_trait]
pub trait GetBookService: 'static + Sync + Send + DependOnBookQuery {
    async fn get_book(&self, dto: GetBookDto) -> error_stack::Result<Option<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let book = self.book_query().find_by_id(&mut connection, &dto.id).await?;
        connection.commit().await?;

        Ok(book.map(|book| BookMapper.map_to_dto(book)))
    }

    async fn get_books(&self, dto: GetBooksDto) -> error_stack::Result<Vec<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let books = self
            .book_query()
            .find_by_ids(&mut connection, &dto.ids)
            .await?;
        connection.commit().await?;

        Ok(books
            .into_iter()
            .map(|book| BookMapper.map_to_dto(book))
            .collect())
    }

    async fn get_all_books(&self) -> error_stack::Result<Vec<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let books = self.book_query().find_all(&mut connection).await?;
        connection.commit().await?;

        Ok(books
            .into_iter()
            .map(|book| BookMapper.map_to_dto(book))
            .collect())
    }
}

impl<T> GetBookService for T where T: DependOnBookQuery {}

#[async_trait::async_trait]
pub trait CreateBookService: 'static + Sync + Send + DependOnBookModifier {
    /// Returns `None` when storage hands back a record that was never assigned an id.
    async fn create_book(
        &self,
        dto: CreateBookDto,
    ) -> error_stack::Result<Option<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let book = BookMapper.map_to_entity(dto.book);
        let saved = self.book_modifier().save(&mut connection, book).await?;
        connection.commit().await?;

        Ok(saved
            .filter(|book| book.id().is_some())
            .map(|book| BookMapper.map_to_dto(book)))
    }
}

impl<T> CreateBookService for T where T: DependOnBookModifier {}

#[async_trait::async_trait]
pub trait UpdateBookService:
    'static + Sync + Send + DependOnBookQuery + DependOnBookModifier
{
    /// Returns `None` if no book is stored under `dto.id`; nothing is written in that case.
    async fn update_book(
        &self,
        dto: UpdateBookDto,
    ) -> error_stack::Result<Option<BookDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;

        let Some(mut book) = self.book_query().find_by_id(&mut connection, &dto.id).await? else {
            return Ok(None);
        };

        let BookDto {
            title,
            author,
            year,
            ..
        } = dto.book;
        book.substitute(|book| {
            *book.title = BookTitle::new(title);
            *book.author = BookAuthor::new(author);
            *book.year = BookYear::new(year);
        });

        let updated = self.book_modifier().save(&mut connection, book).await?;
        connection.commit().await?;

        Ok(updated.map(|book| BookMapper.map_to_dto(book)))
    }
}

impl<T> UpdateBookService for T where T: DependOnBookQuery + DependOnBookModifier {}

#[async_trait::async_trait]
pub trait DeleteBookService: 'static + Sync + Send + DependOnBookModifier {
    async fn delete_book(&self, dto: DeleteBookDto) -> error_stack::Result<(), KernelError> {
        let mut connection = self.database_connection().transact().await?;

        self.book_modifier().delete(&mut connection, &dto.id).await?;
        connection.commit().await?;

        Ok(())
    }
}

impl<T> DeleteBookService for T where T: DependOnBookModifier {}

#[cfg(test)]
mod test {
    use driver::database::InMemoryDatabase;
    use kernel::prelude::entity::BookId;
    use kernel::KernelError;

    use crate::service::{CreateBookService, DeleteBookService, GetBookService, UpdateBookService};
    use crate::transfer::{
        BookDto, CreateBookDto, DeleteBookDto, GetBookDto, GetBooksDto, UpdateBookDto,
    };

    fn dto(title: &str, author: &str, year: i32) -> BookDto {
        BookDto {
            id: None,
            title: title.to_string(),
            author: author.to_string(),
            year,
        }
    }

    async fn create(db: &InMemoryDatabase, book: BookDto) -> BookDto {
        db.create_book(CreateBookDto { book })
            .await
            .unwrap()
            .expect("created book")
    }

    #[tokio::test]
    async fn create_then_get() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::default();
        let created = create(&db, dto("Title", "Author", 2024)).await;
        let id = created.id.expect("assigned id");

        let found = db.get_book(GetBookDto { id: BookId::new(id) }).await?;
        assert_eq!(found, Some(created));
        Ok(())
    }

    #[tokio::test]
    async fn create_ignores_supplied_id() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::default();
        let mut book = dto("Title", "Author", 2024);
        book.id = Some(42);
        let created = create(&db, book).await;

        assert_ne!(created.id, Some(42));
        let found = db.get_book(GetBookDto { id: BookId::new(42) }).await?;
        assert!(found.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn get_missing_book() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::default();
        let found = db.get_book(GetBookDto { id: BookId::new(999) }).await?;
        assert!(found.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn get_books_skips_missing_ids() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::default();
        let first = create(&db, dto("First", "Author", 2001)).await;
        let second = create(&db, dto("Second", "Author", 2002)).await;

        let ids = [first.id, Some(999), second.id]
            .into_iter()
            .flatten()
            .map(BookId::new)
            .collect();
        let found = db.get_books(GetBooksDto { ids }).await?;
        assert_eq!(found, vec![first, second]);

        let found = db.get_books(GetBooksDto { ids: vec![] }).await?;
        assert!(found.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn get_all_books() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::default();
        assert!(db.get_all_books().await?.is_empty());

        let first = create(&db, dto("First", "Author", 2001)).await;
        let second = create(&db, dto("Second", "Author", 2002)).await;
        assert_eq!(db.get_all_books().await?, vec![first, second]);
        Ok(())
    }

    #[tokio::test]
    async fn update_keeps_id() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::default();
        let created = create(&db, dto("Title", "Author", 2024)).await;
        let id = BookId::new(created.id.expect("assigned id"));

        let mut changes = dto("New Title", "New Author", 1999);
        changes.id = Some(12345);
        let updated = db
            .update_book(UpdateBookDto { id, book: changes })
            .await?
            .expect("updated book");
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "New Title");
        assert_eq!(updated.author, "New Author");
        assert_eq!(updated.year, 1999);

        let found = db.get_book(GetBookDto { id }).await?;
        assert_eq!(found, Some(updated));
        assert_eq!(db.get_all_books().await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn update_missing_book_creates_nothing() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::default();
        let updated = db
            .update_book(UpdateBookDto {
                id: BookId::new(999),
                book: dto("Title", "Author", 2024),
            })
            .await?;
        assert!(updated.is_none());
        assert!(db.get_all_books().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn delete_book() -> error_stack::Result<(), KernelError> {
        let db = InMemoryDatabase::default();
        let created = create(&db, dto("Title", "Author", 2024)).await;
        let id = BookId::new(created.id.expect("assigned id"));

        db.delete_book(DeleteBookDto { id }).await?;
        assert!(db.get_book(GetBookDto { id }).await?.is_none());

        // deleting again is a no-op
        db.delete_book(DeleteBookDto { id }).await?;
        Ok(())
    }
}
