use sqlx::PgConnection;

use kernel::interface::query::BookQuery;
use kernel::interface::update::BookModifier;
use kernel::prelude::entity::{Book, BookAuthor, BookId, BookTitle, BookYear};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresBookRepository;

#[async_trait::async_trait]
impl BookQuery for PostgresBookRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        PgBookInternal::find_by_id(con, id).await
    }

    async fn find_by_ids(
        &self,
        con: &mut PostgresTransaction,
        ids: &[BookId],
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        PgBookInternal::find_by_ids(con, ids).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        PgBookInternal::find_all(con).await
    }
}

#[async_trait::async_trait]
impl BookModifier for PostgresBookRepository {
    type Transaction = PostgresTransaction;

    async fn save(
        &self,
        con: &mut PostgresTransaction,
        book: Book,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        if book.id().is_none() {
            PgBookInternal::insert(con, book).await.map(Some)
        } else {
            PgBookInternal::update(con, book).await
        }
    }

    async fn delete(
        &self,
        con: &mut PostgresTransaction,
        book_id: &BookId,
    ) -> error_stack::Result<(), KernelError> {
        PgBookInternal::delete(con, book_id).await
    }
}

#[derive(sqlx::FromRow)]
struct BookRow {
    id: i32,
    title: String,
    author: String,
    year: i32,
}

impl From<BookRow> for Book {
    fn from(value: BookRow) -> Self {
        Book::new(
            Some(BookId::new(value.id)),
            BookTitle::new(value.title),
            BookAuthor::new(value.author),
            BookYear::new(value.year),
        )
    }
}

pub(in crate::database) struct PgBookInternal;

impl PgBookInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &BookId,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, author, year
            FROM books
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Book::from))
    }

    async fn find_by_ids(
        con: &mut PgConnection,
        ids: &[BookId],
    ) -> error_stack::Result<Vec<Book>, KernelError> {
        let ids = ids.iter().map(|id| *id.as_ref()).collect::<Vec<i32>>();
        let rows = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, author, year
            FROM books
            WHERE id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(ids)
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn find_all(con: &mut PgConnection) -> error_stack::Result<Vec<Book>, KernelError> {
        let rows = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            SELECT id, title, author, year
            FROM books
            ORDER BY id
            "#,
        )
        .fetch_all(con)
        .await
        .convert_error()?;
        Ok(rows.into_iter().map(Book::from).collect())
    }

    async fn insert(con: &mut PgConnection, book: Book) -> error_stack::Result<Book, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            INSERT INTO books (title, author, year)
            VALUES ($1, $2, $3)
            RETURNING id, title, author, year
            "#,
        )
        .bind(book.title().as_ref())
        .bind(book.author().as_ref())
        .bind(book.year().as_ref())
        .fetch_one(con)
        .await
        .convert_error()?;
        Ok(Book::from(row))
    }

    async fn update(
        con: &mut PgConnection,
        book: Book,
    ) -> error_stack::Result<Option<Book>, KernelError> {
        let row = sqlx::query_as::<_, BookRow>(
            // language=postgresql
            r#"
            UPDATE books
            SET title = $2, author = $3, year = $4
            WHERE id = $1
            RETURNING id, title, author, year
            "#,
        )
        .bind(book.id().map(|id| *id.as_ref()))
        .bind(book.title().as_ref())
        .bind(book.author().as_ref())
        .bind(book.year().as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        Ok(row.map(Book::from))
    }

    async fn delete(con: &mut PgConnection, book_id: &BookId) -> error_stack::Result<(), KernelError> {
        // language=postgresql
        sqlx::query(
            r#"
            DELETE FROM books
            WHERE id = $1
            "#,
        )
        .bind(book_id.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use kernel::interface::database::DatabaseConnection;
    use kernel::interface::query::BookQuery;
    use kernel::interface::update::BookModifier;
    use kernel::prelude::entity::{Book, BookAuthor, BookTitle, BookYear};
    use kernel::KernelError;

    use crate::database::postgres::book::PostgresBookRepository;
    use crate::database::postgres::PostgresDatabase;

    fn book(title: &str) -> Book {
        Book::new(
            None,
            BookTitle::new(title),
            BookAuthor::new("Author"),
            BookYear::new(2024),
        )
    }

    // Nothing is committed, so every test leaves the table as it found it.
    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn save_find_delete() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let saved = PostgresBookRepository
            .save(&mut con, book("test"))
            .await?
            .expect("inserted");
        let id = saved.id().expect("id assigned by postgres");

        let found = PostgresBookRepository.find_by_id(&mut con, &id).await?;
        assert_eq!(found, Some(saved.clone()));

        let saved = saved.reconstruct(|b| b.title = BookTitle::new("test2"));
        let updated = PostgresBookRepository.save(&mut con, saved.clone()).await?;
        assert_eq!(updated, Some(saved.clone()));

        let found = PostgresBookRepository.find_by_id(&mut con, &id).await?;
        assert_eq!(found, Some(saved.clone()));

        PostgresBookRepository.delete(&mut con, &id).await?;
        let found = PostgresBookRepository.find_by_id(&mut con, &id).await?;
        assert!(found.is_none());

        PostgresBookRepository.delete(&mut con, &id).await?;

        let stale = PostgresBookRepository.save(&mut con, saved).await?;
        assert!(stale.is_none());
        let found = PostgresBookRepository.find_by_id(&mut con, &id).await?;
        assert!(found.is_none());

        Ok(())
    }

    #[test_with::env(POSTGRES_TEST)]
    #[tokio::test]
    async fn find_by_ids_skips_unknown() -> error_stack::Result<(), KernelError> {
        let db = PostgresDatabase::new().await?;
        let mut con = db.transact().await?;

        let first = PostgresBookRepository
            .save(&mut con, book("first"))
            .await?
            .expect("inserted");
        let second = PostgresBookRepository
            .save(&mut con, book("second"))
            .await?
            .expect("inserted");
        let first_id = first.id().expect("id assigned by postgres");
        let second_id = second.id().expect("id assigned by postgres");

        PostgresBookRepository.delete(&mut con, &second_id).await?;

        let found = PostgresBookRepository
            .find_by_ids(&mut con, &[first_id, second_id])
            .await?;
        assert_eq!(found, vec![first.clone()]);

        let all = PostgresBookRepository.find_all(&mut con).await?;
        assert!(all.contains(&first));
        assert!(!all.contains(&second));

        Ok(())
    }
}
