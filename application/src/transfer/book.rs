use kernel::prelude::entity::BookId;

/// Transfer shape of a book. `id` is ignored on the way in and populated on the way out.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BookDto {
    pub id: Option<i32>,
    pub title: String,
    pub author: String,
    pub year: i32,
}

pub struct GetBookDto {
    pub id: BookId,
}

pub struct GetBooksDto {
    pub ids: Vec<BookId>,
}

pub struct CreateBookDto {
    pub book: BookDto,
}

pub struct UpdateBookDto {
    pub id: BookId,
    pub book: BookDto,
}

pub struct DeleteBookDto {
    pub id: BookId,
}
