mod author;
mod id;
mod title;
mod year;

pub use self::{author::*, id::*, title::*, year::*};
use destructure::{Destructure, Mutation};
use vodca::References;

/// Persisted form of a book.
///
/// `id` stays `None` until the storage layer assigns one, after which it never changes.
#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Book {
    id: Option<BookId>,
    title: BookTitle,
    author: BookAuthor,
    year: BookYear,
}

impl Book {
    pub fn new(
        id: Option<BookId>,
        title: BookTitle,
        author: BookAuthor,
        year: BookYear,
    ) -> Self {
        Self {
            id,
            title,
            author,
            year,
        }
    }
}
