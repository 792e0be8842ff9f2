use std::borrow::Cow;

use application::transfer::{
    BookDto, CreateBookDto, DeleteBookDto, GetBookDto, GetBooksDto, UpdateBookDto,
};
use axum::async_trait;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use kernel::prelude::entity::BookId;
use serde::Deserialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::controller::{Intake, TryIntake};
use crate::error::ErrorStatus;

const ID: &str = "id";

/// The `:id` path segment as an integer.
#[derive(Debug)]
pub struct PathBookId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for PathBookId
where
    S: Send + Sync,
{
    type Rejection = ErrorStatus;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ErrorStatus::BadRequest(rejection.body_text()))?;
        raw.parse::<i32>()
            .map(PathBookId)
            .map_err(|_| ErrorStatus::conversion(ID, raw))
    }
}

/// Body of create and update requests. A client supplied `id` is accepted and ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRequest {
    book_title: Option<String>,
    book_author: Option<String>,
    book_year: Option<i32>,
}

impl BookRequest {
    fn into_dto(self) -> BookDto {
        // only reached after `validate`, so every field is present
        BookDto {
            id: None,
            title: self.book_title.unwrap_or_default(),
            author: self.book_author.unwrap_or_default(),
            year: self.book_year.unwrap_or_default(),
        }
    }
}

impl Validate for BookRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if is_blank(self.book_title.as_deref()) {
            errors.add("bookTitle", required("BookTitle is required"));
        }
        if is_blank(self.book_author.as_deref()) {
            errors.add("bookAuthor", required("Book Author is required"));
        }
        if self.book_year.is_none() {
            errors.add("bookYear", required("Book Year is required"));
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |value| value.trim().is_empty())
}

fn required(message: &'static str) -> ValidationError {
    ValidationError::new("required").with_message(Cow::Borrowed(message))
}

/// `?id=1&id=2`. Comma separated values are split as well.
#[derive(Debug, Deserialize)]
pub struct GetBooksRequest {
    #[serde(default)]
    id: Vec<String>,
}

#[derive(Debug)]
pub struct GetBookRequest {
    id: i32,
}

impl GetBookRequest {
    pub fn new(id: i32) -> Self {
        Self { id }
    }
}

#[derive(Debug)]
pub struct DeleteBookRequest {
    id: i32,
}

impl DeleteBookRequest {
    pub fn new(id: i32) -> Self {
        Self { id }
    }
}

pub struct BookTransformer;

impl Intake<GetBookRequest> for BookTransformer {
    type To = GetBookDto;
    fn emit(&self, input: GetBookRequest) -> Self::To {
        GetBookDto {
            id: BookId::new(input.id),
        }
    }
}

impl TryIntake<GetBooksRequest> for BookTransformer {
    type To = GetBooksDto;
    type Error = ErrorStatus;
    fn emit(&self, input: GetBooksRequest) -> Result<Self::To, Self::Error> {
        if input.id.is_empty() {
            return Err(ErrorStatus::BadRequest(format!(
                "Required parameter '{ID}' is not present."
            )));
        }
        // blank values are skipped rather than rejected
        let ids = input
            .id
            .iter()
            .flat_map(|raw| raw.split(','))
            .map(str::trim)
            .filter(|raw| !raw.is_empty())
            .map(|raw| {
                raw.parse::<i32>()
                    .map(BookId::new)
                    .map_err(|_| ErrorStatus::conversion(ID, raw))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(GetBooksDto { ids })
    }
}

impl Intake<BookRequest> for BookTransformer {
    type To = CreateBookDto;
    fn emit(&self, input: BookRequest) -> Self::To {
        CreateBookDto {
            book: input.into_dto(),
        }
    }
}

impl Intake<(i32, BookRequest)> for BookTransformer {
    type To = UpdateBookDto;
    fn emit(&self, (id, input): (i32, BookRequest)) -> Self::To {
        UpdateBookDto {
            id: BookId::new(id),
            book: input.into_dto(),
        }
    }
}

impl Intake<DeleteBookRequest> for BookTransformer {
    type To = DeleteBookDto;
    fn emit(&self, input: DeleteBookRequest) -> Self::To {
        DeleteBookDto {
            id: BookId::new(input.id),
        }
    }
}
