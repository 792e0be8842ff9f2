use std::collections::HashSet;

use application::transfer::BookDto;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use kernel::prelude::entity::BookId;
use serde::Serialize;

use crate::controller::Exhaust;

pub const MISSING_SET: &str = "x-missing-set";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookResponse {
    id: Option<i32>,
    book_title: String,
    book_author: String,
    book_year: i32,
}

impl From<BookDto> for BookResponse {
    fn from(value: BookDto) -> Self {
        let BookDto {
            id,
            title,
            author,
            year,
        } = value;
        Self {
            id,
            book_title: title,
            book_author: author,
            book_year: year,
        }
    }
}

impl IntoResponse for BookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[derive(Debug)]
pub struct CreatedBookResponse(BookResponse);

impl From<BookDto> for CreatedBookResponse {
    fn from(value: BookDto) -> Self {
        Self(BookResponse::from(value))
    }
}

impl IntoResponse for CreatedBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self.0)).into_response()
    }
}

/// Books found for an id list, plus the requested ids that matched nothing.
#[derive(Debug)]
pub struct BooksResponse {
    books: Vec<BookResponse>,
    missing: Vec<i32>,
}

impl IntoResponse for BooksResponse {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::OK, Json(self.books)).into_response();
        if !self.missing.is_empty() {
            let joined = self
                .missing
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(",");
            // digits and commas only, always a valid header value
            if let Ok(value) = HeaderValue::from_str(&joined) {
                response.headers_mut().insert(MISSING_SET, value);
            }
        }
        response
    }
}

#[derive(Debug)]
pub struct DeletedBookResponse {
    id: i32,
}

impl IntoResponse for DeletedBookResponse {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            format!("Book with ID {} successfully deleted.", self.id),
        )
            .into_response()
    }
}

pub struct BookPresenter;

impl Exhaust<Option<BookDto>> for BookPresenter {
    type To = Option<BookResponse>;
    fn emit(&self, input: Option<BookDto>) -> Self::To {
        input.map(BookResponse::from)
    }
}

impl Exhaust<Vec<BookDto>> for BookPresenter {
    type To = Json<Vec<BookResponse>>;
    fn emit(&self, input: Vec<BookDto>) -> Self::To {
        Json(input.into_iter().map(BookResponse::from).collect())
    }
}

impl Exhaust<(Vec<BookId>, Vec<BookDto>)> for BookPresenter {
    type To = BooksResponse;
    fn emit(&self, (requested, found): (Vec<BookId>, Vec<BookDto>)) -> Self::To {
        let present = found.iter().filter_map(|book| book.id).collect::<HashSet<_>>();
        let missing = requested
            .into_iter()
            .map(|id| *id.as_ref())
            .filter(|id| !present.contains(id))
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            tracing::info!(?missing, "requested books not found");
        }
        BooksResponse {
            books: found.into_iter().map(BookResponse::from).collect(),
            missing,
        }
    }
}

/// `Some(id)` once the book is gone, `None` if there was nothing to delete.
impl Exhaust<Option<BookId>> for BookPresenter {
    type To = Option<DeletedBookResponse>;
    fn emit(&self, input: Option<BookId>) -> Self::To {
        input.map(|id| DeletedBookResponse { id: *id.as_ref() })
    }
}

/// Presents the result of a create, answering with `201 Created`.
pub struct CreatedPresenter;

impl Exhaust<Option<BookDto>> for CreatedPresenter {
    type To = Option<CreatedBookResponse>;
    fn emit(&self, input: Option<BookDto>) -> Self::To {
        input.map(CreatedBookResponse::from)
    }
}
