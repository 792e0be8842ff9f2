use application::service::{
    CreateBookService, DeleteBookService, GetBookService, UpdateBookService,
};
use application::transfer::GetBookDto;
use axum::extract::State;
use axum::routing::get;
use axum::Router;
use axum_extra::extract::Query;
use error_stack::Report;
use kernel::interface::query::DependOnBookQuery;
use kernel::interface::update::DependOnBookModifier;
use kernel::KernelError;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    BookRequest, BookTransformer, DeleteBookRequest, GetBookRequest, GetBooksRequest, PathBookId,
    Validated,
};
use crate::response::{BookPresenter, CreatedPresenter};

pub trait BookRouter {
    fn route_book(self) -> Self;
}

impl<D> BookRouter for Router<AppModule<D>>
where
    D: DependOnBookQuery + DependOnBookModifier,
{
    fn route_book(self) -> Self {
        self.route(
            "/api/book",
            get(
                |State(module): State<AppModule<D>>, Query(req): Query<GetBooksRequest>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .try_intake(req)?
                        .handle(|dto| async move {
                            let requested = dto.ids.clone();
                            let books = module.database().get_books(dto).await?;
                            Ok::<_, Report<KernelError>>((requested, books))
                        })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule<D>>, Validated(req): Validated<BookRequest>| async move {
                    Controller::new(BookTransformer, CreatedPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.database().create_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)?
                        .ok_or(ErrorStatus::CreationFailed)
                },
            ),
        )
        .route(
            "/api/book/all",
            get(|State(module): State<AppModule<D>>| async move {
                Controller::<(), _, (), (), _>::new((), BookPresenter)
                    .bypass(|| async move { module.database().get_all_books().await })
                    .await
                    .map_err(ErrorStatus::from)
            }),
        )
        .route(
            "/api/book/:id",
            get(
                |State(module): State<AppModule<D>>, PathBookId(id): PathBookId| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(GetBookRequest::new(id))
                        .handle(|dto| async move { module.database().get_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)?
                        .ok_or_else(|| ErrorStatus::NotFound(format!("Book with ID {id} not found")))
                },
            )
            .put(
                |State(module): State<AppModule<D>>,
                 PathBookId(id): PathBookId,
                 Validated(req): Validated<BookRequest>| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake((id, req))
                        .handle(|dto| async move { module.database().update_book(dto).await })
                        .await
                        .map_err(ErrorStatus::from)?
                        .ok_or_else(|| ErrorStatus::NotFound(format!("Book Id With {id} not found")))
                },
            )
            .delete(
                |State(module): State<AppModule<D>>, PathBookId(id): PathBookId| async move {
                    Controller::new(BookTransformer, BookPresenter)
                        .intake(DeleteBookRequest::new(id))
                        .handle(|dto| async move {
                            let database = module.database();
                            let id = dto.id;
                            let found = database.get_book(GetBookDto { id }).await?;
                            if found.is_none() {
                                return Ok::<_, Report<KernelError>>(None);
                            }
                            database.delete_book(dto).await?;
                            Ok(Some(id))
                        })
                        .await
                        .map_err(ErrorStatus::from)?
                        .ok_or_else(|| ErrorStatus::NotFound(format!("Book Id With {id} not found")))
                },
            ),
        )
    }
}
