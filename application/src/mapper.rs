use kernel::prelude::entity::{Book, BookAuthor, BookTitle, BookYear, DestructBook};

use crate::transfer::BookDto;

/// Converts between a persisted entity and its transfer shape.
pub trait Mapper<Entity, Dto>: 'static + Sync + Send {
    fn map_to_entity(&self, dto: Dto) -> Entity;
    fn map_to_dto(&self, entity: Entity) -> Dto;
}

pub struct BookMapper;

impl Mapper<Book, BookDto> for BookMapper {
    fn map_to_entity(&self, dto: BookDto) -> Book {
        // the storage layer assigns ids, so whatever the caller sent is dropped
        Book::new(
            None,
            BookTitle::new(dto.title),
            BookAuthor::new(dto.author),
            BookYear::new(dto.year),
        )
    }

    fn map_to_dto(&self, entity: Book) -> BookDto {
        let DestructBook {
            id,
            title,
            author,
            year,
        } = entity.into_destruct();
        BookDto {
            id: id.map(|id| *id.as_ref()),
            title: title.as_ref().clone(),
            author: author.as_ref().clone(),
            year: *year.as_ref(),
        }
    }
}

#[cfg(test)]
mod test {
    use kernel::prelude::entity::{Book, BookAuthor, BookId, BookTitle, BookYear};

    use crate::mapper::{BookMapper, Mapper};
    use crate::transfer::BookDto;

    fn book(id: Option<i32>) -> Book {
        Book::new(
            id.map(BookId::new),
            BookTitle::new("Title"),
            BookAuthor::new("Author"),
            BookYear::new(2024),
        )
    }

    fn dto(id: Option<i32>) -> BookDto {
        BookDto {
            id,
            title: "Title".to_string(),
            author: "Author".to_string(),
            year: 2024,
        }
    }

    #[test]
    fn map_to_entity_drops_id() {
        assert_eq!(BookMapper.map_to_entity(dto(Some(7))), book(None));
        assert_eq!(BookMapper.map_to_entity(dto(None)), book(None));
    }

    #[test]
    fn map_to_dto_copies_every_field() {
        assert_eq!(BookMapper.map_to_dto(book(Some(1))), dto(Some(1)));
        assert_eq!(BookMapper.map_to_dto(book(None)), dto(None));
    }

    #[test]
    fn entity_survives_round_trip_without_id() {
        let original = book(Some(3));
        let restored = BookMapper.map_to_entity(BookMapper.map_to_dto(original.clone()));
        assert_eq!(restored.title(), original.title());
        assert_eq!(restored.author(), original.author());
        assert_eq!(restored.year(), original.year());
        assert!(restored.id().is_none());
    }
}
