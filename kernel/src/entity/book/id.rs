use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Fromln, AsRefln)]
pub struct BookId(i32);

impl BookId {
    pub fn new(id: impl Into<i32>) -> Self {
        Self(id.into())
    }
}
