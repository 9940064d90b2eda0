//! Domain entities - the core business objects.

mod turn;

pub use turn::{Role, Turn};
