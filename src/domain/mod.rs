pub mod hints;
pub mod reference;
pub mod summary;
