pub mod entity;
pub mod token;
pub use entity::EntityService;
pub use token::TokenService;
