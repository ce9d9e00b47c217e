pub mod dto;
pub mod entity;
pub mod error;
pub mod page;
pub mod token_claim;
pub use entity::Entity;
pub use error::{Error, StoreError};
pub use page::{Page, PageRequest};
pub use token_claim::TokenClaim;
