pub mod entity;
pub mod health;
pub mod message;
pub use entity::*;
pub use health::HealthResponse;
pub use message::Message;

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(components(schemas(Message, HealthResponse, CreateEntityInfo, EntityResponse, EntityPageResponse)))]
/// Captures OpenAPI schemas defined in the DTO module
pub struct OpenApiSchemas;
