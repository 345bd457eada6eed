pub mod auth_service;
pub mod authorized_system_service;
pub mod occurrence_service;
pub mod occurrence_type_service;
pub mod review_service;
pub mod user_service;

pub use authorized_system_service::*;
pub use occurrence_service::*;
pub use occurrence_type_service::*;
pub use review_service::*;
pub use user_service::*;
