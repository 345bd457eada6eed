pub mod authorized_system;
pub mod occurrence;
pub mod occurrence_type;
pub mod review;
pub mod user;

pub use authorized_system::*;
pub use occurrence::*;
pub use occurrence_type::*;
pub use review::*;
pub use user::*;
