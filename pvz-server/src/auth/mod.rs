//! Authentication and authorization

pub mod jwt;
pub mod middleware;
pub mod permissions;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{gate, require_auth};
pub use permissions::Operation;
