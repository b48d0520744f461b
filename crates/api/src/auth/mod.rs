//! Authentication: JWT issuing and verification, password hashing, and
//! the Bearer-token middleware.

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::Claims;
