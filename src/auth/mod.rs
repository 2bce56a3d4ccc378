pub mod extractors;
pub mod middleware;
pub mod token;

use serde::{Deserialize, Serialize};

pub use extractors::AuthenticatedLogin;
pub use middleware::AuthMiddleware;
pub use token::{generate_token, verify_token, Claims};

/// Response body of a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer token to send in the `Authorization` header.
    pub token: String,
    /// Id of the authenticated login.
    pub login_id: i32,
}
