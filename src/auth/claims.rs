use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT payload used for authentication.
///
/// The user id always travels as `sub`, both when signing and when verifying.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,   // user ID
    pub iat: usize,  // issued at (unix timestamp)
    pub exp: usize,  // expires at (unix timestamp)
    pub iss: String, // issuer
    pub aud: String, // audience
}
