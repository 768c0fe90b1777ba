//! Signed owner cookies.

use hmac::{Hmac, Mac};
use rand::Rng;
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Issues and verifies owner identities carried in the `user_id` cookie.
///
/// A cookie value has the form `<owner_id>.<hex hmac-sha256(owner_id)>`, keyed
/// by the server secret. A client cannot claim another owner's id without
/// the secret.
#[derive(Clone)]
pub struct AuthService {
    signing_secret: String,
}

impl AuthService {
    /// Creates a new service keyed by `signing_secret`.
    pub fn new(signing_secret: String) -> Self {
        Self { signing_secret }
    }

    /// Creates a service with a random per-process key.
    ///
    /// Cookies issued by it become invalid when the process exits.
    pub fn ephemeral() -> Self {
        let key: [u8; 32] = rand::rng().random();
        Self::new(hex::encode(key))
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length")
    }

    /// Returns the hex-encoded signature of `owner_id`.
    fn sign(&self, owner_id: &str) -> String {
        let mut mac = self.mac();
        mac.update(owner_id.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Generates a fresh owner id and its cookie value.
    pub fn issue(&self) -> (String, String) {
        let owner_id = Uuid::new_v4().to_string();
        let cookie = self.cookie_value(&owner_id);
        (owner_id, cookie)
    }

    /// Builds the cookie value for an existing owner id.
    pub fn cookie_value(&self, owner_id: &str) -> String {
        format!("{}.{}", owner_id, self.sign(owner_id))
    }

    /// Returns the owner id if `cookie` carries a valid signature.
    ///
    /// Comparison is constant-time.
    pub fn verify(&self, cookie: &str) -> Option<String> {
        let (owner_id, signature) = cookie.rsplit_once('.')?;
        if owner_id.is_empty() {
            return None;
        }

        let signature = hex::decode(signature).ok()?;
        let mut mac = self.mac();
        mac.update(owner_id.as_bytes());
        mac.verify_slice(&signature).ok()?;

        Some(owner_id.to_string())
    }
}
