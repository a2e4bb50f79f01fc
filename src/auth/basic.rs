use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::warn;

use super::store::CredentialStore;

const LOGIN_NAME_KEY: &str = "LoginName";
const PASSWORD_KEY: &str = "Password";

/// Login/password pair for HTTP Basic authentication.
pub struct BasicAuth {
    login: String,
    password: String,
}

impl BasicAuth {
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
        }
    }

    /// Resolves `"{guid}:LoginName"` and `"{guid}:Password"` from the store.
    ///
    /// A missing key is logged and sent as an empty string, leaving the
    /// server to reject the request.
    pub fn resolve(store: &impl CredentialStore, guid: &str) -> Self {
        let lookup = |name: &str| {
            let key = format!("{guid}:{name}");
            store.get(&key).unwrap_or_else(|| {
                warn!("No credential configured for key '{key}'");
                String::new()
            })
        };

        Self::new(lookup(LOGIN_NAME_KEY), lookup(PASSWORD_KEY))
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    /// Value for the `Authorization` header: `Basic base64("login:password")`.
    ///
    /// The pair is encoded from its UTF-8 bytes; non-ASCII characters are
    /// kept, not replaced with `?`.
    pub fn header_value(&self) -> String {
        let encoded = STANDARD.encode(format!("{}:{}", self.login, self.password));
        format!("Basic {encoded}")
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .finish()
    }
}
