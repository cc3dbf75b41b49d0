use crate::OwnerId;

const BEARER_PREFIX: &str = "Bearer ";

/// Resolves an opaque credential to the account it belongs to.
pub trait Authenticator {
    /// Returns the owner of `credential`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Unauthorized`] if the credential is not recognized.
    fn authenticate(&self, credential: &str) -> crate::Result<OwnerId>;
}

/// Static table of tokens and the owners they authenticate.
#[derive(Default)]
pub struct TokenTable(crate::HashMap<String, OwnerId>);

impl TokenTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token for `owner`, replacing any previous owner of the token.
    pub fn insert<S: Into<String>>(&mut self, token: S, owner: OwnerId) {
        self.0.insert(token.into(), owner);
    }
}

impl Authenticator for TokenTable {
    fn authenticate(&self, credential: &str) -> crate::Result<OwnerId> {
        self.0.get(credential).cloned().ok_or(crate::Error::Unauthorized)
    }
}

/// Extracts the token of an `Authorization: Bearer <token>` header value.
#[must_use]
pub fn bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authenticates the value of an `Authorization` header.
///
/// # Errors
///
/// Returns [`crate::Error::Unauthorized`] if the header is missing, is not a
/// bearer credential, or the token is not recognized.
pub fn authorize<A: Authenticator + ?Sized>(auth: &A, header: Option<&str>) -> crate::Result<OwnerId> {
    let Some(token) = header.and_then(bearer_token) else {
        log::debug!("Rejecting request without bearer token");
        return Err(crate::Error::Unauthorized);
    };

    auth.authenticate(token)
}
