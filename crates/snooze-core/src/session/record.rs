/// The persisted credential pair used for silent re-authentication.
///
/// A record is always complete: the storage adapter never hands out a token
/// without its username or the reverse.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub token: String,
    pub username: String,
}

impl SessionRecord {
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
        }
    }
}

impl std::fmt::Debug for SessionRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRecord")
            .field("token", &"<redacted>")
            .field("username", &self.username)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_token() {
        let record = SessionRecord::new("secret-token", "alice");
        let debug = format!("{record:?}");
        assert!(!debug.contains("secret-token"));
        assert!(debug.contains("alice"));
    }
}
