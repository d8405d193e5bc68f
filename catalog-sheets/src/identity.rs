//! Who is running an operation

/// Identity recorded when nobody is known
pub const SYSTEM_USER: &str = "system";

/// Supplies the current user's name, if any
pub trait IdentityProvider: Send + Sync {
    fn current_user(&self) -> Option<String>;
}

/// Fixed identity, typically from configuration
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user: Option<String>,
}

impl StaticIdentity {
    pub fn new(user: Option<String>) -> Self {
        Self { user }
    }

    pub fn system() -> Self {
        Self::default()
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_user(&self) -> Option<String> {
        self.user.clone()
    }
}

/// Name to stamp on records; blank or missing names become [`SYSTEM_USER`]
pub fn uploader(provider: &dyn IdentityProvider) -> String {
    provider
        .current_user()
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| SYSTEM_USER.to_string())
}
