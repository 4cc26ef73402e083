use secrecy::SecretString;

/// Provider connection settings shared across the CLI and server wiring.
#[derive(Clone)]
pub struct GlobalArgs {
    pub provider_url: String,
    pub provider_anon_key: SecretString,
    pub provider_service_key: Option<SecretString>,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(provider_url: String, anon_key: SecretString) -> Self {
        Self {
            provider_url,
            provider_anon_key: anon_key,
            provider_service_key: None,
        }
    }

    #[must_use]
    pub fn with_service_key(mut self, service_key: SecretString) -> Self {
        self.provider_service_key = Some(service_key);
        self
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("provider_url", &self.provider_url)
            .field("provider_anon_key", &"***")
            .field(
                "provider_service_key",
                &self.provider_service_key.as_ref().map(|_| "***"),
            )
            .finish()
    }
}
