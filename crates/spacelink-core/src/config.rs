use crate::constants::DEFAULT_MAX_LISTENERS;

/// Configuration options for the packet transfer service.
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    /// Capacity of the listener table. Registrations past this count are
    /// refused (logged no-op).
    pub max_listeners: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { max_listeners: DEFAULT_MAX_LISTENERS }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.max_listeners, 1000);
    }
}
