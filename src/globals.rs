use crate::error::Result;
use std::sync::OnceLock;
use std::time::Duration;

/// Used when nothing configured the client before first use
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Global HTTP client for all network requests
static HTTP_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

fn build_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(30)))
        .pool_max_idle_per_host(10)
        .build()
}

/// Initialize the global HTTP client with the configured API timeout
/// This should be called once at application startup
pub fn init_http_client(timeout: Duration) -> Result<()> {
    let client = build_client(timeout)?;
    HTTP_CLIENT
        .set(client)
        .map_err(|_| anyhow::anyhow!("HTTP client already initialized"))?;
    Ok(())
}

/// Get a reference to the global HTTP client
/// Lazily initialized with the default timeout on first access
pub fn http_client() -> &'static reqwest::Client {
    HTTP_CLIENT.get_or_init(|| build_client(DEFAULT_TIMEOUT).expect("Failed to create HTTP client"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_client_singleton() {
        let client1 = http_client();
        let client2 = http_client();
        assert!(std::ptr::eq(client1, client2));
    }

    #[test]
    fn test_init_after_first_use_fails() {
        let _ = http_client();
        assert!(init_http_client(Duration::from_secs(5)).is_err());
    }
}
