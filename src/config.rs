//! Configuration management for the i-Reporter App Interface mock.
//!
//! Configuration is read once at startup from command-line arguments and
//! environment variables (a `.env` file is honoured by the binary), then
//! handed to the router. Nothing reads the environment after that.
//!
//! # Environment Variables
//!
//! - `PORT` - Server port (default: 3000)
//! - `API_TOKEN` - Bearer token clients must send (default: gateway-pass)
//! - `IREPORTER_HOST` - Server bind address (default: 0.0.0.0)
//! - `IREPORTER_UPLOAD_DIR` - Where uploaded files are written (default: ./uploads)
//! - `IREPORTER_MAX_BODY_BYTES` - Request body limit (default: 64 MiB)
//! - `IREPORTER_CORS_ORIGINS` - Allowed CORS origins, comma-separated (default: any)

use std::path::PathBuf;

use clap::Parser;

use crate::server::RouterConfig;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Token accepted when none is configured.
pub const DEFAULT_API_TOKEN: &str = "gateway-pass";

/// Default uploads directory.
pub const DEFAULT_UPLOAD_DIR: &str = "./uploads";

/// Default request body limit (64 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024 * 1024;

// =============================================================================
// CLI Arguments
// =============================================================================

/// i-Reporter App Interface mock server.
///
/// Serves canned equipment measurements and a small product master behind a
/// static bearer token, for exercising i-Reporter gateway integrations.
#[derive(Parser, Debug, Clone)]
#[command(name = "ireporter-mock")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "IREPORTER_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PORT")]
    pub port: u16,

    // =========================================================================
    // Authentication Configuration
    // =========================================================================
    /// Bearer token clients must present in the Authorization header.
    #[arg(long, default_value = DEFAULT_API_TOKEN, env = "API_TOKEN", hide_env_values = true)]
    pub api_token: String,

    // =========================================================================
    // Request Handling
    // =========================================================================
    /// Directory where files attached to getValue are written.
    #[arg(long, default_value = DEFAULT_UPLOAD_DIR, env = "IREPORTER_UPLOAD_DIR")]
    pub upload_dir: PathBuf,

    /// Maximum request body size in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_BODY_BYTES, env = "IREPORTER_MAX_BODY_BYTES")]
    pub max_body_bytes: usize,

    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "IREPORTER_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.api_token.is_empty() {
            return Err(
                "API token must not be empty. Set --api-token or API_TOKEN".to_string(),
            );
        }

        if self.port == 0 {
            return Err("port must be greater than 0".to_string());
        }

        if self.upload_dir.as_os_str().is_empty() {
            return Err(
                "upload directory must not be empty. Set --upload-dir or IREPORTER_UPLOAD_DIR"
                    .to_string(),
            );
        }

        if self.max_body_bytes == 0 {
            return Err("max_body_bytes must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether the built-in fallback token is in use.
    pub fn uses_default_token(&self) -> bool {
        self.api_token == DEFAULT_API_TOKEN
    }

    /// Build the router configuration.
    pub fn router_config(&self) -> RouterConfig {
        let mut router_config = RouterConfig::new(&self.api_token)
            .with_upload_dir(&self.upload_dir)
            .with_max_body_bytes(self.max_body_bytes)
            .with_tracing(!self.no_tracing);

        if let Some(ref origins) = self.cors_origins {
            router_config = router_config.with_cors_origins(origins.clone());
        }

        router_config
    }
}

// =============================================================================
// Tests
// =============================================================================
