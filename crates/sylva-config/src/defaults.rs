//! Built-in defaults shared by the daemon and the client.

/// Default TCP port the parser daemon listens on.
pub const DEFAULT_PORT: u16 = 4466;

/// Default bind address; the daemon accepts clients on every interface.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Identifier selecting the engine's compiled-in model.
pub const BUILTIN_MODEL: &str = "builtin";

/// Default log filter expression used by the binaries.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Default number of connections serviced concurrently.
pub const DEFAULT_MAX_CONNECTIONS: usize = 8;

/// Default socket read and write timeout in milliseconds.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 30_000;

/// Default deadline for a single engine invocation in milliseconds.
pub const DEFAULT_PARSE_TIMEOUT_MS: u64 = 60_000;

/// Default upper bound for a request line, newline included.
pub const DEFAULT_MAX_REQUEST_BYTES: usize = 64 * 1024;

/// Owned bind address used where allocation is required (e.g. serde).
pub fn default_host() -> String {
    DEFAULT_HOST.to_owned()
}

/// Default listening port.
pub const fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Owned model identifier used where allocation is required (e.g. serde).
pub fn default_model() -> String {
    BUILTIN_MODEL.to_owned()
}

/// Default log filter expression used by the binaries.
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned log filter value used where allocation is required (e.g. serde).
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default logging format for the binaries.
pub fn default_log_format() -> crate::logging::LogFormat {
    crate::logging::LogFormat::Json
}

/// Default number of concurrently serviced connections.
pub const fn default_max_connections() -> usize {
    DEFAULT_MAX_CONNECTIONS
}

/// Default socket timeout in milliseconds.
pub const fn default_read_timeout_ms() -> u64 {
    DEFAULT_READ_TIMEOUT_MS
}

/// Default engine deadline in milliseconds.
pub const fn default_parse_timeout_ms() -> u64 {
    DEFAULT_PARSE_TIMEOUT_MS
}

/// Default request line limit in bytes.
pub const fn default_max_request_bytes() -> usize {
    DEFAULT_MAX_REQUEST_BYTES
}
