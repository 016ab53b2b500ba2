//! Option schema definitions.

/// Default payload ceiling for every body decoder: 1 MiB.
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Default certificate validity window, in days.
pub const DEFAULT_VALIDITY_DAYS: i64 = 365;

/// Default certificate subject name.
pub const DEFAULT_COMMON_NAME: &str = "localhost";

/// Root options for [`create`](crate::create).
#[derive(Debug, Clone, Default)]
pub struct ServerOptions {
    /// Request body decoding, forwarded to the body middleware.
    pub body_parser: BodyParser,

    /// Encrypted endpoint configuration, forwarded to the certificate
    /// collaborator. `TlsOptions::Disabled` yields a plain-only server.
    pub certificate: TlsOptions,
}

impl ServerOptions {
    /// Options with every default: dual listeners, body parsing on.
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable request body decoding entirely.
    pub fn without_body_parser(mut self) -> Self {
        self.body_parser = BodyParser::Disabled;
        self
    }

    /// Disable the encrypted endpoint; only the plain listener is bound.
    pub fn without_tls(mut self) -> Self {
        self.certificate = TlsOptions::Disabled;
        self
    }

    /// Override the shared payload ceiling (bytes) for all body decoders.
    /// Re-enables parsing if it was disabled.
    pub fn body_limit(mut self, limit: usize) -> Self {
        let mut config = match self.body_parser {
            BodyParser::Enabled(config) => config,
            BodyParser::Disabled => BodyParserConfig::default(),
        };
        config.limit = limit;
        self.body_parser = BodyParser::Enabled(config);
        self
    }

    /// Use a specific certificate descriptor for the encrypted endpoint.
    pub fn certificate(mut self, options: impl Into<CertificateOptions>) -> Self {
        self.certificate = TlsOptions::SelfSigned(options.into());
        self
    }
}

/// Request body decoding mode.
#[derive(Debug, Clone)]
pub enum BodyParser {
    /// Decode JSON, plain-text, URL-encoded form and raw binary bodies.
    Enabled(BodyParserConfig),

    /// Leave request bodies untouched.
    Disabled,
}

impl Default for BodyParser {
    fn default() -> Self {
        BodyParser::Enabled(BodyParserConfig::default())
    }
}

/// Payload ceilings for the four content-type decoders.
///
/// Each decoder uses its own override when set, otherwise the shared
/// `limit`. Bodies over the ceiling are answered `413` without reaching the
/// handler.
#[derive(Debug, Clone)]
pub struct BodyParserConfig {
    /// Shared ceiling in bytes.
    pub limit: usize,

    /// Override for `application/json` bodies.
    pub json_limit: Option<usize>,

    /// Override for `text/plain` bodies.
    pub text_limit: Option<usize>,

    /// Override for `application/x-www-form-urlencoded` bodies.
    pub form_limit: Option<usize>,

    /// Override for `application/octet-stream` bodies.
    pub raw_limit: Option<usize>,
}

impl Default for BodyParserConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_BODY_LIMIT,
            json_limit: None,
            text_limit: None,
            form_limit: None,
            raw_limit: None,
        }
    }
}

/// Encrypted endpoint configuration.
#[derive(Debug, Clone)]
pub enum TlsOptions {
    /// Generate a self-signed certificate at construction time.
    SelfSigned(CertificateOptions),

    /// Do not bind an encrypted listener.
    Disabled,
}

impl Default for TlsOptions {
    fn default() -> Self {
        TlsOptions::SelfSigned(CertificateOptions::default())
    }
}

/// Descriptor forwarded verbatim to the certificate collaborator.
#[derive(Debug, Clone)]
pub struct CertificateOptions {
    /// Subject common name, also added as a subject alternative name.
    pub common_name: String,

    /// Validity window in days, anchored at generation time.
    pub validity_days: i64,
}

impl Default for CertificateOptions {
    fn default() -> Self {
        Self {
            common_name: DEFAULT_COMMON_NAME.to_string(),
            validity_days: DEFAULT_VALIDITY_DAYS,
        }
    }
}

impl CertificateOptions {
    /// Descriptor with the given subject name and default validity.
    pub fn with_common_name(common_name: impl Into<String>) -> Self {
        Self {
            common_name: common_name.into(),
            ..Self::default()
        }
    }
}

/// A bare string names the certificate subject, defaults for the rest.
impl From<&str> for CertificateOptions {
    fn from(common_name: &str) -> Self {
        Self::with_common_name(common_name)
    }
}

impl From<String> for CertificateOptions {
    fn from(common_name: String) -> Self {
        Self::with_common_name(common_name)
    }
}
