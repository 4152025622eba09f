use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub auth: AuthConfig,
    pub assets: AssetsConfig,
    pub pages: PagesConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

/// Session identity and navigation guard settings
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Supabase project JWT secret used to verify session tokens
    pub jwt_secret: String,
    pub session_cookie: String,
    pub login_path: String,
    /// Paths reachable without a session, besides the login page.
    /// Supports exact paths, `prefix/*` and `prefix/**`.
    pub public_paths: Vec<String>,
}

/// Remote asset host (Cloudinary) credentials and upload target
#[derive(Debug, Clone)]
pub struct AssetsConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
    pub api_base_url: String,
    pub signature_algorithm: SignatureAlgorithm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    Sha1,
    Sha256,
}

impl SignatureAlgorithm {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sha1" | "sha-1" => Some(SignatureAlgorithm::Sha1),
            "sha256" | "sha-256" => Some(SignatureAlgorithm::Sha256),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PagesConfig {
    pub dir: PathBuf,
}

impl AssetsConfig {
    /// True when all three Cloudinary secrets are present
    pub fn is_configured(&self) -> bool {
        !self.cloud_name.is_empty() && !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Some(port) = env::var("MAP_NOTES_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.api.port = port;
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = split_list(&v);
        }

        // Auth overrides
        if let Ok(v) = env::var("SUPABASE_JWT_SECRET") {
            self.auth.jwt_secret = v;
        }
        if let Ok(v) = env::var("AUTH_SESSION_COOKIE") {
            self.auth.session_cookie = v;
        }
        if let Ok(v) = env::var("AUTH_LOGIN_PATH") {
            self.auth.login_path = v;
        }
        if let Ok(v) = env::var("AUTH_PUBLIC_PATHS") {
            self.auth.public_paths = split_list(&v);
        }

        // Asset host overrides
        if let Ok(v) = env::var("CLOUDINARY_CLOUD_NAME") {
            self.assets.cloud_name = v;
        }
        if let Ok(v) = env::var("CLOUDINARY_API_KEY") {
            self.assets.api_key = v;
        }
        if let Ok(v) = env::var("CLOUDINARY_API_SECRET") {
            self.assets.api_secret = v;
        }
        if let Ok(v) = env::var("CLOUDINARY_FOLDER") {
            self.assets.folder = v;
        }
        if let Ok(v) = env::var("CLOUDINARY_API_BASE_URL") {
            self.assets.api_base_url = v;
        }
        if let Ok(v) = env::var("CLOUDINARY_SIGNATURE_ALGORITHM") {
            match SignatureAlgorithm::parse(&v) {
                Some(algorithm) => self.assets.signature_algorithm = algorithm,
                None => tracing::warn!("Ignoring unknown CLOUDINARY_SIGNATURE_ALGORITHM '{}'", v),
            }
        }

        // Pages
        if let Ok(v) = env::var("PAGES_DIR") {
            self.pages.dir = PathBuf::from(v);
        }

        self
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 20 * 1024 * 1024, // 20MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
            auth: AuthConfig::defaults(),
            assets: AssetsConfig::defaults(),
            pages: PagesConfig { dir: PathBuf::from("dist") },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            auth: AuthConfig::defaults(),
            assets: AssetsConfig::defaults(),
            pages: PagesConfig { dir: PathBuf::from("dist") },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                port: 3000,
                enable_request_logging: false,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                enable_cors: false,
                cors_origins: Vec::new(),
            },
            auth: AuthConfig::defaults(),
            assets: AssetsConfig::defaults(),
            pages: PagesConfig { dir: PathBuf::from("dist") },
        }
    }
}

impl AuthConfig {
    fn defaults() -> Self {
        Self {
            jwt_secret: String::new(),
            session_cookie: "sb-access-token".to_string(),
            login_path: "/login".to_string(),
            public_paths: vec!["/register".to_string(), "/confirm".to_string(), "/share/**".to_string()],
        }
    }
}

impl AssetsConfig {
    fn defaults() -> Self {
        Self {
            cloud_name: String::new(),
            api_key: String::new(),
            api_secret: String::new(),
            folder: "supermap_notes".to_string(),
            api_base_url: "https://api.cloudinary.com/v1_1".to_string(),
            signature_algorithm: SignatureAlgorithm::Sha1,
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
