use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub mail_service_url: String,
    pub mail_service_token: String,
    pub jwt_secret: String,
    pub auth_issuer: String,
    pub admin_email_list: Vec<String>,
    pub frontend_url: String,
    pub password_reset_ttl_secs: u64,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

/// Credentials for the superuser created at startup when it does not exist yet.
#[derive(Clone)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "8000".to_string()).parse().expect("PORT must be a number"),
            mail_service_url: env::var("MAIL_SERVICE_URL").unwrap_or_else(|_| "http://localhost:8025/api/v1/send".to_string()),
            mail_service_token: env::var("MAIL_SERVICE_TOKEN").unwrap_or_default(),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            auth_issuer: env::var("AUTH_ISSUER").unwrap_or_else(|_| "https://api.cabin-booking.local".to_string()),
            admin_email_list: parse_email_list(&env::var("ADMIN_EMAIL_LIST").unwrap_or_default()),
            frontend_url: env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string()),
            password_reset_ttl_secs: env::var("PASSWORD_RESET_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3600),
            bootstrap_admin: bootstrap_admin_from_env(),
        }
    }
}

fn bootstrap_admin_from_env() -> Option<BootstrapAdmin> {
    let username = env::var("BOOTSTRAP_ADMIN_USERNAME").ok()?;
    let password = env::var("BOOTSTRAP_ADMIN_PASSWORD").ok()?;
    let email = env::var("BOOTSTRAP_ADMIN_EMAIL").unwrap_or_default();
    Some(BootstrapAdmin { username, password, email })
}

pub fn parse_email_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
