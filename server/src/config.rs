pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_AUTH_USER_HEADER: &str = "x-atlas-user-id";
pub const MAX_IDENTITY_LEN: usize = 128;

/// Upper bound accepted for budgets, in Atlas Bucks.
pub const MAX_BUDGET: u64 = 1_000_000_000;

pub fn database_url() -> Option<String> {
    std::env::var("DATABASE_URL")
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

pub fn server_port() -> u16 {
    std::env::var("SERVER_PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}

pub fn db_max_connections() -> u32 {
    std::env::var("DB_MAX_CONNECTIONS")
        .ok()
        .and_then(|value| value.parse::<u32>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS)
}

/// Header the upstream auth gateway sets to the authenticated identity.
pub fn auth_user_header() -> String {
    std::env::var("AUTH_USER_HEADER")
        .ok()
        .map(|value| value.trim().to_ascii_lowercase())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_AUTH_USER_HEADER.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        temp_env::with_vars_unset(
            ["SERVER_PORT", "DB_MAX_CONNECTIONS", "AUTH_USER_HEADER", "DATABASE_URL"],
            || {
                assert_eq!(server_port(), DEFAULT_SERVER_PORT);
                assert_eq!(db_max_connections(), DEFAULT_DB_MAX_CONNECTIONS);
                assert_eq!(auth_user_header(), DEFAULT_AUTH_USER_HEADER);
                assert_eq!(database_url(), None);
            },
        );
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        temp_env::with_vars(
            [
                ("SERVER_PORT", Some("0")),
                ("DB_MAX_CONNECTIONS", Some("lots")),
                ("AUTH_USER_HEADER", Some("   ")),
                ("DATABASE_URL", Some("")),
            ],
            || {
                assert_eq!(server_port(), DEFAULT_SERVER_PORT);
                assert_eq!(db_max_connections(), DEFAULT_DB_MAX_CONNECTIONS);
                assert_eq!(auth_user_header(), DEFAULT_AUTH_USER_HEADER);
                assert_eq!(database_url(), None);
            },
        );
    }

    #[test]
    fn overrides_are_parsed() {
        temp_env::with_vars(
            [
                ("SERVER_PORT", Some("8080")),
                ("DB_MAX_CONNECTIONS", Some("4")),
                ("AUTH_USER_HEADER", Some("X-Forwarded-User")),
            ],
            || {
                assert_eq!(server_port(), 8080);
                assert_eq!(db_max_connections(), 4);
                assert_eq!(auth_user_header(), "x-forwarded-user");
            },
        );
    }
}
