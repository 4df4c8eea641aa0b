use std::sync::Arc;

use atlas_shared::UserProfile;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use sqlx::PgPool;

type ProfileRow = (i64, i64, i16, bool, DateTime<Utc>);

/// Persistence for user profiles: PostgreSQL when configured, process memory otherwise.
#[derive(Clone)]
pub enum ProfileStore {
    Postgres(PgPool),
    Memory(Arc<DashMap<String, UserProfile>>),
}

impl ProfileStore {
    pub fn memory() -> Self {
        Self::Memory(Arc::new(DashMap::new()))
    }

    pub fn backend(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }

    /// Fetch the profile for `user_id`, creating a zeroed record on first access.
    pub async fn get_or_create(&self, user_id: &str) -> Result<UserProfile, sqlx::Error> {
        match self {
            Self::Postgres(pool) => {
                sqlx::query(
                    "INSERT INTO user_profiles (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING",
                )
                .bind(user_id)
                .execute(pool)
                .await?;
                let row: ProfileRow = sqlx::query_as(
                    "SELECT current_currency_balance, total_parcels, current_badge_tier, is_mayor, updated_at \
                     FROM user_profiles WHERE user_id = $1",
                )
                .bind(user_id)
                .fetch_one(pool)
                .await?;
                Ok(profile_from_row(row))
            }
            Self::Memory(profiles) => Ok(profiles
                .entry(user_id.to_owned())
                .or_insert_with(|| UserProfile {
                    updated_at: Some(Utc::now().to_rfc3339()),
                    ..UserProfile::default()
                })
                .clone()),
        }
    }

    /// Replace-or-insert the full record.
    pub async fn upsert(
        &self,
        user_id: &str,
        profile: UserProfile,
    ) -> Result<UserProfile, sqlx::Error> {
        match self {
            Self::Postgres(pool) => {
                let row: ProfileRow = sqlx::query_as(
                    "INSERT INTO user_profiles \
                     (user_id, current_currency_balance, total_parcels, current_badge_tier, is_mayor, updated_at) \
                     VALUES ($1, $2, $3, $4, $5, NOW()) \
                     ON CONFLICT (user_id) DO UPDATE SET \
                        current_currency_balance = EXCLUDED.current_currency_balance, \
                        total_parcels = EXCLUDED.total_parcels, \
                        current_badge_tier = EXCLUDED.current_badge_tier, \
                        is_mayor = EXCLUDED.is_mayor, \
                        updated_at = EXCLUDED.updated_at \
                     RETURNING current_currency_balance, total_parcels, current_badge_tier, is_mayor, updated_at",
                )
                .bind(user_id)
                .bind(i64::try_from(profile.current_currency_balance).unwrap_or(i64::MAX))
                .bind(i64::try_from(profile.total_parcels).unwrap_or(i64::MAX))
                .bind(i16::try_from(profile.current_badge_tier_index).unwrap_or(0))
                .bind(profile.is_mayor)
                .fetch_one(pool)
                .await?;
                Ok(profile_from_row(row))
            }
            Self::Memory(profiles) => {
                let stored = UserProfile {
                    updated_at: Some(Utc::now().to_rfc3339()),
                    ..profile
                };
                profiles.insert(user_id.to_owned(), stored.clone());
                Ok(stored)
            }
        }
    }
}

fn profile_from_row(row: ProfileRow) -> UserProfile {
    let (balance, parcels, badge_tier, is_mayor, updated_at) = row;
    UserProfile {
        current_currency_balance: u64::try_from(balance).unwrap_or(0),
        total_parcels: u64::try_from(parcels).unwrap_or(0),
        current_badge_tier_index: atlas_shared::badge::clamp_tier_index(i64::from(badge_tier)),
        is_mayor,
        updated_at: Some(updated_at.to_rfc3339()),
    }
}

#[cfg(test)]
mod tests {
    use sqlx::postgres::PgPoolOptions;

    use super::*;

    const REAL_DB_TEST_LOCK: i64 = 41_170_001;

    #[tokio::test]
    async fn memory_store_creates_defaults_then_replaces() {
        let store = ProfileStore::memory();
        let created = store.get_or_create("alice").await.expect("create profile");
        assert_eq!(created.current_currency_balance, 0);
        assert!(created.updated_at.is_some());

        let updated = store
            .upsert(
                "alice",
                UserProfile {
                    current_currency_balance: 900,
                    total_parcels: 14,
                    current_badge_tier_index: 2,
                    is_mayor: true,
                    updated_at: None,
                },
            )
            .await
            .expect("upsert profile");
        assert_eq!(updated.total_parcels, 14);

        let fetched = store.get_or_create("alice").await.expect("fetch profile");
        assert_eq!(fetched, updated);

        let other = store.get_or_create("bob").await.expect("fetch other");
        assert_eq!(other.total_parcels, 0);
    }

    #[tokio::test]
    async fn postgres_store_round_trips_profiles() {
        let Ok(database_url) = std::env::var("DATABASE_URL") else {
            eprintln!("Skipping profile store test: DATABASE_URL is not set");
            return;
        };

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .expect("connect real postgres");
        let mut lock_conn = pool.acquire().await.expect("acquire lock connection");
        sqlx::query("SELECT pg_advisory_lock($1)")
            .bind(REAL_DB_TEST_LOCK)
            .execute(&mut *lock_conn)
            .await
            .expect("acquire db lock");

        crate::db_migrations::run(&pool)
            .await
            .expect("run migrations");
        sqlx::query("DELETE FROM user_profiles WHERE user_id = $1")
            .bind("store-test-user")
            .execute(&pool)
            .await
            .expect("clear test user");

        let store = ProfileStore::Postgres(pool.clone());
        let created = store
            .get_or_create("store-test-user")
            .await
            .expect("create profile");
        assert_eq!(created.total_parcels, 0);
        assert_eq!(created.current_badge_tier_index, 0);

        let updated = store
            .upsert(
                "store-test-user",
                UserProfile {
                    current_currency_balance: 2_500,
                    total_parcels: 31,
                    current_badge_tier_index: 3,
                    is_mayor: true,
                    updated_at: None,
                },
            )
            .await
            .expect("upsert profile");
        assert_eq!(updated.current_currency_balance, 2_500);
        assert_eq!(updated.current_badge_tier_index, 3);

        let fetched = store
            .get_or_create("store-test-user")
            .await
            .expect("fetch profile");
        assert_eq!(fetched.total_parcels, 31);
        assert!(fetched.is_mayor);

        sqlx::query("SELECT pg_advisory_unlock($1)")
            .bind(REAL_DB_TEST_LOCK)
            .execute(&mut *lock_conn)
            .await
            .expect("release db lock");
    }
}
