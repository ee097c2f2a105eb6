//! Startup seeding of the baseline roles and accounts.
//!
//! Each record is checked by name and created only when missing. The check and the
//! insert are separate store calls, so two processes seeding an empty store at the
//! same instant may race; the unique constraints on role names and usernames reject
//! the loser.

use crate::auth::PasswordHasher;
use crate::error::AppError;
use crate::models::{NewUser, ADMINISTRATOR, CUSTOMER};
use crate::repository::{RoleRepository, UserRepository};

pub const SEED_ROLES: [&str; 2] = [ADMINISTRATOR, CUSTOMER];

pub struct SeedUser {
    pub username: &'static str,
    pub email: &'static str,
    pub first_name: &'static str,
    pub last_name: &'static str,
    pub role: &'static str,
}

pub const SEED_USERS: [SeedUser; 3] = [
    SeedUser {
        username: "admin",
        email: "admin@bookstore.com",
        first_name: "System",
        last_name: "Admin",
        role: ADMINISTRATOR,
    },
    SeedUser {
        username: "customer1",
        email: "customer1@bookstore.com",
        first_name: "System",
        last_name: "Customer",
        role: CUSTOMER,
    },
    SeedUser {
        username: "customer2",
        email: "customer2@bookstore.com",
        first_name: "System",
        last_name: "Customer",
        role: CUSTOMER,
    },
];

/// What a seeding run created.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub roles_created: Vec<String>,
    pub users_created: Vec<String>,
}

pub async fn run(
    users: &dyn UserRepository,
    roles: &dyn RoleRepository,
    hasher: &PasswordHasher,
    password: &str,
) -> Result<SeedReport, AppError> {
    let mut report = SeedReport::default();

    for name in SEED_ROLES {
        if roles.find_by_name(name).await?.is_none() {
            roles.create(name).await?;
            log::info!("Seeded role {}", name);
            report.roles_created.push(name.to_string());
        }
    }

    for seed in SEED_USERS.iter() {
        if users.find_by_username(seed.username).await?.is_some() {
            continue;
        }

        let role = roles.find_by_name(seed.role).await?.ok_or_else(|| {
            AppError::InternalServerError(format!("Seed role {} is missing", seed.role))
        })?;

        let user = users
            .create(NewUser {
                username: seed.username.to_string(),
                email: seed.email.to_string(),
                password_hash: hasher.hash(password)?,
                first_name: Some(seed.first_name.to_string()),
                last_name: Some(seed.last_name.to_string()),
            })
            .await?;

        if !users.add_to_role(user.id, role.id).await? {
            return Err(AppError::InternalServerError(format!(
                "Failed to add seed user {} to role {}",
                seed.username, seed.role
            )));
        }

        log::info!("Seeded user {} with role {}", seed.username, seed.role);
        report.users_created.push(seed.username.to_string());
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryStore;

    #[actix_rt::test]
    async fn test_seeding_is_idempotent() {
        let store = MemoryStore::new();
        let hasher = PasswordHasher::new(4);

        let first = run(&store, &store, &hasher, "P@ssword1").await.unwrap();
        assert_eq!(first.roles_created, vec!["Administrator", "Customer"]);
        assert_eq!(first.users_created, vec!["admin", "customer1", "customer2"]);

        let second = run(&store, &store, &hasher, "P@ssword1").await.unwrap();
        assert_eq!(second, SeedReport::default());

        assert_eq!(RoleRepository::find_all(&store).await.unwrap().len(), 2);
        assert_eq!(UserRepository::find_all(&store).await.unwrap().len(), 3);
    }

    #[actix_rt::test]
    async fn test_seed_users_get_their_role() {
        let store = MemoryStore::new();
        let hasher = PasswordHasher::new(4);
        run(&store, &store, &hasher, "P@ssword1").await.unwrap();

        let admin = store.find_by_username("admin").await.unwrap().unwrap();
        assert_eq!(store.roles_of(admin.id).await.unwrap(), vec!["Administrator"]);
        assert!(hasher.verify("P@ssword1", &admin.password_hash).unwrap());

        let customer = store.find_by_username("customer2").await.unwrap().unwrap();
        assert_eq!(store.roles_of(customer.id).await.unwrap(), vec!["Customer"]);
    }
}
