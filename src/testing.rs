//! In-memory repositories and state builders for tests.
//!
//! [`InMemoryDb`] implements every repository trait over shared, mutex-guarded
//! tables. Individual operations can be made to fail with [`InMemoryDb::fail`].

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use dvdrental_cache::CacheError;
use dvdrental_config::{AppConfig, CorsConfig, JwtConfig, RateLimitConfig};
use dvdrental_core::hash_password;
use dvdrental_models::{
    AccountLink, Customer, Movie, MovieQuery, NewCustomer, NewUser, Rental, Role, RoleName,
    RoleRow, SortOrder, Staff, User, UserRecord,
};

use crate::cache::UserCache;
use crate::modules::customers::service::CustomerRepository;
use crate::modules::movies::service::MovieRepository;
use crate::modules::rentals::service::RentalRepository;
use crate::modules::roles::service::RoleRepository;
use crate::modules::staff::service::StaffRepository;
use crate::modules::users::service::UserRepository;
use crate::state::AppState;
use crate::store::{Store, StoreError};

pub const TEST_BCRYPT_COST: u32 = 4;
pub const ADMIN_ROLE_ID: i64 = 1;
pub const CUSTOMER_ROLE_ID: i64 = 2;

/// Repository operations that can be forced to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    StaffLookup,
    CustomerLookup,
    RoleLookup,
    UserLookup,
    /// The single-column role id read done for cached users.
    UserRoleLookup,
    Register,
    CreateCustomer,
    Movies,
    Rentals,
    /// Panics inside the movies repository.
    PanicMovies,
}

#[derive(Debug, Default)]
struct Tables {
    roles: Vec<RoleRow>,
    users: Vec<UserRecord>,
    staff: Vec<Staff>,
    customers: Vec<Customer>,
    movies: Vec<Movie>,
    rentals: Vec<Rental>,
    failing: HashSet<Op>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryDb {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryDb {
    /// A database holding the two seeded roles.
    pub fn new() -> Self {
        let db = Self::default();
        {
            let mut tables = db.lock();
            tables.roles.push(RoleRow {
                id: ADMIN_ROLE_ID,
                name: RoleName::Admin.to_string(),
                level: 10,
            });
            tables.roles.push(RoleRow {
                id: CUSTOMER_ROLE_ID,
                name: RoleName::Customer.to_string(),
                level: 1,
            });
        }
        db
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn store(&self) -> Store {
        Store {
            users: Arc::new(self.clone()),
            roles: Arc::new(self.clone()),
            staff: Arc::new(self.clone()),
            customers: Arc::new(self.clone()),
            movies: Arc::new(self.clone()),
            rentals: Arc::new(self.clone()),
        }
    }

    pub fn fail(&self, op: Op) {
        self.lock().failing.insert(op);
    }

    pub fn add_staff(&self, id: i64, email: &str) {
        self.lock().staff.push(Staff {
            id,
            email: email.to_string(),
            user_id: None,
        });
    }

    pub fn add_customer(&self, id: i64, email: &str) {
        self.lock().customers.push(Customer {
            id,
            store_id: 1,
            first_name: "Test".to_string(),
            last_name: "Customer".to_string(),
            email: email.to_string(),
            user_id: None,
        });
    }

    /// Inserts a registered user linked to an existing staff or customer row
    /// and returns its id. Staff links get the admin role.
    pub fn add_user(&self, email: &str, username: &str, password: &str, link: AccountLink) -> i64 {
        let password_hash = hash_password(password, TEST_BCRYPT_COST).unwrap();
        let role_id = match link {
            AccountLink::Staff(_) => ADMIN_ROLE_ID,
            AccountLink::Customer(_) => CUSTOMER_ROLE_ID,
        };
        let mut tables = self.lock();
        let id = tables.users.len() as i64 + 1;
        tables.users.push(UserRecord {
            id,
            email: email.to_string(),
            username: username.to_string(),
            password_hash,
            role_id,
        });
        assert!(link_account(&mut tables, link, id), "account row missing or already linked");
        id
    }

    /// Renames a role row, e.g. to a name the API does not know.
    pub fn rename_role(&self, role_id: i64, name: &str) {
        if let Some(role) = self.lock().roles.iter_mut().find(|r| r.id == role_id) {
            role.name = name.to_string();
        }
    }

    /// Moves a user to another role, as an operator editing `users.role_id` would.
    pub fn set_user_role(&self, user_id: i64, role_id: i64) {
        if let Some(user) = self.lock().users.iter_mut().find(|u| u.id == user_id) {
            user.role_id = role_id;
        }
    }

    pub fn remove_role(&self, role_id: i64) {
        self.lock().roles.retain(|r| r.id != role_id);
    }

    pub fn add_movie(&self, movie: Movie) {
        self.lock().movies.push(movie);
    }

    pub fn add_rental(&self, rental: Rental) {
        self.lock().rentals.push(rental);
    }

    pub fn user_count(&self) -> usize {
        self.lock().users.len()
    }

    pub fn user_by_email(&self, email: &str) -> Option<UserRecord> {
        self.lock().users.iter().find(|u| u.email == email).cloned()
    }

    pub fn staff_user_id(&self, staff_id: i64) -> Option<i64> {
        self.lock()
            .staff
            .iter()
            .find(|s| s.id == staff_id)
            .and_then(|s| s.user_id)
    }

    pub fn customer_user_id(&self, customer_id: i64) -> Option<i64> {
        self.lock()
            .customers
            .iter()
            .find(|c| c.id == customer_id)
            .and_then(|c| c.user_id)
    }

    pub fn customers(&self) -> Vec<Customer> {
        self.lock().customers.clone()
    }

    fn check(&self, op: Op) -> Result<(), StoreError> {
        if self.lock().failing.contains(&op) {
            return Err(StoreError::Database(sqlx::Error::Protocol(format!(
                "injected {op:?} failure"
            ))));
        }
        Ok(())
    }
}

fn link_account(tables: &mut Tables, link: AccountLink, user_id: i64) -> bool {
    let slot = match link {
        AccountLink::Staff(id) => tables
            .staff
            .iter_mut()
            .find(|s| s.id == id)
            .map(|s| &mut s.user_id),
        AccountLink::Customer(id) => tables
            .customers
            .iter_mut()
            .find(|c| c.id == id)
            .map(|c| &mut c.user_id),
    };

    match slot {
        Some(slot) if slot.is_none() => {
            *slot = Some(user_id);
            true
        }
        _ => false,
    }
}

#[async_trait]
impl UserRepository for InMemoryDb {
    async fn register_user(&self, user: NewUser, link: AccountLink) -> Result<i64, StoreError> {
        self.check(Op::Register)?;
        let mut tables = self.lock();

        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StoreError::EmailTaken);
        }
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::UsernameTaken);
        }

        let id = tables.users.len() as i64 + 1;
        if !link_account(&mut tables, link, id) {
            return Err(StoreError::AlreadyLinked);
        }

        tables.users.push(UserRecord {
            id,
            email: user.email,
            username: user.username,
            password_hash: user.password_hash,
            role_id: user.role_id,
        });
        Ok(id)
    }

    async fn get_user_by_id(&self, id: i64) -> Result<UserRecord, StoreError> {
        self.check(Op::UserLookup)?;
        self.lock()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn get_user_role_id(&self, id: i64) -> Result<i64, StoreError> {
        self.check(Op::UserRoleLookup)?;
        self.lock()
            .users
            .iter()
            .find(|u| u.id == id)
            .map(|u| u.role_id)
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl RoleRepository for InMemoryDb {
    async fn get_role_by_name(&self, name: RoleName) -> Result<Role, StoreError> {
        self.check(Op::RoleLookup)?;
        let row = self
            .lock()
            .roles
            .iter()
            .find(|r| r.name == name.as_str())
            .cloned()
            .ok_or(StoreError::NotFound)?;
        Ok(Role::try_from(row)?)
    }

    async fn get_role_by_id(&self, id: i64) -> Result<Role, StoreError> {
        self.check(Op::RoleLookup)?;
        let row = self
            .lock()
            .roles
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)?;
        Ok(Role::try_from(row)?)
    }
}

#[async_trait]
impl StaffRepository for InMemoryDb {
    async fn get_staff_by_email(&self, email: &str) -> Result<Staff, StoreError> {
        self.check(Op::StaffLookup)?;
        self.lock()
            .staff
            .iter()
            .find(|s| s.email == email)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl CustomerRepository for InMemoryDb {
    async fn get_customer_by_email(&self, email: &str) -> Result<Customer, StoreError> {
        self.check(Op::CustomerLookup)?;
        self.lock()
            .customers
            .iter()
            .find(|c| c.email == email)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create_customer(&self, customer: NewCustomer) -> Result<(), StoreError> {
        self.check(Op::CreateCustomer)?;
        let mut tables = self.lock();
        let id = tables.customers.iter().map(|c| c.id).max().unwrap_or(0) + 1;
        tables.customers.push(Customer {
            id,
            store_id: customer.store_id,
            first_name: customer.first_name,
            last_name: customer.last_name,
            email: customer.email,
            user_id: None,
        });
        Ok(())
    }
}

#[async_trait]
impl MovieRepository for InMemoryDb {
    async fn get_movies(&self, query: &MovieQuery) -> Result<Vec<Movie>, StoreError> {
        if self.lock().failing.contains(&Op::PanicMovies) {
            panic!("movies repository exploded");
        }
        self.check(Op::Movies)?;

        let needle = query.search.to_lowercase();
        let mut movies: Vec<Movie> = self
            .lock()
            .movies
            .iter()
            .filter(|m| {
                needle.is_empty()
                    || m.title.to_lowercase().contains(&needle)
                    || m.description
                        .as_deref()
                        .is_some_and(|d| d.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect();

        movies.sort_by_key(|m| m.release_year);
        if query.sort == SortOrder::Desc {
            movies.reverse();
        }

        Ok(movies
            .into_iter()
            .skip(query.offset.max(0) as usize)
            .take(query.limit.max(0) as usize)
            .collect())
    }
}

#[async_trait]
impl RentalRepository for InMemoryDb {
    async fn get_rental_by_id(&self, id: i64) -> Result<Rental, StoreError> {
        self.check(Op::Rentals)?;
        self.lock()
            .rentals
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

/// A [`UserCache`] backed by a map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserCache {
    users: Arc<Mutex<HashMap<i64, User>>>,
}

impl InMemoryUserCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the user exactly as given, role included.
    pub fn insert(&self, user: User) {
        self.lock().insert(user.id, user);
    }

    pub fn contains(&self, user_id: i64) -> bool {
        self.lock().contains_key(&user_id)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<i64, User>> {
        self.users.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl UserCache for InMemoryUserCache {
    async fn get(&self, user_id: i64) -> Option<User> {
        self.lock().get(&user_id).cloned()
    }

    async fn set(&self, user: &User) -> Result<(), CacheError> {
        let mut cached = user.clone();
        cached.password_hash.clear();
        self.lock().insert(cached.id, cached);
        Ok(())
    }

    async fn evict(&self, user_id: i64) -> Result<(), CacheError> {
        self.lock().remove(&user_id);
        Ok(())
    }
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-key-for-testing-only".to_string(),
        ..JwtConfig::default()
    }
}

/// State over `db` with rate limiting off and a cheap bcrypt cost.
pub fn test_state(db: &InMemoryDb) -> AppState {
    test_state_with_rate_limit(
        db,
        RateLimitConfig {
            enabled: false,
            ..RateLimitConfig::default()
        },
    )
}

pub fn test_state_with_rate_limit(db: &InMemoryDb, rate_limit: RateLimitConfig) -> AppState {
    state_for(db.store(), rate_limit)
}

/// Same as [`test_state`] over any store, e.g. [`Store::postgres`].
pub fn test_state_for_store(store: Store) -> AppState {
    state_for(
        store,
        RateLimitConfig {
            enabled: false,
            ..RateLimitConfig::default()
        },
    )
}

fn state_for(store: Store, rate_limit: RateLimitConfig) -> AppState {
    AppState::new(
        store,
        AppConfig {
            env: "test".to_string(),
            bcrypt_cost: TEST_BCRYPT_COST,
            ..AppConfig::default()
        },
        test_jwt_config(),
        CorsConfig::default(),
        rate_limit,
    )
}
