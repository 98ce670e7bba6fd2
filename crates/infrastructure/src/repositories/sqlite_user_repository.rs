use crate::database::{last_insert_id, run_blocking, users, SqlitePool};
use async_trait::async_trait;
use diesel::prelude::*;
use domain::{DomainError, User, UserRepository, UserRole};

// Database model - separate from domain entity
#[derive(Queryable, Selectable, Debug)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct UserModel {
    pub(crate) user_id: i32,
    pub(crate) username: String,
    pub(crate) password: String,
    pub(crate) email: String,
    pub(crate) usertype: String,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
struct NewUserModel {
    username: String,
    password: String,
    email: String,
    usertype: String,
}

impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        let role: UserRole = model.usertype.parse()?;
        Ok(User::with_id(
            model.user_id,
            model.username,
            model.password,
            model.email,
            role,
        ))
    }
}

impl From<&User> for NewUserModel {
    fn from(user: &User) -> Self {
        NewUserModel {
            username: user.username.clone(),
            password: user.password.clone(),
            email: user.email.clone(),
            usertype: user.role.as_str().to_string(),
        }
    }
}

fn into_user(model: Option<UserModel>) -> Result<Option<User>, DomainError> {
    model.map(User::try_from).transpose()
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<User>, DomainError> {
        let result = run_blocking(&self.pool, move |conn| {
            users::table
                .filter(users::user_id.eq(id))
                .select(UserModel::as_select())
                .first::<UserModel>(conn)
                .optional()
        })
        .await?;

        into_user(result)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let username = username.to_string();
        let result = run_blocking(&self.pool, move |conn| {
            users::table
                .filter(users::username.eq(username))
                .select(UserModel::as_select())
                .first::<UserModel>(conn)
                .optional()
        })
        .await?;

        into_user(result)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let email = email.to_string();
        let result = run_blocking(&self.pool, move |conn| {
            users::table
                .filter(users::email.eq(email))
                .select(UserModel::as_select())
                .first::<UserModel>(conn)
                .optional()
        })
        .await?;

        into_user(result)
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let new_user = NewUserModel::from(user);

        let result = run_blocking(&self.pool, move |conn| {
            diesel::insert_into(users::table)
                .values(&new_user)
                .execute(conn)?;
            let user_id = last_insert_id(conn)?;

            users::table
                .filter(users::user_id.eq(user_id))
                .select(UserModel::as_select())
                .first::<UserModel>(conn)
        })
        .await?;

        result.try_into()
    }

    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let result = run_blocking(&self.pool, move |conn| {
            users::table
                .order(users::user_id.asc())
                .select(UserModel::as_select())
                .load::<UserModel>(conn)
        })
        .await?;

        result.into_iter().map(User::try_from).collect()
    }
}
