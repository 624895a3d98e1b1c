use locations::database::Result;
use model::{
    user::{NewUser, User, UserCredentials},
    WithId,
};
use sqlx::{Executor, Postgres};

use crate::data_model::{user::UserRow, with_id};

use super::convert_error;

pub async fn get_by_email<'c, E>(executor: E, email: &str) -> Result<Option<UserCredentials>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            id, username, email, password_hash, created_at
        FROM
            users
        WHERE email = $1;
        ",
    )
    .bind(email)
    .fetch_optional(executor)
    .await
    .map_err(convert_error)
    .map(|row: Option<UserRow>| row.map(UserRow::into_credentials))
}

pub async fn exists<'c, E>(executor: E, email: &str, username: &str) -> Result<bool>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_scalar(
        "
        SELECT EXISTS(
            SELECT 1 FROM users WHERE email = $1 OR username = $2
        );
        ",
    )
    .bind(email)
    .bind(username)
    .fetch_one(executor)
    .await
    .map_err(convert_error)
}

pub async fn insert<'c, E>(executor: E, user: NewUser) -> Result<WithId<User>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO users(
            username,
            email,
            password_hash
        )
        VALUES ($1, $2, $3)
        RETURNING id, username, email, password_hash, created_at;
        ",
    )
    .bind(user.username)
    .bind(user.email)
    .bind(user.password_hash)
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(|row: UserRow| with_id(row))
}
