use locations::database::Result;
use model::{
    location::{Location, NewLocation},
    user::User,
    WithId,
};
use sqlx::{Executor, Postgres};
use utility::{id::Id, let_also::LetAlso};

use crate::data_model::{location::LocationRow, with_id, with_ids};

use super::convert_error;

pub async fn get_by_user<'c, E>(executor: E, owner: &Id<User>) -> Result<Vec<WithId<Location>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            id, user_id, name, latitude, longitude, created_at
        FROM
            locations
        WHERE user_id = $1
        ORDER BY created_at DESC, id DESC;
        ",
    )
    .bind(owner.raw())
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|rows: Vec<LocationRow>| Ok(with_ids(rows)))
}

pub async fn exists<'c, E>(
    executor: E,
    owner: &Id<User>,
    location: &NewLocation,
) -> Result<bool>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_scalar(
        "
        SELECT EXISTS(
            SELECT 1 FROM locations
            WHERE user_id = $1 AND name = $2 AND latitude = $3 AND longitude = $4
        );
        ",
    )
    .bind(owner.raw())
    .bind(&location.name)
    .bind(location.latitude)
    .bind(location.longitude)
    .fetch_one(executor)
    .await
    .map_err(convert_error)
}

pub async fn insert<'c, E>(
    executor: E,
    owner: &Id<User>,
    location: NewLocation,
) -> Result<WithId<Location>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO locations(
            user_id,
            name,
            latitude,
            longitude
        )
        VALUES ($1, $2, $3, $4)
        RETURNING id, user_id, name, latitude, longitude, created_at;
        ",
    )
    .bind(owner.raw())
    .bind(location.name)
    .bind(location.latitude)
    .bind(location.longitude)
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(|row: LocationRow| with_id(row))
}
