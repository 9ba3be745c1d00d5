//! Postgres implementation of the placement store.
//!
//! Creation order comes from each table's `position` sequence. Every call
//! is a single statement on the pool; callers that need a transaction
//! around a whole placement must serialize writers per color themselves.

use async_trait::async_trait;
use farm_balance::{Animal, Barn, Color, CreationOrder, PartitionStore, StoreResult};
use farm_id::{AnimalId, BarnId};
use sqlx::{postgres::PgRow, PgPool, Row};
use tracing::instrument;

use super::DbError;

/// Placement store backed by the `animals` and `barns` tables.
#[derive(Clone)]
pub struct PgFarmStore {
    pool: PgPool,
}

impl PgFarmStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PartitionStore for PgFarmStore {
    #[instrument(skip(self))]
    async fn find_animals_by_color(&self, color: Color) -> StoreResult<Vec<Animal>> {
        let rows = sqlx::query_as::<_, AnimalRow>(
            r#"
            SELECT animal_id, name, favorite_color, barn_id
            FROM animals
            WHERE favorite_color = $1
            ORDER BY position
            "#,
        )
        .bind(color.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::Query)?;

        rows_into(rows)
    }

    #[instrument(skip(self))]
    async fn find_barns_by_color(
        &self,
        color: Color,
        order: CreationOrder,
    ) -> StoreResult<Vec<Barn>> {
        let sql = match order {
            CreationOrder::Ascending => {
                "SELECT barn_id, name, color FROM barns WHERE color = $1 ORDER BY position ASC"
            }
            CreationOrder::Descending => {
                "SELECT barn_id, name, color FROM barns WHERE color = $1 ORDER BY position DESC"
            }
        };

        let rows = sqlx::query_as::<_, BarnRow>(sql)
            .bind(color.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(DbError::Query)?;

        rows_into(rows)
    }

    async fn save_animal(&self, animal: &Animal) -> StoreResult<Animal> {
        let row = sqlx::query_as::<_, AnimalRow>(
            r#"
            INSERT INTO animals (animal_id, name, favorite_color, barn_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (animal_id) DO UPDATE
            SET name = EXCLUDED.name,
                barn_id = EXCLUDED.barn_id
            RETURNING animal_id, name, favorite_color, barn_id
            "#,
        )
        .bind(animal.id.to_string())
        .bind(&animal.name)
        .bind(animal.favorite_color.as_str())
        .bind(animal.barn.map(|id| id.to_string()))
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::Query)?;

        Ok(Animal::try_from(row)?)
    }

    async fn save_barn(&self, barn: &Barn) -> StoreResult<Barn> {
        let row = sqlx::query_as::<_, BarnRow>(
            r#"
            INSERT INTO barns (barn_id, name, color)
            VALUES ($1, $2, $3)
            ON CONFLICT (barn_id) DO UPDATE
            SET name = EXCLUDED.name
            RETURNING barn_id, name, color
            "#,
        )
        .bind(barn.id.to_string())
        .bind(&barn.name)
        .bind(barn.color.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::Query)?;

        Ok(Barn::try_from(row)?)
    }

    async fn delete_animal(&self, id: AnimalId) -> StoreResult<()> {
        sqlx::query("DELETE FROM animals WHERE animal_id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(DbError::Query)?;
        Ok(())
    }

    async fn delete_barn(&self, id: BarnId) -> StoreResult<()> {
        sqlx::query("DELETE FROM barns WHERE barn_id = $1")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(DbError::Query)?;
        Ok(())
    }

    async fn animal_exists(&self, id: AnimalId) -> StoreResult<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM animals WHERE animal_id = $1)")
                .bind(id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(DbError::Query)?;
        Ok(exists)
    }

    async fn find_animal(&self, id: AnimalId) -> StoreResult<Option<Animal>> {
        let row = sqlx::query_as::<_, AnimalRow>(
            "SELECT animal_id, name, favorite_color, barn_id FROM animals WHERE animal_id = $1",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(DbError::Query)?;

        Ok(row.map(Animal::try_from).transpose()?)
    }

    async fn find_all_animals(&self) -> StoreResult<Vec<Animal>> {
        let rows = sqlx::query_as::<_, AnimalRow>(
            "SELECT animal_id, name, favorite_color, barn_id FROM animals ORDER BY position",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::Query)?;

        rows_into(rows)
    }

    async fn delete_all_animals(&self) -> StoreResult<()> {
        sqlx::query("DELETE FROM animals")
            .execute(&self.pool)
            .await
            .map_err(DbError::Query)?;
        Ok(())
    }

    async fn colors_in_use(&self) -> StoreResult<Vec<Color>> {
        let raw: Vec<String> = sqlx::query_scalar(
            "SELECT color FROM barns UNION SELECT favorite_color FROM animals",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DbError::Query)?;

        let mut colors = raw
            .iter()
            .map(|s| parse_color("color", s))
            .collect::<Result<Vec<_>, _>>()?;
        colors.sort();
        Ok(colors)
    }
}

fn rows_into<R, T>(rows: Vec<R>) -> StoreResult<Vec<T>>
where
    T: TryFrom<R, Error = DbError>,
{
    rows.into_iter()
        .map(|row| T::try_from(row).map_err(Into::into))
        .collect()
}

fn parse_color(column: &'static str, raw: &str) -> Result<Color, DbError> {
    raw.parse().map_err(|e: farm_balance::ParseColorError| DbError::Decode {
        column,
        message: e.to_string(),
    })
}

fn parse_id<T>(column: &'static str, raw: &str) -> Result<T, DbError>
where
    T: std::str::FromStr<Err = farm_id::IdError>,
{
    raw.parse().map_err(|e: farm_id::IdError| DbError::Decode {
        column,
        message: e.to_string(),
    })
}

// =============================================================================
// Database Row Types
// =============================================================================

#[derive(Debug)]
struct AnimalRow {
    animal_id: String,
    name: String,
    favorite_color: String,
    barn_id: Option<String>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for AnimalRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            animal_id: row.try_get("animal_id")?,
            name: row.try_get("name")?,
            favorite_color: row.try_get("favorite_color")?,
            barn_id: row.try_get("barn_id")?,
        })
    }
}

impl TryFrom<AnimalRow> for Animal {
    type Error = DbError;

    fn try_from(row: AnimalRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id("animal_id", &row.animal_id)?,
            name: row.name,
            favorite_color: parse_color("favorite_color", &row.favorite_color)?,
            barn: row
                .barn_id
                .as_deref()
                .map(|raw| parse_id("barn_id", raw))
                .transpose()?,
        })
    }
}

#[derive(Debug)]
struct BarnRow {
    barn_id: String,
    name: String,
    color: String,
}

impl<'r> sqlx::FromRow<'r, PgRow> for BarnRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            barn_id: row.try_get("barn_id")?,
            name: row.try_get("name")?,
            color: row.try_get("color")?,
        })
    }
}

impl TryFrom<BarnRow> for Barn {
    type Error = DbError;

    fn try_from(row: BarnRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_id("barn_id", &row.barn_id)?,
            name: row.name,
            color: parse_color("color", &row.color)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animal_row_decodes() {
        let barn = BarnId::new();
        let row = AnimalRow {
            animal_id: AnimalId::new().to_string(),
            name: "Clover".to_string(),
            favorite_color: "orange".to_string(),
            barn_id: Some(barn.to_string()),
        };
        let animal = Animal::try_from(row).unwrap();
        assert_eq!(animal.favorite_color, Color::Orange);
        assert_eq!(animal.barn, Some(barn));
    }

    #[test]
    fn test_bad_color_is_decode_error() {
        let row = BarnRow {
            barn_id: BarnId::new().to_string(),
            name: "Teal-0".to_string(),
            color: "teal".to_string(),
        };
        let err = Barn::try_from(row).unwrap_err();
        assert!(matches!(err, DbError::Decode { column: "color", .. }));
        assert!(matches!(
            farm_balance::StoreError::from(err),
            farm_balance::StoreError::Corrupt(_)
        ));
    }

    #[test]
    fn test_barn_id_in_animal_column_rejected() {
        let row = AnimalRow {
            animal_id: BarnId::new().to_string(),
            name: "Mix".to_string(),
            favorite_color: "red".to_string(),
            barn_id: None,
        };
        let err = Animal::try_from(row).unwrap_err();
        assert!(matches!(err, DbError::Decode { column: "animal_id", .. }));
    }
}
