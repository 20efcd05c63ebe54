//! UUID-set filtering over entity selects.
//!
//! SQLite caps the number of bound parameters per statement
//! (SQLITE_MAX_VARIABLE_NUMBER), which a few-thousand-node channel blows
//! straight through. Instead of chunking, id sets are validated as UUIDs and
//! embedded as quoted literals in a raw membership clause built by the active
//! [`QueryDialect`]. Only values that parsed as UUIDs ever reach that clause.

use sea_orm::sea_query::{Expr, SelectStatement};
use sea_orm::{
    ColumnTrait, EntityName, EntityTrait, IdenStatic, Iterable, PrimaryKeyToColumn, QueryFilter,
    Select,
};
use uuid::Uuid;

use crate::db::dialect::QueryDialect;

pub trait UuidSetFilter<E: EntityTrait>: Sized {
    /// Keep rows whose value in `column` is in `ids`.
    ///
    /// With `validate` on, any entry that does not parse as a UUID empties
    /// the whole result ("fail soft to empty") instead of raising. With
    /// `validate` off the caller asserts the ids came from a trusted source
    /// (typically read back from the database); unparseable entries are
    /// still dropped rather than embedded.
    fn by_uuids(
        self,
        dialect: &dyn QueryDialect,
        column: E::Column,
        ids: &[String],
        validate: bool,
        include: bool,
    ) -> Self;

    /// Membership filter against a subquery - the portable bound-parameter
    /// path, used when the id set is already query-shaped.
    fn by_uuid_subquery(self, column: E::Column, subquery: SelectStatement, include: bool) -> Self;

    /// `by_uuids` against the entity's primary key, inclusion mode.
    fn filter_by_uuids(self, dialect: &dyn QueryDialect, ids: &[String], validate: bool) -> Self
    where
        E::PrimaryKey: PrimaryKeyToColumn<Column = E::Column>;

    /// `by_uuids` against the entity's primary key, exclusion mode.
    fn exclude_by_uuids(self, dialect: &dyn QueryDialect, ids: &[String], validate: bool) -> Self
    where
        E::PrimaryKey: PrimaryKeyToColumn<Column = E::Column>;
}

impl<E: EntityTrait> UuidSetFilter<E> for Select<E> {
    fn by_uuids(
        self,
        dialect: &dyn QueryDialect,
        column: E::Column,
        ids: &[String],
        validate: bool,
        include: bool,
    ) -> Self {
        let mut parsed = Vec::with_capacity(ids.len());
        for id in ids {
            match Uuid::try_parse(id) {
                Ok(uuid) => parsed.push(uuid),
                Err(_) if validate => {
                    // Malformed batch: no results, no error.
                    return self.filter(Expr::cust("1 = 0"));
                }
                Err(_) => continue,
            }
        }
        let clause = dialect.membership_clause(
            E::default().table_name(),
            column.as_str(),
            &parsed,
            include,
        );
        self.filter(Expr::cust(clause))
    }

    fn by_uuid_subquery(self, column: E::Column, subquery: SelectStatement, include: bool) -> Self {
        if include {
            self.filter(column.in_subquery(subquery))
        } else {
            self.filter(column.not_in_subquery(subquery))
        }
    }

    fn filter_by_uuids(self, dialect: &dyn QueryDialect, ids: &[String], validate: bool) -> Self
    where
        E::PrimaryKey: PrimaryKeyToColumn<Column = E::Column>,
    {
        self.by_uuids(dialect, pk_column::<E>(), ids, validate, true)
    }

    fn exclude_by_uuids(self, dialect: &dyn QueryDialect, ids: &[String], validate: bool) -> Self
    where
        E::PrimaryKey: PrimaryKeyToColumn<Column = E::Column>,
    {
        self.by_uuids(dialect, pk_column::<E>(), ids, validate, false)
    }
}

fn pk_column<E: EntityTrait>() -> E::Column
where
    E::PrimaryKey: PrimaryKeyToColumn<Column = E::Column>,
{
    E::PrimaryKey::iter()
        .next()
        .map(PrimaryKeyToColumn::into_column)
        .expect("derived entities always have a primary key")
}
