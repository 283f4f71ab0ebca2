//! Infrastructure layer - database, migrations, seeding and transactions.

mod db;
pub mod migrations;
mod seed;
mod unit_of_work;

pub use db::Database;
pub use migrations::Migrator;
pub use seed::{seed_lookup_tables, SeedReport};
pub use unit_of_work::{Persistence, TransactionContext, TxFuture, UnitOfWork};
