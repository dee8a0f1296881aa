#![allow(dead_code)]

use migration::{Migrator, MigratorTrait};
use netls_core::patch::Audit;
use netls_core::sea_orm::{Database, DbConn};

pub async fn setup() -> DbConn {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

pub fn operator() -> Audit {
    Audit::now("tester")
}
