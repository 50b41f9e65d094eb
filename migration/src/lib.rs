pub use sea_orm_migration::prelude::*;

mod m20250901_000001_create_giveaways;
mod m20250901_000002_create_participants;
mod m20250901_000003_create_voters;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_create_giveaways::Migration),
            Box::new(m20250901_000002_create_participants::Migration),
            Box::new(m20250901_000003_create_voters::Migration),
        ]
    }
}
