pub use sea_orm_migration::prelude::*;

mod m2026_10_19_000001_create_users;
mod m2026_10_19_000002_create_photos;
mod m2026_10_19_000003_create_bookings;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        // `users` first: photos and bookings both reference it
        vec![
            Box::new(m2026_10_19_000001_create_users::Migration),
            Box::new(m2026_10_19_000002_create_photos::Migration),
            Box::new(m2026_10_19_000003_create_bookings::Migration),
        ]
    }
}
