pub mod books;

use std::sync::Arc;

use libris_db::Database;
use libris_kernel::{settings::Settings, ModuleRegistry};

use books::repository::MongoBookRepository;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, database: &Database, settings: &Settings) {
    let repository = MongoBookRepository::new(database.clone(), &settings.database.collection);
    registry.register(books::create_module(Arc::new(repository)));
}
