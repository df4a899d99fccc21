pub mod import_django;
pub mod initdb;
pub mod serve;

pub use import_django::import_django;
pub use initdb::init_database;
pub use serve::serve;
