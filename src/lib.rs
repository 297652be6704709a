pub mod config;
pub mod logging;
pub mod pom;
pub mod reactor;
pub mod release;
pub mod version;
