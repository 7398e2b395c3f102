// tollgate-core/src/ports/mod.rs

pub mod connector;
pub mod resolver;

pub use connector::Connector;
pub use resolver::RelationResolver;
