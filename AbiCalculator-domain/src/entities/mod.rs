// Domain entities
// Value objects created per calculation request; nothing here is persisted.

pub mod abi;
