pub mod traits;

// Source implementations
pub mod inventree;
