pub mod assessment;
pub mod registry;
