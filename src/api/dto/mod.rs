//! Data Transfer Objects for REST request/response serialization.
//!
//! Wire field names follow the Portuguese contract the mobile clients
//! already speak (`raio`, `coleira`, `data`, and so on); internal names
//! stay English via serde renames.

pub mod animal_dto;
pub mod common_dto;
pub mod heart_rate_dto;
pub mod location_dto;
pub mod safe_zone_dto;

pub use animal_dto::*;
pub use common_dto::*;
pub use heart_rate_dto::*;
pub use location_dto::*;
pub use safe_zone_dto::*;
