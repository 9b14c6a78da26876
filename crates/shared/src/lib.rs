pub mod domain;
pub mod error;

pub use domain::{Order, OrderId, OrderStatus, Priority, VehicleId};
pub use error::OrdersLoadError;
