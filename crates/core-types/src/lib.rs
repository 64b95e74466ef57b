pub mod enums;
pub mod error;
pub mod link;
pub mod order;
pub mod validate;

// Re-export the core types to provide a clean public API.
pub use enums::{OrderSide, OrderType, TimeInForce, WorkingType};
pub use error::CoreError;
pub use link::LinkId;
pub use order::OrderRequest;
pub use validate::{
    validate_price, validate_quantity, validate_side, validate_symbol, validate_time_in_force,
};
