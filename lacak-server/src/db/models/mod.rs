//! Database Models

// Auth
pub mod user;

// Orders
pub mod order;

// Re-exports
pub use user::{User, UserCreate, UserResponse, UserRole, UserSummary, UserUpdate};
pub use order::{
    DateSort, Order, OrderCreate, OrderItem, OrderItemInput, OrderListFilter, OrderStatus,
    OrderUpdate, OrderWithItems, Platform, StatusChange,
};
