pub mod auth;
pub mod favorite;
pub mod quote;
pub mod service;
pub mod task;
pub mod user;

// Re-export common types
pub use auth::*;
pub use favorite::Favorite;
pub use quote::{CreateQuoteRequest, Quote, QuoteStatus, UpdateQuoteRequest};
pub use service::{
    CreateServiceRequest, ListServicesParams, NewService, Service, ServiceSort, ServiceUpdate,
    SortOrder, UpdateServiceRequest,
};
pub use task::{CreateTaskRequest, Task, TaskError, TaskStatus, UpdateTaskStatusRequest};
pub use user::*;
