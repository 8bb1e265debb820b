//! Service layer for business logic and orchestration.
//!
//! Services validate requests, run repository calls through the requesting user's warehouse
//! session, and build the exported files. The session manager and its fixed-delay retry live
//! here as well.

pub mod event;
pub mod export;
pub mod production;
pub mod retry;
pub mod session;
