//! Edge gateway: dispatch & authorization engine.
//!
//! # Architecture Overview
//!
//! ```text
//!                    ┌────────────────────────────────────────────────┐
//!                    │                  API GATEWAY                    │
//!                    │                                                 │
//!   Client Request   │  ┌──────┐   ┌───────────┐   ┌──────────────┐  │
//!   ─────────────────┼─▶│ http │──▶│   auth    │──▶│   dispatch   │  │
//!                    │  │server│   │ validator │   │              │  │
//!                    │  └──────┘   └───────────┘   └──────┬───────┘  │
//!                    │                                     │          │
//!                    │              ┌──────────┐   ┌───────▼──────┐  │
//!                    │              │  policy  │◀──│   routing    │  │
//!                    │              └──────────┘   └───────┬──────┘  │
//!                    │                                     │          │
//!   Client Response  │  ┌──────┐                   ┌───────▼──────┐  │
//!   ◀────────────────┼──│ http │◀──────────────────│   cluster    │──┼──▶ Backend
//!                    │  │client│                   │   registry   │  │    Service
//!                    │  └──────┘                   └──────────────┘  │
//!                    └────────────────────────────────────────────────┘
//! ```
//!
//! The core (auth, policy, routing, cluster, dispatch) is a pure,
//! synchronous decision engine over registries built once at startup.
//! The http layer is the host collaborator: it parses requests, calls the
//! core, and executes the forwarding instruction.

pub mod auth;
pub mod cluster;
pub mod config;
pub mod dispatch;
pub mod gateway;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod policy;
pub mod routing;

pub use config::GatewayConfig;
pub use dispatch::{Dispatch, ForwardInstruction, RejectReason};
pub use gateway::{GatewayCore, RegistryError, RequestDescriptor};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
