//! # Guardian - container update dashboard
//!
//! Client-side core of a dashboard that watches a fleet of Docker containers
//! for image updates. The backend discovers containers, stores the monitoring
//! configuration and runs updates; this crate holds everything the operator
//! interacts with in between.
//!
//! ## Modules
//!
//! - [`schedule`] - cron expression <-> structured schedule form
//! - [`catalog`] - discovered containers with search and pagination
//! - [`selection`] - the set of monitored containers and their flags
//! - [`assembler`] - builds and submits the configuration document
//! - [`status`] - log panel, refreshes and the periodic status poller
//! - [`dashboard`] - operator actions and their notifications
//! - [`backend`] - the backend API seam and its HTTP client
//!
//! ## Example
//!
//! ```rust,no_run
//! use guardian::schedule::{decode, encode, ScheduleDescriptor};
//!
//! let expr = encode(&ScheduleDescriptor::weekly(3, 1));
//! assert_eq!(expr, "0 3 * * 1");
//! assert_eq!(decode(&expr), ScheduleDescriptor::weekly(3, 1));
//! ```

pub mod assembler;
pub mod backend;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod schedule;
pub mod selection;
pub mod status;
