//! biosconf-lib: BIOS configuration management for a BMC
//!
//! This crate holds the state a host firmware exchanges with its management
//! controller:
//! - `Manager`: the base BIOS attribute table and pending attribute changes
//! - `BootOrder`: the current and pending boot device order
//! - `SecureBoot`: secure boot state and provisioning mode
//! - `Password`: verified BIOS password changes against a provisioned seed
//!
//! `BiosConfigService` hosts all of them behind a single request dispatcher.

pub mod attribute;
pub mod boot_order;
pub mod bus_enum;
pub mod config;
pub mod consts;
pub mod error;
pub mod manager;
pub mod password;
pub mod persist;
pub mod secure_boot;
pub mod service;

pub use config::ServiceConfig;
pub use error::{BiosError, Result};
pub use service::{BiosConfigService, Reply, Request, Response};
