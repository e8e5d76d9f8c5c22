/*!

`fleet-synth` derives a complete vSphere VM fleet specification from an
existing template image and environment-supplied parameters. Inventory is
resolved exactly once (`inventory`), each instance gets a freshly rendered
cloud-init bootstrap document (`cloudinit`), and the composed specifications
are collected into a resource graph (`fleet`) for an external plan/apply
engine. Nothing here executes provisioning.

!*/

pub mod cloudinit;
pub mod compose;
pub mod config;
pub mod error;
pub mod fleet;
pub mod inventory;

pub use error::{Error, Result};
