/*!

The `config` module loads everything a synthesis run needs from the process
environment, once, at construction. The resulting [`SynthConfig`] is passed
explicitly into the entry points; no other module reads the environment for
configuration.

!*/

use crate::error::{self, Result};
use fleet_model::constants::{
    ENV_VM_COUNT, ENV_VM_CPU, ENV_VM_DISK_DATA_SIZE, ENV_VM_DISK_OS_SIZE, ENV_VM_HOSTNAME_PREFIX,
    ENV_VM_MEMORY, ENV_VSPHERE_COMPUTE_CLUSTER, ENV_VSPHERE_DATACENTER, ENV_VSPHERE_DATASTORE,
    ENV_VSPHERE_FOLDER, ENV_VSPHERE_NETWORK, ENV_VSPHERE_PASSWORD, ENV_VSPHERE_SERVER,
    ENV_VSPHERE_UBUNTU_TEMPLATE, ENV_VSPHERE_USER,
};
use fleet_model::InventoryQuery;
use snafu::ResultExt;
use std::env;
use std::num::ParseIntError;
use std::str::FromStr;

const DEFAULT_VM_COUNT: i32 = 1;
const DEFAULT_VM_CPU: i32 = 2;
const DEFAULT_MEMORY_GIB: i64 = 1;
const DEFAULT_OS_DISK_GIB: i64 = 10;
const DEFAULT_DATA_DISK_GIB: i64 = 1;

/// Connection credentials for the vCenter endpoint. Kept separate from
/// [`SynthConfig`]'s inventory names so they never end up in the serialized
/// graph.
#[derive(Clone, Debug)]
pub struct VsphereCredentials {
    pub user: String,
    pub password: String,
    pub server: String,
}

/// Everything a synthesis run is parameterized by.
#[derive(Clone, Debug)]
pub struct SynthConfig {
    pub credentials: VsphereCredentials,
    pub datacenter: String,
    pub compute_cluster: String,
    pub datastore: String,
    pub network: String,
    pub folder: String,
    pub template: String,
    pub vm_count: i32,
    pub cpu: i32,
    pub memory_gib: i64,
    pub os_disk_gib: i64,
    pub data_disk_gib: i64,
    /// Read for compatibility with existing deployments; instance naming does
    /// not use it.
    pub hostname_prefix: Option<String>,
}

impl SynthConfig {
    /// Read the configuration from the environment, applying defaults for the
    /// sizing parameters. Missing connection or inventory variables are
    /// fatal.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            credentials: VsphereCredentials {
                user: required(ENV_VSPHERE_USER)?,
                password: required(ENV_VSPHERE_PASSWORD)?,
                server: required(ENV_VSPHERE_SERVER)?,
            },
            datacenter: required(ENV_VSPHERE_DATACENTER)?,
            compute_cluster: required(ENV_VSPHERE_COMPUTE_CLUSTER)?,
            datastore: required(ENV_VSPHERE_DATASTORE)?,
            network: required(ENV_VSPHERE_NETWORK)?,
            folder: required(ENV_VSPHERE_FOLDER)?,
            template: required(ENV_VSPHERE_UBUNTU_TEMPLATE)?,
            vm_count: parsed_or(ENV_VM_COUNT, DEFAULT_VM_COUNT)?,
            cpu: parsed_or(ENV_VM_CPU, DEFAULT_VM_CPU)?,
            memory_gib: parsed_or(ENV_VM_MEMORY, DEFAULT_MEMORY_GIB)?,
            os_disk_gib: parsed_or(ENV_VM_DISK_OS_SIZE, DEFAULT_OS_DISK_GIB)?,
            data_disk_gib: parsed_or(ENV_VM_DISK_DATA_SIZE, DEFAULT_DATA_DISK_GIB)?,
            hostname_prefix: env::var(ENV_VM_HOSTNAME_PREFIX).ok(),
        })
    }

    /// The inventory lookups this configuration asks for.
    pub fn inventory_query(&self) -> InventoryQuery {
        InventoryQuery {
            datacenter: self.datacenter.clone(),
            compute_cluster: self.compute_cluster.clone(),
            datastore: self.datastore.clone(),
            network: self.network.clone(),
            template: self.template.clone(),
            folder: self.folder.clone(),
        }
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).context(error::EnvReadSnafu { key })
}

fn parsed_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr<Err = ParseIntError>,
{
    match env::var(key) {
        Ok(value) => value.trim().parse().context(error::EnvParseSnafu {
            key,
            value: value.as_str(),
        }),
        Err(_) => Ok(default),
    }
}
