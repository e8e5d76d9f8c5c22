use crate::inventory::ResolvedInventory;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One virtual disk in an instance specification.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiskSpec {
    pub unit_number: i32,
    pub label: String,
    pub size_gib: i64,
    pub eagerly_scrub: bool,
    pub thin_provisioned: bool,
}

/// One network interface in an instance specification.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkInterfaceSpec {
    pub network_id: String,
    pub adapter_type: String,
}

/// Clone directive: the template image the instance's disk contents and guest
/// identity are copied from.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneSpec {
    pub template_uuid: String,
}

/// The complete declarative description of one VM. Created once per fleet
/// index and immutable thereafter.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceSpec {
    pub name: String,
    /// Inventory folder path the instance is placed under.
    pub folder: String,
    pub resource_pool_id: String,
    pub datastore_id: String,
    pub guest_id: String,
    pub num_cpus: i32,
    pub num_cores_per_socket: i32,
    pub memory_mib: i64,
    pub enable_disk_uuid: bool,
    pub scsi_type: String,
    /// Always two entries: the cloned `os` disk at unit 0 and the newly
    /// created `data` disk at unit 1.
    pub disks: Vec<DiskSpec>,
    pub network_interfaces: Vec<NetworkInterfaceSpec>,
    pub clone: CloneSpec,
    /// Opaque metadata delivered to the guest agent; carries the bootstrap
    /// document and its encoding tag.
    pub extra_config: BTreeMap<String, String>,
}

/// Ordered collection of instance specifications, one per requested index.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fleet {
    pub instances: Vec<InstanceSpec>,
}

/// The complete output of a synthesis run: the shared resolved inventory and
/// the fleet derived from it, handed to the external plan/apply engine.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGraph {
    pub inventory: ResolvedInventory,
    pub fleet: Fleet,
}

crate::impl_display_as_json!(InstanceSpec);
crate::impl_display_as_json!(ResourceGraph);
