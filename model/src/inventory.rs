use serde::{Deserialize, Serialize};

/// An opaque managed-object reference plus the human name it was resolved
/// from. Resolved exactly once per run and shared read-only by every derived
/// instance.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRef {
    pub id: String,
    pub name: String,
}

/// The template image's primary-disk attributes. The size acts as a floor for
/// the cloned OS disk; the provisioning flags carry the template's
/// provisioning mode onto every derived disk.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDiskProfile {
    pub size_gib: i64,
    pub eagerly_scrub: bool,
    pub thin_provisioned: bool,
}

/// Everything discovered about the template image a fleet is cloned from.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInfo {
    /// UUID of the template virtual machine; the clone source identifier.
    pub id: String,
    pub name: String,
    pub guest_id: String,
    pub scsi_type: String,
    pub network_adapter_type: String,
    pub disk: TemplateDiskProfile,
}

/// The target folder declaration. This is the one resource in the set that is
/// created if absent rather than looked up.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderSpec {
    pub path: String,
    #[serde(rename = "type")]
    pub folder_type: String,
    pub datacenter_id: String,
}

/// The six names a run resolves against existing inventory.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct InventoryQuery {
    pub datacenter: String,
    pub compute_cluster: String,
    pub datastore: String,
    pub network: String,
    pub template: String,
    pub folder: String,
}

/// The resolved inventory shared by every instance in the fleet.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedInventory {
    pub datacenter: InventoryRef,
    pub compute_cluster: InventoryRef,
    pub datastore: InventoryRef,
    pub network: InventoryRef,
    pub template: TemplateInfo,
    pub folder: FolderSpec,
}
