use crate::cloudinit::BootstrapDocument;
use crate::compose::compose_instance;
use crate::config::SynthConfig;
use crate::error::{self, Result};
use crate::inventory::InventorySource;
use fleet_model::{Fleet, ResolvedInventory, ResourceGraph};
use log::info;
use snafu::ensure;

const MIB_PER_GIB: i64 = 1024;

/// Generate the ordered fleet of instance specifications.
///
/// Instance `index` is named `example{index}` and gets its own freshly
/// rendered bootstrap document; the resolved inventory is shared read-only
/// across all of them. Zero instances is a valid request and yields an empty
/// fleet. No upper bound is enforced here; quota is the apply engine's
/// concern.
pub fn generate_fleet(
    config: &SynthConfig,
    inventory: &ResolvedInventory,
    ssh_public_key: &str,
) -> Result<Fleet> {
    ensure!(
        config.vm_count >= 0,
        error::ValidationSnafu {
            field: "vm count",
            message: format!("expected a non-negative value, got {}", config.vm_count),
        }
    );

    // TODO: thread hostname_prefix into instance naming; names stay fixed to
    // `example{index}` until the naming scheme is settled.
    let mut instances = Vec::with_capacity(config.vm_count as usize);
    for index in 0..config.vm_count {
        let name = format!("example{}", index);
        let bootstrap = BootstrapDocument::new(&name, ssh_public_key)?;
        instances.push(compose_instance(
            &name,
            inventory,
            config.cpu,
            config.memory_gib * MIB_PER_GIB,
            config.os_disk_gib,
            config.data_disk_gib,
            bootstrap,
        )?);
    }
    Ok(Fleet { instances })
}

/// Synthesize the complete resource graph: resolve the inventory exactly
/// once, then derive every instance from the shared result.
pub fn synthesize<S>(
    config: &SynthConfig,
    source: &S,
    ssh_public_key: &str,
) -> Result<ResourceGraph>
where
    S: InventorySource + ?Sized,
{
    let inventory = source.resolve(&config.inventory_query())?;
    info!(
        "Resolved inventory for datacenter '{}'",
        inventory.datacenter.name
    );
    let fleet = generate_fleet(config, &inventory, ssh_public_key)?;
    info!(
        "Generated {} instance specification(s)",
        fleet.instances.len()
    );
    Ok(ResourceGraph { inventory, fleet })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::VsphereCredentials;
    use crate::error::Error;
    use fleet_model::{
        FolderSpec, InventoryQuery, InventoryRef, TemplateDiskProfile, TemplateInfo,
    };
    use std::cell::Cell;
    use std::collections::HashSet;

    const KEY: &str = "ssh-rsa AAAA me@host";

    fn inventory() -> ResolvedInventory {
        ResolvedInventory {
            datacenter: InventoryRef {
                id: "datacenter-3".to_string(),
                name: "dc1".to_string(),
            },
            compute_cluster: InventoryRef {
                id: "domain-c8".to_string(),
                name: "cluster1".to_string(),
            },
            datastore: InventoryRef {
                id: "datastore-11".to_string(),
                name: "datastore1".to_string(),
            },
            network: InventoryRef {
                id: "network-13".to_string(),
                name: "VM Network".to_string(),
            },
            template: TemplateInfo {
                id: "423e0a6f-1f60-4bbe-a6f5-1d72a8e3c0ff".to_string(),
                name: "ubuntu-template".to_string(),
                guest_id: "ubuntu64Guest".to_string(),
                scsi_type: "pvscsi".to_string(),
                network_adapter_type: "vmxnet3".to_string(),
                disk: TemplateDiskProfile {
                    size_gib: 16,
                    eagerly_scrub: false,
                    thin_provisioned: true,
                },
            },
            folder: FolderSpec {
                path: "fleet".to_string(),
                folder_type: "vm".to_string(),
                datacenter_id: "datacenter-3".to_string(),
            },
        }
    }

    fn config(vm_count: i32) -> SynthConfig {
        SynthConfig {
            credentials: VsphereCredentials {
                user: "administrator@vsphere.local".to_string(),
                password: "hunter2".to_string(),
                server: "vcenter.example.com".to_string(),
            },
            datacenter: "dc1".to_string(),
            compute_cluster: "cluster1".to_string(),
            datastore: "datastore1".to_string(),
            network: "VM Network".to_string(),
            folder: "fleet".to_string(),
            template: "ubuntu-template".to_string(),
            vm_count,
            cpu: 2,
            memory_gib: 1,
            os_disk_gib: 10,
            data_disk_gib: 1,
            hostname_prefix: None,
        }
    }

    /// Serves a fixed inventory and counts how often it is asked.
    struct FixedInventory {
        inventory: ResolvedInventory,
        resolutions: Cell<usize>,
    }

    impl FixedInventory {
        fn new() -> Self {
            Self {
                inventory: inventory(),
                resolutions: Cell::new(0),
            }
        }
    }

    impl InventorySource for FixedInventory {
        fn resolve(&self, _query: &InventoryQuery) -> Result<ResolvedInventory> {
            self.resolutions.set(self.resolutions.get() + 1);
            Ok(self.inventory.clone())
        }
    }

    #[test]
    fn fleet_of_three_matches_requested_shape() {
        let fleet = generate_fleet(&config(3), &inventory(), KEY).unwrap();
        assert_eq!(fleet.instances.len(), 3);
        for (index, instance) in fleet.instances.iter().enumerate() {
            assert_eq!(instance.name, format!("example{}", index));
            // Template floor (16 GiB) wins over the requested 10 GiB.
            assert_eq!(instance.disks[0].size_gib, 16);
            assert_eq!(instance.disks[1].size_gib, 1);
            assert_eq!(instance.memory_mib, 1024);
        }
    }

    #[test]
    fn names_are_unique_and_ordered() {
        let fleet = generate_fleet(&config(5), &inventory(), KEY).unwrap();
        let names: Vec<&str> = fleet
            .instances
            .iter()
            .map(|instance| instance.name.as_str())
            .collect();
        assert_eq!(names, ["example0", "example1", "example2", "example3", "example4"]);
        let unique: HashSet<&str> = names.iter().copied().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn zero_count_yields_empty_fleet() {
        let fleet = generate_fleet(&config(0), &inventory(), KEY).unwrap();
        assert!(fleet.instances.is_empty());
    }

    #[test]
    fn negative_count_is_rejected() {
        let error = generate_fleet(&config(-1), &inventory(), KEY).unwrap_err();
        assert!(matches!(error, Error::Validation { .. }));
    }

    #[test]
    fn generation_is_deterministic() {
        let a = generate_fleet(&config(2), &inventory(), KEY).unwrap();
        let b = generate_fleet(&config(2), &inventory(), KEY).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn each_instance_gets_its_own_bootstrap_document() {
        let fleet = generate_fleet(&config(2), &inventory(), KEY).unwrap();
        let userdata: Vec<&String> = fleet
            .instances
            .iter()
            .map(|instance| instance.extra_config.get("guestinfo.userdata").unwrap())
            .collect();
        // Hostnames differ, so the rendered documents must differ.
        assert_ne!(userdata[0], userdata[1]);
    }

    #[test]
    fn synthesize_resolves_inventory_exactly_once() {
        let source = FixedInventory::new();
        let graph = synthesize(&config(3), &source, KEY).unwrap();
        assert_eq!(source.resolutions.get(), 1);
        assert_eq!(graph.fleet.instances.len(), 3);
        assert_eq!(graph.inventory, inventory());
    }

    #[test]
    fn synthesize_with_zero_count_still_resolves_inventory() {
        let source = FixedInventory::new();
        let graph = synthesize(&config(0), &source, KEY).unwrap();
        assert_eq!(source.resolutions.get(), 1);
        assert!(graph.fleet.instances.is_empty());
        assert_eq!(graph.inventory.folder.path, "fleet");
    }
}
