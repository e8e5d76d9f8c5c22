use crate::cloudinit::BootstrapDocument;
use crate::error::{self, Result};
use fleet_model::constants::{GUESTINFO_USERDATA, GUESTINFO_USERDATA_ENCODING};
use fleet_model::{CloneSpec, DiskSpec, InstanceSpec, NetworkInterfaceSpec, ResolvedInventory};
use maplit::btreemap;
use snafu::ensure;

/// Compose the declarative specification for one VM.
///
/// The OS disk is cloned from the template and cannot shrink below the
/// template's own disk, so its size is the larger of the template floor and
/// the requested size. The data disk is newly created and takes the requested
/// size as-is. Both disks keep the template's provisioning mode, and the
/// guest identity and device topology are copied from the template so the
/// clone boots with compatible hardware.
pub fn compose_instance(
    name: &str,
    inventory: &ResolvedInventory,
    cpu: i32,
    memory_mib: i64,
    os_disk_gib: i64,
    data_disk_gib: i64,
    bootstrap: BootstrapDocument,
) -> Result<InstanceSpec> {
    positive("cpu", i64::from(cpu))?;
    positive("memory", memory_mib)?;
    positive("os disk size", os_disk_gib)?;
    positive("data disk size", data_disk_gib)?;

    let template = &inventory.template;
    Ok(InstanceSpec {
        name: name.to_string(),
        folder: inventory.folder.path.clone(),
        resource_pool_id: inventory.compute_cluster.id.clone(),
        datastore_id: inventory.datastore.id.clone(),
        guest_id: template.guest_id.clone(),
        num_cpus: cpu,
        // One socket per instance; the core count never exceeds the
        // advertised vCPU count.
        num_cores_per_socket: cpu,
        memory_mib,
        enable_disk_uuid: true,
        scsi_type: template.scsi_type.clone(),
        disks: vec![
            DiskSpec {
                unit_number: 0,
                label: "os".to_string(),
                size_gib: template.disk.size_gib.max(os_disk_gib),
                eagerly_scrub: template.disk.eagerly_scrub,
                thin_provisioned: template.disk.thin_provisioned,
            },
            DiskSpec {
                unit_number: 1,
                label: "data".to_string(),
                size_gib: data_disk_gib,
                eagerly_scrub: template.disk.eagerly_scrub,
                thin_provisioned: template.disk.thin_provisioned,
            },
        ],
        network_interfaces: vec![NetworkInterfaceSpec {
            network_id: inventory.network.id.clone(),
            adapter_type: template.network_adapter_type.clone(),
        }],
        clone: CloneSpec {
            template_uuid: template.id.clone(),
        },
        extra_config: btreemap! {
            GUESTINFO_USERDATA.to_string() => bootstrap.rendered,
            GUESTINFO_USERDATA_ENCODING.to_string() => bootstrap.encoding.to_string(),
        },
    })
}

fn positive(field: &str, value: i64) -> Result<()> {
    ensure!(
        value > 0,
        error::ValidationSnafu {
            field,
            message: format!("expected a positive value, got {}", value),
        }
    );
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;
    use fleet_model::{FolderSpec, InventoryRef, TemplateDiskProfile, TemplateInfo};

    fn inventory(template_disk_gib: i64) -> ResolvedInventory {
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
                    size_gib: template_disk_gib,
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

    fn bootstrap() -> BootstrapDocument {
        BootstrapDocument::new("example0", "ssh-rsa AAAA me@host").unwrap()
    }

    fn compose(inventory: &ResolvedInventory, os_gib: i64, data_gib: i64) -> InstanceSpec {
        compose_instance("example0", inventory, 2, 1024, os_gib, data_gib, bootstrap()).unwrap()
    }

    #[test]
    fn os_disk_keeps_template_floor() {
        let spec = compose(&inventory(16), 10, 1);
        assert_eq!(spec.disks[0].size_gib, 16);
    }

    #[test]
    fn os_disk_grows_past_template_floor() {
        let spec = compose(&inventory(10), 20, 1);
        assert_eq!(spec.disks[0].size_gib, 20);
    }

    #[test]
    fn data_disk_takes_requested_size_exactly() {
        let spec = compose(&inventory(16), 10, 1);
        assert_eq!(spec.disks[1].size_gib, 1);
    }

    #[test]
    fn disks_inherit_template_provisioning_mode() {
        let spec = compose(&inventory(16), 10, 1);
        for disk in &spec.disks {
            assert!(!disk.eagerly_scrub);
            assert!(disk.thin_provisioned);
        }
        assert_eq!(spec.disks[0].label, "os");
        assert_eq!(spec.disks[0].unit_number, 0);
        assert_eq!(spec.disks[1].label, "data");
        assert_eq!(spec.disks[1].unit_number, 1);
    }

    #[test]
    fn topology_copied_from_template() {
        let spec = compose(&inventory(16), 10, 1);
        assert_eq!(spec.guest_id, "ubuntu64Guest");
        assert_eq!(spec.scsi_type, "pvscsi");
        assert_eq!(spec.network_interfaces[0].adapter_type, "vmxnet3");
        assert_eq!(spec.network_interfaces[0].network_id, "network-13");
        assert_eq!(spec.clone.template_uuid, inventory(16).template.id);
        assert!(spec.enable_disk_uuid);
    }

    #[test]
    fn cores_per_socket_match_cpu_count() {
        let spec = compose(&inventory(16), 10, 1);
        assert_eq!(spec.num_cpus, 2);
        assert_eq!(spec.num_cores_per_socket, 2);
    }

    #[test]
    fn placement_from_resolved_inventory() {
        let spec = compose(&inventory(16), 10, 1);
        assert_eq!(spec.folder, "fleet");
        assert_eq!(spec.resource_pool_id, "domain-c8");
        assert_eq!(spec.datastore_id, "datastore-11");
    }

    #[test]
    fn bootstrap_document_attached_as_extra_config() {
        let document = bootstrap();
        let spec = compose_instance("example0", &inventory(16), 2, 1024, 10, 1, document.clone())
            .unwrap();
        assert_eq!(
            spec.extra_config.get(GUESTINFO_USERDATA),
            Some(&document.rendered)
        );
        assert_eq!(
            spec.extra_config.get(GUESTINFO_USERDATA_ENCODING).map(String::as_str),
            Some("gzip+base64")
        );
    }

    #[test]
    fn rejects_non_positive_numerics() {
        let inventory = inventory(16);
        for (cpu, memory, os, data, field) in [
            (0, 1024, 10, 1, "cpu"),
            (2, 0, 10, 1, "memory"),
            (2, 1024, 0, 1, "os disk size"),
            (2, 1024, 10, -1, "data disk size"),
        ] {
            let error =
                compose_instance("example0", &inventory, cpu, memory, os, data, bootstrap())
                    .unwrap_err();
            assert!(matches!(error, Error::Validation { .. }));
            assert!(error.to_string().contains(field));
        }
    }

    #[test]
    fn composition_is_idempotent() {
        let a = compose(&inventory(16), 10, 1);
        let b = compose(&inventory(16), 10, 1);
        assert_eq!(a, b);
    }
}
