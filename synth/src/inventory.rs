/*!

Resolves the read-only inventory a fleet is composed against: datacenter,
compute cluster, datastore, network and template image looked up by name, and
the target folder declared (created if absent). Lookups happen exactly once
per run; the resolved values are shared read-only by every derived instance.

[`GovcResolver`] drives the `govc` CLI and is the only component that talks to
the backend. A lookup failure is fatal and leaves no partial inventory behind.

!*/

use crate::config::VsphereCredentials;
use crate::error::{self, Result};
use fleet_model::constants::FOLDER_TYPE_VM;
use fleet_model::{
    FolderSpec, InventoryQuery, InventoryRef, ResolvedInventory, TemplateDiskProfile, TemplateInfo,
};
use log::{debug, info};
use serde_json::Value;
use snafu::{OptionExt, ResultExt};
use std::env;
use std::process::{Command, Output};

const KIB_PER_GIB: i64 = 1024 * 1024;

/// Read interface into the discovered inventory. The synthesis core only ever
/// sees the resolved values, never the backend.
pub trait InventorySource {
    fn resolve(&self, query: &InventoryQuery) -> Result<ResolvedInventory>;
}

/// Resolves inventory through the `govc` CLI.
pub struct GovcResolver {
    endpoint: String,
}

impl GovcResolver {
    /// Export the connection settings for `govc` and verify the endpoint is
    /// reachable before any lookup runs.
    pub fn new(credentials: &VsphereCredentials) -> Result<Self> {
        set_govc_env_vars(credentials);
        let resolver = Self {
            endpoint: credentials.server.clone(),
        };
        resolver.check_connection()?;
        Ok(resolver)
    }

    fn check_connection(&self) -> Result<()> {
        let output = govc(&["about"])?;
        if !output.status.success() {
            return error::ConnectionSnafu {
                endpoint: self.endpoint.clone(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .fail();
        }
        Ok(())
    }

    /// Resolve one named object to its managed-object reference.
    fn find_ref(
        &self,
        kind: &'static str,
        type_flag: &str,
        name: &str,
        root: &str,
    ) -> Result<InventoryRef> {
        let output = govc(&["find", "-i", "-type", type_flag, "-name", name, root])?;
        let stdout = command_output(output, &format!("govc find -type {} -name {}", type_flag, name))?;
        let id = stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .context(error::NotFoundSnafu { what: kind, name })?
            .to_string();
        debug!("Resolved {} '{}' to '{}'", kind, name, id);
        Ok(InventoryRef {
            id,
            name: name.to_string(),
        })
    }

    /// Read the template image's attributes: clone source UUID, guest
    /// identity, primary disk profile and device topology.
    fn template_info(&self, name: &str, datacenter_path: &str) -> Result<TemplateInfo> {
        // Existence check first so a missing template is reported as such
        // rather than as a malformed vm.info response.
        self.find_ref("template image", "m", name, datacenter_path)?;
        let output = govc(&["vm.info", "-r", "-json", name])?;
        let stdout = command_output(output, &format!("govc vm.info {}", name))?;
        template_from_json(name, &stdout)
    }

    /// Declare the target folder. This is the one resource with creation side
    /// effects: it is created if absent, and an existing folder is left
    /// as-is.
    fn declare_folder(&self, path: &str, datacenter: &InventoryRef) -> Result<FolderSpec> {
        let full_path = format!("/{}/vm/{}", datacenter.name, path.trim_start_matches('/'));
        let output = govc(&["folder.create", &full_path])?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();
            if !stderr.contains("already exists") {
                return error::CommandSnafu {
                    hint: format!("govc folder.create {}", full_path),
                    code: output.status.code().unwrap_or(-1),
                    stderr,
                }
                .fail();
            }
            debug!("Folder '{}' already exists", full_path);
        }
        Ok(FolderSpec {
            path: path.to_string(),
            folder_type: FOLDER_TYPE_VM.to_string(),
            datacenter_id: datacenter.id.clone(),
        })
    }
}

impl InventorySource for GovcResolver {
    fn resolve(&self, query: &InventoryQuery) -> Result<ResolvedInventory> {
        let datacenter_path = format!("/{}", query.datacenter);
        info!("Resolving datacenter '{}'", query.datacenter);
        let datacenter = self.find_ref("datacenter", "d", &query.datacenter, "/")?;
        info!("Resolving compute cluster '{}'", query.compute_cluster);
        let compute_cluster =
            self.find_ref("compute cluster", "c", &query.compute_cluster, &datacenter_path)?;
        info!("Resolving datastore '{}'", query.datastore);
        let datastore = self.find_ref("datastore", "s", &query.datastore, &datacenter_path)?;
        info!("Resolving network '{}'", query.network);
        let network = self.find_ref("network", "n", &query.network, &datacenter_path)?;
        info!("Reading template image '{}'", query.template);
        let template = self.template_info(&query.template, &datacenter_path)?;
        info!("Declaring folder '{}'", query.folder);
        let folder = self.declare_folder(&query.folder, &datacenter)?;
        Ok(ResolvedInventory {
            datacenter,
            compute_cluster,
            datastore,
            network,
            template,
            folder,
        })
    }
}

/// Export the connection settings `govc` reads from its environment.
pub fn set_govc_env_vars(credentials: &VsphereCredentials) {
    env::set_var("GOVC_URL", &credentials.server);
    env::set_var("GOVC_USERNAME", &credentials.user);
    env::set_var("GOVC_PASSWORD", &credentials.password);
    env::set_var("GOVC_INSECURE", "true");
}

fn govc(args: &[&str]) -> Result<Output> {
    Command::new("govc")
        .args(args)
        .output()
        .context(error::ProcessSnafu { what: "govc" })
}

/// If the command exited zero, returns its stdout. Otherwise returns an error
/// naming the operation, the exit code and the captured stderr.
fn command_output(output: Output, hint: &str) -> Result<String> {
    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    } else {
        error::CommandSnafu {
            hint,
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
        .fail()
    }
}

/// Extract the template attributes from `govc vm.info -r -json` output.
fn template_from_json(name: &str, stdout: &str) -> Result<TemplateInfo> {
    let info: Value = serde_json::from_str(stdout).context(error::DeserializeJsonSnafu {
        what: "vm.info",
    })?;
    let vm = info
        .get("VirtualMachines")
        .and_then(|vms| vms.as_array())
        .and_then(|vms| vms.first())
        .context(error::NotFoundSnafu {
            what: "template image",
            name,
        })?;
    let config = vm.get("Config").context(error::MissingSnafu {
        what: "Config",
        from: "vm.info output",
    })?;
    let devices = config
        .get("Hardware")
        .and_then(|hardware| hardware.get("Device"))
        .and_then(|devices| devices.as_array())
        .context(error::MissingSnafu {
            what: "Hardware.Device",
            from: "vm.info output",
        })?;
    Ok(TemplateInfo {
        id: string_field(config, "Uuid")?,
        name: name.to_string(),
        guest_id: string_field(config, "GuestId")?,
        scsi_type: scsi_controller_type(devices)?,
        network_adapter_type: ethernet_adapter_type(devices)?,
        disk: primary_disk(devices)?,
    })
}

fn string_field(value: &Value, field: &'static str) -> Result<String> {
    Ok(value
        .get(field)
        .and_then(Value::as_str)
        .context(error::MissingSnafu {
            what: field,
            from: "vm.info output",
        })?
        .to_string())
}

fn type_name(device: &Value) -> Option<&str> {
    device.get("_typeName").and_then(Value::as_str)
}

/// The template's primary disk: capacity becomes the OS disk floor, the
/// backing flags carry the provisioning mode.
fn primary_disk(devices: &[Value]) -> Result<TemplateDiskProfile> {
    let disk = devices
        .iter()
        .find(|device| type_name(device) == Some("VirtualDisk"))
        .context(error::MissingSnafu {
            what: "VirtualDisk",
            from: "template device list",
        })?;
    let capacity_kib = disk
        .get("CapacityInKB")
        .and_then(Value::as_i64)
        .context(error::MissingSnafu {
            what: "CapacityInKB",
            from: "template disk",
        })?;
    let backing = disk.get("Backing").context(error::MissingSnafu {
        what: "Backing",
        from: "template disk",
    })?;
    Ok(TemplateDiskProfile {
        size_gib: capacity_kib / KIB_PER_GIB,
        eagerly_scrub: backing
            .get("EagerlyScrub")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        thin_provisioned: backing
            .get("ThinProvisioned")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    })
}

fn scsi_controller_type(devices: &[Value]) -> Result<String> {
    devices
        .iter()
        .find_map(|device| match type_name(device) {
            Some("ParaVirtualSCSIController") => Some("pvscsi"),
            Some("VirtualLsiLogicController") => Some("lsilogic"),
            Some("VirtualLsiLogicSASController") => Some("lsilogic-sas"),
            Some("VirtualBusLogicController") => Some("buslogic"),
            _ => None,
        })
        .map(str::to_string)
        .context(error::MissingSnafu {
            what: "SCSI controller",
            from: "template device list",
        })
}

fn ethernet_adapter_type(devices: &[Value]) -> Result<String> {
    devices
        .iter()
        .find_map(|device| match type_name(device) {
            Some("VirtualVmxnet3") => Some("vmxnet3"),
            Some("VirtualE1000") => Some("e1000"),
            Some("VirtualE1000e") => Some("e1000e"),
            _ => None,
        })
        .map(str::to_string)
        .context(error::MissingSnafu {
            what: "network adapter",
            from: "template device list",
        })
}
