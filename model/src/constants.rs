/// vCenter user name.
pub const ENV_VSPHERE_USER: &str = "VSPHERE_USER";
/// vCenter password.
pub const ENV_VSPHERE_PASSWORD: &str = "VSPHERE_PASSWORD";
/// vCenter endpoint, e.g. `vcenter.example.com`.
pub const ENV_VSPHERE_SERVER: &str = "VSPHERE_SERVER";
/// Name of the datacenter to resolve.
pub const ENV_VSPHERE_DATACENTER: &str = "VSPHERE_DATACENTER";
/// Name of the compute cluster to resolve.
pub const ENV_VSPHERE_COMPUTE_CLUSTER: &str = "VSPHERE_COMPUTE_CLUSTER";
/// Name of the datastore to resolve.
pub const ENV_VSPHERE_DATASTORE: &str = "VSPHERE_DATASTORE";
/// Name of the network to resolve.
pub const ENV_VSPHERE_NETWORK: &str = "VSPHERE_NETWORK";
/// Inventory folder path the instances are placed under.
pub const ENV_VSPHERE_FOLDER: &str = "VSPHERE_FOLDER";
/// Name of the template image the instances are cloned from.
pub const ENV_VSPHERE_UBUNTU_TEMPLATE: &str = "VSPHERE_UBUNTU_TEMPLATE";
/// Number of instances to generate.
pub const ENV_VM_COUNT: &str = "VM_COUNT";
/// vCPU count per instance.
pub const ENV_VM_CPU: &str = "VM_CPU";
/// Memory per instance, in GiB.
pub const ENV_VM_MEMORY: &str = "VM_MEMORY";
/// Requested OS disk size, in GiB.
pub const ENV_VM_DISK_OS_SIZE: &str = "VM_DISK_OS_SIZE";
/// Requested data disk size, in GiB.
pub const ENV_VM_DISK_DATA_SIZE: &str = "VM_DISK_DATA_SIZE";
/// Hostname prefix. Read for compatibility; instance naming does not use it.
pub const ENV_VM_HOSTNAME_PREFIX: &str = "VM_HOSTNAME_PREFIX";

/// The extra-config key the guest agent reads the bootstrap document from.
pub const GUESTINFO_USERDATA: &str = "guestinfo.userdata";
/// The extra-config key naming the bootstrap document's transport encoding.
pub const GUESTINFO_USERDATA_ENCODING: &str = "guestinfo.userdata.encoding";
/// Encoding tag for a gzipped, base64-encoded bootstrap document.
pub const USERDATA_ENCODING_GZIP_BASE64: &str = "gzip+base64";

/// vSphere inventory folder type for virtual machines.
pub const FOLDER_TYPE_VM: &str = "vm";
