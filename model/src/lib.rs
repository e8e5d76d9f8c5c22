/*!

`fleet-model` is the data model for the fleet synthesizer: the inventory
references resolved from vCenter, the per-VM instance specification, and the
resource graph handed to the external plan/apply engine. Everything here is
plain serializable data; resolution and composition live in `fleet-synth`.

!*/

pub mod constants;
mod inventory;
mod spec;

pub use inventory::{
    FolderSpec, InventoryQuery, InventoryRef, ResolvedInventory, TemplateDiskProfile, TemplateInfo,
};
pub use spec::{CloneSpec, DiskSpec, Fleet, InstanceSpec, NetworkInterfaceSpec, ResourceGraph};

/// Implement `Display` using `serde_json` `to_string_pretty` for types that implement `Serialize`.
#[macro_export]
macro_rules! impl_display_as_json {
    ($i:ident) => {
        impl std::fmt::Display for $i {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let s = serde_json::to_string_pretty(self)
                    .unwrap_or_else(|e| format!("Serialization failed: {}", e));
                std::fmt::Display::fmt(&s, f)
            }
        }
    };
}
