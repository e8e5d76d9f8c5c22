/*!

Builds the per-instance bootstrap document: a cloud-config body rendered for
one hostname and SSH public key, then gzipped and base64-encoded for delivery
through the `guestinfo.userdata` extra-config key. The whole module is a pure
transform; nothing here touches the backend.

!*/

use crate::error::{self, Result};
use base64::engine::general_purpose::STANDARD as base64_engine;
use base64::Engine as _;
use flate2::write::GzEncoder;
use flate2::Compression;
use fleet_model::constants::USERDATA_ENCODING_GZIP_BASE64;
use snafu::ResultExt;
use std::io::Write;

/// Password hash for the `vagrant` account (SHA-512, 4096 rounds).
const VAGRANT_PASSWD_HASH: &str = "$6$rounds=4096$NQ.EmIrGxn$rTvGsI3WIsix9TjWaDfKrt9tm3aa7SX7pzB.PSjbwtLbsplk1HsVzIrZbXwQNce6wmeJXhCq9YFJHDx9bXFHH.";

/// A rendered, transport-encoded bootstrap document plus the encoding tag the
/// guest agent uses to decode it. Created fresh per VM and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapDocument {
    pub rendered: String,
    pub encoding: &'static str,
}

impl BootstrapDocument {
    /// Render and encode the document for one instance.
    pub fn new(hostname: &str, ssh_public_key: &str) -> Result<Self> {
        let body = render_cloud_config(hostname, ssh_public_key)?;
        Ok(Self {
            rendered: encode_userdata(&body)?,
            encoding: USERDATA_ENCODING_GZIP_BASE64,
        })
    }
}

/// Render the cloud-config body for one instance.
///
/// The second disk is partitioned, formatted and mounted idempotently
/// (`overwrite: false`, `nofail`) so repeated boots never destroy or error on
/// existing data. The SSH key is embedded as a JSON string literal because
/// key text can contain characters significant to the document format.
pub fn render_cloud_config(hostname: &str, ssh_public_key: &str) -> Result<String> {
    let key = serde_json::to_string(ssh_public_key).context(error::EscapeKeySnafu)?;
    Ok(format!(
        r#"#cloud-config
hostname: {}
users:
  - name: vagrant
    passwd: '{}'
    lock_passwd: false
    ssh-authorized-keys:
      - {}
disk_setup:
  /dev/sdb:
    table_type: mbr
    layout:
      - [100, 83]
    overwrite: false
fs_setup:
  - label: data
    device: /dev/sdb1
    filesystem: ext4
    overwrite: false
mounts:
  - [/dev/sdb1, /data, ext4, 'defaults,discard,nofail', '0', '2']
runcmd:
  - sed -i '/vagrant insecure public key/d' /home/vagrant/.ssh/authorized_keys
  # clear any account expiry the base image may ship with.
  - usermod --expiredate '' vagrant
"#,
        hostname, VAGRANT_PASSWD_HASH, key
    ))
}

/// Gzip and base64-encode a rendered document. The returned blob pairs with
/// the `gzip+base64` tag; the tag must describe the transform actually
/// applied or the guest agent will fail to decode the payload.
pub fn encode_userdata(body: &str) -> Result<String> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(body.as_bytes())
        .context(error::CompressUserdataSnafu)?;
    let compressed = encoder.finish().context(error::CompressUserdataSnafu)?;
    Ok(base64_engine.encode(compressed))
}
