//! Local kernel-side operations: bridges, VXLAN interfaces, `tc netem`
//! shaping (§2 "out of scope... invoked via well-defined command strings").

use async_trait::async_trait;
use satnet_schema::error::SatNetError;
use satnet_schema::model::LinkRecord;

/// Everything the link reconciler needs from the local kernel, expressed
/// as a trait so the reconciliation logic in [`crate::linkmanager`] can be
/// tested against a fake without touching netlink.
#[async_trait]
pub trait KernelOps: Send + Sync {
    async fn create_bridge(&self, name: &str) -> Result<(), SatNetError>;

    async fn iface_exists(&self, name: &str) -> Result<bool, SatNetError>;

    /// Current VNI of an existing VXLAN interface, if any, used to detect
    /// structural drift (§4.3 T2: "present but differs structurally").
    async fn iface_vni(&self, name: &str) -> Result<Option<u32>, SatNetError>;

    async fn create_vxlan(
        &self,
        iface: &str,
        vni: u32,
        remote: &str,
        local: &str,
    ) -> Result<(), SatNetError>;

    async fn attach_to_bridge(&self, iface: &str, bridge: &str) -> Result<(), SatNetError>;

    async fn delete_iface(&self, iface: &str) -> Result<(), SatNetError>;

    async fn apply_netem(&self, iface: &str, link: &LinkRecord) -> Result<(), SatNetError>;
}

const VXLAN_DSTPORT: u16 = 4789;
const VXLAN_MTU: u16 = 1350;

/// Shells out to `ip`/`tc` on the local node.
pub struct LinuxKernelOps;

impl LinuxKernelOps {
    async fn run(&self, program: &str, args: &[&str]) -> Result<(), SatNetError> {
        let output = tokio::process::Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| SatNetError::KernelOpError(format!("{program} spawn failed: {e}")))?;

        if !output.status.success() {
            return Err(SatNetError::KernelOpError(format!(
                "{program} {args:?} failed: {}",
                String::from_utf8_lossy(&output.stderr)
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl KernelOps for LinuxKernelOps {
    async fn create_bridge(&self, name: &str) -> Result<(), SatNetError> {
        if self.iface_exists(name).await? {
            return Ok(());
        }
        self.run("ip", &["link", "add", name, "type", "bridge"])
            .await?;
        self.run("ip", &["link", "set", name, "up"]).await
    }

    async fn iface_exists(&self, name: &str) -> Result<bool, SatNetError> {
        let output = tokio::process::Command::new("ip")
            .args(["link", "show", name])
            .output()
            .await
            .map_err(|e| SatNetError::KernelOpError(format!("ip link show failed: {e}")))?;
        Ok(output.status.success())
    }

    async fn iface_vni(&self, name: &str) -> Result<Option<u32>, SatNetError> {
        let output = tokio::process::Command::new("ip")
            .args(["-d", "link", "show", name])
            .output()
            .await
            .map_err(|e| SatNetError::KernelOpError(format!("ip -d link show failed: {e}")))?;
        if !output.status.success() {
            return Ok(None);
        }
        let text = String::from_utf8_lossy(&output.stdout);
        Ok(text
            .split_whitespace()
            .collect::<Vec<_>>()
            .windows(2)
            .find(|w| w[0] == "id")
            .and_then(|w| w[1].trim_end_matches(',').parse().ok()))
    }

    async fn create_vxlan(
        &self,
        iface: &str,
        vni: u32,
        remote: &str,
        local: &str,
    ) -> Result<(), SatNetError> {
        let vni_s = vni.to_string();
        let dstport_s = VXLAN_DSTPORT.to_string();
        let mtu_s = VXLAN_MTU.to_string();
        self.run(
            "ip",
            &[
                "link", "add", iface, "type", "vxlan", "id", &vni_s, "remote", remote, "local",
                local, "dev", "eth0", "dstport", &dstport_s,
            ],
        )
        .await?;
        self.run("ip", &["link", "set", iface, "mtu", &mtu_s])
            .await?;
        self.run("ip", &["link", "set", iface, "up"]).await
    }

    async fn attach_to_bridge(&self, iface: &str, bridge: &str) -> Result<(), SatNetError> {
        self.run("ip", &["link", "set", iface, "master", bridge])
            .await
    }

    async fn delete_iface(&self, iface: &str) -> Result<(), SatNetError> {
        if !self.iface_exists(iface).await? {
            return Ok(());
        }
        self.run("ip", &["link", "del", iface]).await
    }

    async fn apply_netem(&self, iface: &str, link: &LinkRecord) -> Result<(), SatNetError> {
        if link.rate.is_none() && link.loss.is_none() && link.delay.is_none() && link.limit.is_none() {
            return Ok(());
        }

        let mut args: Vec<String> = vec![
            "qdisc".into(),
            "replace".into(),
            "dev".into(),
            iface.into(),
            "root".into(),
            "netem".into(),
        ];
        if let Some(delay) = &link.delay {
            args.push("delay".into());
            args.push(delay.clone());
        }
        if let Some(loss) = &link.loss {
            args.push("loss".into());
            args.push(loss.clone());
        }
        if let Some(rate) = &link.rate {
            args.push("rate".into());
            args.push(rate.clone());
        }
        if let Some(limit) = link.limit {
            args.push("limit".into());
            args.push(limit.to_string());
        }

        let args_ref: Vec<&str> = args.iter().map(String::as_str).collect();
        self.run("tc", &args_ref).await
    }
}
