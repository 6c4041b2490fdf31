//! Restarting the DHCP daemon after a committed change.

use anyhow::Result;
use std::process::Command;
use tracing::{debug, info};

use crate::StaticMapError;

pub const DEFAULT_RELOAD_COMMAND: &str = "/usr/local/sbin/pfSsh.php playback svc restart dhcpd";

pub trait ServiceReloader {
    fn reload_dhcp_service(&self) -> Result<()>;
}

/// Runs an external command (no shell) to restart the DHCP service.
#[derive(Debug, Clone)]
pub struct CommandReloader {
    program: String,
    args: Vec<String>,
}

impl CommandReloader {
    /// Split `command` on whitespace into program and arguments
    pub fn from_command_line(command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| StaticMapError::ServiceReload("empty reload command".to_string()))?;
        Ok(CommandReloader {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl Default for CommandReloader {
    fn default() -> Self {
        let mut parts = DEFAULT_RELOAD_COMMAND
            .split_whitespace()
            .map(str::to_string);
        CommandReloader {
            program: parts.next().unwrap_or_default(),
            args: parts.collect(),
        }
    }
}

impl ServiceReloader for CommandReloader {
    fn reload_dhcp_service(&self) -> Result<()> {
        debug!(program = %self.program, args = ?self.args, "reloading DHCP service");
        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .map_err(|e| StaticMapError::ServiceReload(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StaticMapError::ServiceReload(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            ))
            .into());
        }

        info!("DHCP service reloaded");
        Ok(())
    }
}

/// Leaves the running service alone (`--no-reload`).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReloader;

impl ServiceReloader for NoopReloader {
    fn reload_dhcp_service(&self) -> Result<()> {
        debug!("DHCP service reload skipped");
        Ok(())
    }
}
