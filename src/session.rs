//! Session state - iteration numbering and the claimed-port pool
//!
//! An explicit struct owned by the iteration controller, never ambient
//! process state. Mutated only between pipeline states; torn down with
//! the process.

use std::collections::HashSet;

use tracing::debug;

/// Per-run session state
#[derive(Debug, Clone)]
pub struct Session {
    base_port: u16,
    iteration: u32,
    claimed_ports: HashSet<u16>,
}

impl Session {
    /// Fresh session: iteration 1, no ports claimed
    pub fn new(base_port: u16) -> Self {
        Self {
            base_port,
            iteration: 1,
            claimed_ports: HashSet::new(),
        }
    }

    /// Current iteration number, starting at 1
    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    /// Port to try for the current iteration, `None` once the pool is spent
    ///
    /// Starts at `base_port + iteration - 1` and skips anything already
    /// claimed in this run, so a retry after a port conflict moves to the
    /// next unclaimed port instead of hammering the same one. Returns
    /// `None` when every port from the preferred one up through
    /// `u16::MAX` has been claimed.
    pub fn port_for_iteration(&self) -> Option<u16> {
        let preferred = u32::from(self.base_port) + (self.iteration - 1);
        let mut candidate = preferred.min(u32::from(u16::MAX)) as u16;
        while self.claimed_ports.contains(&candidate) {
            if candidate == u16::MAX {
                return None;
            }
            candidate += 1;
        }
        Some(candidate)
    }

    /// Record a port as used up for this run
    ///
    /// Claimed on a successful bind, and also on a conflict, so the port
    /// is never offered again this session.
    pub fn claim(&mut self, port: u16) {
        debug!(port, "Session::claim: called");
        self.claimed_ports.insert(port);
    }

    /// Ports claimed so far in this run
    pub fn claimed_ports(&self) -> &HashSet<u16> {
        &self.claimed_ports
    }

    /// Move to the next iteration
    pub fn advance(&mut self) {
        self.iteration += 1;
        debug!(iteration = self.iteration, "Session::advance: called");
    }
}
