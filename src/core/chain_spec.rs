//! Fork schedule: which layout applies to a payload with a given timestamp.

use crate::ssz::error::{SszError, SszResult};
use crate::ssz::version::ForkVersion;
use std::str::FromStr;

/// Resolves the fork version in force at a block timestamp.
pub trait ChainSpec {
    fn version_for_timestamp(&self, timestamp: u64) -> ForkVersion;
}

/// Activation timestamps in fork order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForkSchedule {
    activations: Vec<(ForkVersion, u64)>,
}

impl ForkSchedule {
    /// Builds a schedule from `(fork, activation timestamp)` pairs.
    ///
    /// The first entry must activate at 0; forks and timestamps must both be
    /// strictly increasing.
    pub fn new(activations: Vec<(ForkVersion, u64)>) -> SszResult<Self> {
        let Some(&(_, first)) = activations.first() else {
            return Err(SszError::InvalidForkSchedule("empty schedule".into()));
        };
        if first != 0 {
            return Err(SszError::InvalidForkSchedule(format!(
                "first fork activates at {first}, expected 0"
            )));
        }
        for pair in activations.windows(2) {
            let ((prev_fork, prev_ts), (fork, ts)) = (pair[0], pair[1]);
            if fork <= prev_fork {
                return Err(SszError::InvalidForkSchedule(format!(
                    "{fork} listed after {prev_fork}"
                )));
            }
            if ts <= prev_ts {
                return Err(SszError::InvalidForkSchedule(format!(
                    "{fork} activates at {ts}, not after {prev_fork} at {prev_ts}"
                )));
            }
        }
        Ok(Self { activations })
    }
}

impl ChainSpec for ForkSchedule {
    fn version_for_timestamp(&self, timestamp: u64) -> ForkVersion {
        self.activations
            .iter()
            .take_while(|&&(_, activation)| activation <= timestamp)
            .last()
            .map_or(self.activations[0].0, |&(fork, _)| fork)
    }
}

impl FromStr for ForkSchedule {
    type Err = SszError;

    /// Parses `deneb=0,electra=1700000000`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut activations = Vec::new();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, ts) = entry.split_once('=').ok_or_else(|| {
                SszError::InvalidForkSchedule(format!("expected fork=timestamp, got {entry:?}"))
            })?;
            let fork: ForkVersion = name.parse()?;
            let ts = ts.trim().parse::<u64>().map_err(|_| {
                SszError::InvalidForkSchedule(format!("invalid timestamp in {entry:?}"))
            })?;
            activations.push((fork, ts));
        }
        Self::new(activations)
    }
}
