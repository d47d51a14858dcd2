use std::fmt::{self, Display, Formatter};

/// Counters exposed by the transfer service.
///
/// These are the only observable for dropped packets: validation failures
/// on transmit bump `tx_err`, sequence mismatches and truncated inbound
/// packets bump `rx_err`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferTelemetry {
    /// Packets successfully transmitted.
    pub tx: u64,
    /// Packets successfully received and dispatched.
    pub rx: u64,
    /// Outbound packets dropped by validation.
    pub tx_err: u64,
    /// Inbound packets dropped (sequence mismatch or malformed).
    pub rx_err: u64,
    /// Idle packets among the received.
    pub rx_idle: u64,
}

impl TransferTelemetry {
    /// Resets all counters.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Display for TransferTelemetry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tx: {} ({} dropped), rx: {} ({} dropped, {} idle)",
            self.tx, self.tx_err, self.rx, self.rx_err, self.rx_idle
        )
    }
}
