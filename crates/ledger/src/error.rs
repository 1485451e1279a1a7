/// Error type for ledger calls.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Ledger returned HTTP {0}")]
    HttpStatus(u16),

    /// The ledger answered but refused the record.
    #[error("Ledger rejected the record: {0}")]
    Rejected(String),
}
