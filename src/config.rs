use clap::Args;

/// Literal user id used when no session is signed in.
pub const ANONYMOUS_USER: &str = "anonymous";
/// Substituted when the provider reports success without a token.
pub const UNKNOWN_TRANSACTION: &str = "unknown";

/// Naming and sizing knobs for the recorder.
///
/// Defaults match the layout the storefront database already uses, so they
/// only need overriding for drills against a scratch keyspace.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RecorderConfig {
    /// Root segment of ledger paths (`{root}/{user}/{key}`).
    #[arg(long, default_value = "transactions")]
    pub ledger_root: String,

    /// Root segment of cart paths (`{root}/{user}/items`).
    #[arg(long, default_value = "carts")]
    pub cart_root: String,

    /// User id recorded when nobody is signed in.
    #[arg(long, default_value = ANONYMOUS_USER)]
    pub anonymous_user: String,

    /// Transaction id recorded when a success arrives without a token.
    #[arg(long, default_value = UNKNOWN_TRANSACTION)]
    pub unknown_transaction: String,

    /// Buffered events per broadcast subscriber before it starts lagging.
    #[arg(long, default_value_t = 256)]
    pub broadcast_capacity: usize,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            ledger_root: "transactions".to_string(),
            cart_root: "carts".to_string(),
            anonymous_user: ANONYMOUS_USER.to_string(),
            unknown_transaction: UNKNOWN_TRANSACTION.to_string(),
            broadcast_capacity: 256,
        }
    }
}
