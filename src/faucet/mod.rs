//! The withdrawal pipeline.
//!
//! # Data Flow
//! ```text
//! JSON claim payload
//!     → claim.rs (field presence, signature shape)
//!     → validator.rs (fetches one on-chain state snapshot, then applies
//!                     the variant business rules purely over it)
//!     → verifier.rs (anti-replay nonce, EIP-712 signature recovery)
//!     → submitter.rs (gas pricing, serialized nonce fetch, sign, broadcast)
//!     → transaction hash
//! ```
//!
//! # Design Decisions
//! - One validator/verifier/submitter path per faucet variant, dispatched
//!   once on the variant enum
//! - Claims are immutable after construction; outcomes are terminal
//! - The recovered signer, not the caller-supplied address, becomes the
//!   on-chain recipient

pub mod claim;
pub mod outcome;
pub mod submitter;
pub mod validator;
pub mod verifier;

pub use claim::{ClassicClaim, PowClaim, RawWithdrawalClaim, SignatureParts};
pub use outcome::{AcceptedWithdrawal, Rejection, SubmittedWithdrawal, WithdrawalCall};
pub use validator::{ClassicFaucetState, PowFaucetState};
