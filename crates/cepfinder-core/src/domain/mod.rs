//! # Domain Models
//!
//! Canonical domain types shared by every provider adapter.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ZipCode`] | Validated, digits-only CEP |
//! | [`Address`] | Provider-neutral address record |
//! | [`UtcDateTime`] | UTC timestamp attached to provider failures |

mod address;
mod timestamp;
mod zip_code;

pub use address::Address;
pub use timestamp::UtcDateTime;
pub use zip_code::{strip_non_digits, ZipCode};
