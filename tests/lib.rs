// Shared fixtures for the integration tests
pub use cepfinder_core::{Address, ZipCode};

pub fn zip(value: &str) -> ZipCode {
    ZipCode::parse(value).expect("valid zip code")
}

/// The address every scenario resolves 01310-100 to.
pub fn paulista() -> Address {
    Address::new("01310100", "SP", "São Paulo", "Bela Vista", "Avenida Paulista")
}
