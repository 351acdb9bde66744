pub mod address;
pub mod cipher;
pub mod tx;
pub mod wallet;
