pub mod decode;
pub mod mints;
pub mod ownership;
