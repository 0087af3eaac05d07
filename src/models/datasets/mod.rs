pub mod logs;
pub mod transfers;
