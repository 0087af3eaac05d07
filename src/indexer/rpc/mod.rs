pub mod logs;
pub mod receipts;
