pub mod models;
pub mod money;
pub mod pii;

pub use models::notices::{Notice, NoticeKind, Severity};
pub use money::{Money, MoneyError};
pub use pii::Masked;
