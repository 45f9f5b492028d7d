//! gofinances-core: transaction model, summarizer and locale formatting for GoFinances

pub mod categories;
pub mod locale;
pub mod register;
pub mod resume;
pub mod summary;
pub mod timestamp;
pub mod transaction;
pub mod view;

pub use categories::{CATEGORIES, CategoryInfo, find_category};
pub use locale::{DisplayContext, EN_US, Locale, LocaleError, PT_BR};
pub use register::{NewTransaction, RegisterError};
pub use resume::{CategoryTotal, CategoryTotalView, YearMonth, YearMonthError, expenses_by_category};
pub use summary::{Bucket, HighlightCard, HighlightData, Summary, summarize};
pub use timestamp::parse_timestamp;
pub use transaction::{
    Category, StoredAmount, StoredTransaction, Transaction, TransactionError, TransactionType,
    decode_value,
};
pub use view::TransactionView;
