mod category;
mod issue;
mod pagination;

pub use category::Category;
pub use issue::IssueRecord;
pub use pagination::Pagination;
