pub mod pagination;
pub mod response;
pub mod validate;

pub use pagination::{PageQuery, PageRequest, PaginationMeta};
pub use response::{ApiResponse, ApiResult};
pub use validate::{ValidJson, ValidPath, ValidQuery};
